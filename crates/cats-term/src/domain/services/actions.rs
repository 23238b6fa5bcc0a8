use anyhow::Result;
use tokio::sync::mpsc;

use super::CommandRouter;
use super::Flow;
use crate::domain::models::Action;
use crate::domain::models::Event;

pub struct ActionsService {}

impl ActionsService {
    /// Runs actions one at a time until `quit` or until the UI drops its
    /// sender. Every action is followed by `CommandFinished`.
    pub async fn start(
        mut router: CommandRouter,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            tracing::debug!(action = ?action, "received action");

            let flow = match action {
                Action::Submit(line) => router.handle(&line).await?,
                Action::ShowCatalogs => {
                    router.show_catalogs()?;
                    Flow::Continue
                }
                Action::ShowCommands => {
                    router.show_commands()?;
                    Flow::Continue
                }
                Action::Reset => {
                    router.reset().await?;
                    Flow::Continue
                }
                Action::Quit => {
                    router.quit().await?;
                    Flow::Quit
                }
            };

            event_tx.send(Event::CommandFinished)?;
            if flow == Flow::Quit {
                event_tx.send(Event::Quit)?;
                return Ok(());
            }
        }

        router.quit().await?;
        return Ok(());
    }
}
