use std::io;

use anyhow::Result;
use cats_term::application::ui::destruct_terminal_for_panic;
use cats_term::application::ui::start_loop;
use cats_term::domain::models::Action;
use cats_term::domain::models::Event;
use cats_term::domain::services::ActionsService;
use cats_term::domain::services::AppStateProps;
use cats_term::domain::services::CommandRouter;
use cats_term::domain::services::RouterSettings;
use cats_term::domain::services::SessionController;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task;

/// Runs the interactive terminal until the user quits. The actions service
/// runs as a background task owning the session; the UI loop runs here.
pub async fn start(
    sessions: SessionController,
    settings: RouterSettings,
    app_state_props: AppStateProps,
) -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let router = CommandRouter::new(sessions, event_tx.clone(), settings);

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(router, event_tx, &mut action_rx).await;
    });

    enable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = tokio::select! {
        res = start_loop(&mut terminal, app_state_props, action_tx, event_rx) => res,
        Some(res) = background_futures.join_next() => match res {
            Ok(res) => res,
            Err(err) => Err(err.into()),
        },
    };

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = ?err, "terminal stopped with an error");
    }
    tracing::info!("terminal closed");

    return result;
}
