use super::LogHistory;
use crate::domain::models::DisplayBlock;
use crate::domain::models::DisplayLine;
use crate::domain::models::DisplayUpdate;

/// The log pane: the history plus the blocks currently visible.
///
/// Clearing and animation frames only touch the view. History navigation
/// rebuilds the view from the history's replay prefix.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    history: LogHistory,
    view: Vec<DisplayBlock>,
}

impl Screen {
    pub fn new(history_capacity: usize) -> Screen {
        return Screen {
            history: LogHistory::new(history_capacity),
            view: vec![],
        };
    }

    pub fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::Clear => {
                self.view.clear();
            }
            DisplayUpdate::Transient(block) => {
                self.view.clear();
                self.view.push(block);
            }
            DisplayUpdate::Write(block) => {
                self.history.write(block.clone());
                self.view.push(block);
            }
            DisplayUpdate::ClearHistory => {
                self.history.clear();
                self.view.clear();
            }
        }
    }

    /// Returns true when the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.history.previous().is_none() {
            return false;
        }
        self.replay();
        return true;
    }

    pub fn next(&mut self) -> bool {
        if self.history.next().is_none() {
            return false;
        }
        self.replay();
        return true;
    }

    fn replay(&mut self) {
        self.view = self.history.replay().cloned().collect();
    }

    pub fn view(&self) -> &[DisplayBlock] {
        return &self.view;
    }

    pub fn lines(&self) -> impl Iterator<Item = &DisplayLine> {
        return self.view.iter().flat_map(|b| b.lines().iter());
    }

    pub fn history(&self) -> &LogHistory {
        return &self.history;
    }

    pub fn plain_text(&self) -> String {
        return self
            .view
            .iter()
            .map(DisplayBlock::plain_text)
            .collect::<Vec<String>>()
            .join("\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Tone;

    fn text(s: &str) -> DisplayBlock {
        return DisplayBlock::text(s, Tone::Plain);
    }

    #[test]
    fn it_keeps_transient_frames_out_of_history() {
        let mut screen = Screen::new(10);
        screen.apply(DisplayUpdate::Transient(text("frame 1")));
        screen.apply(DisplayUpdate::Transient(text("frame 2")));
        assert_eq!(screen.plain_text(), "frame 2");

        screen.apply(DisplayUpdate::Clear);
        screen.apply(DisplayUpdate::Write(text("result")));
        assert_eq!(screen.plain_text(), "result");
        assert_eq!(screen.history().len(), 1);
    }

    #[test]
    fn it_rebuilds_view_from_history_prefix() {
        let mut screen = Screen::new(10);
        for s in ["a", "b", "c"] {
            screen.apply(DisplayUpdate::Clear);
            screen.apply(DisplayUpdate::Write(text(s)));
        }

        assert!(screen.previous());
        assert_eq!(screen.plain_text(), "a\nb");
        assert!(screen.previous());
        assert!(!screen.previous());
        assert_eq!(screen.plain_text(), "a");
        assert!(screen.next());
        assert!(screen.next());
        assert!(!screen.next());
        assert_eq!(screen.plain_text(), "a\nb\nc");
    }

    #[test]
    fn it_clears_history() {
        let mut screen = Screen::new(10);
        screen.apply(DisplayUpdate::Write(text("a")));
        screen.apply(DisplayUpdate::ClearHistory);
        assert!(screen.history().is_empty());
        assert!(screen.view().is_empty());
    }
}
