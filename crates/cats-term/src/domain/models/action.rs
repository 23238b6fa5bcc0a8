/// Requests from the UI to the actions service, processed strictly in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A raw command line typed by the user.
    Submit(String),
    ShowCatalogs,
    ShowCommands,
    /// Close any session and return to the welcome screen.
    Reset,
    Quit,
}
