use crossterm::event::KeyEvent;
use roster_api::{LoadOptions, LoadedRoster};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadRoster { options: LoadOptions },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadStarted { source: String },
    /// A complete replacement row set with its index.
    RosterLoaded { loaded: Box<LoadedRoster> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Spinner frame.
    Tick,
}
