use crate::app::{App, MenuItem};
use crate::state::app_state::InputFocus;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut reload = false;

    // Always available, even while a name input has focus.
    match (key_event.code, key_event.modifiers) {
        (Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        (KeyCode::F(5), _) => reload = true,
        (KeyCode::F(n @ 1..=3), _) => {
            guard.sort_by(usize::from(n - 1));
            return;
        }
        (KeyCode::PageDown, _) => {
            guard.next_page();
            return;
        }
        (KeyCode::PageUp, _) => {
            guard.prev_page();
            return;
        }
        _ => {}
    }

    if !reload && guard.is_typing() {
        match key_event.code {
            Char(c) => guard.name_input_char(c),
            KeyCode::Backspace => guard.name_input_backspace(),
            KeyCode::Tab => guard.cycle_name_focus(),
            KeyCode::Down => guard.candidate_down(),
            KeyCode::Up => guard.candidate_up(),
            KeyCode::Enter => guard.confirm_name_input(),
            KeyCode::Esc => guard.leave_name_input(),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        _ if reload => {}

        // Quit
        (_, Char('q'), _) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Players),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Teams),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Players tab, table focused
        (MenuItem::Players, KeyCode::Tab, _) => guard.cycle_name_focus(),
        (MenuItem::Players, Char('/'), _) => {
            guard.state.roster.focus = InputFocus::FirstName;
        }
        (MenuItem::Players, KeyCode::Enter, _) => guard.submit_name(),

        // Teams tab
        (MenuItem::Teams, Char('j') | KeyCode::Down, _) => guard.team_cursor_down(),
        (MenuItem::Teams, Char('k') | KeyCode::Up, _) => guard.team_cursor_up(),
        (MenuItem::Teams, Char(' ') | KeyCode::Enter, _) => guard.toggle_team(),
        (MenuItem::Teams, Char('c'), _) => guard.clear_teams(),

        // Result paging
        (MenuItem::Players | MenuItem::Teams, Char('l') | KeyCode::Right, _) => guard.next_page(),
        (MenuItem::Players | MenuItem::Teams, Char('h') | KeyCode::Left, _) => guard.prev_page(),
        (MenuItem::Players | MenuItem::Teams, KeyCode::Home, _) => guard.first_page(),
        (MenuItem::Players | MenuItem::Teams, KeyCode::End, _) => guard.last_page(),

        // Global
        (_, Char('r'), _) => reload = true,
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if reload {
        let request = guard.load_request();
        drop(guard);
        let _ = network_requests.send(request).await;
    }
}
