use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, InputFocus};
use crate::state::messages::NetworkRequest;
use chrono::Local;
use roster_api::LoadedRoster;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Players,
    Teams,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(cli_source: Option<String>) -> Self {
        let settings = AppSettings::load(cli_source);

        let app = Self {
            state: AppState::new(settings.page_size),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn load_request(&self) -> NetworkRequest {
        NetworkRequest::LoadRoster {
            options: self.settings.load_options(),
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_roster_loaded(&mut self, loaded: LoadedRoster) {
        self.state.last_error = None;
        let loaded_at = Local::now().format("%H:%M:%S").to_string();
        self.state.roster.load(loaded, loaded_at);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    /// True while printable keys belong to a name input rather than to the
    /// global bindings.
    pub fn is_typing(&self) -> bool {
        self.state.active_tab == MenuItem::Players
            && self.state.roster.is_loaded()
            && self.state.roster.focus.is_text_input()
    }

    // -----------------------------------------------------------------------
    // Players tab
    // -----------------------------------------------------------------------

    pub fn name_input_char(&mut self, c: char) {
        self.state.roster.push_char(c);
    }

    pub fn name_input_backspace(&mut self) {
        self.state.roster.pop_char();
    }

    pub fn cycle_name_focus(&mut self) {
        self.state.roster.cycle_focus();
    }

    pub fn leave_name_input(&mut self) {
        let roster = &mut self.state.roster;
        roster.focus = InputFocus::Results;
        roster.candidate_cursor = None;
    }

    pub fn candidate_down(&mut self) {
        self.state.roster.candidate_down();
    }

    pub fn candidate_up(&mut self) {
        self.state.roster.candidate_up();
    }

    pub fn confirm_name_input(&mut self) {
        self.state.roster.confirm_name_input();
    }

    pub fn submit_name(&mut self) {
        self.state.roster.submit_name();
    }

    // -----------------------------------------------------------------------
    // Teams tab
    // -----------------------------------------------------------------------

    pub fn team_cursor_down(&mut self) {
        self.state.roster.team_cursor_down();
    }

    pub fn team_cursor_up(&mut self) {
        self.state.roster.team_cursor_up();
    }

    pub fn toggle_team(&mut self) {
        self.state.roster.toggle_team_at_cursor();
    }

    pub fn clear_teams(&mut self) {
        self.state.roster.clear_teams();
    }

    // -----------------------------------------------------------------------
    // Result table
    // -----------------------------------------------------------------------

    pub fn sort_by(&mut self, column: usize) {
        self.state.roster.toggle_sort(column);
    }

    pub fn next_page(&mut self) {
        self.state.roster.table.next_page();
    }

    pub fn prev_page(&mut self) {
        self.state.roster.table.prev_page();
    }

    pub fn first_page(&mut self) {
        self.state.roster.table.first_page();
    }

    pub fn last_page(&mut self) {
        self.state.roster.table.last_page();
    }
}
