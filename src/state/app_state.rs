use crate::app::MenuItem;
use roster_api::{
    FilterEvent, FilterOutput, FilterState, LoadedRoster, Player, ROSTER_COLUMNS, TablePresenter,
    evaluate,
};

// ---------------------------------------------------------------------------
// Name search focus
// ---------------------------------------------------------------------------

/// Which part of the Players tab receives typed keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFocus {
    #[default]
    FirstName,
    LastName,
    Results,
}

impl InputFocus {
    pub fn next(self) -> Self {
        match self {
            InputFocus::FirstName => InputFocus::LastName,
            InputFocus::LastName => InputFocus::Results,
            InputFocus::Results => InputFocus::FirstName,
        }
    }

    pub fn is_text_input(self) -> bool {
        matches!(self, InputFocus::FirstName | InputFocus::LastName)
    }
}

// ---------------------------------------------------------------------------
// Roster / filter state
// ---------------------------------------------------------------------------

/// The loaded row set plus everything derived from it for display.
///
/// `filters` only changes through [`RosterState::dispatch`], which re-runs the
/// filter pass and hands new results to the table presenter.
#[derive(Debug, Default)]
pub struct RosterState {
    pub loaded: Option<LoadedRoster>,
    pub loaded_at: Option<String>,
    pub filters: FilterState,
    pub output: FilterOutput,
    pub table: TablePresenter,
    pub focus: InputFocus,
    /// Highlighted autocomplete candidate for the focused name input.
    pub candidate_cursor: Option<usize>,
    pub team_cursor: usize,
}

impl RosterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            table: TablePresenter::new(&ROSTER_COLUMNS, page_size),
            ..Self::default()
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn players(&self) -> &[Player] {
        self.loaded
            .as_ref()
            .map(|l| l.roster.players.as_slice())
            .unwrap_or(&[])
    }

    pub fn team_names(&self) -> Vec<&str> {
        self.loaded
            .as_ref()
            .map(|l| l.index.teams.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Swap in a freshly loaded roster. Filters carry over; team selections
    /// the new roster no longer lists are dropped.
    pub fn load(&mut self, loaded: LoadedRoster, loaded_at: String) {
        self.filters
            .selected_teams
            .retain(|t| loaded.index.teams.contains(t));
        self.team_cursor = self
            .team_cursor
            .min(loaded.index.team_count().saturating_sub(1));
        self.candidate_cursor = None;
        self.loaded = Some(loaded);
        self.loaded_at = Some(loaded_at);
        self.refresh(true);
    }

    /// Fold `event` into the filter state. Ignored until a roster is loaded.
    pub fn dispatch(&mut self, event: FilterEvent) -> bool {
        if self.loaded.is_none() {
            return false;
        }
        self.filters = std::mem::take(&mut self.filters).apply(event);
        self.refresh(false);
        true
    }

    fn refresh(&mut self, force: bool) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let output = evaluate(&loaded.roster, &loaded.index, &self.filters);
        if force || output.results != *self.table.results() {
            self.table
                .set_results(&loaded.roster.players, output.results.clone());
        }
        self.output = output;
    }

    // -----------------------------------------------------------------------
    // Name inputs
    // -----------------------------------------------------------------------

    pub fn focused_query(&self) -> Option<&str> {
        match self.focus {
            InputFocus::FirstName => Some(&self.filters.first_name_query),
            InputFocus::LastName => Some(&self.filters.last_name_query),
            InputFocus::Results => None,
        }
    }

    pub fn focused_candidates(&self) -> &[String] {
        match self.focus {
            InputFocus::FirstName => &self.output.first_name_candidates,
            InputFocus::LastName => &self.output.last_name_candidates,
            InputFocus::Results => &[],
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
        self.candidate_cursor = None;
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(query) = self.focused_query() {
            let mut query = query.to_string();
            query.push(c);
            self.set_focused_query(query);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(query) = self.focused_query() {
            let mut query = query.to_string();
            query.pop();
            self.set_focused_query(query);
        }
    }

    fn set_focused_query(&mut self, query: String) {
        let event = match self.focus {
            InputFocus::FirstName => FilterEvent::FirstNameChanged(query),
            InputFocus::LastName => FilterEvent::LastNameChanged(query),
            InputFocus::Results => return,
        };
        self.candidate_cursor = None;
        self.dispatch(event);
    }

    pub fn candidate_down(&mut self) {
        let count = self.focused_candidates().len();
        if count == 0 {
            self.candidate_cursor = None;
            return;
        }
        self.candidate_cursor = Some(match self.candidate_cursor {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        });
    }

    pub fn candidate_up(&mut self) {
        self.candidate_cursor = match self.candidate_cursor {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Enter in a name input: take the highlighted candidate if there is one,
    /// then move from first to last name, or submit from the last name.
    pub fn confirm_name_input(&mut self) {
        let picked = self
            .candidate_cursor
            .and_then(|i| self.focused_candidates().get(i).cloned());
        if let Some(candidate) = picked {
            self.set_focused_query(candidate);
        }

        match self.focus {
            InputFocus::FirstName => {
                self.focus = InputFocus::LastName;
                self.candidate_cursor = None;
            }
            InputFocus::LastName => self.submit_name(),
            InputFocus::Results => {}
        }
    }

    pub fn submit_name(&mut self) {
        if self.dispatch(FilterEvent::SubmitName) {
            self.focus = InputFocus::Results;
            self.candidate_cursor = None;
        }
    }

    // -----------------------------------------------------------------------
    // Team picker
    // -----------------------------------------------------------------------

    pub fn team_cursor_down(&mut self) {
        let count = self.loaded.as_ref().map_or(0, |l| l.index.team_count());
        if self.team_cursor + 1 < count {
            self.team_cursor += 1;
        }
    }

    pub fn team_cursor_up(&mut self) {
        self.team_cursor = self.team_cursor.saturating_sub(1);
    }

    pub fn toggle_team_at_cursor(&mut self) -> bool {
        let Some(team) = self
            .loaded
            .as_ref()
            .and_then(|l| l.index.team_at(self.team_cursor))
            .map(str::to_string)
        else {
            return false;
        };
        let selected = !self.filters.is_team_selected(&team);
        self.dispatch(FilterEvent::TeamToggled { team, selected })
    }

    pub fn clear_teams(&mut self) -> bool {
        self.dispatch(FilterEvent::ClearTeams)
    }

    // -----------------------------------------------------------------------
    // Result table
    // -----------------------------------------------------------------------

    pub fn toggle_sort(&mut self, column: usize) {
        if let Some(loaded) = &self.loaded {
            self.table.toggle_sort(&loaded.roster.players, column);
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub roster: RosterState,
}

impl AppState {
    pub fn new(page_size: usize) -> Self {
        Self {
            roster: RosterState::new(page_size),
            ..Self::default()
        }
    }
}
