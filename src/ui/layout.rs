use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const LOG_PANE_HEIGHT: u16 = 10;
pub const NAME_INPUT_HEIGHT: u16 = 3;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (tab_bar, body) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], area)
        } else {
            let [tab, body] = Layout::vertical([
                Constraint::Length(TAB_BAR_HEIGHT),
                Constraint::Fill(1),
            ])
            .areas(area);
            (Self::split_tab_bar(tab), body)
        };

        if !show_logs {
            return LayoutAreas { tab_bar, main: body, logs: None };
        }

        let [main, logs] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(LOG_PANE_HEIGHT),
        ])
        .areas(body);

        LayoutAreas { tab_bar, main, logs: Some(logs) }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(area)
    }
}

/// Players tab: name inputs across the top, candidates beside the results.
pub struct PlayersAreas {
    pub first_input: Rect,
    pub last_input: Rect,
    pub candidates: Rect,
    pub results: Rect,
}

impl PlayersAreas {
    pub fn new(area: Rect) -> Self {
        let [inputs, body] = Layout::vertical([
            Constraint::Length(NAME_INPUT_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [first_input, last_input] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(inputs);
        let [candidates, results] =
            Layout::horizontal([Constraint::Length(26), Constraint::Fill(1)]).areas(body);
        Self { first_input, last_input, candidates, results }
    }
}

/// Teams tab: checkbox list on the left, results on the right.
pub fn split_teams(area: Rect) -> [Rect; 2] {
    Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).areas(area)
}
