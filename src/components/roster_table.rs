use roster_api::PageView;
use tui::buffer::Buffer;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::widgets::{Paragraph, Row, Table, Widget};

use crate::draw::default_border;

pub const EMPTY_MESSAGE: &str = "No matching players";

/// First name, last name, teams.
const COLUMN_WIDTHS: [Constraint; 3] = [
    Constraint::Percentage(18),
    Constraint::Percentage(18),
    Constraint::Fill(1),
];

/// One page of filter results with a header row and a page footer.
pub struct RosterTable<'a> {
    pub view: PageView<'a>,
    pub title: &'a str,
    pub focused: bool,
}

impl Widget for RosterTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused { Color::White } else { Color::DarkGray };
        let block = default_border(border).title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 {
            return;
        }

        let [table_area, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        if self.view.rows.is_empty() {
            Paragraph::new(EMPTY_MESSAGE)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .render(table_area, buf);
        } else {
            let header = Row::new(self.view.headers.iter().map(String::as_str)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
            let rows = self
                .view
                .rows
                .iter()
                .map(|values| Row::new(values.iter().copied()));
            Table::new(rows, COLUMN_WIDTHS)
                .header(header)
                .column_spacing(2)
                .render(table_area, buf);
        }

        Paragraph::new(page_label(&self.view))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right)
            .render(footer, buf);
    }
}

pub fn page_label(view: &PageView) -> String {
    let noun = if view.total == 1 { "player" } else { "players" };
    if view.page_count == 0 {
        return format!("0 {noun}");
    }
    format!(
        "Page {}/{}  |  {} {noun}",
        view.page + 1,
        view.page_count,
        view.total
    )
}
