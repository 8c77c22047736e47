use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::roster_table::RosterTable;
use crate::state::app_state::{InputFocus, RosterState};
use crate::state::network::{LoadPhase, LoadingState};
use crate::ui::layout::{LayoutAreas, PlayersAreas, split_teams};

static TABS: &[&str; 2] = &["Players", "Teams"];

const HELP_TEXT: &str = "\
Players tab
  type         edit the focused name (Tab moves first -> last -> table)
  Up/Down      highlight an autocomplete candidate
  Enter        take the candidate, then search on the last name
  Esc          leave the name inputs (/ returns to them)

Teams tab
  j/k          move    Space  toggle team    c  clear selection
  Results list players who played for every selected team.

Results
  F1 F2 F3     sort by first name, last name, teams (asc, desc, off)
  PgDn/PgUp    next/previous page (h/l and Home/End outside inputs)

General
  1 2 ?        switch tab    F5 or r  reload roster
  \"            toggle logs   f  full screen   q or Ctrl-C  quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Players if app.state.roster.is_loaded() => {
                draw_players(f, layout.main, &app.state.roster)
            }
            MenuItem::Teams if app.state.roster.is_loaded() => {
                draw_teams(f, layout.main, &app.state.roster)
            }
            MenuItem::Players | MenuItem::Teams => draw_load_status(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Players => 0,
        MenuItem::Teams => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    // A failed reload keeps the previous roster on screen; flag it here.
    let (status, status_style) = match (
        app.state.roster.loaded_at.as_deref(),
        app.state.last_error.is_some(),
    ) {
        (Some(_), true) => ("reload failed, F5 retries  Help: ? ".to_string(), style.fg(Color::Red)),
        (Some(at), false) => (
            format!("{} players @ {at}  Help: ? ", app.state.roster.players().len()),
            style,
        ),
        (None, _) => ("Help: ? ".to_string(), style),
    };
    let help = Paragraph::new(status)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(status_style);
    f.render_widget(help, tab_bar[1]);
}

/// Shown until the first roster arrives, or after it failed to load.
fn draw_load_status(f: &mut Frame, area: Rect, app: &App) {
    let (msg, color) = match app.state.last_error.as_deref() {
        Some(err) => (
            format!("Roster load failed:\n{err}\n\nPress F5 or r to retry"),
            Color::Red,
        ),
        None => (
            format!("Loading roster from {}...", app.settings.source),
            Color::DarkGray,
        ),
    };
    let block = default_border(color).title(" Roster ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn draw_players(f: &mut Frame, area: Rect, roster: &RosterState) {
    let areas = PlayersAreas::new(area);

    draw_name_input(
        f,
        areas.first_input,
        " First name ",
        &roster.filters.first_name_query,
        roster.focus == InputFocus::FirstName,
    );
    draw_name_input(
        f,
        areas.last_input,
        " Last name ",
        &roster.filters.last_name_query,
        roster.focus == InputFocus::LastName,
    );

    let (title, candidates) = match roster.focus {
        InputFocus::LastName => (" Last names ", &roster.output.last_name_candidates),
        _ => (" First names ", &roster.output.first_name_candidates),
    };
    let cursor = roster.candidate_cursor.filter(|_| roster.focus.is_text_input());
    let items: Vec<ListItem> = candidates
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let label = if name.is_empty() { "(blank)" } else { name.as_str() };
            let style = if Some(i) == cursor {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(label.to_string(), style)))
        })
        .collect();
    f.render_widget(
        List::new(items).block(default_border(Color::DarkGray).title(title)),
        areas.candidates,
    );

    draw_results(f, areas.results, roster, roster.focus == InputFocus::Results);
}

fn draw_name_input(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let color = if focused { Color::Yellow } else { Color::DarkGray };
    let text = if focused { format!("{value}_") } else { value.to_string() };
    f.render_widget(
        Paragraph::new(text).block(default_border(color).title(title.to_string())),
        area,
    );
}

fn draw_teams(f: &mut Frame, area: Rect, roster: &RosterState) {
    let [list_area, results_area] = split_teams(area);

    let block = default_border(Color::White).title(format!(
        " Teams ({} selected) ",
        roster.filters.selected_teams.len()
    ));
    let inner = block.inner(list_area);
    f.render_widget(block, list_area);

    let teams = roster.team_names();
    let visible = usize::from(inner.height);
    let offset = roster.team_cursor.saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = teams
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, team)| {
            let mark = if roster.filters.is_team_selected(team) { "[x]" } else { "[ ]" };
            let style = if i == roster.team_cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{mark} {team}"), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);

    draw_results(f, results_area, roster, false);
}

fn draw_results(f: &mut Frame, area: Rect, roster: &RosterState, focused: bool) {
    let view = roster.table.present(roster.players());
    f.render_widget(
        RosterTable {
            view,
            title: "Results",
            focused,
        },
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    let Some(indicator) = loading.indicator() else {
        return;
    };
    let style = match loading.phase() {
        LoadPhase::Failed => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(indicator.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
