mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker, SPINNER_INTERVAL};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{debug, error};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliCommand {
    Run { source: Option<String> },
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let source = match parse_cli_args(std::env::args().skip(1)) {
        Ok(CliCommand::Run { source }) => source,
        Ok(CliCommand::Exit) => return Ok(()),
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = Arc::new(Mutex::new(App::new(source)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Spinner ticks
    let ticker = tokio::spawn(tick_task(ui_event_tx.clone()));

    // Trigger roster load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    ticker.abort();
    network_task.abort();

    Ok(())
}

fn parse_cli_args(args: impl IntoIterator<Item = String>) -> Result<CliCommand, String> {
    let mut source = None;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return Ok(CliCommand::Exit);
            }
            "-V" | "--version" => {
                println!("rostertui {}", env!("CARGO_PKG_VERSION"));
                return Ok(CliCommand::Exit);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown argument: {flag}")),
            _ if source.is_some() => return Err(format!("Unexpected argument: {arg}")),
            _ => source = Some(arg),
        }
    }

    Ok(CliCommand::Run { source })
}

fn usage_text() -> &'static str {
    "rostertui - search a CSV roster of hockey players

Usage:
  rostertui [PATH|URL]
  rostertui --help
  rostertui --version

The roster needs FIRST_NAME, LAST_NAME and TEAMS columns; TEAMS holds a
comma separated list. Defaults to data/players.csv in the working
directory, falling back to the copy shipped above the rostertui binary.

Environment:
  ROSTERTUI_CSV              Roster path or http(s) URL
  ROSTERTUI_PAGE_SIZE        Result rows per page (default 10)
  ROSTERTUI_EXPECTED_TEAMS   Reject rosters with a different distinct team count
  ROSTERTUI_LOG              Log level: error, warn, info, debug or trace

Settings file:
  $XDG_CONFIG_HOME/rostertui/settings.json (or ~/.config/rostertui/settings.json)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw =
                    handle_ui_event(ui_event, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let request = app.lock().await.load_request();
            let _ = network_requests.send(request).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::Tick => loading.tick(),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadStarted { source } => {
            debug!("loading roster from {source}");
            loading.begin();
        }
        NetworkResponse::RosterLoaded { loaded } => {
            loading.finish(true);
            let mut guard = app.lock().await;
            guard.on_roster_loaded(*loaded);
        }
        NetworkResponse::Error { message } => {
            error!("Roster load failed: {message}");
            loading.finish(false);
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

async fn tick_task(ui_events: mpsc::Sender<UiEvent>) {
    let mut interval = tokio::time::interval(SPINNER_INTERVAL);
    loop {
        interval.tick().await;
        if ui_events.send(UiEvent::Tick).await.is_err() {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_runs_with_configured_source() {
        assert_eq!(parse_cli_args(args(&[])), Ok(CliCommand::Run { source: None }));
    }

    #[test]
    fn positional_argument_is_the_source() {
        assert_eq!(
            parse_cli_args(args(&["https://example.com/players.csv"])),
            Ok(CliCommand::Run { source: Some("https://example.com/players.csv".into()) })
        );
    }

    #[test]
    fn rejects_unknown_flags_and_extra_arguments() {
        assert!(parse_cli_args(args(&["--verbose"])).is_err());
        assert!(parse_cli_args(args(&["a.csv", "b.csv"])).is_err());
    }

    #[test]
    fn version_exits() {
        assert_eq!(parse_cli_args(args(&["--version"])), Ok(CliCommand::Exit));
    }
}
