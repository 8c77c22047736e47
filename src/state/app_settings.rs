use log::{LevelFilter, warn};
use roster_api::{DEFAULT_MAX_ATTEMPTS, DEFAULT_PAGE_SIZE, LoadOptions, RosterSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "data/players.csv";

/// On-disk settings. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    source: Option<String>,
    page_size: Option<usize>,
    expected_team_count: Option<usize>,
    max_attempts: Option<u32>,
    log_level: Option<String>,
    full_screen: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub source: RosterSource,
    pub page_size: usize,
    pub expected_team_count: Option<usize>,
    pub max_attempts: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            source: RosterSource::parse(DEFAULT_SOURCE),
            page_size: DEFAULT_PAGE_SIZE,
            expected_team_count: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl AppSettings {
    /// Settings file, then `ROSTERTUI_*` environment variables, then the
    /// command line source argument. Later layers win.
    pub fn load(cli_source: Option<String>) -> Self {
        let file = read_settings_file();
        let env = |key: &str| std::env::var(key).ok();
        let mut settings = Self::resolve(file, env, cli_source);

        if settings.source == RosterSource::parse(DEFAULT_SOURCE)
            && let Some(path) = bundled_roster()
        {
            settings.source = RosterSource::Path(path);
        }
        settings
    }

    fn resolve(
        file: SettingsFile,
        env: impl Fn(&str) -> Option<String>,
        cli_source: Option<String>,
    ) -> Self {
        let mut settings = Self::default();

        if let Some(source) = file.source {
            settings.source = RosterSource::parse(&source);
        }
        if let Some(page_size) = file.page_size.filter(|n| *n > 0) {
            settings.page_size = page_size;
        }
        settings.expected_team_count = file.expected_team_count;
        if let Some(attempts) = file.max_attempts.filter(|n| *n > 0) {
            settings.max_attempts = attempts;
        }
        settings.log_level = file.log_level.as_deref().and_then(parse_level);
        settings.full_screen = file.full_screen.unwrap_or(false);

        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(source) = env("ROSTERTUI_CSV") {
            settings.source = RosterSource::parse(&source);
        }
        if let Some(page_size) = env("ROSTERTUI_PAGE_SIZE").and_then(|v| parse_positive(&v)) {
            settings.page_size = page_size;
        }
        if let Some(teams) = env("ROSTERTUI_EXPECTED_TEAMS").and_then(|v| v.trim().parse().ok()) {
            settings.expected_team_count = Some(teams);
        }
        if let Some(level) = env("ROSTERTUI_LOG").as_deref().and_then(parse_level) {
            settings.log_level = Some(level);
        }

        if let Some(source) = cli_source.filter(|s| !s.trim().is_empty()) {
            settings.source = RosterSource::parse(&source);
        }

        settings
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            source: self.source.clone(),
            expected_team_count: self.expected_team_count,
            max_attempts: self.max_attempts,
        }
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().parse() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("ignoring unknown log level {raw:?}");
            None
        }
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse().ok().filter(|n| *n > 0)
}

/// The sample roster next to the installed binary, for when the working
/// directory has no `data/players.csv` of its own.
fn bundled_roster() -> Option<PathBuf> {
    if Path::new(DEFAULT_SOURCE).is_file() {
        return None;
    }
    let exe = std::env::current_exe().ok()?;
    find_roster_above(exe.parent()?)
}

/// First `data/players.csv` found in `start` or one of its ancestors.
fn find_roster_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(DEFAULT_SOURCE))
        .find(|path| path.is_file())
}

pub fn settings_path() -> Option<PathBuf> {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return Some(PathBuf::from(config_dir).join("rostertui").join("settings.json"));
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("rostertui")
                .join("settings.json"),
        );
    }
    None
}

fn read_settings_file() -> SettingsFile {
    let Some(path) = settings_path() else {
        return SettingsFile::default();
    };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return SettingsFile::default();
    };
    match serde_json::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            warn!("invalid settings file {}: {e}", path.display());
            SettingsFile::default()
        }
    }
}
