pub mod client;
pub mod decode;
pub mod filter;
pub mod index;
pub mod presenter;

pub use client::{
    DEFAULT_MAX_ATTEMPTS, LoadError, LoadOptions, LoadResult, LoadedRoster, RosterApi, RosterSource,
    validate,
};
pub use decode::{DecodeError, Decoded, decode, encode};
pub use filter::{
    ActiveQuery, FilterEvent, FilterOutput, FilterState, ResultSet, evaluate, filter_by_exact_name,
    filter_by_teams, match_first_name_prefix, match_last_name_prefix,
};
pub use index::{NamePair, RosterIndex, build_index};
pub use presenter::{
    Column, DEFAULT_PAGE_SIZE, Field, PageView, ROSTER_COLUMNS, SortDirection, TablePresenter,
};

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Domain types: typed player rows, independent of the CSV wire format
// ---------------------------------------------------------------------------

pub const FIRST_NAME_COLUMN: &str = "FIRST_NAME";
pub const LAST_NAME_COLUMN: &str = "LAST_NAME";
pub const TEAMS_COLUMN: &str = "TEAMS";

/// One decoded player record.
///
/// The three columns the filters care about are lifted into typed fields at
/// decode time and default to `""` when the source row lacks them, so nothing
/// downstream has to guard against missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    pub first_name: String,
    pub last_name: String,
    /// Comma separated team names, possibly empty.
    pub teams: String,
    /// Columns other than the three above, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Player {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        teams: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            teams: teams.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Look up a value by its CSV column name.
    pub fn field(&self, column: &str) -> Option<&str> {
        match column {
            FIRST_NAME_COLUMN => Some(&self.first_name),
            LAST_NAME_COLUMN => Some(&self.last_name),
            TEAMS_COLUMN => Some(&self.teams),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Team names as listed on the row: split on commas, leading whitespace
    /// after each comma dropped, lower-cased.
    pub fn team_keys(&self) -> Vec<String> {
        if self.teams.is_empty() {
            return Vec::new();
        }
        self.teams
            .split(',')
            .map(|t| t.trim_start().to_lowercase())
            .collect()
    }
}

/// The full row set produced by one load. Replaced wholesale on reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub headers: Vec<String>,
    pub players: Vec<Player>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_covers_typed_and_extra_columns() {
        let mut p = Player::new("Wayne", "Gretzky", "Edmonton Oilers");
        p.extra.insert("POSITION".into(), "C".into());
        assert_eq!(p.field(FIRST_NAME_COLUMN), Some("Wayne"));
        assert_eq!(p.field(TEAMS_COLUMN), Some("Edmonton Oilers"));
        assert_eq!(p.field("POSITION"), Some("C"));
        assert_eq!(p.field("NUMBER"), None);
    }

    #[test]
    fn team_keys_split_on_comma_and_following_space() {
        let p = Player::new("a", "b", "Boston Bruins, Detroit Red Wings,Chicago Blackhawks");
        assert_eq!(
            p.team_keys(),
            vec!["boston bruins", "detroit red wings", "chicago blackhawks"]
        );
    }

    #[test]
    fn team_keys_empty_when_teams_blank() {
        assert!(Player::new("a", "b", "").team_keys().is_empty());
    }
}
