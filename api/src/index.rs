use crate::Player;
use log::debug;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePair {
    pub first_name: String,
    pub last_name: String,
}

/// Lookup structures derived from one roster. A pure function of the rows:
/// rebuild it whenever the roster is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterIndex {
    /// Distinct first names in first-seen order. Empty names are kept.
    pub first_names: Vec<String>,
    /// Distinct last names in first-seen order. Empty names are kept.
    pub last_names: Vec<String>,
    /// One pair per row, duplicates included.
    pub name_pairs: Vec<NamePair>,
    /// Distinct trimmed team names, sorted ascending.
    pub teams: BTreeSet<String>,
}

impl RosterIndex {
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Team at `pos` in display (sorted) order.
    pub fn team_at(&self, pos: usize) -> Option<&str> {
        self.teams.iter().nth(pos).map(String::as_str)
    }
}

/// Scan the rows once and build every derived lookup.
pub fn build_index(players: &[Player]) -> RosterIndex {
    let mut index = RosterIndex {
        name_pairs: Vec::with_capacity(players.len()),
        ..RosterIndex::default()
    };
    let mut seen_first: HashSet<&str> = HashSet::new();
    let mut seen_last: HashSet<&str> = HashSet::new();

    for player in players {
        if seen_first.insert(&player.first_name) {
            index.first_names.push(player.first_name.clone());
        }
        if seen_last.insert(&player.last_name) {
            index.last_names.push(player.last_name.clone());
        }
        index.name_pairs.push(NamePair {
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
        });

        if !player.teams.is_empty() {
            index.teams.extend(
                player
                    .teams
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(ToString::to_string),
            );
        }
    }

    debug!(
        "indexed {} rows: {} first names, {} last names, {} teams",
        index.name_pairs.len(),
        index.first_names.len(),
        index.last_names.len(),
        index.teams.len()
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Player> {
        vec![
            Player::new("Wayne", "Gretzky", "Edmonton Oilers, Los Angeles Kings"),
            Player::new("Brent", "Gretzky", "Tampa Bay Lightning"),
            Player::new("Wayne", "Gretzky", "Edmonton Oilers"),
            Player::new("", "Unknown", ""),
            Player::new("Bobby", "Orr", " Boston Bruins ,Chicago Blackhawks,"),
        ]
    }

    #[test]
    fn name_pairs_match_row_count_with_duplicates() {
        let rows = roster();
        let index = build_index(&rows);
        assert_eq!(index.name_pairs.len(), rows.len());
        assert_eq!(index.name_pairs[0], index.name_pairs[2]);
    }

    #[test]
    fn distinct_names_keep_first_seen_order_and_blanks() {
        let index = build_index(&roster());
        assert_eq!(index.first_names, vec!["Wayne", "Brent", "", "Bobby"]);
        assert_eq!(index.last_names, vec!["Gretzky", "Unknown", "Orr"]);
    }

    #[test]
    fn teams_are_trimmed_sorted_and_skip_blank_pieces() {
        let index = build_index(&roster());
        let teams: Vec<&str> = index.teams.iter().map(String::as_str).collect();
        assert_eq!(
            teams,
            vec![
                "Boston Bruins",
                "Chicago Blackhawks",
                "Edmonton Oilers",
                "Los Angeles Kings",
                "Tampa Bay Lightning",
            ]
        );
        assert!(teams.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn every_row_team_appears_in_index() {
        let rows = roster();
        let index = build_index(&rows);
        for row in &rows {
            for team in row.teams.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                assert!(index.teams.contains(team), "missing {team}");
            }
        }
    }

    #[test]
    fn row_without_teams_still_contributes_names() {
        let index = build_index(&[Player::new("Ken", "Dryden", "")]);
        assert!(index.teams.is_empty());
        assert_eq!(index.first_names, vec!["Ken"]);
        assert_eq!(index.name_pairs.len(), 1);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let rows = roster();
        assert_eq!(build_index(&rows), build_index(&rows));
    }

    #[test]
    fn team_at_follows_sorted_order() {
        let index = build_index(&roster());
        assert_eq!(index.team_at(0), Some("Boston Bruins"));
        assert_eq!(index.team_at(4), Some("Tampa Bay Lightning"));
        assert_eq!(index.team_at(5), None);
        assert_eq!(index.team_count(), 5);
    }

    #[test]
    fn empty_roster_builds_empty_index() {
        assert_eq!(build_index(&[]), RosterIndex::default());
    }
}
