use crate::index::RosterIndex;
use crate::{Player, Roster};
use log::debug;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Result set: positions into the roster, original order preserved
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    positions: Vec<usize>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<usize>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resolve positions against the roster they were computed from.
    pub fn rows<'a>(&'a self, players: &'a [Player]) -> impl Iterator<Item = &'a Player> + 'a {
        self.positions.iter().filter_map(|&i| players.get(i))
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn select<F>(players: &[Player], keep: F) -> ResultSet
where
    F: Fn(&Player) -> bool,
{
    let positions = players
        .iter()
        .enumerate()
        .filter(|&(_, p)| keep(p))
        .map(|(i, _)| i)
        .collect();
    ResultSet { positions }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Distinct first names starting with `query`, case-insensitive.
/// An empty query matches every name.
pub fn match_first_name_prefix<'a>(index: &'a RosterIndex, query: &str) -> Vec<&'a str> {
    let prefix = normalize(query);
    index
        .first_names
        .iter()
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .map(String::as_str)
        .collect()
}

/// Last names paired with `selected_first_name` that start with `query`.
///
/// The first name must match exactly (case-insensitive), so an empty first
/// name only reaches rows whose first name is also empty.
///
/// Unlike a plain projection of the matching pairs, each last name is
/// returned only once (first occurrence, row order): two rows for the same
/// full name give one autocomplete entry, not two.
pub fn match_last_name_prefix<'a>(
    index: &'a RosterIndex,
    selected_first_name: &str,
    query: &str,
) -> Vec<&'a str> {
    let first = normalize(selected_first_name);
    let prefix = normalize(query);
    let mut seen = HashSet::new();
    index
        .name_pairs
        .iter()
        .filter(|pair| pair.first_name.to_lowercase() == first)
        .map(|pair| pair.last_name.as_str())
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Rows whose first and last name both equal the trimmed queries,
/// case-insensitive.
pub fn filter_by_exact_name(players: &[Player], first_name: &str, last_name: &str) -> ResultSet {
    let first = normalize(first_name);
    let last = normalize(last_name);
    select(players, |p| {
        p.first_name.to_lowercase() == first && p.last_name.to_lowercase() == last
    })
}

/// Rows listing every selected team. No selection means no results.
pub fn filter_by_teams<S: AsRef<str>>(players: &[Player], selected_teams: &[S]) -> ResultSet {
    if selected_teams.is_empty() {
        return ResultSet::empty();
    }
    let wanted: Vec<String> = selected_teams
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();
    select(players, |p| {
        let keys = p.team_keys();
        wanted.iter().all(|team| keys.contains(team))
    })
}

// ---------------------------------------------------------------------------
// Filter state: one owned value, each event yields the next state
// ---------------------------------------------------------------------------

/// Which query currently drives the result table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveQuery {
    #[default]
    None,
    Name {
        first: String,
        last: String,
    },
    Teams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    FirstNameChanged(String),
    LastNameChanged(String),
    TeamToggled { team: String, selected: bool },
    SubmitName,
    ClearTeams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub first_name_query: String,
    pub last_name_query: String,
    /// In selection order, no duplicates.
    pub selected_teams: Vec<String>,
    pub active: ActiveQuery,
}

impl FilterState {
    pub fn apply(mut self, event: FilterEvent) -> Self {
        match event {
            FilterEvent::FirstNameChanged(query) => self.first_name_query = query,
            FilterEvent::LastNameChanged(query) => self.last_name_query = query,
            FilterEvent::TeamToggled { team, selected } => {
                if selected {
                    if !self.selected_teams.contains(&team) {
                        self.selected_teams.push(team);
                    }
                } else {
                    self.selected_teams.retain(|t| *t != team);
                }
                self.active = ActiveQuery::Teams;
            }
            FilterEvent::SubmitName => {
                self.active = ActiveQuery::Name {
                    first: self.first_name_query.trim().to_string(),
                    last: self.last_name_query.trim().to_string(),
                };
            }
            FilterEvent::ClearTeams => {
                self.selected_teams.clear();
            }
        }
        self
    }

    pub fn is_team_selected(&self, team: &str) -> bool {
        self.selected_teams.iter().any(|t| t == team)
    }
}

/// Everything the presentation layer reads back after an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutput {
    pub results: ResultSet,
    pub first_name_candidates: Vec<String>,
    pub last_name_candidates: Vec<String>,
}

/// Recompute results and autocomplete candidates for `state`.
pub fn evaluate(roster: &Roster, index: &RosterIndex, state: &FilterState) -> FilterOutput {
    let results = match &state.active {
        ActiveQuery::None => ResultSet::empty(),
        ActiveQuery::Name { first, last } => filter_by_exact_name(&roster.players, first, last),
        ActiveQuery::Teams => filter_by_teams(&roster.players, &state.selected_teams),
    };
    debug!("filter pass matched {} of {} rows", results.len(), roster.len());

    FilterOutput {
        results,
        first_name_candidates: match_first_name_prefix(index, &state.first_name_query)
            .into_iter()
            .map(ToString::to_string)
            .collect(),
        last_name_candidates: match_last_name_prefix(
            index,
            &state.first_name_query,
            &state.last_name_query,
        )
        .into_iter()
        .map(ToString::to_string)
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;

    fn players() -> Vec<Player> {
        vec![
            Player::new("John", "Tavares", "New York Islanders, Toronto Maple Leafs"),
            Player::new("Joan", "Smith", ""),
            Player::new("Mark", "Messier", "Edmonton Oilers, New York Rangers, Vancouver Canucks"),
            Player::new("John", "Smith", "Boston Bruins"),
            Player::new("john", "Tonelli", "New York Islanders"),
            Player::new("", "Nobody", ""),
        ]
    }

    fn sorted(mut v: Vec<&str>) -> Vec<&str> {
        v.sort_unstable();
        v
    }

    #[test]
    fn first_name_prefix_is_case_insensitive() {
        let rows = vec![
            Player::new("John", "", ""),
            Player::new("Joan", "", ""),
            Player::new("Mark", "", ""),
        ];
        let index = build_index(&rows);
        assert_eq!(sorted(match_first_name_prefix(&index, "jo")), vec!["Joan", "John"]);
        assert_eq!(sorted(match_first_name_prefix(&index, "JO")), vec!["Joan", "John"]);
        assert_eq!(sorted(match_first_name_prefix(&index, "  jo ")), vec!["Joan", "John"]);
    }

    #[test]
    fn empty_first_name_prefix_returns_all_distinct_names() {
        let index = build_index(&players());
        assert_eq!(match_first_name_prefix(&index, "").len(), index.first_names.len());
    }

    #[test]
    fn last_name_prefix_is_scoped_to_first_name() {
        let index = build_index(&players());
        assert_eq!(match_last_name_prefix(&index, "JOHN", ""), vec!["Tavares", "Smith", "Tonelli"]);
        assert_eq!(match_last_name_prefix(&index, "john", "t"), vec!["Tavares", "Tonelli"]);
        assert_eq!(match_last_name_prefix(&index, "mark", "s"), Vec::<&str>::new());
    }

    #[test]
    fn last_name_prefix_with_empty_first_name_matches_only_blank_first_names() {
        let index = build_index(&players());
        assert_eq!(match_last_name_prefix(&index, "", ""), vec!["Nobody"]);
    }

    #[test]
    fn last_name_candidates_are_distinct() {
        let rows = vec![
            Player::new("Wayne", "Gretzky", "Edmonton Oilers"),
            Player::new("Wayne", "Gretzky", "Los Angeles Kings"),
        ];
        let index = build_index(&rows);
        assert_eq!(match_last_name_prefix(&index, "wayne", "g"), vec!["Gretzky"]);
    }

    #[test]
    fn exact_name_requires_full_match_on_both_fields() {
        let rows = vec![Player::new("Wayne", "Gretzky", "Edmonton Oilers")];
        assert_eq!(filter_by_exact_name(&rows, "wayne", "GRETZKY").positions(), &[0]);
        assert!(filter_by_exact_name(&rows, "way", "Gretzky").is_empty());
        assert!(filter_by_exact_name(&rows, "Wayne", "").is_empty());
    }

    #[test]
    fn exact_name_trims_queries_and_keeps_duplicates() {
        let rows = players();
        assert_eq!(filter_by_exact_name(&rows, " John ", "tavares").positions(), &[0]);
        assert_eq!(filter_by_exact_name(&rows, "john", "smith").positions(), &[3]);
    }

    #[test]
    fn blank_fields_never_match_non_empty_queries() {
        let rows = vec![Player::default()];
        assert!(filter_by_exact_name(&rows, "a", "b").is_empty());
        assert_eq!(filter_by_exact_name(&rows, "", "").len(), 1);
    }

    #[test]
    fn no_team_selection_yields_no_results() {
        let rows = players();
        let none: [&str; 0] = [];
        assert!(filter_by_teams(&rows, &none).is_empty());
    }

    #[test]
    fn team_filter_is_an_intersection() {
        let rows = vec![
            Player::new("a", "a", "Boston Bruins, Detroit Red Wings"),
            Player::new("b", "b", "Boston Bruins"),
        ];
        let result = filter_by_teams(&rows, &["Boston Bruins", "Detroit Red Wings"]);
        assert_eq!(result.positions(), &[0]);
        let result = filter_by_teams(&rows, &["boston bruins"]);
        assert_eq!(result.positions(), &[0, 1]);
    }

    #[test]
    fn team_filter_preserves_row_order() {
        let rows = players();
        let result = filter_by_teams(&rows, &["NEW YORK ISLANDERS"]);
        assert_eq!(result.positions(), &[0, 4]);
        let names: Vec<&str> = result.rows(&rows).map(|p| p.last_name.as_str()).collect();
        assert_eq!(names, vec!["Tavares", "Tonelli"]);
    }

    #[test]
    fn team_filter_does_not_match_partial_names() {
        let rows = vec![Player::new("a", "a", "New York Rangers")];
        assert!(filter_by_teams(&rows, &["New York"]).is_empty());
    }

    #[test]
    fn toggling_teams_never_duplicates_and_activates_team_query() {
        let state = FilterState::default()
            .apply(FilterEvent::TeamToggled { team: "Boston Bruins".into(), selected: true })
            .apply(FilterEvent::TeamToggled { team: "Boston Bruins".into(), selected: true })
            .apply(FilterEvent::TeamToggled { team: "Ottawa Senators".into(), selected: true });
        assert_eq!(state.selected_teams, vec!["Boston Bruins", "Ottawa Senators"]);
        assert_eq!(state.active, ActiveQuery::Teams);

        let state = state.apply(FilterEvent::TeamToggled {
            team: "Boston Bruins".into(),
            selected: false,
        });
        assert_eq!(state.selected_teams, vec!["Ottawa Senators"]);
        assert!(state.is_team_selected("Ottawa Senators"));
        assert!(!state.is_team_selected("Boston Bruins"));
    }

    #[test]
    fn submit_captures_trimmed_name_queries() {
        let state = FilterState::default()
            .apply(FilterEvent::FirstNameChanged(" Mark ".into()))
            .apply(FilterEvent::LastNameChanged("messier".into()));
        assert_eq!(state.active, ActiveQuery::None);
        let state = state.apply(FilterEvent::SubmitName);
        assert_eq!(
            state.active,
            ActiveQuery::Name { first: "Mark".into(), last: "messier".into() }
        );
    }

    #[test]
    fn evaluate_follows_the_active_query() {
        let rows = players();
        let roster = Roster { headers: Vec::new(), players: rows };
        let index = build_index(&roster.players);

        let state = FilterState::default().apply(FilterEvent::FirstNameChanged("jo".into()));
        let out = evaluate(&roster, &index, &state);
        assert!(out.results.is_empty());
        assert_eq!(out.first_name_candidates, vec!["John", "Joan", "john"]);
        assert!(out.last_name_candidates.is_empty());

        let state = state
            .apply(FilterEvent::FirstNameChanged("john".into()))
            .apply(FilterEvent::LastNameChanged("smith".into()))
            .apply(FilterEvent::SubmitName);
        let out = evaluate(&roster, &index, &state);
        assert_eq!(out.results.positions(), &[3]);
        assert_eq!(out.last_name_candidates, vec!["Smith"]);

        let state = state.apply(FilterEvent::TeamToggled {
            team: "New York Islanders".into(),
            selected: true,
        });
        assert_eq!(evaluate(&roster, &index, &state).results.positions(), &[0, 4]);

        let state = state.apply(FilterEvent::ClearTeams);
        assert!(evaluate(&roster, &index, &state).results.is_empty());
    }

    #[test]
    fn evaluate_leaves_inputs_untouched() {
        let roster = Roster { headers: Vec::new(), players: players() };
        let index = build_index(&roster.players);
        let before = (roster.clone(), index.clone());
        let state = FilterState::default().apply(FilterEvent::TeamToggled {
            team: "Boston Bruins".into(),
            selected: true,
        });
        let _ = evaluate(&roster, &index, &state);
        assert_eq!((roster, index), before);
    }
}
