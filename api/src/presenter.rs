use crate::Player;
use crate::filter::ResultSet;
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Teams,
}

impl Field {
    pub fn get(self, player: &Player) -> &str {
        match self {
            Field::FirstName => &player.first_name,
            Field::LastName => &player.last_name,
            Field::Teams => &player.teams,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub field: Field,
}

pub const ROSTER_COLUMNS: [Column; 3] = [
    Column { label: "First Name", field: Field::FirstName },
    Column { label: "Last Name", field: Field::LastName },
    Column { label: "Teams", field: Field::Teams },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn marker(self) -> char {
        match self {
            SortDirection::Ascending => '▲',
            SortDirection::Descending => '▼',
        }
    }
}

/// One rendered page of the result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    /// Column labels, the sorted one suffixed with its direction marker.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<&'a str>>,
    /// Zero-based.
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// Sort and paging state over the current result set.
///
/// Owns no filtering: it only reorders and slices whatever [`ResultSet`] it
/// was last handed. Installing a new result set always returns to the first
/// page so the index can never point past the new page count.
#[derive(Debug, Clone)]
pub struct TablePresenter {
    columns: Vec<Column>,
    page_size: usize,
    page: usize,
    sort: Option<(usize, SortDirection)>,
    results: ResultSet,
    /// Result positions in display order.
    order: Vec<usize>,
}

impl Default for TablePresenter {
    fn default() -> Self {
        Self::new(&ROSTER_COLUMNS, DEFAULT_PAGE_SIZE)
    }
}

impl TablePresenter {
    pub fn new(columns: &[Column], page_size: usize) -> Self {
        Self {
            columns: columns.to_vec(),
            page_size: page_size.max(1),
            page: 0,
            sort: None,
            results: ResultSet::empty(),
            order: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Zero when there are no results.
    pub fn page_count(&self) -> usize {
        self.order.len().div_ceil(self.page_size)
    }

    /// Install a freshly filtered result set. The active sort is re-applied.
    pub fn set_results(&mut self, players: &[Player], results: ResultSet) {
        self.results = results;
        self.page = 0;
        self.apply_sort(players);
    }

    /// Select `column` for sorting. Re-selecting the sorted column flips it to
    /// descending, then back to the unsorted filter order.
    pub fn toggle_sort(&mut self, players: &[Player], column: usize) {
        if column >= self.columns.len() {
            return;
        }
        self.sort = match self.sort {
            Some((c, SortDirection::Ascending)) if c == column => {
                Some((column, SortDirection::Descending))
            }
            Some((c, SortDirection::Descending)) if c == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
        self.page = 0;
        self.apply_sort(players);
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.page_count().saturating_sub(1);
    }

    pub fn present<'a>(&self, players: &'a [Player]) -> PageView<'a> {
        let headers = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| match self.sort {
                Some((c, dir)) if c == i => format!("{} {}", col.label, dir.marker()),
                _ => col.label.to_string(),
            })
            .collect();

        let rows = self
            .order
            .iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .filter_map(|&i| players.get(i))
            .map(|p| self.columns.iter().map(|col| col.field.get(p)).collect())
            .collect();

        PageView {
            headers,
            rows,
            page: self.page,
            page_count: self.page_count(),
            total: self.order.len(),
        }
    }

    fn apply_sort(&mut self, players: &[Player]) {
        self.order = self.results.positions().to_vec();
        let Some((column, direction)) = self.sort else {
            return;
        };
        let Some(field) = self.columns.get(column).map(|c| c.field) else {
            return;
        };
        let key = |i: usize| players.get(i).map(|p| field.get(p)).unwrap_or_default();
        self.order.sort_by(|&a, &b| {
            let ord: Ordering = key(a).cmp(key(b));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}
