use crate::table::SortDirection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current sort column and direction.
///
/// Invariant: when `key` is `None` the direction is `None` too, and row
/// order falls back to filtered input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// The direction to hand to `sort_rows`, defaulting to ascending when a
    /// key is set without one.
    pub fn effective_direction(&self) -> SortDirection {
        self.direction.unwrap_or(SortDirection::Ascending)
    }
}

/// Everything the table view tracks between renders of one row source.
///
/// The shaping functions in [`crate::table`] are pure; this struct is the
/// small explicit state the caller re-invokes them with on every change.
/// Selection is keyed by `original_index`, so it survives filtering,
/// sorting and paging, and only a new row source clears it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub search: String,
    pub sort: SortState,
    pub page: usize,
    pub page_size: usize,
    pub selected: BTreeSet<usize>,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        TableState {
            search: String::new(),
            sort: SortState::default(),
            page: 0,
            page_size,
            selected: BTreeSet::new(),
        }
    }

    /// Replace the search text and jump back to the first page.
    ///
    /// The selection is deliberately left alone; hiding a row does not
    /// deselect it.
    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.page = 0;
    }

    /// Cycle the sort state of a column header
    ///
    /// Clicking a new column sorts it ascending; clicking the sorted column
    /// again flips to descending, and a third click clears the sort
    /// entirely. Any change returns to the first page.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = if self.sort.key.as_deref() != Some(column) {
            SortState {
                key: Some(column.to_string()),
                direction: Some(SortDirection::Ascending),
            }
        } else if self.sort.direction == Some(SortDirection::Ascending) {
            SortState {
                key: Some(column.to_string()),
                direction: Some(SortDirection::Descending),
            }
        } else {
            SortState::default()
        };
        self.page = 0;
    }

    /// Change the page size and jump back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// A new row source arrived: the old selection no longer identifies
    /// anything, so it is cleared along with the page position. Search and
    /// sort settings survive.
    pub fn reset_rows(&mut self) {
        self.selected.clear();
        self.page = 0;
    }

    /// Flip the selection state of one row.
    pub fn toggle_row(&mut self, original_index: usize) {
        if !self.selected.remove(&original_index) {
            self.selected.insert(original_index);
        }
    }

    /// Select every row in the given set (typically the visible rows).
    pub fn select_all(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selected.extend(indices);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, original_index: usize) -> bool {
        self.selected.contains(&original_index)
    }

    /// Whether the header checkbox should show fully checked.
    pub fn all_selected(&self, row_count: usize) -> bool {
        row_count > 0 && self.selected.len() == row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_sort_cycles_through_directions() {
        let mut state = TableState::new(10);

        state.toggle_sort("name");
        assert_eq!(state.sort.key.as_deref(), Some("name"));
        assert_eq!(state.sort.direction, Some(SortDirection::Ascending));

        state.toggle_sort("name");
        assert_eq!(state.sort.direction, Some(SortDirection::Descending));

        state.toggle_sort("name");
        assert_eq!(state.sort, SortState::default());
    }

    #[test]
    fn switching_columns_restarts_ascending() {
        let mut state = TableState::new(10);
        state.toggle_sort("a");
        state.toggle_sort("a");
        state.toggle_sort("b");
        assert_eq!(state.sort.key.as_deref(), Some("b"));
        assert_eq!(state.sort.direction, Some(SortDirection::Ascending));
    }

    #[test]
    fn criteria_changes_reset_page_but_keep_selection() {
        let mut state = TableState::new(5);
        state.toggle_row(3);
        state.set_page(4);

        state.set_search("abc");
        assert_eq!(state.page, 0);
        assert!(state.is_selected(3));

        state.set_page(2);
        state.toggle_sort("col");
        assert_eq!(state.page, 0);
        assert!(state.is_selected(3));

        state.set_page(1);
        state.set_page_size(25);
        assert_eq!(state.page, 0);
        assert!(state.is_selected(3));
    }

    #[test]
    fn new_row_source_clears_selection() {
        let mut state = TableState::new(5);
        state.select_all([0, 1, 2]);
        state.set_page(2);

        state.reset_rows();
        assert!(state.selected.is_empty());
        assert_eq!(state.page, 0);
    }

    #[test]
    fn row_toggle_and_select_all() {
        let mut state = TableState::new(5);
        state.toggle_row(7);
        assert!(state.is_selected(7));
        state.toggle_row(7);
        assert!(!state.is_selected(7));

        state.select_all([1, 2, 3]);
        assert!(state.all_selected(3));
        assert!(!state.all_selected(4));

        state.clear_selection();
        assert!(!state.all_selected(0));
        assert!(state.selected.is_empty());
    }

    #[test]
    fn sort_invariant_holds_after_clearing() {
        let mut state = TableState::new(5);
        state.toggle_sort("x");
        state.toggle_sort("x");
        state.toggle_sort("x");
        assert!(state.sort.key.is_none());
        assert!(state.sort.direction.is_none());
    }
}
