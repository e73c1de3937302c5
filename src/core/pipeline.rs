//! List derivation: status filter, free-text search and priority ordering.
//!
//! [`derive_list`] is pure. [`MemoizedList`] wraps it so a view only re-derives when the
//! raw data, the filter or the search text actually changed.

use crate::models::{Order, Problem, TwoState, Work};
use std::sync::Arc;

/// A record that can be shown in a filtered list.
pub trait Listable: Clone {
    /// Two-valued status type.
    type Status: TwoState;

    /// Current status.
    fn status(&self) -> Self::Status;

    /// Fields matched by the search box. Absent fields are empty strings.
    fn search_fields(&self) -> [&str; 3];
}

impl Listable for Problem {
    type Status = crate::models::ProblemStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn search_fields(&self) -> [&str; 3] {
        [
            &self.description,
            self.part_affected.as_deref().unwrap_or(""),
            self.boat_name.as_deref().unwrap_or(""),
        ]
    }
}

impl Listable for Work {
    type Status = crate::models::CompletionStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn search_fields(&self) -> [&str; 3] {
        [
            &self.title,
            self.description.as_deref().unwrap_or(""),
            self.category.as_str(),
        ]
    }
}

impl Listable for Order {
    type Status = crate::models::CompletionStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn search_fields(&self) -> [&str; 3] {
        [
            &self.title,
            self.description.as_deref().unwrap_or(""),
            &self.category,
        ]
    }
}

/// Status filter of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter<S> {
    /// Every status
    #[default]
    All,
    /// Only this status
    Only(S),
}

impl<S: TwoState> StatusFilter<S> {
    /// Whether `status` passes the filter.
    #[must_use]
    pub fn accepts(self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status == wanted,
        }
    }
}

/// Filters, searches and orders `raw`.
///
/// Active items (open, pending) come first; the sort is stable so ties keep the input
/// order. An empty search string matches everything.
#[must_use]
pub fn derive_list<T: Listable>(raw: &[T], filter: StatusFilter<T::Status>, search: &str) -> Vec<T> {
    let needle = search.to_lowercase();

    let mut items: Vec<T> = raw
        .iter()
        .filter(|item| filter.accepts(item.status()))
        .filter(|item| {
            needle.is_empty()
                || item
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();

    items.sort_by_key(|item| !item.status().is_active());
    items
}

/// [`derive_list`] with a one-entry cache.
///
/// The raw list is identified by a generation number supplied by the caller; bump it
/// whenever a fresh fetch replaces the data.
#[derive(Debug, Clone)]
pub struct MemoizedList<T: Listable> {
    key: Option<(u64, StatusFilter<T::Status>, String)>,
    derived: Arc<Vec<T>>,
}

impl<T: Listable> Default for MemoizedList<T> {
    fn default() -> Self {
        Self {
            key: None,
            derived: Arc::new(Vec::new()),
        }
    }
}

impl<T: Listable> MemoizedList<T> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived list for these inputs, recomputed only when one of them changed.
    pub fn get(
        &mut self,
        generation: u64,
        raw: &[T],
        filter: StatusFilter<T::Status>,
        search: &str,
    ) -> Arc<Vec<T>> {
        let unchanged = self
            .key
            .as_ref()
            .is_some_and(|(g, f, s)| *g == generation && *f == filter && s == search);

        if !unchanged {
            self.derived = Arc::new(derive_list(raw, filter, search));
            self.key = Some((generation, filter, search.to_string()));
        }

        Arc::clone(&self.derived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{CompletionStatus, ProblemStatus},
        test_utils::{order, problem, work},
    };

    fn ids<T, F: Fn(&T) -> i64>(items: &[T], id: F) -> Vec<i64> {
        items.iter().map(id).collect()
    }

    #[test]
    fn test_filter_open_problems() {
        let raw = vec![
            problem(1, ProblemStatus::Open, "Vela strappata"),
            problem(2, ProblemStatus::Closed, "Timone rotto"),
            problem(3, ProblemStatus::Open, "Scafo graffiato"),
        ];
        let open = derive_list(&raw, StatusFilter::Only(ProblemStatus::Open), "");
        assert_eq!(ids(&open, |p| p.id), vec![1, 3]);
        assert!(open.iter().all(|p| p.status == ProblemStatus::Open));
    }

    #[test]
    fn test_toggled_problem_joins_open_list_at_the_end() {
        let raw = vec![
            problem(1, ProblemStatus::Open, "Vela strappata"),
            problem(2, ProblemStatus::Closed, "Timone rotto"),
            problem(3, ProblemStatus::Open, "Scafo graffiato"),
        ];
        let mut shown = derive_list(&raw, StatusFilter::All, "");
        assert_eq!(ids(&shown, |p| p.id), vec![1, 3, 2]);

        if let Some(p) = shown.iter_mut().find(|p| p.id == 2) {
            p.status = p.status.toggled();
        }
        let open = derive_list(&shown, StatusFilter::Only(ProblemStatus::Open), "");
        assert_eq!(ids(&open, |p| p.id), vec![1, 3, 2]);
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let mut with_part = problem(1, ProblemStatus::Open, "Crepa");
        with_part.part_affected = Some("Deriva".to_string());
        let mut with_boat = problem(2, ProblemStatus::Closed, "Graffio");
        with_boat.boat_name = Some("Optimist 7".to_string());
        let raw = vec![with_part, with_boat, problem(3, ProblemStatus::Open, "Altro")];

        let hits = derive_list(&raw, StatusFilter::All, "DERIVA");
        assert_eq!(ids(&hits, |p| p.id), vec![1]);

        let hits = derive_list(&raw, StatusFilter::All, "optimist");
        assert_eq!(ids(&hits, |p| p.id), vec![2]);
        for p in &hits {
            assert!(
                p.search_fields()
                    .iter()
                    .any(|f| f.to_lowercase().contains("optimist"))
            );
        }
    }

    #[test]
    fn test_empty_search_is_identity_up_to_priority() {
        let raw = vec![
            work(1, CompletionStatus::Pending, "Pulizia"),
            work(2, CompletionStatus::Pending, "Verniciatura"),
        ];
        let all = derive_list(&raw, StatusFilter::All, "");
        assert_eq!(all, raw);
    }

    #[test]
    fn test_priority_sort_is_stable() {
        let raw = vec![
            order(1, CompletionStatus::Completed, "Cime"),
            order(2, CompletionStatus::Pending, "Grilli"),
            order(3, CompletionStatus::Completed, "Vernice"),
            order(4, CompletionStatus::Pending, "Nastro"),
        ];
        let sorted = derive_list(&raw, StatusFilter::All, "");
        assert_eq!(ids(&sorted, |o| o.id), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_work_search_uses_category() {
        let raw = vec![work(1, CompletionStatus::Pending, "Pulizia")];
        assert_eq!(derive_list(&raw, StatusFilter::All, "campo").len(), 1);
        assert!(derive_list(&raw, StatusFilter::All, "vele").is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let raw: Vec<Order> = Vec::new();
        assert!(derive_list(&raw, StatusFilter::Only(CompletionStatus::Pending), "x").is_empty());
    }

    #[test]
    fn test_memoized_list_reuses_result_until_inputs_change() {
        let raw = vec![
            problem(1, ProblemStatus::Open, "Vela"),
            problem(2, ProblemStatus::Closed, "Timone"),
        ];
        let mut memo = MemoizedList::new();

        let first = memo.get(1, &raw, StatusFilter::All, "");
        let again = memo.get(1, &raw, StatusFilter::All, "");
        assert!(Arc::ptr_eq(&first, &again));

        let filtered = memo.get(1, &raw, StatusFilter::Only(ProblemStatus::Closed), "");
        assert!(!Arc::ptr_eq(&first, &filtered));
        assert_eq!(ids(&filtered, |p| p.id), vec![2]);

        let refetched = memo.get(2, &raw, StatusFilter::Only(ProblemStatus::Closed), "");
        assert!(!Arc::ptr_eq(&filtered, &refetched));
    }
}
