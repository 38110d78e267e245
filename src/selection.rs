//! Selection set: the ordered set of row identities marked for a bulk action.
//!
//! Every operation is total. Ids that are unknown, foreign or no longer
//! present in the current snapshot are accepted and simply stay inert.

use crate::filter::RowFilter;
use crate::model::Section;
use crate::rows::SectionDescriptor;

/// Ordered set of selected row ids (ascending lexical order, no duplicates).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id.
    pub fn add(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
        self.ids.sort();
    }

    /// Remove an id if present.
    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|selected| selected != id);
    }

    /// Add the id if absent, remove it otherwise. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Replace the selection with exactly the rows of `section` that pass `filter`.
    pub fn select_all_visible(
        &mut self,
        section: &Section,
        descriptor: &SectionDescriptor,
        filter: Option<&str>,
    ) {
        let filter = RowFilter::new(filter);
        self.ids = section
            .iter()
            .filter(|(_, row)| filter.matches(row))
            .map(|(key, row)| descriptor.row_id(key, row))
            .collect();
        self.ids.sort();
        self.ids.dedup();
    }

    /// Empty the set.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.binary_search_by(|s| s.as_str().cmp(id)).is_ok()
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Ids in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    /// Owned copy of the ids, e.g. as command arguments.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }

    /// Selected ids that still identify a row of `section`.
    ///
    /// Ids that vanished with a snapshot replace are skipped, not reported.
    #[must_use]
    pub fn live_in(&self, section: &Section, descriptor: &SectionDescriptor) -> Vec<String> {
        self.ids
            .iter()
            .filter(|id| descriptor.find(section, id).is_some())
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.add(id);
        }
        set
    }
}
