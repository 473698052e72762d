//! Requests picked for a bulk action.

use serde::{Deserialize, Serialize};

use crate::models::leave_request::LeaveRequest;
use crate::types::LeaveRequestId;

/// Insertion-ordered set of request ids. Owned by the admin session, cleared
/// explicitly after a bulk action or a reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaveRequestId>", into = "Vec<LeaveRequestId>")]
pub struct SelectionSet {
    ids: Vec<LeaveRequestId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection, dropping repeated ids but keeping first-seen order.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = LeaveRequestId>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.insert(id);
        }
        selection
    }

    /// "Select all" over a filtered list.
    pub fn select_all(requests: &[LeaveRequest]) -> Self {
        Self::from_ids(requests.iter().map(|r| r.id.clone()))
    }

    /// Selects only the requests still waiting for a decision.
    pub fn pending_of(requests: &[LeaveRequest]) -> Self {
        Self::from_ids(
            requests
                .iter()
                .filter(|r| r.is_pending())
                .map(|r| r.id.clone()),
        )
    }

    /// Returns false when the id was already selected.
    pub fn insert(&mut self, id: LeaveRequestId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &LeaveRequestId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        before != self.ids.len()
    }

    /// Checkbox semantics. Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: LeaveRequestId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: &LeaveRequestId) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeaveRequestId> {
        self.ids.iter()
    }
}

impl From<Vec<LeaveRequestId>> for SelectionSet {
    fn from(ids: Vec<LeaveRequestId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<SelectionSet> for Vec<LeaveRequestId> {
    fn from(selection: SelectionSet) -> Self {
        selection.ids
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a LeaveRequestId;
    type IntoIter = std::slice::Iter<'a, LeaveRequestId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
