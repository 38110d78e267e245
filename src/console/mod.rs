//! Navigation controller: the owned state of one console session.
//!
//! [`ConsoleState`] bundles the snapshot store, the active section, the
//! filter text, the selection and the auth token. Every mutation goes
//! through a method that returns a [`Redraw`] hint, and [`reduce`] folds
//! [`ConsoleEvent`]s over a state without side effects beyond logging.
//!
//! Command replies are applied here, not in the dispatcher, so a dispatch
//! future never borrows the state and several may be in flight.

pub mod view;

pub use view::{ConsoleView, RowView, TableView};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::StalePolicy;
use crate::dispatch::{AuthToken, Reply, RequestId};
use crate::error::{DispatchError, KontoError, Result};
use crate::model::{Role, Section, SectionKey, Snapshot};
use crate::registry;
use crate::rows::{self, SectionDescriptor};
use crate::selection::SelectionSet;
use crate::store::SnapshotStore;

/// How much of the view must be rebuilt after a state change.
///
/// Variants are ordered by extent, so several hints combine with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Redraw {
    /// Nothing changed.
    #[default]
    None,
    /// The visible row set changed (filter).
    Rows,
    /// Row decorations changed (selection).
    Table,
    /// Sidebar, columns and rows (navigation, new snapshot).
    Full,
}

impl Redraw {
    /// Combine two hints.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Inputs to the console.
#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    /// Sidebar click.
    ChangeSection(usize),
    /// Filter text edited.
    SetFilter(Option<String>),
    /// Row checkbox set.
    Select(String),
    /// Row checkbox cleared.
    Deselect(String),
    /// Row checkbox flipped.
    Toggle(String),
    /// "Select all" over the visible rows.
    SelectAllVisible,
    /// "Select none".
    ClearSelection,
    /// Outcome of a dispatched command.
    Reply(std::result::Result<Reply, DispatchError>),
}

/// Owned state of one console session.
#[derive(Debug, Clone)]
pub struct ConsoleState {
    role: Role,
    store: SnapshotStore,
    active: Option<usize>,
    filter: Option<String>,
    selection: SelectionSet,
    auth: Option<AuthToken>,
    stale_policy: StalePolicy,
    last_applied: Option<RequestId>,
}

impl ConsoleState {
    /// Start a session from the initial snapshot. The snapshot fixes the role.
    #[must_use]
    pub fn new(initial: Snapshot, auth: Option<AuthToken>) -> Self {
        Self {
            role: initial.role,
            store: SnapshotStore::new(initial),
            active: None,
            filter: None,
            selection: SelectionSet::new(),
            auth,
            stale_policy: StalePolicy::default(),
            last_applied: None,
        }
    }

    /// Set the stale reply policy.
    #[must_use]
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Session role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Auth token, if logged in.
    #[must_use]
    pub fn auth(&self) -> Option<&AuthToken> {
        self.auth.as_ref()
    }

    /// Replace the auth token.
    pub fn set_auth(&mut self, auth: Option<AuthToken>) {
        self.auth = auth;
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// Number of snapshots applied since the session started.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.store.generation()
    }

    /// Sidebar index of the active section, `None` before any navigation.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Key of the active section.
    #[must_use]
    pub fn active_key(&self) -> SectionKey {
        self.active
            .map_or(SectionKey::Empty, |i| registry::section_key_at(self.role, i))
    }

    /// Row rules of the active section.
    #[must_use]
    pub fn descriptor(&self) -> SectionDescriptor {
        rows::descriptor(self.role, self.active_key())
    }

    /// Dataset of the active section.
    #[must_use]
    pub fn active_section(&self) -> Option<&Section> {
        self.store.section(self.active_key())
    }

    /// Current filter text.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Request id of the last applied reply.
    #[must_use]
    pub const fn last_applied(&self) -> Option<RequestId> {
        self.last_applied
    }

    /// Navigate to a sidebar index. Always resets filter and selection, even
    /// when re-entering the active section; out of range activates the
    /// empty section.
    pub fn change_section(&mut self, index: usize) -> Redraw {
        self.active = Some(index);
        self.filter = None;
        self.selection.clear();
        debug!(index, section = %self.active_key(), "Section changed");
        Redraw::Full
    }

    /// Replace the filter text. The selection is left alone.
    pub fn set_filter(&mut self, filter: Option<&str>) -> Redraw {
        self.filter = filter.filter(|f| !f.is_empty()).map(str::to_string);
        Redraw::Rows
    }

    /// Mark a row.
    pub fn select(&mut self, id: &str) -> Redraw {
        self.selection.add(id);
        Redraw::Table
    }

    /// Unmark a row.
    pub fn deselect(&mut self, id: &str) -> Redraw {
        self.selection.remove(id);
        Redraw::Table
    }

    /// Flip a row's mark.
    pub fn toggle(&mut self, id: &str) -> Redraw {
        self.selection.toggle(id);
        Redraw::Table
    }

    /// Select exactly the rows passing the filter.
    pub fn select_all_visible(&mut self) -> Redraw {
        let descriptor = self.descriptor();
        match self.store.section(self.active_key()) {
            Some(section) => {
                self.selection
                    .select_all_visible(section, &descriptor, self.filter.as_deref());
            }
            None => self.selection.clear(),
        }
        Redraw::Table
    }

    /// Drop the whole selection.
    pub fn clear_selection(&mut self) -> Redraw {
        self.selection.clear();
        Redraw::Table
    }

    /// Identities of the rows currently passing the filter.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<String> {
        let descriptor = self.descriptor();
        let filter = crate::filter::RowFilter::new(self.filter());
        self.active_section()
            .map(|section| {
                section
                    .iter()
                    .filter(|(_, row)| filter.matches(row))
                    .map(|(key, row)| descriptor.row_id(key, row))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Selected ids that still exist in the active section, as command
    /// arguments.
    #[must_use]
    pub fn live_selection(&self) -> Vec<String> {
        self.active_section()
            .map(|section| self.selection.live_in(section, &self.descriptor()))
            .unwrap_or_default()
    }

    /// Apply a successful reply.
    ///
    /// Fails with [`KontoError::RoleMismatch`] when the snapshot belongs to
    /// another role; the state is unchanged then. A reply dropped by the
    /// stale policy yields `Redraw::None`.
    pub fn apply(&mut self, reply: Reply) -> Result<Redraw> {
        if reply.snapshot.role != self.role {
            return Err(KontoError::RoleMismatch {
                expected: self.role.to_string(),
                found: reply.snapshot.role.to_string(),
            });
        }

        if self.stale_policy == StalePolicy::Ignore
            && self.last_applied.is_some_and(|last| reply.request < last)
        {
            debug!(request = %reply.request, "Dropping stale reply");
            return Ok(Redraw::None);
        }

        let latest = self
            .last_applied
            .map_or(reply.request, |last| last.max(reply.request));
        let key = self.active_key();
        let had_section = self.store.section(key).is_some();
        self.store.replace(reply.snapshot);
        self.last_applied = Some(latest);

        // Only a dataset that existed and is now gone resets navigation.
        if had_section && self.store.section(key).is_none() {
            debug!(section = %key, "Active section vanished from snapshot");
            self.active = None;
            self.filter = None;
            self.selection.clear();
        }

        Ok(Redraw::Full)
    }

    /// Apply the outcome of a dispatch. Failures leave the state unchanged.
    pub fn apply_reply(&mut self, outcome: std::result::Result<Reply, DispatchError>) -> Redraw {
        match outcome {
            Ok(reply) => match self.apply(reply) {
                Ok(redraw) => redraw,
                Err(e) => {
                    warn!(error = %e, "Reply rejected");
                    Redraw::None
                }
            },
            // Logged where it happened.
            Err(_) => Redraw::None,
        }
    }

    /// Handle one event in place.
    pub fn handle(&mut self, event: ConsoleEvent) -> Redraw {
        match event {
            ConsoleEvent::ChangeSection(index) => self.change_section(index),
            ConsoleEvent::SetFilter(filter) => self.set_filter(filter.as_deref()),
            ConsoleEvent::Select(id) => self.select(&id),
            ConsoleEvent::Deselect(id) => self.deselect(&id),
            ConsoleEvent::Toggle(id) => self.toggle(&id),
            ConsoleEvent::SelectAllVisible => self.select_all_visible(),
            ConsoleEvent::ClearSelection => self.clear_selection(),
            ConsoleEvent::Reply(outcome) => self.apply_reply(outcome),
        }
    }

    /// Build the view model.
    #[must_use]
    pub fn view(&self) -> ConsoleView {
        let active_index = self.active.filter(|_| !self.active_key().is_empty());
        ConsoleView {
            role: self.role,
            section: self.active_key(),
            sidebar: registry::sidebar(self.role, active_index),
            filter: self.filter.clone(),
            selected: self.selection.len(),
            table: TableView::build(
                &self.descriptor(),
                self.active_section(),
                self.filter(),
                &self.selection,
            ),
        }
    }
}

/// Fold one event over a state.
#[must_use]
pub fn reduce(mut state: ConsoleState, event: ConsoleEvent) -> (ConsoleState, Redraw) {
    let redraw = state.handle(event);
    (state, redraw)
}
