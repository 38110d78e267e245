//! Section registry: which sections a role can navigate, in sidebar order.
//!
//! The lists are static configuration. Resolving an index never fails:
//! anything out of range is the empty section, so "nothing selected" is a
//! regular state for the rest of the pipeline.

use serde::Serialize;

use crate::model::{Role, SectionKey};

const ADMIN_SECTIONS: &[SectionKey] = &[
    SectionKey::Changes,
    SectionKey::Accesses,
    SectionKey::Users,
    SectionKey::Districts,
    SectionKey::Subscriptions,
    SectionKey::AccountSettings,
];

const BEARBEITER_SECTIONS: &[SectionKey] = &[
    SectionKey::OwnChanges,
    SectionKey::Sheets,
    SectionKey::Subscriptions,
    SectionKey::AccountSettings,
];

const GAST_SECTIONS: &[SectionKey] = &[
    SectionKey::Sheets,
    SectionKey::Subscriptions,
    SectionKey::AccountSettings,
];

/// Ordered sections navigable by a role.
#[must_use]
pub const fn sections_for(role: Role) -> &'static [SectionKey] {
    match role {
        Role::Admin => ADMIN_SECTIONS,
        Role::Bearbeiter => BEARBEITER_SECTIONS,
        Role::Gast => GAST_SECTIONS,
    }
}

/// Resolve a sidebar index to a section key; out of range is [`SectionKey::Empty`].
#[must_use]
pub fn section_key_at(role: Role, index: usize) -> SectionKey {
    sections_for(role)
        .get(index)
        .copied()
        .unwrap_or(SectionKey::Empty)
}

/// Sidebar index of a section for a role, if the role can navigate there.
#[must_use]
pub fn index_of(role: Role, key: SectionKey) -> Option<usize> {
    sections_for(role).iter().position(|k| *k == key)
}

/// One sidebar entry as exposed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    /// Sidebar index (the argument for `change_section`).
    pub index: usize,
    /// Section key.
    pub key: SectionKey,
    /// Display label.
    pub label: &'static str,
    /// Whether this is the active section.
    pub active: bool,
}

/// Build the sidebar for a role with the given active index.
#[must_use]
pub fn sidebar(role: Role, active: Option<usize>) -> Vec<SidebarItem> {
    sections_for(role)
        .iter()
        .enumerate()
        .map(|(index, key)| SidebarItem {
            index,
            key: *key,
            label: key.label(),
            active: active == Some(index),
        })
        .collect()
}
