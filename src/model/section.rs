//! Section keys.

use std::fmt;

use serde::{Serialize, Serializer};

/// Identifier of a console section.
///
/// Each key has a wire name (the key of its dataset in the snapshot) and
/// a sidebar label. [`SectionKey::Empty`] is the "nothing selected"
/// section with the wire name `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SectionKey {
    /// No section.
    #[default]
    Empty,
    /// All registry changes.
    Changes,
    /// Changes authored by the operator.
    OwnChanges,
    /// Access requests.
    Accesses,
    /// User accounts.
    Users,
    /// Registry districts.
    Districts,
    /// Change subscriptions.
    Subscriptions,
    /// Registry sheets visible to the operator.
    Sheets,
    /// The operator's own account data.
    AccountSettings,
}

impl SectionKey {
    /// Every non-empty key.
    pub const ALL: [SectionKey; 8] = [
        SectionKey::Changes,
        SectionKey::OwnChanges,
        SectionKey::Accesses,
        SectionKey::Users,
        SectionKey::Districts,
        SectionKey::Subscriptions,
        SectionKey::Sheets,
        SectionKey::AccountSettings,
    ];

    /// Wire name used as the dataset key in snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Changes => "aenderungen",
            Self::OwnChanges => "meine-aenderungen",
            Self::Accesses => "zugriffe",
            Self::Users => "benutzer",
            Self::Districts => "bezirke",
            Self::Subscriptions => "abonnements",
            Self::Sheets => "meine-grundbuchblaetter",
            Self::AccountSettings => "meine-kontodaten",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Changes => "Änderungen",
            Self::OwnChanges => "Meine Änderungen",
            Self::Accesses => "Zugriffe",
            Self::Users => "Benutzer",
            Self::Districts => "Bezirke",
            Self::Subscriptions => "Abonnements",
            Self::Sheets => "Meine Grundbuchblätter",
            Self::AccountSettings => "Einstellungen",
        }
    }

    /// Whether this is the empty key.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Parse a wire name. Unknown names map to `None`; `""` maps to `Empty`.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        if name.is_empty() {
            return Some(Self::Empty);
        }
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SectionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
