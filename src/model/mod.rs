//! Data model for the account console.
//!
//! A [`Snapshot`] is the complete, server-authoritative dataset of a
//! session: the operator's [`Role`] and one [`Section`] table per
//! section key. Snapshots are immutable; the console swaps them whole.

mod section;

pub use section::SectionKey;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{KontoError, Result};

/// A raw row: fixed-order string fields as delivered by the server.
pub type Row = Vec<String>;

/// Access tier of the logged-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator: full console.
    Admin,
    /// Caseworker: own changes and sheets.
    Bearbeiter,
    /// Guest: read-only sheets.
    Gast,
}

impl Role {
    /// All roles, in privilege order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Bearbeiter, Role::Gast];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Bearbeiter => "bearbeiter",
            Self::Gast => "gast",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = KontoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "admin" => Ok(Self::Admin),
            "bearbeiter" => Ok(Self::Bearbeiter),
            "gast" => Ok(Self::Gast),
            other => Err(KontoError::invalid_argument(
                "role",
                format!("unknown role '{other}' (expected admin, bearbeiter or gast)"),
            )),
        }
    }
}

/// One section table: server column names plus row-id → row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Column names as delivered by the server.
    #[serde(rename = "spalten", default)]
    pub columns: Vec<String>,
    /// Rows keyed by server row id, in delivery order.
    #[serde(rename = "daten", default)]
    pub rows: IndexMap<String, Row>,
}

impl Section {
    /// Create a section from columns and `(key, row)` pairs.
    pub fn new<I, K>(columns: &[&str], rows: I) -> Self
    where
        I: IntoIterator<Item = (K, Row)>,
        K: Into<String>,
    {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: rows.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the section has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by its server key.
    #[must_use]
    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.get(key)
    }

    /// Iterate `(key, row)` pairs in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.rows.iter().map(|(k, r)| (k.as_str(), r))
    }
}

/// The complete client-side dataset of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Role of the operator this snapshot was built for.
    #[serde(alias = "kontotyp")]
    pub role: Role,
    /// Section tables keyed by wire section key.
    #[serde(default)]
    pub data: IndexMap<String, Section>,
}

impl Snapshot {
    /// Create an empty snapshot for a role.
    #[must_use]
    pub fn empty(role: Role) -> Self {
        Self {
            role,
            data: IndexMap::new(),
        }
    }

    /// Builder-style insertion of a section.
    #[must_use]
    pub fn with_section(mut self, key: SectionKey, section: Section) -> Self {
        self.data.insert(key.as_str().to_string(), section);
        self
    }

    /// Get a section by key. The empty key never resolves.
    #[must_use]
    pub fn section(&self, key: SectionKey) -> Option<&Section> {
        if key.is_empty() {
            return None;
        }
        self.data.get(key.as_str())
    }

    /// Whether a dataset exists for the key.
    #[must_use]
    pub fn has_section(&self, key: SectionKey) -> bool {
        self.section(key).is_some()
    }

    /// Decode a snapshot from JSON.
    ///
    /// Accepts either the bare snapshot (`{"role": .., "data": ..}`) as
    /// embedded in the console page, or a full `"ok"` reply envelope.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            KontoError::SnapshotDecode {
                message: e.to_string(),
                source: Some(e),
            }
        })?;

        if let Some(status) = value.get("status").and_then(|s| s.as_str()) {
            if status != "ok" {
                return Err(KontoError::decode(format!(
                    "expected an ok reply, found status '{status}'"
                )));
            }
        }

        serde_json::from_value(value).map_err(|e| KontoError::SnapshotDecode {
            message: e.to_string(),
            source: Some(e),
        })
    }
}
