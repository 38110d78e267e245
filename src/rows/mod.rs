//! Row model: per (role, section) rules for row identity and projection.
//!
//! The rules live in a lookup table resolved once per render into a
//! [`SectionDescriptor`]. Combinations that have no rule resolve to the
//! explicit [`SectionDescriptor::Empty`] variant, which has no columns
//! and projects nothing; an unknown or disallowed section shows an empty
//! table instead of failing.

pub mod format;

use crate::model::{Role, Row, Section, SectionKey};

/// Separator of composite row identities.
pub const COMPOSITE_SEPARATOR: &str = "/";

/// How the identity of a row is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// The server's row key.
    RowKey,
    /// A single raw column.
    Column(usize),
    /// Several raw columns joined with [`COMPOSITE_SEPARATOR`].
    Composite(&'static [usize]),
}

/// One displayed field, computed from the raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Raw column value.
    Raw(usize),
    /// Abbreviated commit id.
    ShortHash(usize),
    /// Commit time from epoch seconds, offset minutes and sign columns.
    CommitDate {
        /// Epoch seconds column.
        seconds: usize,
        /// Offset minutes column.
        offset: usize,
        /// Offset sign column.
        sign: usize,
    },
    /// RFC 3339 timestamp column.
    Timestamp(usize),
    /// Enum-like value stored with quotes.
    Unquoted(usize),
    /// Federal state code shown by name.
    Land(usize),
    /// Access request state from granted-by / rejected-by columns.
    AccessStatus {
        /// Granted-by column.
        granted: usize,
        /// Rejected-by column.
        rejected: usize,
    },
}

impl Field {
    /// Compute the display value. Missing columns read as `""`.
    #[must_use]
    pub fn render(self, row: &[String]) -> String {
        let col = |i: usize| row.get(i).map_or("", String::as_str);
        match self {
            Self::Raw(i) => col(i).to_string(),
            Self::ShortHash(i) => format::short_hash(col(i)),
            Self::CommitDate { seconds, offset, sign } => {
                if col(seconds).is_empty() {
                    String::new()
                } else {
                    format::commit_date(col(seconds), col(offset), col(sign))
                }
            }
            Self::Timestamp(i) => format::timestamp(col(i)),
            Self::Unquoted(i) => format::unquote(col(i)),
            Self::Land(i) => format::land_name(col(i)).to_string(),
            Self::AccessStatus { granted, rejected } => {
                format::access_status(col(granted), col(rejected))
            }
        }
    }
}

/// Rules for one section table.
#[derive(Debug, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Column labels, one per projected field.
    pub columns: &'static [&'static str],
    /// Identity rule.
    pub identity: Identity,
    /// Displayed fields.
    pub projection: &'static [Field],
}

/// Resolved rules for the active (role, section) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionDescriptor {
    /// A known table.
    Table(&'static TableDescriptor),
    /// No rule registered: no columns, no rows.
    Empty,
}

impl SectionDescriptor {
    /// Whether this is the empty descriptor.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Column labels.
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Table(table) => table.columns,
            Self::Empty => &[],
        }
    }

    /// Even column width in percent, `100 / column count` (0 without columns).
    #[must_use]
    pub fn column_width(&self) -> f64 {
        match self.columns().len() {
            0 => 0.0,
            n => 100.0 / n as f64,
        }
    }

    /// Canonical selection key of a row.
    #[must_use]
    pub fn row_id(&self, key: &str, row: &[String]) -> String {
        let identity = match self {
            Self::Table(table) => table.identity,
            Self::Empty => Identity::RowKey,
        };
        let col = |i: usize| row.get(i).map_or("", String::as_str);
        match identity {
            Identity::RowKey => key.to_string(),
            Identity::Column(i) => col(i).to_string(),
            Identity::Composite(cols) => cols
                .iter()
                .map(|i| col(*i).trim())
                .collect::<Vec<_>>()
                .join(COMPOSITE_SEPARATOR),
        }
    }

    /// Displayed fields of a row.
    #[must_use]
    pub fn project(&self, row: &[String]) -> Vec<String> {
        match self {
            Self::Table(table) => table.projection.iter().map(|f| f.render(row)).collect(),
            Self::Empty => Vec::new(),
        }
    }

    /// Identities of all rows of a section, in delivery order.
    pub fn row_ids<'a>(&'a self, section: &'a Section) -> impl Iterator<Item = String> + 'a {
        section.iter().map(move |(key, row)| self.row_id(key, row))
    }

    /// Find a row by identity. Absent ids are simply `None`.
    #[must_use]
    pub fn find<'s>(&self, section: &'s Section, id: &str) -> Option<(&'s str, &'s Row)> {
        if let Self::Table(TableDescriptor {
            identity: Identity::RowKey,
            ..
        }) = self
        {
            return section.rows.get_key_value(id).map(|(k, r)| (k.as_str(), r));
        }
        section.iter().find(|(key, row)| self.row_id(key, row) == id)
    }
}

static CHANGES: TableDescriptor = TableDescriptor {
    columns: &["Commit", "Name", "E-Mail", "Datum", "Zusammenfassung"],
    identity: Identity::Column(0),
    projection: &[
        Field::ShortHash(0),
        Field::Raw(1),
        Field::Raw(2),
        Field::CommitDate {
            seconds: 3,
            offset: 4,
            sign: 5,
        },
        Field::Raw(6),
    ],
};

static ACCESSES: TableDescriptor = TableDescriptor {
    columns: &["Name", "E-Mail", "Typ", "Grund", "Blätter", "Status", "Datum"],
    identity: Identity::Column(0),
    projection: &[
        Field::Raw(1),
        Field::Raw(2),
        Field::Unquoted(3),
        Field::Raw(4),
        Field::Raw(5),
        Field::AccessStatus {
            granted: 6,
            rejected: 7,
        },
        Field::Timestamp(8),
    ],
};

static USERS: TableDescriptor = TableDescriptor {
    columns: &["Name", "E-Mail", "Kontotyp", "Fingerprint"],
    identity: Identity::Column(1),
    projection: &[Field::Raw(0), Field::Raw(1), Field::Raw(2), Field::Raw(4)],
};

static DISTRICTS: TableDescriptor = TableDescriptor {
    columns: &["Land", "Amtsgericht", "Bezirk"],
    identity: Identity::Composite(&[0, 1, 2]),
    projection: &[Field::Land(0), Field::Raw(1), Field::Raw(2)],
};

static SUBSCRIPTIONS: TableDescriptor = TableDescriptor {
    columns: &["Typ", "Ziel", "Amtsgericht", "Bezirk", "Blatt", "Aktenzeichen"],
    identity: Identity::Column(0),
    projection: &[
        Field::Unquoted(1),
        Field::Raw(2),
        Field::Raw(3),
        Field::Raw(4),
        Field::Raw(5),
        Field::Raw(6),
    ],
};

static SHEETS: TableDescriptor = TableDescriptor {
    columns: &["Land", "Amtsgericht", "Bezirk", "Blatt", "Letzte Änderung"],
    identity: Identity::Composite(&[0, 1, 2, 3]),
    projection: &[
        Field::Land(0),
        Field::Raw(1),
        Field::Raw(2),
        Field::Raw(3),
        Field::Timestamp(4),
    ],
};

/// (role, section) → rules.
static DESCRIPTORS: &[(Role, SectionKey, &TableDescriptor)] = &[
    (Role::Admin, SectionKey::Changes, &CHANGES),
    (Role::Admin, SectionKey::Accesses, &ACCESSES),
    (Role::Admin, SectionKey::Users, &USERS),
    (Role::Admin, SectionKey::Districts, &DISTRICTS),
    (Role::Admin, SectionKey::Subscriptions, &SUBSCRIPTIONS),
    (Role::Admin, SectionKey::AccountSettings, &USERS),
    (Role::Bearbeiter, SectionKey::OwnChanges, &CHANGES),
    (Role::Bearbeiter, SectionKey::Sheets, &SHEETS),
    (Role::Bearbeiter, SectionKey::Subscriptions, &SUBSCRIPTIONS),
    (Role::Bearbeiter, SectionKey::AccountSettings, &USERS),
    (Role::Gast, SectionKey::Sheets, &SHEETS),
    (Role::Gast, SectionKey::Subscriptions, &SUBSCRIPTIONS),
    (Role::Gast, SectionKey::AccountSettings, &USERS),
];

/// Resolve the rules for a role and section.
#[must_use]
pub fn descriptor(role: Role, key: SectionKey) -> SectionDescriptor {
    DESCRIPTORS
        .iter()
        .find(|(r, k, _)| *r == role && *k == key)
        .map_or(SectionDescriptor::Empty, |(_, _, table)| {
            SectionDescriptor::Table(table)
        })
}
