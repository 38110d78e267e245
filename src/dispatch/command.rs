//! Named commands and their positional argument layouts.
//!
//! Each builder produces the exact `aktion` and `daten` the backend
//! expects. Builders that take free input validate it before anything is
//! sent; builders over selections accept any ids, including stale ones.

use std::fmt;

use crate::error::{KontoError, Result};
use crate::model::Role;
use crate::rows::format::land_code;

/// Action names understood by the backend.
pub mod actions {
    /// Grant access requests.
    pub const APPROVE_ACCESS: &str = "zugriff-genehmigen";
    /// Reject access requests.
    pub const REJECT_ACCESS: &str = "zugriff-ablehnen";
    /// Withdraw granted access.
    pub const WITHDRAW_ACCESS: &str = "zugriff-zurueckziehen";
    /// Create a user.
    pub const CREATE_USER: &str = "benutzer-neu";
    /// Delete users.
    pub const DELETE_USERS: &str = "benutzer-loeschen";
    /// Change the role of users.
    pub const EDIT_USER_ROLE: &str = "benutzer-bearbeite-kontotyp";
    /// Generate a new key pair.
    pub const GENERATE_KEYPAIR: &str = "schluessel-neu";
    /// Create districts.
    pub const CREATE_DISTRICT: &str = "bezirk-neu";
    /// Delete districts.
    pub const DELETE_DISTRICTS: &str = "bezirk-loeschen";
    /// Change an account setting.
    pub const EDIT_SETTING: &str = "einstellung-bearbeiten";
    /// Create a subscription.
    pub const CREATE_SUBSCRIPTION: &str = "abo-neu";
    /// End subscriptions.
    pub const END_SUBSCRIPTIONS: &str = "abo-loeschen";
    /// Export registry sheets (binary reply).
    pub const EXPORT_SHEETS: &str = "grundbuchblaetter-exportieren";
}

/// What kind of reply a command produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// A JSON `ok`/`error` body.
    Snapshot,
    /// Raw bytes (a file download).
    Binary,
}

/// Delivery channel of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionKind {
    /// Notification by e-mail.
    Email,
    /// Notification by webhook.
    Webhook,
}

impl SubscriptionKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Webhook => "webhook",
        }
    }

    /// Parse the wire name.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "email" => Ok(Self::Email),
            "webhook" => Ok(Self::Webhook),
            other => Err(KontoError::invalid_argument(
                "typ",
                format!("'{other}' is not a subscription type (expected email or webhook)"),
            )),
        }
    }
}

/// One district of a bulk import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRecord {
    /// Federal state.
    pub land: String,
    /// Local court.
    pub court: String,
    /// District name.
    pub district: String,
}

impl DistrictRecord {
    /// Create a record.
    pub fn new(land: impl Into<String>, court: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            land: land.into(),
            court: court.into(),
            district: district.into(),
        }
    }
}

/// A named action with positional string arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    action: String,
    args: Vec<String>,
    reply: ReplyKind,
}

impl Command {
    fn new(action: &str, args: Vec<String>) -> Self {
        Self {
            action: action.to_string(),
            args,
            reply: ReplyKind::Snapshot,
        }
    }

    /// A command not covered by the builders below.
    pub fn custom<I, S>(action: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action: action.into(),
            args: args.into_iter().map(Into::into).collect(),
            reply: ReplyKind::Snapshot,
        }
    }

    /// Mark the command as producing a binary reply.
    #[must_use]
    pub fn binary(mut self) -> Self {
        self.reply = ReplyKind::Binary;
        self
    }

    /// Action name.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Positional arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Expected reply kind.
    #[must_use]
    pub const fn reply_kind(&self) -> ReplyKind {
        self.reply
    }

    /// Grant the selected access requests.
    pub fn approve_access(ids: &[String]) -> Self {
        Self::new(actions::APPROVE_ACCESS, ids.to_vec())
    }

    /// Reject the selected access requests.
    pub fn reject_access(ids: &[String]) -> Self {
        Self::new(actions::REJECT_ACCESS, ids.to_vec())
    }

    /// Withdraw the selected granted accesses.
    pub fn withdraw_access(ids: &[String]) -> Self {
        Self::new(actions::WITHDRAW_ACCESS, ids.to_vec())
    }

    /// Create a user.
    pub fn create_user(name: &str, email: &str, password: &str, role: Role) -> Result<Self> {
        require("name", name)?;
        require("email", email)?;
        require("passwort", password)?;
        Ok(Self::new(
            actions::CREATE_USER,
            vec![
                name.to_string(),
                email.to_string(),
                password.to_string(),
                role.as_str().to_string(),
            ],
        ))
    }

    /// Delete the selected users.
    pub fn delete_users(ids: &[String]) -> Self {
        Self::new(actions::DELETE_USERS, ids.to_vec())
    }

    /// Change the role of a user; the current selection rides along.
    pub fn edit_user_role(role: Role, id: &str, selection: &[String]) -> Self {
        let mut args = Vec::with_capacity(selection.len() + 2);
        args.push(role.as_str().to_string());
        args.push(id.to_string());
        args.extend(selection.iter().cloned());
        Self::new(actions::EDIT_USER_ROLE, args)
    }

    /// Generate a new key pair for a user.
    pub fn generate_keypair(id: &str) -> Self {
        Self::new(actions::GENERATE_KEYPAIR, vec![id.to_string()])
    }

    /// Create one district.
    pub fn create_district(land: &str, court: &str, district: &str) -> Result<Self> {
        Self::create_districts([DistrictRecord::new(land, court, district)])
    }

    /// Create several districts at once, sent as flat triples.
    ///
    /// The federal state may be given by code or full name; it is always
    /// sent as its code.
    pub fn create_districts<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = DistrictRecord>,
    {
        let mut args = Vec::new();
        for record in records {
            require("land", &record.land)?;
            require("amtsgericht", &record.court)?;
            require("bezirk", &record.district)?;
            let land = land_code(&record.land).ok_or_else(|| {
                KontoError::invalid_argument(
                    "land",
                    format!("unknown federal state: {}", record.land.trim()),
                )
            })?;
            args.extend([land.to_string(), record.court, record.district]);
        }
        if args.is_empty() {
            return Err(KontoError::invalid_argument("bezirke", "no districts given"));
        }
        Ok(Self::new(actions::CREATE_DISTRICT, args))
    }

    /// Delete the selected districts.
    pub fn delete_districts(ids: &[String]) -> Self {
        Self::new(actions::DELETE_DISTRICTS, ids.to_vec())
    }

    /// Change an account setting.
    pub fn edit_setting(key: &str, value: &str) -> Result<Self> {
        require("einstellung", key)?;
        Ok(Self::new(
            actions::EDIT_SETTING,
            vec![key.to_string(), value.to_string()],
        ))
    }

    /// Subscribe to changes of a registry sheet.
    pub fn create_subscription(
        kind: &str,
        court: &str,
        district: &str,
        sheet: &str,
        target: &str,
        reference: &str,
    ) -> Result<Self> {
        let kind = SubscriptionKind::parse(kind)?;
        require("amtsgericht", court)?;
        require("bezirk", district)?;
        require("ziel", target)?;
        let sheet = sheet.trim();
        if sheet.is_empty() || !sheet.chars().all(|c| c.is_ascii_digit()) {
            return Err(KontoError::invalid_argument(
                "blatt",
                format!("'{sheet}' is not a sheet number"),
            ));
        }
        Ok(Self::new(
            actions::CREATE_SUBSCRIPTION,
            vec![
                kind.as_str().to_string(),
                court.to_string(),
                district.to_string(),
                sheet.to_string(),
                target.to_string(),
                reference.to_string(),
            ],
        ))
    }

    /// End the selected subscriptions.
    pub fn end_subscriptions(ids: &[String]) -> Self {
        Self::new(actions::END_SUBSCRIPTIONS, ids.to_vec())
    }

    /// Export the selected registry sheets as a file.
    pub fn export_sheets(ids: &[String]) -> Self {
        Self::new(actions::EXPORT_SHEETS, ids.to_vec()).binary()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} args)", self.action, self.args.len())
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KontoError::invalid_argument(name, "must not be empty"));
    }
    Ok(())
}
