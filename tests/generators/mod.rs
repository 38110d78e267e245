//! Synthetic snapshots and scripted transports for tests.
//!
//! Builders produce snapshots shaped like the backend's, so tests can
//! drive the console without a server.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use konto_console::dispatch::{Transport, TransportError};
use konto_console::model::{Role, Row, Section, SectionKey, Snapshot};
use serde_json::Value;
use uuid::Uuid;

/// Build a raw row from string slices.
pub fn row(fields: &[&str]) -> Row {
    fields.iter().map(|f| (*f).to_string()).collect()
}

/// A user row: name, email, role, public key, fingerprint.
pub fn user(name: &str, email: &str, role: &str) -> Row {
    row(&[name, email, role, "", ""])
}

/// Admin users section with the given role for Anna.
pub fn users_section(anna_role: &str) -> Section {
    Section::new(
        &["name", "email", "rechte", "pubkey", "fingerprint"],
        [
            ("1", user("Anna Muster", "a@b.com", anna_role)),
            ("2", user("Bernd Beispiel", "b@c.de", "gast")),
            ("3", user("Carl Köhler", "c@d.de", "admin")),
        ],
    )
}

/// Admin districts section.
pub fn districts_section() -> Section {
    Section::new(
        &["land", "amtsgericht", "bezirk"],
        [
            ("1", row(&["NRW", "Köln", "Deutz"])),
            ("2", row(&["NRW", "Köln", "Kalk"])),
            ("3", row(&["BYN", "München", "Schwabing"])),
        ],
    )
}

/// Snapshot as seen by an administrator.
pub fn admin_snapshot(anna_role: &str) -> Snapshot {
    Snapshot::empty(Role::Admin)
        .with_section(SectionKey::Users, users_section(anna_role))
        .with_section(SectionKey::Districts, districts_section())
}

/// Snapshot as seen by a caseworker.
pub fn bearbeiter_snapshot() -> Snapshot {
    Snapshot::empty(Role::Bearbeiter).with_section(
        SectionKey::Sheets,
        Section::new(
            &["land", "amtsgericht", "bezirk", "blatt", "geaendert"],
            [
                ("1", row(&["NRW", "Köln", "Deutz", "1", "2024-03-01T09:30:00+01:00"])),
                ("2", row(&["NRW", "Köln", "Deutz", "2", ""])),
            ],
        ),
    )
}

/// Snapshot as seen by a guest.
pub fn gast_snapshot() -> Snapshot {
    Snapshot::empty(Role::Gast)
}

/// A users section with `count` generated rows.
pub fn generated_users(count: usize) -> Section {
    let rows = (0..count).map(|i| {
        let id = Uuid::new_v4().simple().to_string();
        let role = if i % 3 == 0 { "bearbeiter" } else { "gast" };
        (
            i.to_string(),
            user(&format!("Person {i}"), &format!("{id}@example.org"), role),
        )
    });
    Section::new(&["name", "email", "rechte", "pubkey", "fingerprint"], rows)
}

/// Serialize a snapshot as an `ok` reply body.
pub fn ok_body(snapshot: &Snapshot) -> String {
    let mut value = serde_json::to_value(snapshot).unwrap();
    value["status"] = Value::from("ok");
    value.to_string()
}

/// Build an `error` reply body.
pub fn error_body(code: Value, text: &str) -> String {
    serde_json::json!({ "status": "error", "code": code, "text": text }).to_string()
}

/// One scripted transport step.
pub struct Step {
    delay: Duration,
    outcome: Result<String, String>,
}

impl Step {
    /// Reply immediately with `body`.
    pub fn reply(body: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(body.into()),
        }
    }

    /// Fail at the transport level.
    pub fn fail(message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(message.to_string()),
        }
    }

    /// Delay this step.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replays steps in order and records every request body.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    sent: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    /// Create a transport from its steps.
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Requests sent so far, decoded.
    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, body: Vec<u8>) -> Result<Bytes, TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push(serde_json::from_slice(&body).unwrap());
        let step = self.steps.lock().unwrap().pop_front();
        let Some(step) = step else {
            return Err(TransportError::new("script exhausted"));
        };
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.outcome.map(Bytes::from).map_err(TransportError::new)
    }
}
