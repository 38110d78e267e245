//! Command dispatcher: one request/response round-trip per command.
//!
//! The dispatcher owns no console state. It encodes a [`Command`], sends it
//! through a [`Transport`], classifies the outcome and logs failures at
//! this boundary. Applying a successful [`Reply`] is left to the caller,
//! so several dispatches may be in flight at once.

pub mod command;
pub mod protocol;
pub mod transport;

pub use command::{Command, DistrictRecord, ReplyKind, SubscriptionKind};
pub use transport::{HttpTransport, Transport, TransportError};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{DispatchError, FailureKind, KontoError, Result};
use crate::model::Snapshot;
use crate::util::atomic_write;
use protocol::ReplyBody;

/// Default bound on one round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Monotonically increasing id of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque session token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token; blank input means "not logged in".
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// A successful command: the fresh authoritative snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Request this reply answers.
    pub request: RequestId,
    /// Replacement snapshot.
    pub snapshot: Snapshot,
}

/// A successful binary command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Request this reply answers.
    pub request: RequestId,
    /// File contents.
    pub bytes: Bytes,
}

impl Download {
    /// Write the file into `dir` under `file_name`, atomically.
    pub fn save_into(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(KontoError::invalid_argument(
                "file_name",
                format!("'{file_name}' is not a plain file name"),
            ));
        }
        std::fs::create_dir_all(dir)
            .map_err(|e| KontoError::io(format!("creating {}", dir.display()), e))?;
        let path = dir.join(file_name);
        atomic_write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Sends commands and classifies their outcome.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: T,
    timeout: Duration,
    next_id: AtomicU64,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher with the default timeout.
    pub fn new(transport: T) -> Self {
        Self::with_timeout(transport, DEFAULT_TIMEOUT)
    }

    /// Create a dispatcher with a custom timeout.
    pub fn with_timeout(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a command whose reply is a snapshot.
    #[instrument(skip(self, auth), fields(action = %command.action()))]
    pub async fn dispatch(
        &self,
        auth: Option<&AuthToken>,
        command: &Command,
    ) -> std::result::Result<Reply, DispatchError> {
        let (request, body) = self.round_trip(auth, command).await?;

        match ReplyBody::from_slice(&body) {
            Ok(ReplyBody::Ok(snapshot)) => {
                debug!(request = %request, role = %snapshot.role, "Command succeeded");
                Ok(Reply { request, snapshot })
            }
            Ok(ReplyBody::Error(err)) => {
                let code = err.code.to_string();
                warn!(request = %request, code = %code, text = %err.text, "Command rejected");
                Err(DispatchError::new(
                    FailureKind::Application { code },
                    command.action(),
                    err.text,
                    Some(request),
                ))
            }
            Err(detail) => {
                warn!(request = %request, error = %detail, "Malformed reply");
                Err(DispatchError::new(
                    FailureKind::Malformed,
                    command.action(),
                    detail,
                    Some(request),
                ))
            }
        }
    }

    /// Send a command whose reply is a file.
    ///
    /// A JSON `error` body is still recognized and classified.
    #[instrument(skip(self, auth), fields(action = %command.action()))]
    pub async fn download(
        &self,
        auth: Option<&AuthToken>,
        command: &Command,
    ) -> std::result::Result<Download, DispatchError> {
        let (request, bytes) = self.round_trip(auth, command).await?;

        if let Ok(ReplyBody::Error(err)) = ReplyBody::from_slice(&bytes) {
            let code = err.code.to_string();
            warn!(request = %request, code = %code, text = %err.text, "Export rejected");
            return Err(DispatchError::new(
                FailureKind::Application { code },
                command.action(),
                err.text,
                Some(request),
            ));
        }

        debug!(request = %request, bytes = bytes.len(), "Export received");
        Ok(Download { request, bytes })
    }

    async fn round_trip(
        &self,
        auth: Option<&AuthToken>,
        command: &Command,
    ) -> std::result::Result<(RequestId, Bytes), DispatchError> {
        let Some(auth) = auth else {
            debug!("No auth token, command not sent");
            return Err(DispatchError::new(
                FailureKind::AuthAbsent,
                command.action(),
                "no auth token",
                None,
            ));
        };

        let body = protocol::encode_request(auth.expose(), command.action(), command.args())
            .map_err(|e| {
                DispatchError::new(FailureKind::Malformed, command.action(), e.to_string(), None)
            })?;

        let request = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(request = %request, args = command.args().len(), "Sending command");

        match tokio::time::timeout(self.timeout, self.transport.send(body)).await {
            Ok(Ok(bytes)) => Ok((request, bytes)),
            Ok(Err(err)) => {
                warn!(request = %request, error = %err, "Transport failure");
                Err(DispatchError::new(
                    FailureKind::Transport,
                    command.action(),
                    err.message,
                    Some(request),
                ))
            }
            Err(_) => {
                warn!(request = %request, timeout = ?self.timeout, "Command timed out");
                Err(DispatchError::new(
                    FailureKind::Timeout,
                    command.action(),
                    format!("no reply within {:?}", self.timeout),
                    Some(request),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use std::sync::Mutex;

    /// Replays canned replies and records what was sent.
    struct Scripted {
        replies: Mutex<Vec<std::result::Result<Bytes, TransportError>>>,
        sent: Mutex<Vec<serde_json::Value>>,
    }

    impl Scripted {
        fn new(replies: Vec<std::result::Result<&'static str, &'static str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .rev()
                        .map(|r| {
                            r.map(|body| Bytes::from_static(body.as_bytes()))
                                .map_err(TransportError::new)
                        })
                        .collect(),
                ),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Scripted {
        async fn send(&self, body: Vec<u8>) -> std::result::Result<Bytes, TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push(serde_json::from_slice(&body).unwrap());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(TransportError::new("script exhausted")))
        }
    }

    fn token() -> AuthToken {
        AuthToken::new("tok").unwrap()
    }

    #[tokio::test]
    async fn test_ok_reply_carries_snapshot() {
        let dispatcher = Dispatcher::new(Scripted::new(vec![Ok(
            r#"{"status":"ok","role":"admin","data":{}}"#,
        )]));
        let reply = dispatcher
            .dispatch(Some(&token()), &Command::delete_users(&["a@b.com".into()]))
            .await
            .unwrap();

        assert_eq!(reply.request, RequestId(1));
        assert_eq!(reply.snapshot.role, Role::Admin);

        let sent = dispatcher.transport().sent.lock().unwrap();
        assert_eq!(
            sent[0],
            serde_json::json!({"auth": "tok", "aktion": "benutzer-loeschen", "daten": ["a@b.com"]})
        );
    }

    #[tokio::test]
    async fn test_missing_auth_sends_nothing() {
        let dispatcher = Dispatcher::new(Scripted::new(vec![]));
        let err = dispatcher
            .dispatch(None, &Command::generate_keypair("a@b.com"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, FailureKind::AuthAbsent);
        assert_eq!(err.request, None);
        assert!(dispatcher.transport().sent.lock().unwrap().is_empty());
        assert!(AuthToken::new("  ").is_none());
    }

    #[tokio::test]
    async fn test_failure_classification() {
        let dispatcher = Dispatcher::new(Scripted::new(vec![
            Ok(r#"{"status":"error","code":0,"text":"Fehler bei Authentifizierung"}"#),
            Ok("<html>"),
            Err("connection refused"),
        ]));
        let cmd = Command::custom("x", Vec::<String>::new());

        let rejected = dispatcher.dispatch(Some(&token()), &cmd).await.unwrap_err();
        assert_eq!(rejected.code(), Some("0"));
        assert_eq!(rejected.detail, "Fehler bei Authentifizierung");

        let malformed = dispatcher.dispatch(Some(&token()), &cmd).await.unwrap_err();
        assert_eq!(malformed.kind, FailureKind::Malformed);

        let transport = dispatcher.dispatch(Some(&token()), &cmd).await.unwrap_err();
        assert_eq!(transport.kind, FailureKind::Transport);
        assert!(transport.is_retryable());
        assert_eq!(transport.request, Some(RequestId(3)));
    }

    #[tokio::test]
    async fn test_download_and_save() {
        let dispatcher = Dispatcher::new(Scripted::new(vec![
            Ok("PK\x03\x04zip"),
            Ok(r#"{"status":"error","code":"E1","text":"kein Blatt"}"#),
        ]));
        let cmd = Command::export_sheets(&["NRW/Köln/Deutz/1".into()]);

        let download = dispatcher.download(Some(&token()), &cmd).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = download.save_into(dir.path(), "export.zip").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"PK\x03\x04zip");
        assert!(download.save_into(dir.path(), "../x.zip").is_err());

        let err = dispatcher.download(Some(&token()), &cmd).await.unwrap_err();
        assert_eq!(err.code(), Some("E1"));
    }
}
