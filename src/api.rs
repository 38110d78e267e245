//! High-level programmatic API for konto-console.
//!
//! [`KontoClient`] wires configuration, transport and dispatcher together
//! and applies replies to a [`ConsoleState`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use konto_console::api::{load_snapshot, KontoClient};
//! use konto_console::prelude::*;
//!
//! # async fn run() -> konto_console::Result<()> {
//! let client = KontoClient::from_config(Config::load()?, AuthToken::new("token"))?;
//! let mut console = client.open_session(load_snapshot("konto.json".as_ref())?);
//!
//! console.change_section(2);
//! console.select("a@b.com");
//! let cmd = Command::delete_users(&console.live_selection());
//! client.execute(&mut console, &cmd).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use futures::stream::{FuturesUnordered, StreamExt};

use crate::config::Config;
use crate::console::{ConsoleState, Redraw};
use crate::dispatch::{AuthToken, Command, Dispatcher, HttpTransport, Reply, Transport};
use crate::error::{KontoError, Result};
use crate::model::Snapshot;

/// High-level client for console operations.
#[derive(Debug)]
pub struct KontoClient<T = HttpTransport> {
    config: Config,
    dispatcher: Dispatcher<T>,
    auth: Option<AuthToken>,
}

impl KontoClient<HttpTransport> {
    /// Create a client talking HTTP to the configured server.
    pub fn from_config(config: Config, auth: Option<AuthToken>) -> Result<Self> {
        let transport = HttpTransport::new(&config.server)?;
        Ok(Self::with_transport(config, transport, auth))
    }
}

impl<T: Transport> KontoClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(config: Config, transport: T, auth: Option<AuthToken>) -> Self {
        let dispatcher = Dispatcher::with_timeout(transport, config.server.timeout());
        Self {
            config,
            dispatcher,
            auth,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The dispatcher, for callers that apply replies themselves.
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Start a console session on an initial snapshot.
    pub fn open_session(&self, snapshot: Snapshot) -> ConsoleState {
        ConsoleState::new(snapshot, self.auth.clone())
            .with_stale_policy(self.config.session.stale_replies)
    }

    /// Send a command without a console session.
    pub async fn send(&self, command: &Command) -> Result<Reply> {
        Ok(self.dispatcher.dispatch(self.auth.as_ref(), command).await?)
    }

    /// Send a command with the session's token and apply the reply.
    ///
    /// On any failure the state is left as it was.
    pub async fn execute(&self, state: &mut ConsoleState, command: &Command) -> Result<Redraw> {
        let auth = state.auth().cloned();
        let reply = self.dispatcher.dispatch(auth.as_ref(), command).await?;
        state.apply(reply)
    }

    /// Send several commands at once and apply each reply as it arrives.
    ///
    /// Results are returned in arrival order. Which replies win is decided
    /// by the session's stale policy.
    pub async fn execute_all(
        &self,
        state: &mut ConsoleState,
        commands: &[Command],
    ) -> Vec<Result<Redraw>> {
        let auth = state.auth().cloned();
        let mut pending: FuturesUnordered<_> = commands
            .iter()
            .map(|command| self.dispatcher.dispatch(auth.as_ref(), command))
            .collect();

        let mut outcomes = Vec::with_capacity(commands.len());
        while let Some(outcome) = pending.next().await {
            outcomes.push(outcome.map_err(KontoError::from).and_then(|reply| state.apply(reply)));
        }
        outcomes
    }

    /// Export registry sheets into the configured export directory.
    pub async fn export(&self, ids: &[String]) -> Result<PathBuf> {
        self.export_into(ids, &self.config.export.target_dir()).await
    }

    /// Export registry sheets into `dir`.
    pub async fn export_into(&self, ids: &[String], dir: &Path) -> Result<PathBuf> {
        if ids.is_empty() {
            return Err(KontoError::invalid_argument("ids", "no sheets selected"));
        }
        let command = Command::export_sheets(ids);
        let download = self.dispatcher.download(self.auth.as_ref(), &command).await?;
        download.save_into(dir, &self.config.export.file_name)
    }
}

/// Read an initial snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Err(KontoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let json = std::fs::read_to_string(path)
        .map_err(|e| KontoError::io(format!("Failed to read snapshot: {}", path.display()), e))?;
    Snapshot::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StalePolicy;
    use crate::dispatch::TransportError;
    use crate::model::Role;
    use bytes::Bytes;
    use tokio_test::{assert_err, assert_ok, block_on};

    struct Unreachable;

    impl Transport for Unreachable {
        async fn send(&self, _body: Vec<u8>) -> std::result::Result<Bytes, TransportError> {
            Err(TransportError::new("unreachable"))
        }
    }

    fn client(policy: StalePolicy) -> KontoClient<Unreachable> {
        let mut config = Config::default();
        config.session.stale_replies = policy;
        KontoClient::with_transport(config, Unreachable, AuthToken::new("tok"))
    }

    #[test]
    fn test_open_session_carries_token() {
        let state = client(StalePolicy::Ignore).open_session(Snapshot::empty(Role::Gast));
        assert_eq!(state.role(), Role::Gast);
        assert_eq!(state.auth().map(AuthToken::expose), Some("tok"));
    }

    #[test]
    fn test_export_without_ids_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(block_on(client(StalePolicy::Apply).export_into(&[], dir.path())));
        assert!(matches!(err, KontoError::InvalidArgument { .. }));
    }

    #[test]
    fn test_failed_execute_keeps_state() {
        let client = client(StalePolicy::Apply);
        let mut state = client.open_session(Snapshot::empty(Role::Admin));
        let err = assert_err!(block_on(
            client.execute(&mut state, &Command::generate_keypair("a@b.com"))
        ));
        assert!(err.is_recoverable());
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn test_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("konto.json");
        std::fs::write(&path, r#"{"status":"ok","kontotyp":"gast","data":{}}"#).unwrap();

        let snapshot = assert_ok!(load_snapshot(&path));
        assert_eq!(snapshot.role, Role::Gast);
        assert!(matches!(
            load_snapshot(&dir.path().join("missing.json")),
            Err(KontoError::FileNotFound { .. })
        ));
    }
}
