//! konto-console: state engine and command client for the role-gated
//! land-registry account console.
//!
//! The crate holds the dataset an operator currently sees, resolves which
//! sections their role may open, filters and multi-selects rows, and
//! dispatches mutating commands to a backend that answers with a fresh,
//! authoritative snapshot.
//!
//! # Features
//!
//! - **Role-gated navigation**: static section lists per role, with an
//!   explicit empty section instead of errors
//! - **Row rules as data**: identity and projection per (role, section)
//! - **Selection that survives refreshes**: stale ids stay inert
//! - **Typed dispatch**: every failure is a classified [`DispatchError`]
//! - **Render-ready views**: no UI toolkit required
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use konto_console::prelude::*;
//!
//! fn main() -> konto_console::Result<()> {
//!     let snapshot = Snapshot::from_json(&std::fs::read_to_string("konto.json")?)?;
//!     let mut console = ConsoleState::new(snapshot, AuthToken::new("token"));
//!
//!     console.change_section(0);
//!     console.set_filter(Some("Köln"));
//!     console.select_all_visible();
//!
//!     for row in console.view().table.rows {
//!         println!("{} {:?}", row.id, row.cells);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`model`]: Roles, section keys, sections and snapshots
//! - [`store`]: The current snapshot, swapped whole
//! - [`registry`]: Sections per role, in sidebar order
//! - [`rows`]: Row identity and display projection per section
//! - [`filter`]: Case-insensitive row filter
//! - [`selection`]: The ordered selection set
//! - [`console`]: Session state, navigation and the view model
//! - [`dispatch`]: Commands, wire protocol, transports and the dispatcher
//! - [`api`]: High-level client
//! - [`cli`]: Command-line interface
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling

#![doc(html_root_url = "https://docs.rs/konto-console/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod model;
pub mod registry;
pub mod rows;
pub mod selection;
pub mod store;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{DispatchError, FailureKind, KontoError, Result};
pub use model::{Role, SectionKey, Snapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::api::KontoClient;
    pub use crate::config::{Config, StalePolicy};
    pub use crate::console::{reduce, ConsoleEvent, ConsoleState, ConsoleView, Redraw};
    pub use crate::dispatch::{AuthToken, Command, Dispatcher, Reply, RequestId, Transport};
    pub use crate::error::{DispatchError, FailureKind, KontoError, Result};
    pub use crate::model::{Role, Section, SectionKey, Snapshot};
    pub use crate::selection::SelectionSet;
}
