//! Shared-secret and invite authorization over the principal store.
//!
//! An inbound (identity, text) pair runs through the [`AccessController`],
//! which consults the principal repository and the invite manager and
//! returns an [`AccessOutcome`]. Secrets are compared verbatim; possession
//! of a secret IS the identity check — there are no per-user credentials
//! in this system by design.
//!
//! # Example
//!
//! ```no_run
//! use gatekeeper::{AccessController, AccessOutcome};
//! use storage::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:relay.db?mode=rwc").await?;
//! db.init().await?;
//!
//! let gate = AccessController::new(db);
//! match gate.authorize(111, "Alice", "secret").await? {
//!     AccessOutcome::GrantedUser => println!("welcome"),
//!     AccessOutcome::Denied => println!("denied"),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod policy;

pub use controller::{AccessController, AccessOutcome};
pub use error::GatekeeperError;
pub use policy::{match_access_secret, match_admin_secret, Grant};
