//! Single-turn relay between the access gate and the provider router.
//!
//! This crate is the seam the messaging front end talks to: it feeds each
//! inbound (identity, text, image?) turn through the [`gatekeeper`] first
//! and dispatches at most one chat call through the
//! [`provider_router::ProviderRouter`] afterwards. Replies are plain text;
//! the front end owns delivery.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use provider_router::ProviderRouter;
//! use relay::{RelayProcessor, TurnReply};
//! use storage::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:relay.db?mode=rwc").await?;
//! db.init().await?;
//!
//! let relay = RelayProcessor::new(db, Arc::new(ProviderRouter::new()));
//! match relay.handle_turn(111, "Alice", Some("hello"), None).await? {
//!     TurnReply::Text(reply) => println!("{}", reply),
//!     TurnReply::Silent => {}
//! }
//! # Ok(())
//! # }
//! ```

mod processor;

pub use processor::{RelayError, RelayProcessor, TurnReply};
