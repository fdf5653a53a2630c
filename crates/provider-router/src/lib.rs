//! Static backend registry and router.
//!
//! The registry is a closed set: every backend the deployment can talk to is
//! a [`ProviderKind`] variant with a static capability descriptor. The
//! [`ProviderRouter`] caches one client per backend, tracks which backend is
//! active, and dispatches chat, model-listing and health operations.
//!
//! # Example
//!
//! ```no_run
//! use provider_core::Message;
//! use provider_router::{ProviderOptions, ProviderRouter};
//!
//! # async fn example() -> Result<(), provider_core::ProviderError> {
//! let router = ProviderRouter::new();
//! router
//!     .configure("lm_studio", ProviderOptions::with_base_url("http://127.0.0.1:1234/v1"))
//!     .await;
//!
//! let response = router
//!     .chat(&[Message::user("Hello!")], "local-model", None)
//!     .await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

mod registry;
mod router;

pub use registry::{ProviderKind, ProviderOptions, DEFAULT_PROVIDER};
pub use router::ProviderRouter;
