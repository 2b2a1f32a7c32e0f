//! # garage-provider - Declarative management of a Garage cluster
//!
//! garage-provider reconciles declared state against the admin API of a
//! [Garage](https://garagehq.deuxfleurs.fr) object-storage cluster. A host
//! orchestration runtime owns planning and applying; this crate supplies
//! the reconcilers it calls into and the HTTP client they share.
//!
//! ## Core Concepts
//!
//! - **Provider**: bootstrap that turns host/scheme/token settings into a
//!   configured [`client::AdminClient`]
//! - **Resources**: `garage_bucket`, `garage_access_key` and
//!   `garage_permission`, each implementing [`resources::Resource`]
//! - **Registry**: [`resources::ResourceRegistry`] dispatches
//!   create/read/update/delete/import by resource type name
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │         Host runtime / garage-provider CLI   │
//! └──────────────────────────────────────────────┘
//!                        │  ResourceState (JSON)
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │              ResourceRegistry                │
//! │   bucket  │  access_key  │  permission       │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │   AdminClient (bearer auth, JSON, no retry)  │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!               Garage admin API v2
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use garage_provider::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ProviderConfig::new("garage.internal:3903", "admin-token");
//!     let registry = GarageProvider::default().configure(&config)?;
//!
//!     let mut plan = ResourceState::new();
//!     plan.insert("name".into(), "assets".into());
//!     let state = registry.create("garage_bucket", &plan).await?;
//!     println!("{:?}", state.get("id"));
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::client::{AccessKey, AdminClient, Bucket, Permission, Permissions};
    pub use crate::config::ProviderConfig;
    pub use crate::error::{Error, Result};
    pub use crate::provider::GarageProvider;
    pub use crate::resources::{Resource, ResourceRegistry, ResourceState, Schema};
}

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod resources;

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
