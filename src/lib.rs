//! # Keyforge
//!
//! Multi-tenant API credential and rate-limit policy administration for
//! model-serving gateways.
//!
//! Keyforge issues API credentials, groups them into teams, and computes
//! the consumption limits a separate enforcement gateway applies per
//! credential. Teams and keys persist as label-indexed records in an
//! external store (Kubernetes Secrets in production); the intended limits
//! are published as declarative rate-limit policy objects that a gateway
//! controller reconciles. Keyforge itself never rate-limits traffic.
//!
//! ## Admin service
//!
//! ```rust,no_run
//! use keyforge::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     server::run(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Embedded engine
//!
//! ```rust,no_run
//! use keyforge::{Config, server::build_engine};
//! use keyforge::core::lifecycle::CreateTeamRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = build_engine(&Config::default())?;
//!     let team = engine
//!         .create_team(CreateTeamRequest {
//!             team_id: "ml-research".into(),
//!             display_name: "ML Research".into(),
//!             tier: "premium".into(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("created team {}", team.team_id);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use crate::config::Config;
pub use crate::core::lifecycle::LifecycleManager;
pub use crate::utils::error::{KeyforgeError, Result};
