//! XeroML Client Library
//!
//! A Rust client for the XeroML API, which turns free-form user messages
//! into structured intent graphs and tracks how those intents drift across
//! a multi-turn conversation.
//!
//! # Features
//!
//! - **Intent Parsing**: `classify` any text into an [`IntentGraph`]
//! - **Sessions**: Multi-turn context with drift detection
//! - **Usage**: Credit balance and monthly call counts
//! - **Observability**: Tracing spans, structured logging and request metrics
//! - **Async and Blocking**: Tokio-based client plus a [`blocking`] wrapper
//!
//! Every call is a single HTTP request. Failures are returned as
//! [`XeroMlError`] and are never retried by the client.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xeroml_client::XeroMlClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = XeroMlClient::new("xml_your_api_key")?;
//!
//!     let graph = client.classify("Book a table for two tomorrow at 8").await?;
//!     println!("{} ({} sub-goals)", graph.root_goal, graph.sub_goal_count());
//!     Ok(())
//! }
//! ```
//!
//! # Session Example
//!
//! ```rust,no_run
//! use xeroml_client::{TurnRole, XeroMlClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = XeroMlClient::from_env()?;
//!     let session = client.create_session(None).await?;
//!
//!     session.parse("Refactor the auth module").await?;
//!     session.update("Here is the refactored module...", TurnRole::Assistant).await?;
//!     session.parse("Also add payments while you're in there").await?;
//!
//!     let drift = session.check_drift().await?;
//!     if drift.detected {
//!         println!("drift: {:?}", drift.description);
//!     }
//!     session.end().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod blocking;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{XeroMlClient, XeroMlClientBuilder};
pub use config::XeroMlConfig;
pub use errors::{XeroMlError, XeroMlResult};
pub use services::{IntentService, Session, SessionsService, UsageService};

// Type re-exports
pub use types::graph::{
    ActionReadiness, AmbiguityLevel, IntentGraph, IntentMeta, IntentScope, LatentStates,
    ParseResponse, RiskSensitivity, SubGoal, SubGoalStatus,
};
pub use types::requests::ParseRequest;
pub use types::session::{DriftReport, SessionInfo, TurnRole};
pub use types::usage::{CreditInfo, UsageInfo, UsageMonth};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
