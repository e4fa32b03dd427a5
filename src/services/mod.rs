//! Service implementations for the XeroML API.
//!
//! Every service shares one request executor, so all of them use the same
//! transport, credential and metrics collector.

mod executor;
mod intents;
mod sessions;
mod usage;

pub(crate) use executor::RequestExecutor;
pub use intents::IntentService;
pub use sessions::{Session, SessionsService};
pub use usage::UsageService;
