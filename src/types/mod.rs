//! Type definitions for the XeroML API.
//!
//! Mirrors the API's request and response schemas: intent graphs, sessions,
//! drift reports and usage.

pub mod graph;
pub mod requests;
pub mod session;
pub mod usage;
