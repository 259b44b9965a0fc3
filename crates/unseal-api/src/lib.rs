//! Unseal API
//!
//! HTTP surface for the document unlock service: JWT auth middleware,
//! document/purchase handlers, lifecycle service, and application setup.
//! Modules are public so integration tests can build the router directly.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
