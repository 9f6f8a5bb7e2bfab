//! Session-authenticated blog backend.
//!
//! Layout follows a hexagonal split: `domain` holds entities, services and
//! ports; `inbound` adapts HTTP onto the ports; `outbound` implements them
//! over SQLite and Argon2. `server` wires them into an Actix application.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use domain::TraceId;
pub use middleware::Trace;
