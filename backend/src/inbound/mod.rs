//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! The only transport is server-rendered HTTP under [`http`].

pub mod http;
