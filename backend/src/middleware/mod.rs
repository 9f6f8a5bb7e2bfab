//! Request middleware.
//!
//! Purpose: request lifecycle concerns that apply to every route, currently
//! trace id assignment and per-request logging.

pub mod trace;

pub use trace::Trace;
