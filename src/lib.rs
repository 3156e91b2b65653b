//! Library crate for port-zero: a concurrent TCP connect scanner with host
//! liveness checks and best-effort service identification.
pub mod error;
pub mod liveness;
pub mod ports;
pub mod probe;
pub mod resolve;
pub mod scanner;
pub mod services;
pub mod types;
