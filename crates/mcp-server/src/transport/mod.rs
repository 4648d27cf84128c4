//! Transports carrying JSON-RPC messages to [`crate::handlers::dispatch`]

pub mod stdio;

pub use stdio::{run_stdio_server, serve};
