//! Simulator wiring: configuration, the shared context and task lifecycle.

/// Simulator configuration.
pub mod config;
/// Shared context and the running simulator handle.
pub mod context;
