//! WebSocket front end: decodes pen messages and feeds the command channel.

/// Applies decoded messages to the scene and the command channel.
pub mod handler;
/// Wire format.
pub mod message;
/// Listener and per-connection loops.
pub mod server;
