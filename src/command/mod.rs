//! Movement commands and the FIFO that carries them from the receiver to the animator.

/// Unbounded single-consumer command queue.
pub mod channel;
/// The `Command` value type.
pub mod model;
