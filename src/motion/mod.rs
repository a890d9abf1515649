//! The kinematic animator: turns queued commands into robot motion over simulated time.

/// Command consumer and state machine.
pub mod animator;
/// Step sizes and timing.
pub mod profile;
