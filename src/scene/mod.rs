//! Shared rendering state: robot pose snapshots and the two line layers.

/// Plain data types (poses, segments, snapshots).
pub mod model;
/// The single-writer/many-reader store the components share.
pub mod store;
