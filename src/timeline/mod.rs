//! Time allocation across strokes and raster frame sampling.

/// Per-stroke durations and animation windows.
pub mod allocator;
/// Regular frame sampling of a timeline.
pub mod frames;
