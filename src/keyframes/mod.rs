//! Keyframe synthesis.
//!
//! Each output variant is a [`strategy::StrokeAnimationStrategy`] that turns the
//! stroke windows of a diagram into style rules.

/// Self-running CSS animation.
pub mod continuous;
/// Style-sheet model and CSS serialization.
pub mod css;
/// One style sheet per sampled raster frame.
pub mod raster;
/// Script-driven animation, one stroke at a time.
pub mod script;
/// The capability shared by all variants.
pub mod strategy;
