//! Kanimate turns static stroke-order diagrams (KanjiVG-style SVG) into animations.
//!
//! Each diagram's strokes are measured, given a share of a bounded animation period,
//! and rendered into up to three outputs:
//!
//! - a self-running animated SVG driven by CSS keyframes
//! - an SVG whose strokes are advanced by an external script
//! - an animated GIF sampled at a fixed frame rate
//!
//! [`run_batch`] processes a whole directory; [`animate_file`] a single diagram.
#![forbid(unsafe_code)]

pub mod animation;
pub mod config;
pub mod document;
pub mod export;
pub mod foundation;
pub mod geometry;
pub mod keyframes;
pub mod pipeline;
pub mod timeline;

pub use crate::animation::ease::{EasingCurve, TimingFunction};
pub use crate::config::settings::{RasterBackendKind, Settings, VariantSelection};
pub use crate::document::assemble::{DiagramOutputs, assemble};
pub use crate::document::diagram::{Diagram, strip_generated_artifacts};
pub use crate::document::xml::Document;
pub use crate::export::backend::{FrameStyling, InMemoryBackend, RasterExportBackend, RasterJob};
pub use crate::export::external::ExternalToolBackend;
pub use crate::export::resvg_gif::ResvgGifBackend;
pub use crate::foundation::error::{KanimateError, KanimateResult};
pub use crate::geometry::length::path_length;
pub use crate::keyframes::css::escape_identifier;
pub use crate::pipeline::batch::{BatchReport, OutputPaths, animate_file, run_batch};
pub use crate::timeline::allocator::{StrokeWindow, Timeline};
pub use crate::timeline::frames::{FrameIndex, FrameSchedule};
