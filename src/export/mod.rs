//! Raster export backends.
//!
//! Backends consume frame documents in playback order and produce one animated GIF
//! per diagram.

/// Backend trait, job description and a recording backend.
pub mod backend;
/// `svgexport`, ImageMagick and `gifsicle` driven as child processes.
pub mod external;
/// In-process rasterization with `resvg`.
pub mod resvg_gif;
