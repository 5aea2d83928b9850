/// Arc length of SVG path data.
pub mod length;
