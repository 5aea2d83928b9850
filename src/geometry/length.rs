use kurbo::{BezPath, ParamCurveArclen as _};

use crate::foundation::error::{KanimateError, KanimateResult};

/// Parse SVG path data (`d` attribute) into a Bézier path.
pub fn parse_path_data(d: &str) -> KanimateResult<BezPath> {
    BezPath::from_svg(d)
        .map_err(|e| KanimateError::geometry(format!("invalid path data \"{d}\": {e}")))
}

/// Arc length of SVG path data, summed over all segments of all subpaths.
///
/// `tolerance` bounds the absolute error of each segment's integration. Moves
/// contribute nothing; `closepath` contributes the closing line.
pub fn path_length(d: &str, tolerance: f64) -> KanimateResult<f64> {
    let path = parse_path_data(d)?;
    Ok(bez_path_length(&path, tolerance))
}

pub fn bez_path_length(path: &BezPath, tolerance: f64) -> f64 {
    path.segments().map(|seg| seg.arclen(tolerance)).sum()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/length.rs"]
mod tests;
