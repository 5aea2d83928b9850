use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::animation::ease::TimingFunction;
use crate::foundation::error::{KanimateError, KanimateResult};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "KANIMATE_CONFIG";
/// Settings file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "kanimate.json";

/// Everything configurable about a run.
///
/// Loaded once, validated once, then passed by reference to every stage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory scanned for `*.svg` stroke diagrams.
    pub input_dir: PathBuf,
    /// Root of the `svg/`, `js_svg/` and `gif/` output directories.
    pub output_dir: PathBuf,
    /// Id prefix of the stroke-number label group, which is hidden.
    pub stroke_numbers_prefix: String,
    pub colors: StrokeColors,
    pub brush: BrushSettings,
    pub timing: TimingSettings,
    pub geometry: GeometrySettings,
    pub raster: RasterSettings,
    /// Keep frame documents, manifests and intermediate GIFs after a raster export.
    pub keep_temporary_files: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("kanjivg/kanji"),
            output_dir: PathBuf::from("output"),
            stroke_numbers_prefix: "kvg:StrokeNumbers_".to_owned(),
            colors: StrokeColors::default(),
            brush: BrushSettings::default(),
            timing: TimingSettings::default(),
            geometry: GeometrySettings::default(),
            raster: RasterSettings::default(),
            keep_temporary_files: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> KanimateResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| KanimateError::configuration(format!("invalid settings: {e}")))
    }

    /// Read settings from a JSON file.
    pub fn from_path(path: &Path) -> KanimateResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&json).map_err(|e| match e {
            KanimateError::Configuration(msg) => {
                KanimateError::configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Resolve settings from `KANIMATE_CONFIG`, then `./kanimate.json`, then defaults.
    pub fn load() -> KanimateResult<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            tracing::debug!(path = %path.display(), "loading settings from environment");
            return Self::from_path(&path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "loading settings from working directory");
            return Self::from_path(local);
        }
        Ok(Self::default())
    }

    /// Reject settings that cannot produce the requested outputs.
    pub fn validate(&self, variants: VariantSelection) -> KanimateResult<()> {
        if !variants.any() {
            return Err(KanimateError::configuration(
                "no output selected (enable at least one of --svg, --js-svg, --gif)",
            ));
        }
        self.timing.validate()?;
        self.geometry.validate()?;
        if variants.raster {
            self.raster.validate()?;
        }
        Ok(())
    }

    pub fn svg_output_dir(&self) -> PathBuf {
        self.output_dir.join("svg")
    }

    pub fn js_svg_output_dir(&self) -> PathBuf {
        self.output_dir.join("js_svg")
    }

    pub fn gif_output_dir(&self) -> PathBuf {
        self.output_dir.join("gif")
    }
}

/// Which documents a run produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VariantSelection {
    /// Self-running animated SVG.
    pub continuous: bool,
    /// SVG whose strokes are advanced by an external script.
    pub script: bool,
    /// Animated GIF.
    pub raster: bool,
}

impl VariantSelection {
    pub fn any(self) -> bool {
        self.continuous || self.script || self.raster
    }
}

/// Stroke color and width of one overlay layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

impl LineStyle {
    fn new(color: &str, width: f64) -> Self {
        Self {
            color: color.to_owned(),
            width,
        }
    }

    /// Inline style carried by an overlay group.
    pub fn group_style(&self) -> String {
        format!(
            "fill:none;stroke:{};stroke-width:{:.6};stroke-linecap:round;stroke-linejoin:round;",
            self.color, self.width
        )
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrokeColors {
    /// Forced onto the original stroke paths, which become the outline.
    pub border: LineStyle,
    /// Background copy of every stroke, drawn in full from the start.
    pub unfilled: LineStyle,
    /// Color of a stroke while it is being drawn.
    pub filling: String,
    /// Color of a stroke once it is drawn.
    pub filled: LineStyle,
    pub brush: LineStyle,
    pub brush_border: LineStyle,
}

impl Default for StrokeColors {
    fn default() -> Self {
        Self {
            border: LineStyle::new("#666", 4.5),
            unfilled: LineStyle::new("#eee", 3.0),
            filling: "#f00".to_owned(),
            filled: LineStyle::new("#000", 3.1),
            brush: LineStyle::new("#f00", 5.5),
            brush_border: LineStyle::new("#666", 7.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrushSettings {
    /// Draw a pen tip that tracks the end of the stroke being drawn.
    pub show: bool,
    /// Place the brush border layer above the background layer.
    pub front_border: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            show: true,
            front_border: true,
        }
    }
}

/// `duration = max(floor, scale * length^exponent)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationCurve {
    pub scale: f64,
    pub exponent: f64,
    pub floor: f64,
}

impl Default for DurationCurve {
    fn default() -> Self {
        Self {
            scale: 0.125,
            exponent: 0.5,
            floor: 0.0,
        }
    }
}

impl DurationCurve {
    pub fn duration(&self, length: f64) -> f64 {
        (self.scale * length.max(0.0).powf(self.exponent)).max(self.floor)
    }
}

/// `animation_time = (factor * total_time)^exponent`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeRescale {
    pub factor: f64,
    pub exponent: f64,
}

impl Default for TimeRescale {
    fn default() -> Self {
        Self {
            factor: 3.0,
            exponent: 2.0 / 3.0,
        }
    }
}

impl TimeRescale {
    pub fn rescale(&self, total_time: f64) -> f64 {
        (self.factor * total_time.max(0.0)).powf(self.exponent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSettings {
    pub function: TimingFunction,
    pub duration: DurationCurve,
    pub rescale: TimeRescale,
    /// Seconds the completed diagram stays on screen before the animation loops.
    pub hold: f64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            function: TimingFunction::default(),
            duration: DurationCurve::default(),
            rescale: TimeRescale::default(),
            hold: 1.5,
        }
    }
}

impl TimingSettings {
    pub fn validate(&self) -> KanimateResult<()> {
        let d = self.duration;
        if !(d.scale.is_finite() && d.scale > 0.0) {
            return Err(KanimateError::configuration(
                "timing.duration.scale must be positive",
            ));
        }
        if !(d.exponent.is_finite() && d.exponent > 0.0) {
            return Err(KanimateError::configuration(
                "timing.duration.exponent must be positive",
            ));
        }
        if !(d.floor.is_finite() && d.floor >= 0.0) {
            return Err(KanimateError::configuration(
                "timing.duration.floor must be non-negative",
            ));
        }
        let r = self.rescale;
        if !(r.factor.is_finite() && r.factor > 0.0) {
            return Err(KanimateError::configuration(
                "timing.rescale.factor must be positive",
            ));
        }
        if !(r.exponent > 0.0 && r.exponent <= 1.0) {
            return Err(KanimateError::configuration(
                "timing.rescale.exponent must lie in (0, 1]",
            ));
        }
        if !(self.hold.is_finite() && self.hold >= 0.0) {
            return Err(KanimateError::configuration(
                "timing.hold must be non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometrySettings {
    /// Absolute error bound of arc-length integration.
    pub length_tolerance: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            length_tolerance: 1e-8,
        }
    }
}

impl GeometrySettings {
    pub fn validate(&self) -> KanimateResult<()> {
        if !(self.length_tolerance.is_finite() && self.length_tolerance > 0.0) {
            return Err(KanimateError::configuration(
                "geometry.length_tolerance must be positive",
            ));
        }
        Ok(())
    }
}

/// Raster export implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterBackendKind {
    /// `svgexport`, ImageMagick `convert` and `gifsicle` on PATH.
    #[default]
    External,
    /// In-process `resvg` rasterization and GIF encoding.
    Resvg,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterSettings {
    /// Seconds between two sampled frames.
    pub frame_duration: f64,
    /// Width and height of the square output, in pixels.
    pub size: u32,
    /// CSS color, or `transparent`.
    pub background: String,
    /// Required to use a transparent background, which inflates file size tenfold.
    pub allow_transparent: bool,
    pub backend: RasterBackendKind,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            frame_duration: 0.04,
            size: 150,
            background: "#ddf".to_owned(),
            allow_transparent: false,
            backend: RasterBackendKind::default(),
        }
    }
}

impl RasterSettings {
    pub fn is_transparent(&self) -> bool {
        self.background.eq_ignore_ascii_case("transparent")
    }

    pub fn validate(&self) -> KanimateResult<()> {
        if self.is_transparent() && !self.allow_transparent {
            return Err(KanimateError::configuration(
                "\"transparent\" is not allowed as GIF background by default because the \
                 generated files are about ten times bigger; set raster.allow_transparent \
                 to true to use it anyway",
            ));
        }
        if !(self.frame_duration.is_finite() && self.frame_duration > 0.0) {
            return Err(KanimateError::configuration(
                "raster.frame_duration must be positive",
            ));
        }
        if self.size == 0 {
            return Err(KanimateError::configuration("raster.size must be non-zero"));
        }
        // The external tools accept any ImageMagick color; the in-process renderer does not.
        if self.backend == RasterBackendKind::Resvg {
            crate::export::resvg_gif::parse_background(&self.background)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
