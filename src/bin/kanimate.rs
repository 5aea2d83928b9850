use anyhow::Context as _;
use clap::{ArgAction, Parser, builder::BoolishValueParser};

use kanimate::{
    ExternalToolBackend, RasterBackendKind, RasterExportBackend, ResvgGifBackend, Settings,
    VariantSelection, run_batch,
};

/// Animate stroke-order diagrams into SVG and GIF.
///
/// Settings come from the file named by `KANIMATE_CONFIG`, else `./kanimate.json`,
/// else built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "kanimate", version)]
struct Cli {
    /// Generate self-running animated SVGs.
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    svg: bool,

    /// Generate SVGs animated by an external script.
    #[arg(
        long = "js-svg",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    js_svg: bool,

    /// Generate animated GIFs.
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    gif: bool,
}

impl Cli {
    fn selection(&self) -> VariantSelection {
        VariantSelection {
            continuous: self.svg,
            script: self.js_svg,
            raster: self.gif,
        }
    }
}

fn backend_for(kind: RasterBackendKind) -> Box<dyn RasterExportBackend> {
    match kind {
        RasterBackendKind::External => Box::new(ExternalToolBackend::default()),
        RasterBackendKind::Resvg => Box::new(ResvgGifBackend::new()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let selection = cli.selection();

    let settings = Settings::load().context("load settings")?;
    settings.validate(selection)?;

    let mut backend = backend_for(settings.raster.backend);
    let report = run_batch(&settings, selection, backend.as_mut())?;

    eprintln!(
        "animated {} diagram(s), {} failed",
        report.animated.len(),
        report.failed.len()
    );
    if !report.is_success() {
        for (path, err) in &report.failed {
            eprintln!("  {}: {err}", path.display());
        }
        anyhow::bail!("{} diagram(s) could not be animated", report.failed.len());
    }
    Ok(())
}
