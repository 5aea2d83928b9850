use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::settings::{Settings, VariantSelection};
use crate::document::assemble::assemble;
use crate::document::diagram::Diagram;
use crate::document::xml::Document;
use crate::export::backend::{RasterExportBackend, RasterJob, ensure_dir, ensure_parent_dir};
use crate::foundation::error::{KanimateError, KanimateResult};
use crate::timeline::allocator::Timeline;

/// Where every artifact of one diagram goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub continuous: PathBuf,
    pub script: PathBuf,
    pub raster: PathBuf,
    /// Scratch directory of the raster export, unique per diagram.
    pub work_dir: PathBuf,
}

impl OutputPaths {
    pub fn for_stem(settings: &Settings, stem: &str) -> Self {
        let gif_dir = settings.gif_output_dir();
        Self {
            continuous: settings.svg_output_dir().join(format!("{stem}_anim.svg")),
            script: settings
                .js_svg_output_dir()
                .join(format!("{stem}_js_anim.svg")),
            raster: gif_dir.join(format!("{stem}_anim.gif")),
            work_dir: gif_dir.join(format!(".{stem}-frames")),
        }
    }
}

/// Outcome of a batch run that was not aborted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub animated: Vec<PathBuf>,
    /// Diagrams skipped because of an error local to them, with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn remove_files_with_extension(dir: &Path, ext: &str) -> KanimateResult<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("list '{}'", dir.display()))
                .into());
        }
    };
    let mut removed = 0;
    for entry in entries {
        let path = entry.context("read directory entry")?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == ext) {
            std::fs::remove_file(&path)
                .with_context(|| format!("remove '{}'", path.display()))?;
            tracing::debug!(path = %path.display(), "removed previous output");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Delete outputs of previous runs for the selected variants.
pub fn clear_converted(settings: &Settings, selection: VariantSelection) -> KanimateResult<usize> {
    let targets = [
        (selection.continuous, settings.svg_output_dir(), "svg"),
        (selection.script, settings.js_svg_output_dir(), "svg"),
        (selection.raster, settings.gif_output_dir(), "gif"),
    ];
    let mut removed = 0;
    for (selected, dir, ext) in targets {
        if selected {
            removed += remove_files_with_extension(&dir, ext)?;
        }
    }
    if removed > 0 {
        tracing::info!(removed, "cleared previous outputs");
    }
    Ok(removed)
}

/// `*.svg` files of `dir`, sorted by name.
pub fn list_diagrams(dir: &Path) -> KanimateResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        KanimateError::configuration(format!(
            "cannot read input directory '{}': {e}",
            dir.display()
        ))
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("read directory entry")?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "svg") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn write_output(path: &Path, contents: &str) -> KanimateResult<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote output");
    Ok(())
}

/// Produce every selected output for one diagram file.
pub fn animate_file(
    path: &Path,
    settings: &Settings,
    selection: VariantSelection,
    backend: &mut dyn RasterExportBackend,
) -> KanimateResult<()> {
    animate_file_at(path, settings, selection, backend, None)
}

/// Like [`animate_file`], reporting the diagram's position `(done, total)` in a batch.
#[tracing::instrument(skip_all, fields(file = %path.display()))]
fn animate_file_at(
    path: &Path,
    settings: &Settings,
    selection: VariantSelection,
    backend: &mut dyn RasterExportBackend,
    progress: Option<(usize, usize)>,
) -> KanimateResult<()> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| KanimateError::document("diagram file has no name"))?;

    let xml =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    let diagram = Diagram::from_document(Document::parse(&xml)?, stem.as_str(), settings)?;
    let timeline = Timeline::allocate(&diagram.lengths(), &settings.timing);
    let (done, total) = progress.unwrap_or((0, 1));
    tracing::info!(
        done,
        total,
        strokes = diagram.strokes.len(),
        period = timeline.period(),
        "animating diagram"
    );

    let outputs = assemble(
        &diagram,
        &timeline,
        settings,
        selection,
        backend.frame_styling(),
    )?;
    let paths = OutputPaths::for_stem(settings, &stem);

    if let Some(svg) = &outputs.continuous {
        write_output(&paths.continuous, svg)?;
    }
    if let Some(svg) = &outputs.script {
        write_output(&paths.script, svg)?;
    }
    if let Some(frames) = &outputs.raster {
        ensure_dir(&settings.gif_output_dir())?;
        tracing::info!(backend = backend.name(), frames = frames.len(), "exporting gif");
        backend.export(&RasterJob {
            base_name: &stem,
            frames,
            output_path: paths.raster,
            work_dir: paths.work_dir,
            raster: &settings.raster,
            keep_temporary_files: settings.keep_temporary_files,
        })?;
    }
    Ok(())
}

/// Animate every diagram of the input directory, in name order.
///
/// Errors local to one diagram are recorded and the batch moves on; errors
/// for which [`KanimateError::aborts_batch`] holds stop it.
pub fn run_batch(
    settings: &Settings,
    selection: VariantSelection,
    backend: &mut dyn RasterExportBackend,
) -> KanimateResult<BatchReport> {
    let files = list_diagrams(&settings.input_dir)?;
    clear_converted(settings, selection)?;
    tracing::info!(files = files.len(), input = %settings.input_dir.display(), "starting batch");

    let total = files.len();
    let mut report = BatchReport::default();
    for (done, path) in files.into_iter().enumerate() {
        match animate_file_at(&path, settings, selection, backend, Some((done, total))) {
            Ok(()) => report.animated.push(path),
            Err(e) if e.aborts_batch() => {
                tracing::error!(file = %path.display(), error = %e, "aborting batch");
                return Err(e);
            }
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "skipping diagram");
                report.failed.push((path, e.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
