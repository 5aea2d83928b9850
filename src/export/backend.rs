use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::settings::RasterSettings;
use crate::foundation::error::KanimateResult;
use crate::timeline::frames::Frame;

/// How per-frame rules are attached to frame documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameStyling {
    /// A `<style>` element, for renderers with a full CSS engine.
    #[default]
    StyleElement,
    /// Folded into each element's `style` attribute.
    Inline,
}

/// One frame document ready for rasterization.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterFrame {
    pub frame: Frame,
    /// Complete SVG document of the frame.
    pub svg: String,
}

/// Everything needed to turn one diagram's frames into an animated raster file.
#[derive(Clone, Debug)]
pub struct RasterJob<'a> {
    /// File stem shared by every artifact of the diagram.
    pub base_name: &'a str,
    /// Frames in playback order.
    pub frames: &'a [RasterFrame],
    /// Final animated file.
    pub output_path: PathBuf,
    /// Scratch directory owned by this diagram.
    pub work_dir: PathBuf,
    pub raster: &'a RasterSettings,
    pub keep_temporary_files: bool,
}

/// Capability that turns frame documents into an animated raster file.
///
/// Called once per diagram; diagrams are exported in batch order.
pub trait RasterExportBackend {
    fn name(&self) -> &'static str;

    fn frame_styling(&self) -> FrameStyling {
        FrameStyling::StyleElement
    }

    fn export(&mut self, job: &RasterJob<'_>) -> KanimateResult<()>;
}

/// Backend that records jobs instead of exporting them; for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    styling: FrameStyling,
    jobs: Vec<RecordedJob>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedJob {
    pub base_name: String,
    pub output_path: PathBuf,
    pub frames: Vec<RasterFrame>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styling(styling: FrameStyling) -> Self {
        Self {
            styling,
            jobs: Vec::new(),
        }
    }

    pub fn jobs(&self) -> &[RecordedJob] {
        &self.jobs
    }
}

impl RasterExportBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn frame_styling(&self) -> FrameStyling {
        self.styling
    }

    fn export(&mut self, job: &RasterJob<'_>) -> KanimateResult<()> {
        self.jobs.push(RecordedJob {
            base_name: job.base_name.to_owned(),
            output_path: job.output_path.clone(),
            frames: job.frames.to_vec(),
        });
        Ok(())
    }
}

pub fn ensure_dir(path: &Path) -> KanimateResult<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory '{}'", path.display()))?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> KanimateResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Delete scratch files unless the job keeps them; missing files are ignored.
pub fn remove_temporary(job: &RasterJob<'_>, paths: &[PathBuf]) -> KanimateResult<()> {
    if job.keep_temporary_files {
        return Ok(());
    }
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed temporary file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("remove temporary file '{}'", path.display()))
                    .into());
            }
        }
    }
    Ok(())
}

/// Remove the job's scratch directory once it is empty.
pub fn remove_work_dir(job: &RasterJob<'_>) {
    if job.keep_temporary_files {
        return;
    }
    if std::fs::remove_dir(&job.work_dir).is_ok() {
        tracing::debug!(path = %job.work_dir.display(), "removed work directory");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/backend.rs"]
mod tests;
