use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::export::backend::{
    RasterExportBackend, RasterJob, ensure_dir, ensure_parent_dir, remove_temporary,
    remove_work_dir,
};
use crate::foundation::error::{KanimateError, KanimateResult};

/// Reference pipeline built on command-line tools found on PATH:
/// `svgexport` rasterizes frames, ImageMagick `convert` assembles and
/// re-palettes the GIF, and `gifsicle` optimizes it.
#[derive(Clone, Debug)]
pub struct ExternalToolBackend {
    pub svgexport: OsString,
    pub convert: OsString,
    pub gifsicle: OsString,
}

impl Default for ExternalToolBackend {
    fn default() -> Self {
        Self {
            svgexport: "svgexport".into(),
            convert: "convert".into(),
            gifsicle: "gifsicle".into(),
        }
    }
}

/// One rasterization instruction of the svgexport batch manifest.
#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    input: [String; 1],
    output: [[String; 2]; 1],
}

fn absolute(path: &Path) -> KanimateResult<String> {
    let abs = std::path::absolute(path)
        .with_context(|| format!("resolve absolute path of '{}'", path.display()))?;
    Ok(abs.to_string_lossy().into_owned())
}

/// Quote an argument for display as a POSIX shell word.
pub fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

fn command_line(program: &OsString, args: &[OsString]) -> String {
    std::iter::once(program)
        .chain(args)
        .map(|a| shell_quote(&a.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a tool to completion; a spawn failure or non-zero exit is fatal.
pub fn run_tool(program: &OsString, args: &[OsString]) -> KanimateResult<()> {
    tracing::info!(command = %command_line(program, args), "running external tool");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            KanimateError::external_process(format!(
                "failed to spawn {} (is it installed and on PATH?): {e}",
                program.to_string_lossy()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(KanimateError::external_process(format!(
            "{} exited with status {}: {}",
            program.to_string_lossy(),
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Arguments of the frame-assembly pass: frames in order, with a `-delay`
/// switch whenever the delay changes, then background handling.
pub fn assembly_args(
    frames: &[(u32, PathBuf)],
    transparent: bool,
    background: &str,
    out: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut current = None;
    for (delay, png) in frames {
        if current != Some(*delay) {
            args.push("-delay".into());
            args.push(delay.to_string().into());
            current = Some(*delay);
        }
        args.push(png.into());
    }
    if transparent {
        args.extend(["-dispose", "previous"].map(OsString::from));
    } else {
        args.push("-background".into());
        args.push(background.into());
        args.extend(["-alpha", "remove"].map(OsString::from));
    }
    args.extend(["-layers", "OptimizePlus"].map(OsString::from));
    args.push(out.into());
    args
}

/// Arguments of the palette pass: reduce every frame to one shared
/// 63-color palette (plus transparency).
pub fn palette_args(input: &Path, out: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![input.into()];
    args.extend(
        [
            "(",
            "-clone",
            "0--1",
            "-background",
            "none",
            "+append",
            "-quantize",
            "transparent",
            "-colors",
            "63",
            "-unique-colors",
            "-write",
            "mpr:cmap",
            "+delete",
            ")",
            "-map",
            "mpr:cmap",
        ]
        .map(OsString::from),
    );
    args.push(out.into());
    args
}

impl RasterExportBackend for ExternalToolBackend {
    fn name(&self) -> &'static str {
        "external"
    }

    #[tracing::instrument(skip_all, fields(diagram = job.base_name, frames = job.frames.len()))]
    fn export(&mut self, job: &RasterJob<'_>) -> KanimateResult<()> {
        ensure_dir(&job.work_dir)?;
        ensure_parent_dir(&job.output_path)?;

        let size = format!("{0}:{0}", job.raster.size);
        let mut svg_files = Vec::with_capacity(job.frames.len());
        let mut png_frames = Vec::with_capacity(job.frames.len());
        let mut manifest = Vec::with_capacity(job.frames.len());

        for f in job.frames {
            let stem = format!("{}_frame{:04}", job.base_name, f.frame.index.0);
            let svg = job.work_dir.join(format!("{stem}.svg"));
            let png = job.work_dir.join(format!("{stem}.png"));
            std::fs::write(&svg, &f.svg)
                .with_context(|| format!("write frame document '{}'", svg.display()))?;
            manifest.push(ManifestEntry {
                input: [absolute(&svg)?],
                output: [[absolute(&png)?, size.clone()]],
            });
            svg_files.push(svg);
            png_frames.push((f.frame.delay_centis(), png));
        }

        let manifest_path = job
            .work_dir
            .join(format!("{}_export_data.json", job.base_name));
        let json = serde_json::to_string(&manifest)
            .map_err(|e| KanimateError::Other(anyhow::Error::new(e)))?;
        std::fs::write(&manifest_path, json)
            .with_context(|| format!("write manifest '{}'", manifest_path.display()))?;
        tracing::info!(manifest = %manifest_path.display(), "created export instructions");

        run_tool(&self.svgexport, &[manifest_path.clone().into()])?;
        svg_files.push(manifest_path);
        remove_temporary(job, &svg_files)?;

        let tmp1 = job.work_dir.join(format!("{}_anim_tmp1.gif", job.base_name));
        let tmp2 = job.work_dir.join(format!("{}_anim_tmp2.gif", job.base_name));

        run_tool(
            &self.convert,
            &assembly_args(
                &png_frames,
                job.raster.is_transparent(),
                &job.raster.background,
                &tmp1,
            ),
        )?;
        let pngs: Vec<PathBuf> = png_frames.into_iter().map(|(_, p)| p).collect();
        remove_temporary(job, &pngs)?;

        run_tool(&self.convert, &palette_args(&tmp1, &tmp2))?;
        remove_temporary(job, &[tmp1])?;

        run_tool(
            &self.gifsicle,
            &[
                "-O3".into(),
                tmp2.clone().into(),
                "-o".into(),
                job.output_path.clone().into(),
            ],
        )?;
        remove_temporary(job, &[tmp2])?;
        remove_work_dir(job);

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/external.rs"]
mod tests;
