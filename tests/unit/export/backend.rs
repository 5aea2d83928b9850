use super::*;
use crate::timeline::frames::FrameIndex;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "kanimate_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame(k: u64) -> RasterFrame {
    RasterFrame {
        frame: Frame {
            index: FrameIndex(k),
            time: k as f64 * 0.5,
            delay: 0.5,
        },
        svg: format!("<svg data-frame=\"{k}\"/>"),
    }
}

fn job<'a>(
    frames: &'a [RasterFrame],
    raster: &'a RasterSettings,
    dir: &Path,
    keep: bool,
) -> RasterJob<'a> {
    RasterJob {
        base_name: "04e8c",
        frames,
        output_path: dir.join("04e8c_anim.gif"),
        work_dir: dir.join(".04e8c-frames"),
        raster,
        keep_temporary_files: keep,
    }
}

#[test]
fn in_memory_backend_records_jobs_in_order() {
    let raster = RasterSettings::default();
    let frames = [frame(0), frame(1)];
    let dir = PathBuf::from("out");
    let mut backend = InMemoryBackend::new();
    assert_eq!(backend.frame_styling(), FrameStyling::StyleElement);

    backend.export(&job(&frames, &raster, &dir, false)).unwrap();
    backend.export(&job(&frames[..1], &raster, &dir, false)).unwrap();

    assert_eq!(backend.jobs().len(), 2);
    assert_eq!(backend.jobs()[0].frames, frames);
    assert_eq!(backend.jobs()[0].output_path, dir.join("04e8c_anim.gif"));
    assert_eq!(backend.jobs()[1].frames.len(), 1);

    let inline = InMemoryBackend::with_styling(FrameStyling::Inline);
    assert_eq!(inline.frame_styling(), FrameStyling::Inline);
}

#[test]
fn temporary_files_are_removed_unless_kept() {
    let raster = RasterSettings::default();
    let dir = temp_dir("backend_cleanup");
    let work = dir.join(".04e8c-frames");
    ensure_dir(&work).unwrap();
    let scratch = work.join("a.svg");

    std::fs::write(&scratch, "x").unwrap();
    let kept = job(&[], &raster, &dir, true);
    remove_temporary(&kept, std::slice::from_ref(&scratch)).unwrap();
    remove_work_dir(&kept);
    assert!(scratch.exists());

    let dropped = job(&[], &raster, &dir, false);
    remove_temporary(&dropped, &[scratch.clone(), work.join("missing.png")]).unwrap();
    assert!(!scratch.exists());
    remove_work_dir(&dropped);
    assert!(!work.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn work_dir_with_leftovers_is_kept() {
    let raster = RasterSettings::default();
    let dir = temp_dir("backend_leftovers");
    let work = dir.join(".04e8c-frames");
    ensure_dir(&work).unwrap();
    std::fs::write(work.join("user.txt"), "x").unwrap();

    remove_work_dir(&job(&[], &raster, &dir, false));
    assert!(work.exists());

    let _ = std::fs::remove_dir_all(&dir);
}
