use super::*;
use crate::config::settings::RasterSettings;
use crate::timeline::frames::{Frame as TimelineFrame, FrameIndex};

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "kanimate_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect x="0" y="0" width="5" height="10" style="fill:#000"/></svg>"##;

#[test]
fn background_colors_parse() {
    assert_eq!(
        parse_background("#ddf").unwrap(),
        Rgba8 {
            r: 0xdd,
            g: 0xdd,
            b: 0xff,
            a: 255
        }
    );
    assert_eq!(
        parse_background("#102030").unwrap(),
        Rgba8 {
            r: 0x10,
            g: 0x20,
            b: 0x30,
            a: 255
        }
    );
    assert_eq!(parse_background("#10203080").unwrap().a, 0x80);
    assert_eq!(parse_background("Transparent").unwrap(), Rgba8::TRANSPARENT);
}

#[test]
fn unsupported_backgrounds_are_configuration_errors() {
    for bad in ["ddf", "#dd", "#gggggg", "#ddé", "lavender"] {
        let err = parse_background(bad).unwrap_err();
        assert!(matches!(err, KanimateError::Configuration(_)), "{bad}");
    }
}

#[test]
fn render_frame_scales_to_the_requested_size() {
    let image = render_frame(SQUARE, 20, parse_background("#fff").unwrap()).unwrap();
    assert_eq!(image.dimensions(), (20, 20));
    assert_eq!(image.get_pixel(2, 10).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(17, 10).0, [255, 255, 255, 255]);
}

#[test]
fn invalid_frame_documents_are_document_errors() {
    let err = render_frame("<svg", 10, Rgba8::TRANSPARENT).unwrap_err();
    assert!(matches!(err, KanimateError::Document(_)));
}

#[test]
fn export_writes_a_decodable_gif() {
    let dir = temp_dir("resvg_gif_export");
    let raster = RasterSettings {
        size: 16,
        ..RasterSettings::default()
    };
    let frames: Vec<RasterFrame> = (0..3)
        .map(|k| RasterFrame {
            frame: TimelineFrame {
                index: FrameIndex(k),
                time: k as f64 * 0.1,
                delay: 0.1,
            },
            svg: SQUARE.to_owned(),
        })
        .collect();
    let job = RasterJob {
        base_name: "square",
        frames: &frames,
        output_path: dir.join("gif/square_anim.gif"),
        work_dir: dir.join("gif/.square-frames"),
        raster: &raster,
        keep_temporary_files: false,
    };

    let mut backend = ResvgGifBackend::new();
    assert_eq!(backend.frame_styling(), FrameStyling::Inline);
    backend.export(&job).unwrap();

    let bytes = std::fs::read(&job.output_path).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert!(!job.work_dir.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn zero_threads_is_rejected() {
    let mut backend = ResvgGifBackend { threads: Some(0) };
    let raster = RasterSettings::default();
    let job = RasterJob {
        base_name: "x",
        frames: &[],
        output_path: temp_dir("resvg_zero_threads").join("x.gif"),
        work_dir: temp_dir("resvg_zero_threads_work"),
        raster: &raster,
        keep_temporary_files: false,
    };
    assert!(matches!(
        backend.export(&job),
        Err(KanimateError::Configuration(_))
    ));
}
