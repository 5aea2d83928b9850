use super::*;

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

#[test]
fn assembly_switches_delay_only_when_it_changes() {
    let frames = vec![
        (50, PathBuf::from("f0.png")),
        (50, PathBuf::from("f1.png")),
        (50, PathBuf::from("f2.png")),
        (80, PathBuf::from("f3.png")),
    ];
    let args = assembly_args(&frames, false, "#ddf", Path::new("tmp1.gif"));
    assert_eq!(
        strings(&args),
        [
            "-delay", "50", "f0.png", "f1.png", "f2.png", "-delay", "80", "f3.png",
            "-background", "#ddf", "-alpha", "remove", "-layers", "OptimizePlus", "tmp1.gif",
        ]
    );
}

#[test]
fn transparent_assembly_disposes_previous_frames() {
    let frames = vec![(4, PathBuf::from("f0.png"))];
    let args = strings(&assembly_args(&frames, true, "transparent", Path::new("o.gif")));
    assert_eq!(
        args,
        ["-delay", "4", "f0.png", "-dispose", "previous", "-layers", "OptimizePlus", "o.gif"]
    );
}

#[test]
fn palette_pass_maps_to_a_shared_colormap() {
    let args = strings(&palette_args(Path::new("in.gif"), Path::new("out.gif")));
    assert_eq!(args.first().map(String::as_str), Some("in.gif"));
    assert_eq!(args.last().map(String::as_str), Some("out.gif"));
    let joined = args.join(" ");
    assert!(joined.contains("( -clone 0--1 -background none +append"));
    assert!(joined.contains("-colors 63 -unique-colors -write mpr:cmap +delete )"));
    assert!(joined.contains("-map mpr:cmap"));
}

#[test]
fn shell_quote_survives_embedded_quotes() {
    assert_eq!(shell_quote("a b"), "'a b'");
    assert_eq!(shell_quote("it's"), r"'it'\''s'");
}

#[test]
fn missing_tool_is_an_external_process_error() {
    let err = run_tool(&"kanimate-definitely-not-a-tool".into(), &[]).unwrap_err();
    assert!(matches!(err, KanimateError::ExternalProcess(_)));
    assert!(err.aborts_batch());
}
