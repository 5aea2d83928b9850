use super::*;

const TOL: f64 = 1e-8;

#[test]
fn straight_lines_sum_their_lengths() {
    assert!((path_length("M0,0 L3,4", TOL).unwrap() - 5.0).abs() < 1e-9);
    assert!((path_length("M0,0 H10 V10", TOL).unwrap() - 20.0).abs() < 1e-9);
}

#[test]
fn closepath_adds_the_closing_segment() {
    let len = path_length("M0,0 L10,0 L10,10 Z", TOL).unwrap();
    assert!((len - (20.0 + 200f64.sqrt())).abs() < 1e-9);
}

#[test]
fn disjoint_subpaths_are_summed() {
    let len = path_length("M0,0 L10,0 M100,100 l0,5", TOL).unwrap();
    assert!((len - 15.0).abs() < 1e-9);
}

#[test]
fn degenerate_cubic_matches_its_chord() {
    // Control points on the chord: the curve is the straight segment.
    let len = path_length("M0,0 C10,0 20,0 30,0", TOL).unwrap();
    assert!((len - 30.0).abs() < 1e-7);
}

#[test]
fn quarter_circle_cubic_is_close_to_the_arc() {
    let k = 0.5522847498;
    let d = format!("M1,0 C1,{k} {k},1 0,1");
    let len = path_length(&d, TOL).unwrap();
    assert!((len - std::f64::consts::FRAC_PI_2).abs() < 1e-3);
}

#[test]
fn quadratic_and_relative_commands_are_supported() {
    let abs = path_length("M0,0 Q5,10 10,0", TOL).unwrap();
    let rel = path_length("m0,0 q5,10 10,0", TOL).unwrap();
    assert!(abs > 10.0);
    assert!((abs - rel).abs() < 1e-9);
}

#[test]
fn smooth_curve_shorthand_is_supported() {
    // KanjiVG stroke data typically chains `c` with `s`.
    let len = path_length("M31.5,24.5c1.12,0.25,2.75,0.25,3.75,0.12s3-0.5,6-1", TOL).unwrap();
    assert!(len > 0.0);
}

#[test]
fn empty_path_has_zero_length() {
    assert_eq!(path_length("", TOL).unwrap(), 0.0);
    assert_eq!(path_length("M5,5", TOL).unwrap(), 0.0);
}

#[test]
fn malformed_data_is_a_geometry_error() {
    let err = path_length("M0,0 L1", TOL).unwrap_err();
    assert!(matches!(err, KanimateError::Geometry(_)));
    assert!(path_length("banana", TOL).is_err());
}
