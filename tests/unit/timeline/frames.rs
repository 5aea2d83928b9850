use super::*;

#[test]
fn sampler_boundary_matches_reference_numbers() {
    let period = 2.3 + 1.5;
    let s = FrameSchedule::sample(2.3, period, 0.5).unwrap();
    assert_eq!(s.last_frame_index, 5);
    assert_eq!(s.len(), 7);

    let indices: Vec<u64> = s.frames.iter().map(|f| f.index.0).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6]);

    let closing = s.closing_frame().unwrap();
    assert_eq!(closing.time, period);
    assert!((closing.delay - (period - 5.0 * 0.5)).abs() < 1e-12);
}

#[test]
fn regular_frames_are_evenly_spaced() {
    let s = FrameSchedule::sample(1.0, 2.0, 0.25).unwrap();
    for f in &s.frames[..s.frames.len() - 1] {
        assert_eq!(f.time, f.index.0 as f64 * 0.25);
        assert_eq!(f.delay, 0.25);
    }
    assert_eq!(s.last_frame_index, 5);
}

#[test]
fn zero_animation_time_still_yields_frames() {
    let s = FrameSchedule::sample(0.0, 1.5, 0.04).unwrap();
    assert_eq!(s.last_frame_index, 1);
    assert_eq!(s.len(), 3);
}

#[test]
fn non_positive_frame_duration_is_rejected() {
    assert!(FrameSchedule::sample(1.0, 2.0, 0.0).is_err());
    assert!(FrameSchedule::sample(1.0, 2.0, -0.1).is_err());
}

#[test]
fn delay_centis_truncates() {
    let f = Frame {
        index: FrameIndex(0),
        time: 0.0,
        delay: 0.046,
    };
    assert_eq!(f.delay_centis(), 4);
}

#[test]
fn delay_centis_absorbs_float_noise() {
    let f = Frame {
        index: FrameIndex(0),
        time: 0.0,
        delay: 0.29,
    };
    assert_eq!(f.delay_centis(), 29);
}

#[test]
fn loop_lasts_one_frame_longer_than_the_period() {
    let schedule = FrameSchedule::sample(2.3, 3.8, 0.5).unwrap();
    let total: f64 = schedule.frames.iter().map(|f| f.delay).sum();
    assert!((total - (3.8 + 0.5)).abs() < 1e-9, "{total}");
}
