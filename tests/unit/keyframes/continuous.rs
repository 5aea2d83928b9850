use super::*;
use crate::config::settings::DurationCurve;
use crate::keyframes::strategy::OverlayIds;
use crate::timeline::allocator::Timeline;

fn settings() -> Settings {
    let mut s = Settings::default();
    s.timing.duration = DurationCurve {
        scale: 1.0,
        exponent: 1.0,
        floor: 0.0,
    };
    s.timing.hold = 0.0;
    s
}

fn run(settings: &Settings) -> String {
    let timeline = Timeline::allocate(&[10.0, 20.0], &settings.timing);
    let mut strategy = ContinuousStrategy::new(settings, timeline.period());
    for (i, w) in timeline.windows.iter().enumerate() {
        let ids = OverlayIds::for_path(&format!("kvg:x-s{}", i + 1));
        let name = format!("x-s{}", i + 1);
        strategy.animate_stroke(&StrokeContext {
            ids: &ids,
            name: &name,
            window: w,
            timeline: &timeline,
        });
    }
    let VariantOutput::Continuous(sheet) = Box::new(strategy).finish() else {
        panic!("unexpected variant");
    };
    sheet.to_css()
}

#[test]
fn strike_keyframes_hold_then_draw_inside_the_window() {
    let css = run(&settings());
    assert!(css.contains(
        "@keyframes strike-x-s2 {\n    0% { stroke-dashoffset: 20.000; }\n    33.333% { stroke-dashoffset: 20.000; }\n    100.000% { stroke-dashoffset: 0; }\n    100% { stroke-dashoffset: 0; }\n}"
    ));
    assert!(css.contains(
        "@keyframes showhide-x-s1 {\n    0.000% { visibility: hidden; }\n    33.333% { stroke: #f00; }\n}"
    ));
}

#[test]
fn animation_repeats_forever_with_the_global_period() {
    let s = settings();
    let period = Timeline::allocate(&[10.0, 20.0], &s.timing).period();
    let css = run(&s);
    let expected = format!(
        "animation: strike-x-s1 {period:.3}s ease-in-out infinite,\n        showhide-x-s1 {period:.3}s step-start infinite;"
    );
    assert!(css.contains(&expected), "{css}");
    assert!(css.contains("#kvg\\3a x-s1-anim {\n    stroke-dasharray: 10.000 10.000;"));
}

#[test]
fn brush_rules_follow_the_brush_toggle() {
    let mut s = settings();
    assert!(run(&s).contains("showhide-brush-x-s1"));
    assert!(run(&s).contains("#kvg\\3a x-s1-brush, #kvg\\3a x-s1-brush-brd {"));

    s.brush.show = false;
    assert!(!run(&s).contains("brush"));
}
