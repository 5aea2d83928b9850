use super::*;

const NI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="109" height="109" viewBox="0 0 109 109">
<g id="kvg:StrokePaths_04e8c" style="fill:none;stroke:#000000;stroke-width:3;">
	<g id="kvg:04e8c" kvg:element="二">
		<path id="kvg:04e8c-s1" d="M10,20L20,20"/>
		<path id="kvg:04e8c-s2" d="M10,50L30,50"/>
	</g>
</g>
<g id="kvg:StrokeNumbers_04e8c" style="font-size:8;fill:#808080">
	<text transform="matrix(1 0 0 1 5 18)">1</text>
</g>
</svg>
"#;

const ALL: VariantSelection = VariantSelection {
    continuous: true,
    script: true,
    raster: true,
};

fn run(
    xml: &str,
    settings: &Settings,
    selection: VariantSelection,
    styling: FrameStyling,
) -> DiagramOutputs {
    let doc = Document::parse(xml).unwrap();
    let diagram = Diagram::from_document(doc, "04e8c", settings).unwrap();
    let timeline = Timeline::allocate(&diagram.lengths(), &settings.timing);
    assemble(&diagram, &timeline, settings, selection, styling).unwrap()
}

fn top_level_ids(xml: &str) -> Vec<String> {
    Document::parse(xml)
        .unwrap()
        .root
        .child_elements()
        .filter_map(|e| e.id().map(str::to_owned))
        .collect()
}

#[test]
fn only_requested_variants_are_built() {
    let s = Settings::default();
    let out = run(
        NI,
        &s,
        VariantSelection {
            script: true,
            ..VariantSelection::default()
        },
        FrameStyling::StyleElement,
    );
    assert!(out.continuous.is_none());
    assert!(out.script.is_some());
    assert!(out.raster.is_none());
}

#[test]
fn style_comes_first_and_layers_follow_the_source_groups() {
    let out = run(NI, &Settings::default(), ALL, FrameStyling::StyleElement);
    let svg = out.continuous.unwrap();
    assert_eq!(
        top_level_ids(&svg),
        [
            "style-Kanimate",
            "kvg:StrokePaths_04e8c",
            "kvg:StrokeNumbers_04e8c",
            "kvg:04e8c-bg-Kanimate",
            "kvg:04e8c-brush-brd-Kanimate",
            "kvg:04e8c-anim-Kanimate",
            "kvg:04e8c-brush-Kanimate",
        ]
    );
    assert!(svg.contains("<use id=\"kvg:04e8c-s2-anim\" xlink:href=\"#kvg:04e8c-s2\"/>"));
    assert!(svg.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
    assert!(svg.contains("@keyframes strike-04e8c-s1"));
}

#[test]
fn layer_order_follows_brush_settings() {
    let mut s = Settings::default();
    s.brush.front_border = false;
    let ids = top_level_ids(&run(NI, &s, ALL, FrameStyling::StyleElement).continuous.unwrap());
    assert_eq!(
        ids[3..],
        [
            "kvg:04e8c-brush-brd-Kanimate",
            "kvg:04e8c-bg-Kanimate",
            "kvg:04e8c-anim-Kanimate",
            "kvg:04e8c-brush-Kanimate",
        ]
    );

    s.brush.show = false;
    let ids = top_level_ids(&run(NI, &s, ALL, FrameStyling::StyleElement).continuous.unwrap());
    assert_eq!(ids[3..], ["kvg:04e8c-bg-Kanimate", "kvg:04e8c-anim-Kanimate"]);
}

#[test]
fn script_output_carries_stroke_markers() {
    let out = run(NI, &Settings::default(), ALL, FrameStyling::StyleElement);
    let svg = out.script.unwrap();
    let doc = Document::parse(&svg).unwrap();
    assert_eq!(doc.root.attr(NUM_STROKES_ATTR), Some("2"));

    let anim = doc
        .root
        .child_elements()
        .find(|e| e.id() == Some("kvg:04e8c-anim-Kanimate"))
        .unwrap();
    let children: Vec<_> = anim.child_elements().collect();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].name, "a");
    assert_eq!(children[0].attr("data-stroke"), Some("0"));
    assert_eq!(children[2].attr("data-stroke"), Some("2"));
    let duration: f64 = children[2].attr("data-duration").unwrap().parse().unwrap();
    assert!(duration > 0.0);
}

#[test]
fn regenerating_from_own_output_is_idempotent() {
    let s = Settings::default();
    let first = run(NI, &s, ALL, FrameStyling::StyleElement);
    let again = run(
        first.continuous.as_deref().unwrap(),
        &s,
        ALL,
        FrameStyling::StyleElement,
    );
    assert_eq!(again.continuous, first.continuous);

    let script_again = run(first.script.as_deref().unwrap(), &s, ALL, FrameStyling::StyleElement);
    assert_eq!(script_again.script, first.script);

    let ids = top_level_ids(again.continuous.as_deref().unwrap());
    assert_eq!(ids.iter().filter(|id| *id == "style-Kanimate").count(), 1);
    assert_eq!(ids.iter().filter(|id| id.ends_with("-Kanimate")).count(), 5);
}

#[test]
fn raster_frames_use_style_elements_by_default() {
    let s = Settings::default();
    let frames = run(NI, &s, ALL, FrameStyling::StyleElement).raster.unwrap();
    let doc = Document::parse(NI).unwrap();
    let diagram = Diagram::from_document(doc, "04e8c", &s).unwrap();
    let timeline = Timeline::allocate(&diagram.lengths(), &s.timing);
    let schedule = FrameSchedule::for_timeline(&timeline, s.raster.frame_duration).unwrap();

    assert_eq!(frames.len(), schedule.len());
    assert_eq!(frames[0].frame, schedule.frames[0]);
    assert!(frames[0].svg.contains("<style id=\"style-Kanimate\">"));
    assert!(!frames[0].svg.contains("@keyframes"));
}

#[test]
fn inline_styling_folds_id_rules_into_attributes() {
    let s = Settings::default();
    let frames = run(NI, &s, ALL, FrameStyling::Inline).raster.unwrap();
    let first = Document::parse(&frames[0].svg).unwrap();
    assert!(first.root.child_elements().all(|e| e.local_name() != "style"));

    let mut root = first.root;
    let numbers = root.find_by_id_mut("kvg:StrokeNumbers_04e8c").unwrap();
    assert_eq!(
        numbers.attr("style"),
        Some("font-size:8;fill:#808080;display:none;")
    );
    let hidden = root.find_by_id_mut("kvg:04e8c-s2-anim").unwrap();
    assert!(hidden.attr("style").unwrap().contains("visibility:hidden;"));
}
