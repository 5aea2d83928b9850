use crate::config::settings::{LineStyle, Settings, VariantSelection};
use crate::document::diagram::{
    Diagram, DiagramGroup, GENERATED_SUFFIX, NUM_STROKES_ATTR, STYLE_ID,
};
use crate::document::xml::{Document, Element, Node};
use crate::export::backend::{FrameStyling, RasterFrame};
use crate::foundation::error::KanimateResult;
use crate::keyframes::continuous::ContinuousStrategy;
use crate::keyframes::css::{StyleSheet, animation_name};
use crate::keyframes::raster::RasterStrategy;
use crate::keyframes::script::ScriptStrategy;
use crate::keyframes::strategy::{
    OverlayIds, StrokeAnimationStrategy, StrokeContext, VariantOutput,
};
use crate::timeline::allocator::Timeline;
use crate::timeline::frames::FrameSchedule;

/// Serialized documents of one diagram, one field per requested variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagramOutputs {
    pub continuous: Option<String>,
    pub script: Option<String>,
    pub raster: Option<Vec<RasterFrame>>,
}

/// Run every requested strategy over the diagram and build its documents.
///
/// The diagram's document is never modified; each variant starts from its own copy.
pub fn assemble(
    diagram: &Diagram,
    timeline: &Timeline,
    settings: &Settings,
    selection: VariantSelection,
    frame_styling: FrameStyling,
) -> KanimateResult<DiagramOutputs> {
    let mut strategies: Vec<Box<dyn StrokeAnimationStrategy + '_>> = Vec::new();
    if selection.continuous {
        strategies.push(Box::new(ContinuousStrategy::new(settings, timeline.period())));
    }
    if selection.script {
        strategies.push(Box::new(ScriptStrategy::new(settings)));
    }
    if selection.raster {
        let schedule = FrameSchedule::for_timeline(timeline, settings.raster.frame_duration)?;
        strategies.push(Box::new(RasterStrategy::new(settings, schedule)));
    }

    let overlay_ids: Vec<OverlayIds> = diagram
        .strokes
        .iter()
        .map(|s| OverlayIds::for_path(&s.id))
        .collect();

    for group in &diagram.groups {
        match group {
            DiagramGroup::StrokeNumbers { id } => {
                for s in &mut strategies {
                    s.hide_group(id);
                }
            }
            DiagramGroup::Strokes { id, strokes } => {
                if let Some(id) = id {
                    for s in &mut strategies {
                        s.outline_group(id, &settings.colors.border);
                    }
                }
                for i in strokes.clone() {
                    let name = animation_name(&diagram.strokes[i].id);
                    let ctx = StrokeContext {
                        ids: &overlay_ids[i],
                        name: &name,
                        window: &timeline.windows[i],
                        timeline,
                    };
                    for s in &mut strategies {
                        s.animate_stroke(&ctx);
                    }
                }
            }
        }
    }

    let mut outputs = DiagramOutputs::default();
    for strategy in strategies {
        match strategy.finish() {
            VariantOutput::Continuous(sheet) => {
                let mut doc = diagram.document.clone();
                attach_layers(&mut doc, diagram, &overlay_ids, settings, None);
                insert_style(&mut doc, &sheet);
                outputs.continuous = Some(doc.to_xml_string()?);
            }
            VariantOutput::Script(script) => {
                let mut doc = diagram.document.clone();
                attach_layers(
                    &mut doc,
                    diagram,
                    &overlay_ids,
                    settings,
                    Some(script.durations.as_slice()),
                );
                doc.root
                    .set_attr(NUM_STROKES_ATTR, diagram.strokes.len().to_string());
                insert_style(&mut doc, &script.sheet);
                outputs.script = Some(doc.to_xml_string()?);
            }
            VariantOutput::Raster(raster) => {
                let mut base = diagram.document.clone();
                attach_layers(&mut base, diagram, &overlay_ids, settings, None);
                let frames = raster
                    .schedule
                    .frames
                    .iter()
                    .zip(&raster.sheets)
                    .map(|(frame, sheet)| -> KanimateResult<RasterFrame> {
                        let mut doc = base.clone();
                        match frame_styling {
                            FrameStyling::StyleElement => insert_style(&mut doc, sheet),
                            FrameStyling::Inline => inline_styles(&mut doc, sheet),
                        }
                        Ok(RasterFrame {
                            frame: *frame,
                            svg: doc.to_xml_string()?,
                        })
                    })
                    .collect::<KanimateResult<Vec<_>>>()?;
                outputs.raster = Some(frames);
            }
        }
    }
    Ok(outputs)
}

fn layer_group(id: String, style: &LineStyle) -> Element {
    Element::new("g")
        .with_attr("id", id)
        .with_attr("style", style.group_style())
}

fn overlay_use(id: &str, href: &str, stroke: Option<usize>) -> Element {
    let el = Element::new("use")
        .with_attr("id", id)
        .with_attr("xlink:href", format!("#{href}"));
    match stroke {
        Some(n) => el.with_attr("data-stroke", n.to_string()),
        None => el,
    }
}

/// Append the overlay layers referencing every stroke path.
///
/// With `durations`, the layers carry the markers a driving script reads:
/// a leading `<a data-stroke="0"/>`, per-stroke `data-stroke` indices and,
/// on the animated layer, `data-duration`.
fn attach_layers(
    doc: &mut Document,
    diagram: &Diagram,
    overlay_ids: &[OverlayIds],
    settings: &Settings,
    durations: Option<&[f64]>,
) {
    let colors = &settings.colors;
    let layer_id = |kind: &str| format!("kvg:{}-{kind}{GENERATED_SUFFIX}", diagram.base_id);
    let scripted = durations.is_some();

    let mut bg = layer_group(layer_id("bg"), &colors.unfilled);
    let mut anim = layer_group(layer_id("anim"), &colors.filled);
    let mut brush = layer_group(layer_id("brush"), &colors.brush);
    let mut brush_border = layer_group(layer_id("brush-brd"), &colors.brush_border);

    if scripted {
        for layer in [&mut bg, &mut anim, &mut brush, &mut brush_border] {
            layer.push(Element::new("a").with_attr("data-stroke", "0"));
        }
    }

    for (i, ids) in overlay_ids.iter().enumerate() {
        let marker = scripted.then_some(i + 1);
        bg.push(overlay_use(&ids.bg, &ids.path, marker));

        let mut anim_use = overlay_use(&ids.anim, &ids.path, marker);
        if let Some(d) = durations.and_then(|d| d.get(i)) {
            anim_use.set_attr("data-duration", d.to_string());
        }
        anim.push(anim_use);

        brush.push(overlay_use(&ids.brush, &ids.path, marker));
        brush_border.push(overlay_use(&ids.brush_border, &ids.path, marker));
    }

    let root = &mut doc.root;
    if !settings.brush.show {
        root.push(bg);
        root.push(anim);
        return;
    }
    if settings.brush.front_border {
        root.push(bg);
        root.push(brush_border);
    } else {
        root.push(brush_border);
        root.push(bg);
    }
    root.push(anim);
    root.push(brush);
}

fn insert_style(doc: &mut Document, sheet: &StyleSheet) {
    let mut style = Element::new("style").with_attr("id", STYLE_ID);
    style.children.push(Node::CData(sheet.to_css()));
    doc.root.children.insert(0, Node::Element(style));
}

/// Fold id-only rules into the `style` attribute of their target elements.
///
/// Later declarations win, matching the cascade order of the sheet.
fn inline_styles(doc: &mut Document, sheet: &StyleSheet) {
    for rule in sheet.rules() {
        let Some(ids) = rule.plain_ids() else {
            continue;
        };
        let decls: String = rule
            .declarations
            .iter()
            .map(|d| format!("{}:{};", d.property, d.value))
            .collect();
        for id in ids {
            let Some(el) = doc.root.find_by_id_mut(id) else {
                continue;
            };
            let mut style = el.attr("style").unwrap_or_default().to_owned();
            if !style.is_empty() && !style.ends_with(';') {
                style.push(';');
            }
            style.push_str(&decls);
            el.set_attr("style", style);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/assemble.rs"]
mod tests;
