use std::ops::Range;

use crate::config::settings::Settings;
use crate::document::xml::{Document, KVG_NS, Node, XLINK_NS};
use crate::foundation::error::{KanimateError, KanimateResult};
use crate::geometry::length::path_length;

/// Suffix of the ids of every top-level element this tool adds.
pub const GENERATED_SUFFIX: &str = "-Kanimate";
/// Id of the injected `<style>` element.
pub const STYLE_ID: &str = "style-Kanimate";
/// Root attribute recording the stroke count in script-driven output.
pub const NUM_STROKES_ATTR: &str = "data-num-strokes";

/// Remove everything a previous run injected, so regenerating is idempotent.
///
/// Drops top-level `<style>` and `<g>` elements whose id ends in
/// [`GENERATED_SUFFIX`] and the root stroke-count attribute.
pub fn strip_generated_artifacts(mut doc: Document) -> Document {
    let before = doc.root.children.len();
    doc.root.children.retain(|node| match node {
        Node::Element(el) => {
            let generated = matches!(el.local_name(), "style" | "g")
                && el.id().is_some_and(|id| id.ends_with(GENERATED_SUFFIX));
            !generated
        }
        _ => true,
    });
    let removed = before - doc.root.children.len();
    if removed > 0 {
        tracing::debug!(removed, "stripped previously generated elements");
    }
    doc.root.remove_attr(NUM_STROKES_ATTR);
    doc
}

/// One stroke path, in diagram order.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub id: String,
    pub index: usize,
    pub length: f64,
}

/// A top-level group of the diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagramGroup {
    /// Stroke-number labels, hidden in every output.
    StrokeNumbers { id: String },
    /// Stroke paths; `strokes` indexes into [`Diagram::strokes`].
    Strokes {
        id: Option<String>,
        strokes: Range<usize>,
    },
}

/// A cleaned diagram document with its strokes measured.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagram {
    /// Base used for overlay group ids, usually the file stem.
    pub base_id: String,
    /// Source document with previously generated elements removed.
    pub document: Document,
    pub groups: Vec<DiagramGroup>,
    pub strokes: Vec<Stroke>,
}

impl Diagram {
    pub fn from_document(
        doc: Document,
        base_id: impl Into<String>,
        settings: &Settings,
    ) -> KanimateResult<Self> {
        let mut document = strip_generated_artifacts(doc);
        if document.root.attr("xmlns:xlink").is_none() {
            document.root.set_attr("xmlns:xlink", XLINK_NS);
        }
        // KanjiVG declares its prefix only through DTD attribute defaults,
        // which namespace-aware renderers do not apply.
        if document.root.attr("xmlns:kvg").is_none() && document.root.uses_prefix("kvg") {
            document.root.set_attr("xmlns:kvg", KVG_NS);
        }

        let tolerance = settings.geometry.length_tolerance;
        let mut groups = Vec::new();
        let mut strokes = Vec::new();

        for group in document.root.child_elements().filter(|e| e.local_name() == "g") {
            let id = group.id();
            if let Some(id) = id.filter(|id| id.starts_with(&settings.stroke_numbers_prefix)) {
                groups.push(DiagramGroup::StrokeNumbers { id: id.to_owned() });
                continue;
            }

            let first = strokes.len();
            for path in group.descendants_named("path") {
                let path_id = path.id().ok_or_else(|| {
                    KanimateError::document(format!(
                        "stroke path #{} has no id",
                        strokes.len() + 1
                    ))
                })?;
                let d = path.attr("d").ok_or_else(|| {
                    KanimateError::document(format!("stroke path '{path_id}' has no path data"))
                })?;
                let length = path_length(d, tolerance)?;
                strokes.push(Stroke {
                    id: path_id.to_owned(),
                    index: strokes.len(),
                    length,
                });
            }
            groups.push(DiagramGroup::Strokes {
                id: id.map(str::to_owned),
                strokes: first..strokes.len(),
            });
        }

        Ok(Self {
            base_id: base_id.into(),
            document,
            groups,
            strokes,
        })
    }

    pub fn lengths(&self) -> Vec<f64> {
        self.strokes.iter().map(|s| s.length).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/diagram.rs"]
mod tests;
