use crate::config::settings::LineStyle;
use crate::keyframes::css::{Selector, StyleRule, StyleSheet, num3};
use crate::timeline::allocator::{StrokeWindow, Timeline};
use crate::timeline::frames::FrameSchedule;

/// Ids of the overlay elements created for one stroke path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayIds {
    pub path: String,
    pub bg: String,
    pub anim: String,
    pub brush: String,
    pub brush_border: String,
}

impl OverlayIds {
    pub fn for_path(path_id: &str) -> Self {
        Self {
            path: path_id.to_owned(),
            bg: format!("{path_id}-bg"),
            anim: format!("{path_id}-anim"),
            brush: format!("{path_id}-brush"),
            brush_border: format!("{path_id}-brush-brd"),
        }
    }
}

/// Everything a strategy needs to animate one stroke.
#[derive(Clone, Copy, Debug)]
pub struct StrokeContext<'a> {
    pub ids: &'a OverlayIds,
    /// `@keyframes`-safe name derived from the path id.
    pub name: &'a str,
    pub window: &'a StrokeWindow,
    pub timeline: &'a Timeline,
}

/// Result of running a strategy over every stroke of a diagram.
#[derive(Clone, Debug, PartialEq)]
pub enum VariantOutput {
    Continuous(StyleSheet),
    Script(ScriptOutput),
    Raster(RasterOutput),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptOutput {
    pub sheet: StyleSheet,
    /// Relative duration of each stroke, exposed to the driving script.
    pub durations: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RasterOutput {
    pub schedule: FrameSchedule,
    /// One sheet per frame of `schedule`, in the same order.
    pub sheets: Vec<StyleSheet>,
}

/// One way of turning per-stroke windows into style rules.
///
/// The assembler walks the diagram once and feeds every strategy the same
/// group and stroke events, in document order.
pub trait StrokeAnimationStrategy {
    /// Add a rule to every sheet this strategy produces.
    fn push_shared(&mut self, rule: StyleRule);

    /// Hide a group entirely (the stroke-number labels).
    fn hide_group(&mut self, group_id: &str) {
        self.push_shared(StyleRule::new([Selector::id(group_id)]).decl("display", "none"));
    }

    /// Force the outline look on an original stroke-path group.
    fn outline_group(&mut self, group_id: &str, border: &LineStyle) {
        self.push_shared(
            StyleRule::new([Selector::id(group_id)])
                .important("stroke-width", format!("{:.1}px", border.width))
                .important("stroke", border.color.clone()),
        );
    }

    fn animate_stroke(&mut self, stroke: &StrokeContext<'_>);

    fn finish(self: Box<Self>) -> VariantOutput;
}

/// `stroke-dasharray` value of a stroke drawn as one dash of its own length.
pub(crate) fn full_dash(length: f64) -> String {
    format!("{} {}", num3(length), num3(length))
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/strategy.rs"]
mod tests;
