use crate::config::settings::Settings;
use crate::keyframes::css::{Selector, StyleRule, StyleSheet, num3};
use crate::keyframes::strategy::{
    RasterOutput, StrokeAnimationStrategy, StrokeContext, VariantOutput,
};
use crate::timeline::allocator::WindowPhase;
use crate::timeline::frames::FrameSchedule;

// Padding that keeps renderers from drawing a dot for a zero-length dash or gap.
const DASH_GAP_PAD: f64 = 0.002;
const DASH_OFFSET_PAD: f64 = 0.0015;
const BRUSH_DASH: f64 = 0.001;

/// Static snapshot of every stroke at each sampled frame.
pub struct RasterStrategy<'a> {
    settings: &'a Settings,
    schedule: FrameSchedule,
    sheets: Vec<StyleSheet>,
}

impl<'a> RasterStrategy<'a> {
    pub fn new(settings: &'a Settings, schedule: FrameSchedule) -> Self {
        let sheets = vec![StyleSheet::new(); schedule.len()];
        Self {
            settings,
            schedule,
            sheets,
        }
    }
}

impl StrokeAnimationStrategy for RasterStrategy<'_> {
    fn push_shared(&mut self, rule: StyleRule) {
        for sheet in &mut self.sheets {
            sheet.rule(rule.clone());
        }
    }

    fn animate_stroke(&mut self, stroke: &StrokeContext<'_>) {
        let ids = stroke.ids;
        let w = stroke.window;
        let show_brush = self.settings.brush.show;
        let timing = self.settings.timing.function;

        let with_brush = |first: &str| {
            let mut selectors = vec![Selector::id(first)];
            if show_brush {
                selectors.push(Selector::id(&ids.brush));
                selectors.push(Selector::id(&ids.brush_border));
            }
            selectors
        };

        for (frame, sheet) in self.schedule.frames.iter().zip(&mut self.sheets) {
            sheet.comment(format!("stroke {}", ids.path));

            match w.phase_at(stroke.timeline.to_unscaled(frame.time)) {
                WindowPhase::Before => {
                    sheet.rule(StyleRule::new(with_brush(&ids.anim)).decl("visibility", "hidden"));
                }
                WindowPhase::After => {
                    sheet.rule(StyleRule::new(with_brush(&ids.bg)).decl("visibility", "hidden"));
                }
                WindowPhase::During { progress } => {
                    let progression = timing.apply(progress);
                    let offset = format!("{:.4}", w.length * (1.0 - progression) + DASH_OFFSET_PAD);
                    let gap = num3(w.length + DASH_GAP_PAD);

                    sheet.rule(
                        StyleRule::new([Selector::id(&ids.anim)])
                            .decl("stroke-dasharray", format!("{} {gap}", num3(w.length)))
                            .decl("stroke-dashoffset", offset.clone())
                            .decl("stroke", self.settings.colors.filling.clone()),
                    );
                    if show_brush {
                        sheet.rule(
                            StyleRule::new([
                                Selector::id(&ids.brush),
                                Selector::id(&ids.brush_border),
                            ])
                            .decl("stroke-dasharray", format!("{BRUSH_DASH} {gap}"))
                            .decl("stroke-dashoffset", offset),
                        );
                    }
                }
            }
        }
    }

    fn finish(self: Box<Self>) -> VariantOutput {
        VariantOutput::Raster(RasterOutput {
            schedule: self.schedule,
            sheets: self.sheets,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/raster.rs"]
mod tests;
