use crate::config::settings::Settings;
use crate::keyframes::css::{Keyframes, Selector, StyleRule, StyleSheet, num3, pct3};
use crate::keyframes::strategy::{
    StrokeAnimationStrategy, StrokeContext, VariantOutput, full_dash,
};

/// Looping, clock-driven animation keyed to percentage windows of one period.
pub struct ContinuousStrategy<'a> {
    settings: &'a Settings,
    period: f64,
    sheet: StyleSheet,
}

impl<'a> ContinuousStrategy<'a> {
    pub fn new(settings: &'a Settings, period: f64) -> Self {
        Self {
            settings,
            period,
            sheet: StyleSheet::new(),
        }
    }
}

impl StrokeAnimationStrategy for ContinuousStrategy<'_> {
    fn push_shared(&mut self, rule: StyleRule) {
        self.sheet.rule(rule);
    }

    fn animate_stroke(&mut self, stroke: &StrokeContext<'_>) {
        let w = stroke.window;
        let len = num3(w.length);
        let start = pct3(w.start_pct);
        let end = pct3(w.end_pct);
        let period = format!("{:.3}s", self.period);
        let timing = self.settings.timing.function.css_name();
        let strike = format!("strike-{}", stroke.name);
        let showhide = format!("showhide-{}", stroke.name);

        // Dash offset: undrawn until the window opens, drawn once it closes.
        self.sheet.keyframes(
            Keyframes::new(strike.clone())
                .stop("0%", "stroke-dashoffset", len.clone())
                .stop(start.clone(), "stroke-dashoffset", len.clone())
                .stop(end.clone(), "stroke-dashoffset", "0")
                .stop("100%", "stroke-dashoffset", "0"),
        );

        self.sheet.keyframes(
            Keyframes::new(showhide.clone())
                .stop(start.clone(), "visibility", "hidden")
                .stop(end.clone(), "stroke", self.settings.colors.filling.clone()),
        );

        self.sheet.rule(
            StyleRule::new([Selector::id(&stroke.ids.anim)])
                .decl("stroke-dasharray", full_dash(w.length))
                .decl("stroke-dashoffset", "0")
                .decl(
                    "animation",
                    format!(
                        "{strike} {period} {timing} infinite,\n        {showhide} {period} step-start infinite"
                    ),
                ),
        );

        if self.settings.brush.show {
            let showhide_brush = format!("showhide-brush-{}", stroke.name);
            self.sheet.keyframes(
                Keyframes::new(showhide_brush.clone())
                    .stop(start, "visibility", "hidden")
                    .stop(end, "visibility", "visible")
                    .stop("100%", "visibility", "hidden"),
            );

            // A zero-length dash leaves only the round cap: the pen tip.
            self.sheet.rule(
                StyleRule::new([
                    Selector::id(&stroke.ids.brush),
                    Selector::id(&stroke.ids.brush_border),
                ])
                .decl("stroke-dasharray", format!("0 {len}"))
                .decl(
                    "animation",
                    format!(
                        "{strike} {period} {timing} infinite,\n        {showhide_brush} {period} step-start infinite"
                    ),
                ),
            );
        }
    }

    fn finish(self: Box<Self>) -> VariantOutput {
        VariantOutput::Continuous(self.sheet)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/continuous.rs"]
mod tests;
