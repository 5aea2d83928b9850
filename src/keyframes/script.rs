use crate::config::settings::Settings;
use crate::keyframes::css::{
    Keyframes, Selector, StyleRule, StyleSheet, escape_identifier, num3,
};
use crate::keyframes::strategy::{
    ScriptOutput, StrokeAnimationStrategy, StrokeContext, VariantOutput, full_dash,
};

/// Matches the overlay element the driving script marked as current.
const AFTER_CURRENT: &str = "[class *= \"current\"]";

/// Single-shot rules keyed off classes toggled by an external script.
///
/// Each stroke animates for its own relative duration once its overlay gets the
/// `animate` class; strokes after the `current` one stay hidden.
pub struct ScriptStrategy<'a> {
    settings: &'a Settings,
    sheet: StyleSheet,
    durations: Vec<f64>,
}

impl<'a> ScriptStrategy<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        let mut sheet = StyleSheet::new();
        sheet.rule(
            StyleRule::new([Selector::Raw(".backward".to_owned())])
                .important("animation-direction", "reverse"),
        );
        Self {
            settings,
            sheet,
            durations: Vec::new(),
        }
    }
}

fn raw(css: String) -> Selector {
    Selector::Raw(css)
}

impl StrokeAnimationStrategy for ScriptStrategy<'_> {
    fn push_shared(&mut self, rule: StyleRule) {
        self.sheet.rule(rule);
    }

    fn animate_stroke(&mut self, stroke: &StrokeContext<'_>) {
        let ids = stroke.ids;
        let w = stroke.window;
        let len = num3(w.length);
        let duration = stroke.timeline.relative_duration(w);
        let timing = self.settings.timing.function.css_name();
        let strike = format!("strike-{}", stroke.name);
        let anim = escape_identifier(&ids.anim);
        let bg = escape_identifier(&ids.bg);

        self.durations.push(duration);
        self.sheet.comment(format!("stroke {}", ids.path));

        if self.settings.brush.show {
            self.sheet.rule(
                StyleRule::new([
                    Selector::id(&ids.brush),
                    Selector::id(&ids.brush_border),
                    Selector::id(&ids.bg),
                ])
                .decl("visibility", "hidden"),
            );
        }

        self.sheet.rule(
            StyleRule::new([raw(format!("{AFTER_CURRENT} ~ #{anim}"))])
                .decl("visibility", "hidden"),
        );

        self.sheet.rule(
            StyleRule::new([
                raw(format!("{AFTER_CURRENT} ~ #{bg}")),
                raw(format!("#{bg}.animate")),
            ])
            .decl("visibility", "visible"),
        );

        self.sheet.keyframes(
            Keyframes::new(strike.clone())
                .stop("0%", "stroke-dashoffset", len.clone())
                .stop("100%", "stroke-dashoffset", "0"),
        );

        self.sheet.rule(
            StyleRule::new([raw(format!("#{anim}.animate"))])
                .decl("stroke", self.settings.colors.filling.clone())
                .decl("stroke-dasharray", full_dash(w.length))
                .decl("visibility", "visible")
                .decl(
                    "animation",
                    format!("{strike} {duration:.3}s {timing} forwards 1"),
                ),
        );

        if self.settings.brush.show {
            let strike_brush = format!("strike-brush-{}", stroke.name);
            self.sheet.keyframes(
                Keyframes::new(strike_brush.clone())
                    .stop("0%", "stroke-dashoffset", len.clone())
                    .stop("100%", "stroke-dashoffset", "0.4"),
            );
            self.sheet.rule(
                StyleRule::new([
                    raw(format!("#{}.animate.brush", escape_identifier(&ids.brush))),
                    raw(format!(
                        "#{}.animate.brush",
                        escape_identifier(&ids.brush_border)
                    )),
                ])
                .decl("stroke-dasharray", format!("0 {len}"))
                .decl("visibility", "visible")
                .decl(
                    "animation",
                    format!("{strike_brush} {duration:.3}s {timing} forwards 1"),
                ),
            );
        }
    }

    fn finish(self: Box<Self>) -> VariantOutput {
        VariantOutput::Script(ScriptOutput {
            sheet: self.sheet,
            durations: self.durations,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/script.rs"]
mod tests;
