//! Minimal style-sheet model for the generated animation rules.
//!
//! Rules are kept structured until serialization so the same sheet can be
//! written as a `<style>` block or, for id-only rules, folded into inline
//! `style` attributes.

use std::fmt::Write as _;

/// First line of every generated style sheet.
pub const CSS_HEADER: &str = "/* CSS automatically generated by kanimate, do not edit! */";

/// Escape an element id for use in a CSS id selector.
///
/// | input                                   | output            |
/// |-----------------------------------------|-------------------|
/// | ASCII letters, `_`, non-ASCII           | unchanged         |
/// | `-` and digits after the first position | unchanged         |
/// | digit in first position (or after `-`)  | `\3X ` (hex code) |
/// | `-` alone                               | `\-`              |
/// | any other ASCII character, e.g. `:`     | `\3a ` (hex code) |
pub fn escape_identifier(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 8);
    let mut chars = id.chars().peekable();
    let mut first = true;
    let mut after_leading_dash = false;

    while let Some(c) = chars.next() {
        let leading = first || after_leading_dash;
        match c {
            'a'..='z' | 'A'..='Z' | '_' => out.push(c),
            '0'..='9' if leading => push_code_point(&mut out, c),
            '0'..='9' => out.push(c),
            '-' if first && chars.peek().is_none() => out.push_str("\\-"),
            '-' => out.push(c),
            c if !c.is_ascii() => out.push(c),
            c => push_code_point(&mut out, c),
        }
        after_leading_dash = first && c == '-';
        first = false;
    }
    out
}

fn push_code_point(out: &mut String, c: char) {
    let _ = write!(out, "\\{:x} ", u32::from(c));
}

/// Name usable in `@keyframes`: the id without its `kvg:` namespace prefix,
/// with every character outside `[A-Za-z0-9_-]` replaced by `-`.
pub fn animation_name(id: &str) -> String {
    id.strip_prefix("kvg:")
        .unwrap_or(id)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Three-decimal number, the precision of lengths and percentages.
pub fn num3(v: f64) -> String {
    format!("{v:.3}")
}

pub fn pct3(v: f64) -> String {
    format!("{v:.3}%")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// `#id`, escaped on output.
    Id(String),
    /// Selector text written verbatim.
    Raw(String),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn to_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{}", escape_identifier(id)),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    fn to_css(&self) -> String {
        if self.important {
            format!("{}: {} !important;", self.property, self.value)
        } else {
            format!("{}: {};", self.property, self.value)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct StyleRule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    pub fn new(selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self {
            selectors: selectors.into_iter().collect(),
            declarations: Vec::new(),
        }
    }

    pub fn decl(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration {
            property,
            value: value.into(),
            important: false,
        });
        self
    }

    pub fn important(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration {
            property,
            value: value.into(),
            important: true,
        });
        self
    }

    /// Ids targeted by this rule, if every selector is a plain id selector.
    pub fn plain_ids(&self) -> Option<Vec<&str>> {
        self.selectors
            .iter()
            .map(|s| match s {
                Selector::Id(id) => Some(id.as_str()),
                Selector::Raw(_) => None,
            })
            .collect()
    }

    fn write_css(&self, out: &mut String) {
        let selectors: Vec<String> = self.selectors.iter().map(Selector::to_css).collect();
        let _ = writeln!(out, "{} {{", selectors.join(", "));
        for d in &self.declarations {
            let _ = writeln!(out, "    {}", d.to_css());
        }
        out.push_str("}\n");
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeStop {
    /// Offset text, e.g. `0%` or `33.333%`.
    pub offset: String,
    pub declarations: Vec<Declaration>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes {
    pub name: String,
    pub stops: Vec<KeyframeStop>,
}

impl Keyframes {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stops: Vec::new(),
        }
    }

    pub fn stop(
        mut self,
        offset: impl Into<String>,
        property: &'static str,
        value: impl Into<String>,
    ) -> Self {
        self.stops.push(KeyframeStop {
            offset: offset.into(),
            declarations: vec![Declaration {
                property,
                value: value.into(),
                important: false,
            }],
        });
        self
    }

    fn write_css(&self, out: &mut String) {
        let _ = writeln!(out, "@keyframes {} {{", self.name);
        for stop in &self.stops {
            let decls: Vec<String> = stop.declarations.iter().map(Declaration::to_css).collect();
            let _ = writeln!(out, "    {} {{ {} }}", stop.offset, decls.join(" "));
        }
        out.push_str("}\n");
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CssItem {
    Comment(String),
    Rule(StyleRule),
    Keyframes(Keyframes),
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct StyleSheet {
    items: Vec<CssItem>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.items.push(CssItem::Comment(text.into()));
    }

    pub fn rule(&mut self, rule: StyleRule) {
        self.items.push(CssItem::Rule(rule));
    }

    pub fn keyframes(&mut self, keyframes: Keyframes) {
        self.items.push(CssItem::Keyframes(keyframes));
    }

    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.items.iter().filter_map(|item| match item {
            CssItem::Rule(r) => Some(r),
            _ => None,
        })
    }

    pub fn to_css(&self) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(CSS_HEADER);
        out.push('\n');
        for item in &self.items {
            match item {
                CssItem::Comment(text) => {
                    let _ = writeln!(out, "\n/* {text} */");
                }
                CssItem::Rule(rule) => rule.write_css(&mut out),
                CssItem::Keyframes(kf) => kf.write_css(&mut out),
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/css.rs"]
mod tests;
