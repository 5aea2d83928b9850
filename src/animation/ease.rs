use std::{fmt, str::FromStr};

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, Point};

use crate::foundation::error::{KanimateError, KanimateResult};

const SOLVE_EPSILON: f64 = 1e-12;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;

/// Named CSS timing function applied to each stroke's draw progression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingFunction {
    Linear,
    Ease,
    EaseIn,
    #[default]
    EaseInOut,
    EaseOut,
}

impl TimingFunction {
    pub const ALL: [TimingFunction; 5] = [
        Self::Linear,
        Self::Ease,
        Self::EaseIn,
        Self::EaseInOut,
        Self::EaseOut,
    ];

    /// Name used in the `animation` shorthand of generated style sheets.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseInOut => "ease-in-out",
            Self::EaseOut => "ease-out",
        }
    }

    /// Control points of the CSS definition, `None` for `linear`.
    pub fn curve(self) -> Option<EasingCurve> {
        let (x1, y1, x2, y2) = match self {
            Self::Linear => return None,
            Self::Ease => (0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
        };
        Some(EasingCurve::new(Point::new(x1, y1), Point::new(x2, y2)))
    }

    /// Map normalized time `x` to normalized progress.
    pub fn apply(self, x: f64) -> f64 {
        match self.curve() {
            Some(curve) => curve.evaluate(x),
            None => x.clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for TimingFunction {
    type Err = KanimateError;

    fn from_str(s: &str) -> KanimateResult<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.css_name() == s)
            .ok_or_else(|| KanimateError::configuration(format!("invalid timing function \"{s}\"")))
    }
}

/// Cubic Bézier timing curve from (0,0) to (1,1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EasingCurve {
    bez: CubicBez,
}

impl EasingCurve {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self {
            bez: CubicBez::new(Point::ZERO, p1, p2, Point::new(1.0, 1.0)),
        }
    }

    /// Evaluate the curve's y at abscissa `x`, clamped to `[0, 1]`.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        self.bez.eval(t).y.clamp(0.0, 1.0)
    }

    // The curve is parametrized by t, so invert Bx(t) = x first.
    fn solve_t(&self, x: f64) -> f64 {
        let deriv = self.bez.deriv();

        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.bez.eval(t).x - x;
            if err.abs() < SOLVE_EPSILON {
                return t;
            }
            let slope = deriv.eval(t).x;
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
            if !(0.0..=1.0).contains(&t) {
                break;
            }
        }

        // Newton stalled or left the unit interval: Bx is monotonic, so bisection converges.
        let mut lo = 0.0;
        let mut hi = 1.0;
        let mut t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let err = self.bez.eval(t).x - x;
            if err.abs() < SOLVE_EPSILON {
                break;
            }
            if err < 0.0 {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
