//! Easing functions for animations
//!
//! An easing remaps linear time progress in `[0, 1]` to visual progress.
//! Output is not required to stay in `[0, 1]`; the tween engine writes
//! whatever the easing returns.

use std::fmt;
use std::rc::Rc;

/// Easing function type
#[derive(Clone, Default)]
pub enum Easing {
    /// Identity mapping
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f64, f64, f64, f64),
    /// Caller-supplied mapping
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// CSS `ease`
    pub const EASE: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);
    /// CSS `ease-in`
    pub const EASE_IN: Easing = Easing::CubicBezier(0.42, 0.0, 1.0, 1.0);
    /// CSS `ease-out`
    pub const EASE_OUT: Easing = Easing::CubicBezier(0.0, 0.0, 0.58, 1.0);
    /// CSS `ease-in-out`
    pub const EASE_IN_OUT: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);

    /// Wrap an arbitrary mapping, e.g. `Easing::custom(|t| t * t)`
    pub fn custom<F: Fn(f64) -> f64 + 'static>(f: F) -> Self {
        Easing::Custom(Rc::new(f))
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Custom(f) => f(t),
        }
    }

    /// Look up an easing by its kebab-case name (`"ease-in-quad"`, `"ease"`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let easing = match name {
            "linear" => Easing::Linear,
            "ease" => Easing::EASE,
            "ease-in" => Easing::EASE_IN,
            "ease-out" => Easing::EASE_OUT,
            "ease-in-out" => Easing::EASE_IN_OUT,
            "ease-in-quad" => Easing::EaseInQuad,
            "ease-out-quad" => Easing::EaseOutQuad,
            "ease-in-out-quad" => Easing::EaseInOutQuad,
            "ease-in-cubic" => Easing::EaseInCubic,
            "ease-out-cubic" => Easing::EaseOutCubic,
            "ease-in-out-cubic" => Easing::EaseInOutCubic,
            "ease-in-quart" => Easing::EaseInQuart,
            "ease-out-quart" => Easing::EaseOutQuart,
            "ease-in-out-quart" => Easing::EaseInOutQuart,
            _ => return None,
        };
        Some(easing)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::EaseInQuad => f.write_str("EaseInQuad"),
            Easing::EaseOutQuad => f.write_str("EaseOutQuad"),
            Easing::EaseInOutQuad => f.write_str("EaseInOutQuad"),
            Easing::EaseInCubic => f.write_str("EaseInCubic"),
            Easing::EaseOutCubic => f.write_str("EaseOutCubic"),
            Easing::EaseInOutCubic => f.write_str("EaseInOutCubic"),
            Easing::EaseInQuart => f.write_str("EaseInQuart"),
            Easing::EaseOutQuart => f.write_str("EaseOutQuart"),
            Easing::EaseInOutQuart => f.write_str("EaseInOutQuart"),
            Easing::CubicBezier(x1, y1, x2, y2) => f
                .debug_tuple("CubicBezier")
                .field(x1)
                .field(y1)
                .field(x2)
                .field(y2)
                .finish(),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Cubic bezier easing calculation (matches browser `cubic-bezier()` timing functions).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = t;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - t).abs() < 1e-7 {
            break;
        }
        if val < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³, in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
