use std::f64::consts::FRAC_PI_2;

/// Timing curve applied to normalized progress.
///
/// Every curve maps 0 to 0 and 1 to 1. Names in configs are snake_case (`"in_out_cubic"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    #[default]
    Linear,
    /// `t^2`.
    InQuad,
    /// Mirror of [`Ease::InQuad`].
    OutQuad,
    /// Quadratic on both ends.
    InOutQuad,
    /// `t^3`.
    InCubic,
    /// Mirror of [`Ease::InCubic`].
    OutCubic,
    /// Cubic on both ends.
    InOutCubic,
    /// Quarter sine wave.
    InSine,
    /// Mirror of [`Ease::InSine`].
    OutSine,
    /// Half cosine wave.
    InOutSine,
    /// Overshoots the target slightly before settling.
    OutBack,
}

/// Accelerating curve `t^p`.
fn accel(t: f64, p: i32) -> f64 {
    t.powi(p)
}

/// Decelerating mirror of [`accel`].
fn decel(t: f64, p: i32) -> f64 {
    1.0 - (1.0 - t).powi(p)
}

/// Accelerate through the first half, decelerate through the second.
fn both(t: f64, p: i32) -> f64 {
    if t < 0.5 {
        accel(2.0 * t, p) / 2.0
    } else {
        0.5 + decel(2.0 * t - 1.0, p) / 2.0
    }
}

impl Ease {
    /// Every variant, in [`Ease::NAMES`] order.
    pub const ALL: [Ease; 11] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::OutBack,
    ];

    /// Config names accepted by [`Ease::from_name`].
    pub const NAMES: [&'static str; 11] = [
        "linear",
        "in_quad",
        "out_quad",
        "in_out_quad",
        "in_cubic",
        "out_cubic",
        "in_out_cubic",
        "in_sine",
        "out_sine",
        "in_out_sine",
        "out_back",
    ];

    /// Map progress `t` (clamped to `[0, 1]`).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => accel(t, 2),
            Self::OutQuad => decel(t, 2),
            Self::InOutQuad => both(t, 2),
            Self::InCubic => accel(t, 3),
            Self::OutCubic => decel(t, 3),
            Self::InOutCubic => both(t, 3),
            Self::InSine => 1.0 - (t * FRAC_PI_2).cos(),
            Self::OutSine => (t * FRAC_PI_2).sin(),
            Self::InOutSine => (1.0 - (t * std::f64::consts::PI).cos()) / 2.0,
            Self::OutBack => {
                const K: f64 = 1.701_58;
                let u = t - 1.0;
                1.0 + (K + 1.0) * u.powi(3) + K * u.powi(2)
            }
        }
    }

    /// Variant for a config name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
