use crate::foundation::core::Fps;

/// Physical parameters of a damped spring.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpringConfig {
    /// Mass attached to the spring; must be > 0.
    pub mass: f64,
    /// Damping coefficient; >= 0.
    pub damping: f64,
    /// Spring stiffness; must be > 0.
    pub stiffness: f64,
    /// Never report progress past the target.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            damping: 10.0,
            stiffness: 100.0,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    /// Damping ratio `zeta` (1 = critically damped).
    pub fn damping_ratio(self) -> f64 {
        let s = self.sanitized();
        s.damping / (2.0 * (s.stiffness * s.mass).sqrt())
    }

    fn sanitized(self) -> Self {
        fn finite_or(v: f64, fallback: f64) -> f64 {
            if v.is_finite() { v } else { fallback }
        }
        Self {
            mass: finite_or(self.mass, 1.0).max(1e-6),
            damping: finite_or(self.damping, 10.0).max(0.0),
            stiffness: finite_or(self.stiffness, 100.0).max(1e-6),
            overshoot_clamping: self.overshoot_clamping,
        }
    }
}

/// Spring progress from 0 toward 1 at `frame` (relative to the spring start).
///
/// The spring starts at rest at 0 and is evaluated in closed form at `t = frame / fps`, so the
/// value depends only on its inputs.
pub fn spring(frame: u64, fps: Fps, config: SpringConfig) -> f64 {
    spring_at_secs(fps.frames_to_secs(frame), config)
}

/// Spring mapped onto `[from, to]`, starting after `delay_frames`.
pub fn spring_between(
    frame: u64,
    fps: Fps,
    config: SpringConfig,
    from: f64,
    to: f64,
    delay_frames: u64,
) -> f64 {
    if frame < delay_frames {
        return from;
    }
    let p = spring(frame - delay_frames, fps, config);
    from + (to - from) * p
}

fn spring_at_secs(t: f64, config: SpringConfig) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let c = config.sanitized();
    let omega0 = (c.stiffness / c.mass).sqrt();
    let zeta = c.damping / (2.0 * (c.stiffness * c.mass).sqrt());

    // Displacement from the target: starts at -1 with zero velocity.
    let d0 = -1.0;
    let v0 = 0.0;
    let d = if (zeta - 1.0).abs() < 1e-9 {
        (-omega0 * t).exp() * (d0 + (v0 + omega0 * d0) * t)
    } else if zeta < 1.0 {
        let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
        let b = (v0 + zeta * omega0 * d0) / omega_d;
        (-zeta * omega0 * t).exp() * (d0 * (omega_d * t).cos() + b * (omega_d * t).sin())
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega0 * (zeta - root);
        let r2 = -omega0 * (zeta + root);
        let c2 = (v0 - r1 * d0) / (r2 - r1);
        let c1 = d0 - c2;
        c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
    };

    let p = 1.0 + d;
    if c.overshoot_clamping { p.min(1.0) } else { p }
}

/// Number of frames until the spring stays within `threshold` of its target.
///
/// Scans at most `max_frames` frames; returns `max_frames` when the spring has not settled.
pub fn settle_frames(fps: Fps, config: SpringConfig, threshold: f64, max_frames: u64) -> u64 {
    let threshold = threshold.abs().max(1e-9);
    let mut settled_since = None;
    for f in 0..=max_frames {
        let off = (spring(f, fps, config) - 1.0).abs();
        match (off <= threshold, settled_since) {
            (true, None) => settled_since = Some(f),
            (false, Some(_)) => settled_since = None,
            _ => {}
        }
    }
    settled_since.unwrap_or(max_frames)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
