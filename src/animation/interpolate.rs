use crate::animation::ease::Ease;
use crate::foundation::error::{ReelError, ReelResult};

/// Behavior for inputs outside the input range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Hold the edge output value.
    #[default]
    Clamp,
    /// Continue the edge segment linearly.
    Extend,
    /// Return the input unchanged.
    Identity,
}

/// Options for [`interpolate`] and [`interpolate_piecewise`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterpolateOpts {
    /// Easing applied to the normalized position within a segment.
    pub ease: Ease,
    /// Extrapolation below the first input stop.
    pub left: Extrapolate,
    /// Extrapolation above the last input stop.
    pub right: Extrapolate,
}

impl InterpolateOpts {
    /// Clamp on both sides with the given easing.
    pub fn eased(ease: Ease) -> Self {
        Self {
            ease,
            ..Self::default()
        }
    }
}

/// Map `input` from `[in0, in1]` onto `[out0, out1]`.
///
/// A degenerate input range (`in0 == in1`) behaves like a step at `in0`.
pub fn interpolate(
    input: f64,
    range_in: [f64; 2],
    range_out: [f64; 2],
    opts: InterpolateOpts,
) -> f64 {
    let [in0, in1] = range_in;
    let [out0, out1] = range_out;
    if in0 == in1 {
        return if input < in0 { out0 } else { out1 };
    }

    let (lo, hi) = if in0 < in1 { (in0, in1) } else { (in1, in0) };
    if input < lo || input > hi {
        let edge = if input < lo { opts.left } else { opts.right };
        match edge {
            Extrapolate::Clamp => {
                let at_start = (input < lo) == (in0 < in1);
                return if at_start { out0 } else { out1 };
            }
            Extrapolate::Identity => return input,
            Extrapolate::Extend => {
                let t = (input - in0) / (in1 - in0);
                return out0 + (out1 - out0) * t;
            }
        }
    }

    let t = (input - in0) / (in1 - in0);
    out0 + (out1 - out0) * opts.ease.apply(t)
}

/// Clamped linear remap; the common case for frame-driven progress.
pub fn interpolate_clamped(input: f64, range_in: [f64; 2], range_out: [f64; 2]) -> f64 {
    interpolate(input, range_in, range_out, InterpolateOpts::default())
}

/// Piecewise variant over matching stop lists.
///
/// `stops_in` must be strictly increasing and have the same length (>= 2) as `stops_out`.
pub fn interpolate_piecewise(
    input: f64,
    stops_in: &[f64],
    stops_out: &[f64],
    opts: InterpolateOpts,
) -> ReelResult<f64> {
    if stops_in.len() < 2 || stops_in.len() != stops_out.len() {
        return Err(ReelError::validation("interpolate stops must have equal length >= 2"));
    }
    if !stops_in.windows(2).all(|w| w[0] < w[1]) {
        return Err(ReelError::validation("interpolate input stops must be strictly increasing"));
    }
    if stops_in.iter().chain(stops_out).any(|v| !v.is_finite()) {
        return Err(ReelError::validation("interpolate stops must be finite"));
    }

    let last = stops_in.len() - 1;
    let seg = stops_in[1..last].partition_point(|&s| s <= input);
    let seg_opts = InterpolateOpts {
        ease: opts.ease,
        left: if seg == 0 { opts.left } else { Extrapolate::Clamp },
        right: if seg + 1 == last {
            opts.right
        } else {
            Extrapolate::Clamp
        },
    };
    Ok(interpolate(
        input,
        [stops_in[seg], stops_in[seg + 1]],
        [stops_out[seg], stops_out[seg + 1]],
        seg_opts,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
