//! Numeric helpers shared by the flight model and entity motion
//!
//! All angles here are in degrees unless the name says otherwise.

/// Linear interpolation between `from` and `to`
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Frame-rate independent exponential approach of `from` toward `to`
///
/// `smoothing` is a rate constant (1/s): after `dt` seconds the remaining gap
/// has shrunk by a factor of `e^(-smoothing * dt)`.
#[inline]
pub fn lerp_exp(from: f32, to: f32, smoothing: f32, dt: f32) -> f32 {
    lerp(from, to, 1.0 - (-smoothing * dt).exp())
}

/// Clamp `value` into `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Snap-to-the-other-side wrap used for horizontal world bounds
///
/// Not a modulo wrap: anything below `min` lands exactly on `max` and vice
/// versa. Tick deltas are clamped, so overshoot stays small.
#[inline]
pub fn wrap(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        max
    } else if value > max {
        min
    } else {
        value
    }
}

/// Normalize an angle in degrees to [-180, 180)
///
/// Non-finite input maps to 0.
#[inline]
pub fn normalize_angle(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let mut angle = (deg + 180.0) % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    // Tiny negatives round up to exactly 360 in f32
    if angle >= 360.0 {
        angle -= 360.0;
    }
    angle - 180.0
}

#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg.to_radians()
}

/// Sanitize a tick delta: negative or non-finite becomes 0, large steps are capped
#[inline]
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() {
        clamp(dt, 0.0, max_dt)
    } else {
        0.0
    }
}
