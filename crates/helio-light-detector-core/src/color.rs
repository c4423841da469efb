//! Color weighting and transfer functions shared by dynamic and baked lighting.

use glam::Vec3;

/// Rec. 601 luma coefficients. They sum to 0.9999, not exactly 1.0.
pub const LUMA_COEFFICIENTS: Vec3 = Vec3::new(0.2989, 0.5870, 0.1140);

/// Perceived brightness of a linear RGB color.
#[inline]
pub fn luma(color: Vec3) -> f32 {
    color.dot(LUMA_COEFFICIENTS)
}

/// Scale a light intensity by its color when perceived brightness is enabled.
///
/// With weighting disabled the light is treated as grayscale and the raw
/// intensity is returned untouched.
#[inline]
pub fn weighted_intensity(intensity: f32, color: Vec3, perceived_brightness: bool) -> f32 {
    if perceived_brightness {
        intensity * luma(color)
    } else {
        intensity
    }
}

/// Collapse an RGB irradiance sample into a scalar level.
///
/// Baked samples carry no separate intensity, so the unweighted form sums the
/// three channels instead.
#[inline]
pub fn irradiance_level(rgb: Vec3, perceived_brightness: bool) -> f32 {
    if perceived_brightness {
        luma(rgb)
    } else {
        rgb.x + rgb.y + rgb.z
    }
}

/// sRGB linear to gamma transfer function.
#[inline]
pub fn linear_to_gamma(value: f32) -> f32 {
    if value <= 0.003_130_8 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Per-channel [`linear_to_gamma`].
#[inline]
pub fn linear_to_gamma_rgb(rgb: Vec3) -> Vec3 {
    Vec3::new(
        linear_to_gamma(rgb.x),
        linear_to_gamma(rgb.y),
        linear_to_gamma(rgb.z),
    )
}
