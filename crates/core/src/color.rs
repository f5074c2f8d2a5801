//! OKLCH to sRGB conversion and WCAG relative luminance.

use tekton_contract::Oklch;

const LUMINANCE_CUTOFF: f64 = 0.03928;
const LUMINANCE_LOW_FACTOR: f64 = 12.92;
const LUMINANCE_OFFSET: f64 = 0.055;
const LUMINANCE_EXPONENT: f64 = 2.4;

const RED_COEFFICIENT: f64 = 0.2126;
const GREEN_COEFFICIENT: f64 = 0.7152;
const BLUE_COEFFICIENT: f64 = 0.0722;

/// A gamma-encoded sRGB colour with channels in 0.0 – 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Converts OKLCH to linear sRGB through OKLab. Out-of-gamut results are not
/// clipped here.
pub fn oklch_to_linear_srgb(color: Oklch) -> [f64; 3] {
    let hue = color.h.to_radians();
    let l = color.l;
    let a = color.c * hue.cos();
    let b = color.c * hue.sin();

    let l_ = l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let m_ = l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let s_ = l - 0.089_484_177_5 * a - 1.291_485_548_0 * b;

    let l3 = l_ * l_ * l_;
    let m3 = m_ * m_ * m_;
    let s3 = s_ * s_ * s_;

    [
        4.076_741_662_1 * l3 - 3.307_711_591_3 * m3 + 0.230_969_929_2 * s3,
        -1.268_438_004_6 * l3 + 2.609_757_401_1 * m3 - 0.341_319_396_5 * s3,
        -0.004_196_086_3 * l3 - 0.703_418_614_7 * m3 + 1.707_614_701_0 * s3,
    ]
}

fn gamma_encode(linear: f64) -> f64 {
    if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Gamut-clipped, gamma-encoded sRGB for an OKLCH colour.
pub fn to_srgb(color: Oklch) -> Srgb {
    let clipped = Oklch::new(color.l.clamp(0.0, 1.0), color.c.clamp(0.0, 0.5), color.h);
    let [r, g, b] = oklch_to_linear_srgb(clipped);
    Srgb {
        r: gamma_encode(r.clamp(0.0, 1.0)),
        g: gamma_encode(g.clamp(0.0, 1.0)),
        b: gamma_encode(b.clamp(0.0, 1.0)),
    }
}

/// WCAG 2.x relative luminance of an sRGB colour.
pub fn relative_luminance(color: Srgb) -> f64 {
    fn channel(c: f64) -> f64 {
        if c <= LUMINANCE_CUTOFF {
            c / LUMINANCE_LOW_FACTOR
        } else {
            ((c + LUMINANCE_OFFSET) / (1.0 + LUMINANCE_OFFSET)).powf(LUMINANCE_EXPONENT)
        }
    }
    RED_COEFFICIENT * channel(color.r)
        + GREEN_COEFFICIENT * channel(color.g)
        + BLUE_COEFFICIENT * channel(color.b)
}

pub fn oklch_luminance(color: Oklch) -> f64 {
    relative_luminance(to_srgb(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn white_and_black() {
        let white = to_srgb(Oklch::new(1.0, 0.0, 0.0));
        assert!(close(white.r, 1.0) && close(white.g, 1.0) && close(white.b, 1.0));
        assert!(close(relative_luminance(white), 1.0));

        let black = to_srgb(Oklch::new(0.0, 0.0, 0.0));
        assert!(close(black.r, 0.0) && close(black.g, 0.0) && close(black.b, 0.0));
        assert!(close(relative_luminance(black), 0.0));
    }

    #[test]
    fn neutral_midpoint_is_grey() {
        let grey = to_srgb(Oklch::new(0.5, 0.0, 0.0));
        assert!(close(grey.r, grey.g) && close(grey.g, grey.b));
        // oklch(0.5 0 0) is roughly #636363.
        assert!((0.37..=0.41).contains(&grey.r), "got {}", grey.r);
    }

    #[test]
    fn out_of_gamut_is_clipped() {
        let vivid = to_srgb(Oklch::new(0.7, 0.5, 145.0));
        for channel in [vivid.r, vivid.g, vivid.b] {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    #[test]
    fn lightness_orders_luminance() {
        let darker = oklch_luminance(Oklch::new(0.3, 0.05, 250.0));
        let lighter = oklch_luminance(Oklch::new(0.8, 0.05, 250.0));
        assert!(lighter > darker);
    }
}
