//! Colour handling: hex parsing, CIE LCh (HCL) conversion and the
//! long-way-round HCL interpolation used by the hour-of-day colour scale.
//!
//! Conversions use the D50 white point and the sRGB transfer curve.

use std::f64::consts::PI;
use std::fmt;

const XN: f64 = 0.964_22;
const YN: f64 = 1.0;
const ZN: f64 = 0.825_21;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// An 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |h: &str| u8::from_str_radix(h, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A colour in cylindrical CIE LCh. `h` is NaN for achromatic colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hcl {
    pub h: f64,
    pub c: f64,
    pub l: f64,
}

impl Hcl {
    pub fn from_rgb(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r);
        let g = srgb_to_linear(rgb.g);
        let b = srgb_to_linear(rgb.b);
        let y = xyz_to_lab((0.222_504_5 * r + 0.716_878_6 * g + 0.060_616_9 * b) / YN);
        let (x, z) = if rgb.r == rgb.g && rgb.g == rgb.b {
            (y, y)
        } else {
            (
                xyz_to_lab((0.436_074_7 * r + 0.385_064_9 * g + 0.143_080_4 * b) / XN),
                xyz_to_lab((0.013_932_2 * r + 0.097_104_5 * g + 0.714_173_3 * b) / ZN),
            )
        };
        let l = 116.0 * y - 16.0;
        let a = 500.0 * (x - y);
        let b = 200.0 * (y - z);

        if a.abs() < 1e-12 && b.abs() < 1e-12 {
            return Self { h: f64::NAN, c: 0.0, l };
        }
        let mut h = b.atan2(a) * 180.0 / PI;
        if h < 0.0 {
            h += 360.0;
        }
        Self {
            h,
            c: (a * a + b * b).sqrt(),
            l,
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = if self.h.is_nan() { 0.0 } else { self.h * PI / 180.0 };
        let a = h.cos() * self.c;
        let b = h.sin() * self.c;

        let y0 = (self.l + 16.0) / 116.0;
        let x = XN * lab_to_xyz(y0 + a / 500.0);
        let y = YN * lab_to_xyz(y0);
        let z = ZN * lab_to_xyz(y0 - b / 200.0);

        Rgb::new(
            linear_to_srgb(3.133_856_1 * x - 1.616_866_7 * y - 0.490_614_6 * z),
            linear_to_srgb(-0.978_768_4 * x + 1.916_141_5 * y + 0.033_454_0 * z),
            linear_to_srgb(0.071_945_3 * x - 0.228_991_4 * y + 1.405_242_7 * z),
        )
    }
}

/// Interpolate from `start` to `end` in HCL, moving the hue linearly
/// without taking the shorter way around the colour wheel.
pub fn hcl_long(start: Rgb, end: Rgb) -> impl Fn(f64) -> Rgb {
    let a = Hcl::from_rgb(start);
    let b = Hcl::from_rgb(end);
    move |t: f64| {
        let h = lerp_hue(a.h, b.h, t);
        Hcl {
            h,
            c: a.c + (b.c - a.c) * t,
            l: a.l + (b.l - a.l) * t,
        }
        .to_rgb()
    }
}

/// An achromatic end borrows the other end's hue.
fn lerp_hue(a: f64, b: f64, t: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => f64::NAN,
        (true, false) => b,
        (false, true) => a,
        (false, false) => a + (b - a) * t,
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let x = channel as f64 / 255.0;
    if x <= 0.040_45 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(x: f64) -> u8 {
    let v = if x <= 0.003_130_8 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    };
    (255.0 * v).round().clamp(0.0, 255.0) as u8
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}
