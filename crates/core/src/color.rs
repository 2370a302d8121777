//! CSS-style colors for draw calls.
//!
//! Every color the backdrop paints is an 8-bit RGB triple plus a fractional
//! alpha, exactly what a 2D canvas `fillStyle`/`strokeStyle` string carries.
//! [`Rgba`] parses and prints that `rgba(r, g, b, a)` form so the browser
//! surface can hand colors straight to the canvas context.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BackdropError;

/// 8-bit RGB with a fractional alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha, clamped to [0, 1].
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Component-wise linear interpolation, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)` or `#rrggbb`.
    pub fn parse(input: &str) -> Result<Rgba, BackdropError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid(input));
        }
        let (body, want) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, 4)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, 3)
        } else {
            return Err(invalid(input));
        };
        let body = body.strip_suffix(')').ok_or_else(|| invalid(input))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != want {
            return Err(invalid(input));
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid(input));
        let a = match parts.get(3) {
            Some(p) => p.parse::<f64>().map_err(|_| invalid(input))?,
            None => 1.0,
        };
        if !(0.0..=1.0).contains(&a) {
            return Err(invalid(input));
        }
        Ok(Rgba {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a,
        })
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba::rgb(r, g, b))
}

fn invalid(input: &str) -> BackdropError {
    BackdropError::InvalidColor(input.to_string())
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_rgba() {
        let c = Rgba::parse("rgba(0, 255, 255, 0.1)").unwrap();
        assert_eq!(c, Rgba::new(0, 255, 255, 0.1));
    }

    #[test]
    fn parses_rgb_as_opaque() {
        let c = Rgba::parse("rgb(2,16,39)").unwrap();
        assert_eq!(c, Rgba::rgb(2, 16, 39));
    }

    #[test]
    fn parses_hex() {
        assert_eq!(Rgba::parse("#021027").unwrap(), Rgba::rgb(2, 16, 39));
    }

    #[test]
    fn rejects_garbage() {
        for bad in [
            "",
            "cyan",
            "#12345",
            "rgba(0, 0, 0)",
            "rgb(0, 0, 0, 1)",
            "rgba(256, 0, 0, 1)",
            "rgba(0, 0, 0, 1.5)",
            "rgba(0, 0, 0, 0.5",
        ] {
            assert!(
                matches!(Rgba::parse(bad), Err(BackdropError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn display_matches_canvas_style_string() {
        assert_eq!(
            Rgba::new(2, 16, 39, 0.15).to_string(),
            "rgba(2, 16, 39, 0.15)"
        );
        assert_eq!(Rgba::rgb(255, 255, 255).to_string(), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn display_output_parses_back() {
        let c = Rgba::new(0, 255, 255, 0.35);
        assert_eq!(Rgba::parse(&c.to_string()).unwrap(), c);
    }

    #[test]
    fn with_alpha_clamps() {
        let c = Rgba::rgb(1, 2, 3);
        assert_eq!(c.with_alpha(2.0).a, 1.0);
        assert_eq!(c.with_alpha(-1.0).a, 0.0);
        assert_eq!(c.with_alpha(0.4).a, 0.4);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let glow = Rgba::new(0, 255, 255, 0.2);
        let clear = Rgba::new(0, 255, 255, 0.0);
        assert_eq!(glow.lerp(clear, 0.0), glow);
        assert_eq!(glow.lerp(clear, 1.0), clear);
        let mid = glow.lerp(clear, 0.5);
        assert!((mid.a - 0.1).abs() < 1e-12);
        assert_eq!((mid.r, mid.g, mid.b), (0, 255, 255));
    }

    #[test]
    fn serializes_as_css_string() {
        let json = serde_json::to_string(&Rgba::new(0, 255, 255, 0.7)).unwrap();
        assert_eq!(json, "\"rgba(0, 255, 255, 0.7)\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::new(0, 255, 255, 0.7));
    }

    #[test]
    fn deserialize_rejects_bad_string() {
        assert!(serde_json::from_str::<Rgba>("\"purple\"").is_err());
    }
}
