use crate::ring::geometry::{clamp_ratio, clamp_unit};
use derive_more::{Deref, From, Into};
use palette::rgb::FromHexError;
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),
    #[error("color must have 6 or 8 hex digits: {0}")]
    BadLength(String),
    #[error("invalid hex digits in color: {0}")]
    BadDigits(String),
}

/// Color written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgba<f64>);

impl HexColor {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self(Srgba::new(r, g, b, a))
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !matches!(digits.len(), 6 | 8) {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigits(s.to_string()));
        }

        let bad_digits = |_: FromHexError| ColorParseError::BadDigits(s.to_string());
        let bytes: Srgba<u8> = if digits.len() == 8 {
            digits.parse().map_err(bad_digits)?
        } else {
            digits
                .parse::<Srgb<u8>>()
                .map_err(bad_digits)?
                .with_alpha(u8::MAX)
        };
        Ok(Self(bytes.into_format()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: Srgba<u8> = self.0.into_format();
        write!(f, "#{:x}", bytes)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RingKind {
    Progress,
    Activity,
}

impl RingKind {
    pub fn default_parameters(&self) -> RingParameters {
        match self {
            Self::Progress => RingParameters::new(
                HexColor::rgba(0.8, 0.8, 1.0, 1.0),
                HexColor::rgba(0.9, 0.9, 1.0, 1.0),
                0.5,
                0.38,
                0.06,
            ),
            Self::Activity => RingParameters::new(
                HexColor::rgba(0.9, 0.5, 1.0, 0.9),
                HexColor::rgba(0.5, 0.9, 1.0, 0.8),
                0.5,
                0.45,
                0.05,
            ),
        }
    }
}

/// Visual settings of one ring, applied as a single batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingParameters {
    pub color1: HexColor,
    pub color2: HexColor,
    #[serde(deserialize_with = "unit")]
    pub blend: f64,
    #[serde(deserialize_with = "ratio")]
    pub radius_ratio: f64,
    #[serde(deserialize_with = "ratio")]
    pub width_ratio: f64,
}

impl RingParameters {
    pub fn new(
        color1: HexColor,
        color2: HexColor,
        blend: f64,
        radius_ratio: f64,
        width_ratio: f64,
    ) -> Self {
        Self {
            color1,
            color2,
            blend: clamp_unit(blend),
            radius_ratio: clamp_ratio(radius_ratio),
            width_ratio: clamp_ratio(width_ratio),
        }
    }
}

fn ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_ratio)
}

fn unit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parsing() {
        let color: HexColor = "#ff800040".parse().unwrap();
        let (r, g, b, a) = color.into_components();
        assert_eq!((r, g, b), (1.0, 128.0 / 255.0, 0.0));
        assert!((a - 64.0 / 255.0).abs() < 1e-12);

        let opaque: HexColor = " #00ff00 ".parse().unwrap();
        assert_eq!(opaque.alpha, 1.0);

        assert!(matches!(
            "00ff00".parse::<HexColor>(),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            "#0f0".parse::<HexColor>(),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            "#gg0000".parse::<HexColor>(),
            Err(ColorParseError::BadDigits(_))
        ));
    }

    #[test]
    fn test_hex_color_rejects_non_hex_characters() {
        for input in ["#+f+f+f", "#-1ff00", "#00ff00 0", "#ééé"] {
            assert!(input.parse::<HexColor>().is_err(), "{input} should not parse");
        }
        assert_eq!(
            "#+f+f+f".parse::<HexColor>(),
            Err(ColorParseError::BadDigits("#+f+f+f".to_string()))
        );
    }

    #[test]
    fn test_hex_color_display() {
        assert_eq!(HexColor::rgba(1.0, 0.0, 0.5, 1.0).to_string(), "#ff0080ff");
    }

    #[test]
    fn test_ring_kind_from_str() {
        let cases = vec![
            ("progress", RingKind::Progress),
            ("Progress", RingKind::Progress),
            ("ACTIVITY", RingKind::Activity),
        ];
        for (s, expected) in cases {
            assert_eq!(s.parse::<RingKind>().unwrap(), expected);
        }
        assert!("spinner".parse::<RingKind>().is_err());
        assert_eq!(RingKind::Activity.to_string(), "activity");
    }

    #[test]
    fn test_parameters_clamp_on_deserialize() {
        let json = r##"{
            "color1": "#ffffff",
            "color2": "#000000cc",
            "blend": 1.5,
            "radius_ratio": 0.8,
            "width_ratio": -0.1
        }"##;
        let params: RingParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.blend, 1.0);
        assert_eq!(params.radius_ratio, 0.5);
        assert_eq!(params.width_ratio, 0.0);
        assert_eq!(params.color2.to_string(), "#000000cc");
    }

    #[test]
    fn test_parameters_clamp_on_construction() {
        let params = RingParameters::new(
            HexColor::rgba(0.0, 0.0, 0.0, 1.0),
            HexColor::rgba(1.0, 1.0, 1.0, 1.0),
            -2.0,
            0.3,
            0.7,
        );
        assert_eq!(params.blend, 0.0);
        assert_eq!(params.radius_ratio, 0.3);
        assert_eq!(params.width_ratio, 0.5);
    }
}
