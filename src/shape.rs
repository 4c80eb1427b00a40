//! The named shapes a particle field can take.
//!
//! [`ParticleShape`] selects the generator used for the field and keys the
//! default color applied when the shape becomes active.

use crate::color::Rgb;
use crate::error::ShapeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the particle field.
///
/// Serialized with the upper-case names used by the UI and the vision
/// service (`"GALAXY"`, `"HEART"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticleShape {
    /// Three-armed spiral galaxy, flattened into a disk (default).
    #[default]
    Galaxy,

    /// Parametric heart curve with depth scatter.
    Heart,

    /// Four-petal rose curve wrapped onto a sphere.
    Flower,

    /// Planet body with a flat ring.
    Saturn,

    /// Uniformly filled explosion sphere.
    Fireworks,
}

impl ParticleShape {
    /// All shapes, in the order the UI lists them.
    pub const ALL: [ParticleShape; 5] = [
        ParticleShape::Galaxy,
        ParticleShape::Heart,
        ParticleShape::Flower,
        ParticleShape::Saturn,
        ParticleShape::Fireworks,
    ];

    /// Upper-case identifier of the shape.
    pub fn name(&self) -> &'static str {
        match self {
            ParticleShape::Galaxy => "GALAXY",
            ParticleShape::Heart => "HEART",
            ParticleShape::Flower => "FLOWER",
            ParticleShape::Saturn => "SATURN",
            ParticleShape::Fireworks => "FIREWORKS",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["GALAXY", "HEART", "FLOWER", "SATURN", "FIREWORKS"]
    }

    /// Color applied whenever this shape is selected or detected.
    pub fn default_color(&self) -> Rgb {
        match self {
            ParticleShape::Galaxy => Rgb::from_hex(0x00ffff),
            ParticleShape::Heart => Rgb::from_hex(0xff0055),
            ParticleShape::Flower => Rgb::from_hex(0xff69b4),
            ParticleShape::Saturn => Rgb::from_hex(0xffa500),
            ParticleShape::Fireworks => Rgb::from_hex(0xffffff),
        }
    }

    /// Look up a shape by name, ignoring ASCII case only.
    ///
    /// Returns `None` for anything that is not exactly a known shape name,
    /// including names with surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        ParticleShape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(name))
    }
}

impl FromStr for ParticleShape {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParticleShape::from_name(s).ok_or_else(|| ShapeError::InvalidShape(s.to_string()))
    }
}

impl fmt::Display for ParticleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(ParticleShape::from_name("heart"), Some(ParticleShape::Heart));
        assert_eq!(ParticleShape::from_name("Saturn"), Some(ParticleShape::Saturn));
        assert_eq!(ParticleShape::from_name("BANANA"), None);
        assert_eq!(ParticleShape::from_name(""), None);
    }

    #[test]
    fn test_from_name_rejects_padded_names() {
        assert_eq!(ParticleShape::from_name("  heart \n"), None);
        assert_eq!(ParticleShape::from_name(" GALAXY"), None);
        assert_eq!(ParticleShape::from_name("HEART "), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "thumbs up".parse::<ParticleShape>().unwrap_err();
        assert_eq!(err, ShapeError::InvalidShape("thumbs up".into()));
    }

    #[test]
    fn test_names_match_variants() {
        let names: Vec<_> = ParticleShape::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, ParticleShape::variants());
    }

    #[test]
    fn test_default_colors() {
        assert_eq!(ParticleShape::Heart.default_color().to_string(), "#ff0055");
        assert_eq!(ParticleShape::Galaxy.default_color().to_string(), "#00ffff");
        assert_eq!(ParticleShape::Flower.default_color().to_string(), "#ff69b4");
        assert_eq!(ParticleShape::Saturn.default_color().to_string(), "#ffa500");
        assert_eq!(ParticleShape::Fireworks.default_color().to_string(), "#ffffff");
    }

    #[test]
    fn test_serde_uses_upper_case() {
        let json = serde_json::to_string(&ParticleShape::Fireworks).unwrap();
        assert_eq!(json, "\"FIREWORKS\"");
        let shape: ParticleShape = serde_json::from_str("\"SATURN\"").unwrap();
        assert_eq!(shape, ParticleShape::Saturn);
    }
}
