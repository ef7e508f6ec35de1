use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A color as understood by PyMOL: either a named color or a hex RGB value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Color {
    Named(&'static str),
    Rgb(u32),
}

/// The color of all residues before conservation coloring is applied.
pub const NEUTRAL_COLOR: Color = Color::Named("grey60");

/// Scores at or above this value share the last color of a scheme.
pub const SATURATING_SCORE: usize = 4;

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    /// White for conserved positions, darkening to red with increasing variability.
    #[default]
    Reds,
    /// Green for conserved positions, turning purple with increasing variability.
    GreenPurple,
}

impl ColorScheme {
    /// Colors for the scores 1, 2, 3 and 4 or more.
    pub fn colors(&self) -> [Color; SATURATING_SCORE] {
        match self {
            Self::Reds => [
                Color::Rgb(0xffffff),
                Color::Rgb(0xff8a8a),
                Color::Rgb(0xd9381e),
                Color::Rgb(0x750000),
            ],
            Self::GreenPurple => [
                Color::Rgb(0x0f8a38),
                Color::Rgb(0x60f090),
                Color::Rgb(0x8c7fac),
                Color::Rgb(0x692d94),
            ],
        }
    }

    pub fn color_for(&self, score: usize) -> Color {
        if score == 0 {
            NEUTRAL_COLOR
        } else {
            self.colors()[score.min(SATURATING_SCORE) - 1]
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reds => "reds",
            Self::GreenPurple => "green-purple",
        }
    }
}

impl std::str::FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "reds" => Ok(Self::Reds),
            "green-purple" => Ok(Self::GreenPurple),
            _ => Err(format!(
                "unknown color scheme '{s}', expected one of: reds, green-purple"
            )),
        }
    }
}

impl Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Rgb(rgb) => write!(f, "0x{rgb:06x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ColorScheme, NEUTRAL_COLOR};

    #[test]
    fn test_score_buckets() {
        for scheme in [ColorScheme::Reds, ColorScheme::GreenPurple] {
            let colors = scheme.colors();
            assert_eq!(scheme.color_for(1), colors[0]);
            assert_eq!(scheme.color_for(2), colors[1]);
            assert_eq!(scheme.color_for(3), colors[2]);
            assert_eq!(scheme.color_for(4), colors[3]);
            assert_eq!(scheme.color_for(7), scheme.color_for(4));
            assert_eq!(scheme.color_for(0), NEUTRAL_COLOR);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::Rgb(0xff8a8a).to_string(), "0xff8a8a");
        assert_eq!(Color::Rgb(0x0f8a38).to_string(), "0x0f8a38");
        assert_eq!(NEUTRAL_COLOR.to_string(), "grey60");
    }

    #[test]
    fn test_parse_scheme() {
        assert_eq!("reds".parse(), Ok(ColorScheme::Reds));
        assert_eq!("Green_Purple".parse(), Ok(ColorScheme::GreenPurple));
        assert!("rainbow".parse::<ColorScheme>().is_err());
        assert_eq!(ColorScheme::default(), ColorScheme::Reds);
    }
}
