use super::color::{Rgb, clamp_unit, mix};
use crate::config::ConfigError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One named set of three colors the orb can display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub tertiary: Rgb,
    pub label: String,
}

impl ColorScheme {
    pub fn new(label: impl Into<String>, primary: Rgb, secondary: Rgb, tertiary: Rgb) -> Self {
        Self { primary, secondary, tertiary, label: label.into() }
    }
}

/// The colors actually shown on a frame: the active scheme blended toward the next one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayColors {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub tertiary: Rgb,
    pub label: String,
}

static DEFAULT_PALETTE: Lazy<Palette> = Lazy::new(|| {
    Palette(vec![
        ColorScheme::new(
            "Serene Violet",
            Rgb::new(0x66, 0x7e, 0xea),
            Rgb::new(0x76, 0x4b, 0xa2),
            Rgb::new(0xf0, 0x93, 0xfb),
        ),
        ColorScheme::new(
            "Ocean Teal",
            Rgb::new(0x4f, 0xac, 0xfe),
            Rgb::new(0x00, 0xf2, 0xfe),
            Rgb::new(0x43, 0xe9, 0x7b),
        ),
        ColorScheme::new(
            "Warm Coral",
            Rgb::new(0xfa, 0x70, 0x9a),
            Rgb::new(0xfe, 0xe1, 0x40),
            Rgb::new(0xfa, 0x80, 0x72),
        ),
        ColorScheme::new(
            "Mint Lavender",
            Rgb::new(0xa8, 0xed, 0xea),
            Rgb::new(0xfe, 0xd6, 0xe3),
            Rgb::new(0xd2, 0x99, 0xc2),
        ),
        ColorScheme::new(
            "Sunset Peach",
            Rgb::new(0xff, 0xec, 0xd2),
            Rgb::new(0xfc, 0xb6, 0x9f),
            Rgb::new(0xff, 0x8a, 0x80),
        ),
        ColorScheme::new(
            "Jade Sky",
            Rgb::new(0x84, 0xfa, 0xb0),
            Rgb::new(0x8f, 0xd3, 0xf4),
            Rgb::new(0xa8, 0xc8, 0xec),
        ),
    ])
});

/// A fixed, ordered, cyclic list of color schemes.
///
/// A palette always holds at least two schemes, so every index taken modulo its
/// length is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorScheme>", into = "Vec<ColorScheme>")]
pub struct Palette(Vec<ColorScheme>);

impl Palette {
    /// The smallest palette that can still transition somewhere.
    pub const MIN_SCHEMES: usize = 2;

    pub fn new(schemes: Vec<ColorScheme>) -> Result<Self, ConfigError> {
        if schemes.len() < Self::MIN_SCHEMES {
            return Err(ConfigError::PaletteTooSmall(schemes.len()));
        }
        Ok(Self(schemes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn schemes(&self) -> &[ColorScheme] {
        &self.0
    }

    /// The scheme at `index`, wrapping around the palette.
    pub fn scheme(&self, index: usize) -> &ColorScheme {
        &self.0[index % self.0.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.0.len()
    }

    /// Blend scheme `active` toward its successor at `blend` in [0, 1].
    ///
    /// The label flips to the successor's once the blend passes the halfway mark.
    pub fn display_colors(&self, active: usize, blend: f32) -> DisplayColors {
        let blend = clamp_unit(blend);
        let current = self.scheme(active);
        let next = self.scheme(self.next_index(active));
        let label = if blend < 0.5 { &current.label } else { &next.label };
        DisplayColors {
            primary: mix(current.primary, next.primary, blend),
            secondary: mix(current.secondary, next.secondary, blend),
            tertiary: mix(current.tertiary, next.tertiary, blend),
            label: label.clone(),
        }
    }

    /// Primary colors previewing the upcoming schemes, one per particle.
    pub fn particle_colors(&self, active: usize, count: usize) -> Vec<Rgb> {
        (0..count).map(|i| self.scheme(active + i).primary).collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        DEFAULT_PALETTE.clone()
    }
}

impl TryFrom<Vec<ColorScheme>> for Palette {
    type Error = ConfigError;

    fn try_from(schemes: Vec<ColorScheme>) -> Result<Self, Self::Error> {
        Self::new(schemes)
    }
}

impl From<Palette> for Vec<ColorScheme> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn two_tone() -> Palette {
        Palette::new(vec![
            ColorScheme::new("black", Rgb::new(0, 0, 0), Rgb::new(0, 0, 0), Rgb::new(0, 0, 0)),
            ColorScheme::new("white", Rgb::new(255, 255, 255), Rgb::new(255, 255, 255), Rgb::new(255, 255, 255)),
        ])
        .expect("valid palette")
    }

    #[test]
    fn default_palette_has_six_schemes() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 6);
        assert_eq!(palette.scheme(0).primary.to_hex(), "#667eea");
        assert_eq!(palette.scheme(5).tertiary.to_hex(), "#a8c8ec");
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn too_small_palette_is_rejected(#[case] len: usize) {
        let schemes = Palette::default().schemes()[..len].to_vec();
        assert!(matches!(Palette::new(schemes), Err(ConfigError::PaletteTooSmall(n)) if n == len));
    }

    #[test]
    fn indexes_wrap() {
        let palette = two_tone();
        assert_eq!(palette.scheme(3).label, "white");
        assert_eq!(palette.next_index(1), 0);
    }

    #[rstest]
    #[case(0.0, 0, "black")]
    #[case(0.49, 125, "black")]
    #[case(0.5, 128, "white")]
    #[case(1.0, 255, "white")]
    fn display_colors_blend(#[case] blend: f32, #[case] channel: u8, #[case] label: &str) {
        let colors = two_tone().display_colors(0, blend);
        assert_eq!(colors.primary, Rgb::new(channel, channel, channel));
        assert_eq!(colors.tertiary, colors.primary);
        assert_eq!(colors.label, label);
    }

    #[test]
    fn particle_colors_preview_upcoming_schemes() {
        let palette = Palette::default();
        let colors = palette.particle_colors(4, 6);
        let expected: Vec<Rgb> = [4, 5, 0, 1, 2, 3].iter().map(|&i| palette.scheme(i).primary).collect();
        assert_eq!(colors, expected);
    }

    #[test]
    fn deserializing_validates_length() {
        let yaml = "- { primary: '#000000', secondary: '#000000', tertiary: '#000000', label: only }";
        assert!(serde_yaml::from_str::<Palette>(yaml).is_err());
    }
}
