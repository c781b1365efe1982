//! Colors for figure series and heatmaps
//!
//! - Qualitative palettes (Set1, Set3) for distinguishing series
//! - Sequential colormaps (viridis, blues) for heatmap color scales

use serde::{Deserialize, Serialize};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Create a new color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from 8-bit channels (alpha = 1.0)
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a color from hex string (e.g., "#E41A1C" or "e41a1c")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::from_rgb8(r, g, b))
    }

    /// Same color with a different opacity
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    /// CSS `rgba(r,g,b,a)` string
    pub fn to_css(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({},{},{},{})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a
        )
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// Fallback for series counts beyond the qualitative palettes
pub const SERIES_BLUE: (u8, u8, u8) = (31, 119, 180);

/// ColorBrewer Set1 (9 colors)
pub const SET1: [(u8, u8, u8); 9] = [
    (228, 26, 28),
    (55, 126, 184),
    (77, 175, 74),
    (152, 78, 163),
    (255, 127, 0),
    (255, 255, 51),
    (166, 86, 40),
    (247, 129, 191),
    (153, 153, 153),
];

/// ColorBrewer Set3 (12 colors)
pub const SET3: [(u8, u8, u8); 12] = [
    (141, 211, 199),
    (255, 255, 179),
    (190, 186, 218),
    (251, 128, 114),
    (128, 177, 211),
    (253, 180, 98),
    (179, 222, 105),
    (252, 205, 229),
    (217, 217, 217),
    (188, 128, 189),
    (204, 235, 197),
    (255, 237, 111),
];

/// One color per series
///
/// Fewer than three series take the head of Set1, up to twelve take Set3,
/// and larger counts are all drawn in the same blue.
pub fn series_colors(n: usize) -> Vec<Color> {
    let to_color = |&(r, g, b): &(u8, u8, u8)| Color::from_rgb8(r, g, b);
    if n < 3 {
        SET1.iter().take(n).map(to_color).collect()
    } else if n <= SET3.len() {
        SET3.iter().take(n).map(to_color).collect()
    } else {
        vec![to_color(&SERIES_BLUE); n]
    }
}

/// A colormap for mapping scalar values to colors
#[derive(Clone, Debug)]
pub struct Colormap {
    /// Name of the colormap
    pub name: String,
    /// Color stops (positions from 0.0 to 1.0)
    stops: Vec<(f32, Color)>,
}

impl Colormap {
    /// Create a new colormap from a list of colors (evenly spaced)
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        let n = colors.len();
        let stops = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / (n - 1).max(1) as f32, c))
            .collect();

        Self {
            name: name.into(),
            stops,
        }
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        match self.stops.as_slice() {
            [] => Color::default(),
            [(_, only)] => *only,
            stops => stops
                .windows(2)
                .find(|w| t <= w[1].0)
                .map(|w| {
                    let ((t0, c0), (t1, c1)) = (w[0], w[1]);
                    Color::lerp(&c0, &c1, (t - t0) / (t1 - t0))
                })
                .unwrap_or(stops[stops.len() - 1].1),
        }
    }

    /// Same colors, high end first
    pub fn reversed(&self) -> Self {
        Self {
            name: format!("{}_r", self.name),
            stops: self
                .stops
                .iter()
                .rev()
                .map(|&(t, c)| (1.0 - t, c))
                .collect(),
        }
    }

    /// Evenly spaced `(position, color)` pairs for a heatmap color scale
    pub fn color_scale(&self, size: usize) -> Vec<(f64, Color)> {
        (0..size)
            .map(|i| {
                let t = i as f32 / (size - 1).max(1) as f32;
                (t as f64, self.sample(t))
            })
            .collect()
    }
}

/// The viridis colormap (perceptually uniform, colorblind-safe)
pub fn viridis() -> Colormap {
    Colormap::from_colors(
        "viridis",
        vec![
            Color::rgb(0.267, 0.005, 0.329),
            Color::rgb(0.282, 0.141, 0.458),
            Color::rgb(0.254, 0.265, 0.530),
            Color::rgb(0.207, 0.372, 0.553),
            Color::rgb(0.164, 0.471, 0.558),
            Color::rgb(0.128, 0.567, 0.551),
            Color::rgb(0.135, 0.659, 0.518),
            Color::rgb(0.267, 0.749, 0.441),
            Color::rgb(0.478, 0.821, 0.318),
            Color::rgb(0.741, 0.873, 0.150),
            Color::rgb(0.993, 0.906, 0.144),
        ],
    )
}

/// ColorBrewer Blues, white to dark blue
pub fn blues() -> Colormap {
    let hex = [
        "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
        "#08306b",
    ];
    Colormap::from_colors("blues", hex.iter().filter_map(|h| Color::from_hex(h)).collect())
}

/// Black through red and yellow to white
pub fn hot() -> Colormap {
    Colormap::from_colors(
        "hot",
        vec![
            Color::BLACK,
            Color::rgb(0.9, 0.0, 0.0),
            Color::rgb(1.0, 0.824, 0.0),
            Color::WHITE,
        ],
    )
}

/// Built-in colormap by name; a `_r` suffix reverses it
pub fn get_colormap(name: &str) -> Option<Colormap> {
    let name = name.to_lowercase();
    if let Some(base) = name.strip_suffix("_r") {
        return get_colormap(base).map(|cmap| cmap.reversed());
    }
    match name.as_str() {
        "viridis" => Some(viridis()),
        "blues" => Some(blues()),
        "hot" => Some(hot()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#E41A1C").unwrap();
        assert_eq!(color, Color::from_rgb8(228, 26, 28));
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn test_to_css_with_alpha() {
        let color = Color::from_rgb8(228, 26, 28).with_alpha(0.5);
        assert_eq!(color.to_css(), "rgba(228,26,28,0.5)");
        assert_eq!(Color::from_rgb8(0, 0, 0).to_css(), "rgba(0,0,0,1)");
    }

    #[test]
    fn test_series_colors_schedule() {
        let two = series_colors(2);
        assert_eq!(two[0], Color::from_rgb8(228, 26, 28));
        assert_eq!(two[1], Color::from_rgb8(55, 126, 184));

        let five = series_colors(5);
        assert_eq!(five.len(), 5);
        assert_eq!(five[0], Color::from_rgb8(141, 211, 199));

        let many = series_colors(13);
        assert_eq!(many.len(), 13);
        assert!(many.iter().all(|c| *c == many[0]));

        assert!(series_colors(0).is_empty());
    }

    #[test]
    fn test_colormap_sample() {
        let cmap = viridis();
        let c0 = cmap.sample(0.0);
        let c1 = cmap.sample(1.0);
        let mid = cmap.sample(0.5);

        // Viridis starts dark purple, ends yellow
        assert!(c0.r < 0.3);
        assert!(c1.r > 0.9);
        assert!(mid.g > 0.4);
    }

    #[test]
    fn test_color_scale_spans_unit_interval() {
        let scale = blues().color_scale(5);
        assert_eq!(scale.len(), 5);
        assert_eq!(scale[0].0, 0.0);
        assert_eq!(scale[4].0, 1.0);
        assert!(scale[0].1.r > scale[4].1.r);
    }

    #[test]
    fn test_get_colormap() {
        assert!(get_colormap("Viridis").is_some());
        assert!(get_colormap("jet").is_none());
        assert!(get_colormap("jet_r").is_none());
    }

    #[test]
    fn test_reversed_hot_starts_white() {
        let cmap = get_colormap("Hot_r").unwrap();
        assert_eq!(cmap.name, "hot_r");
        assert_eq!(cmap.sample(0.0), Color::WHITE);
        assert_eq!(cmap.sample(1.0), Color::BLACK);
    }
}
