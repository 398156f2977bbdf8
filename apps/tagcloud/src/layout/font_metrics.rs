//! Built-in text measurement from static glyph-width tables.
//!
//! Widths are in em units and scaled by the tier's pixel font size. This is an
//! approximation of real text shaping; it is exact enough for collision
//! avoidance as long as the host renders with the same tier-to-font mapping.
//! Tables cover ASCII 0x20..=0x7E (index = `(char as usize) - 32`); anything
//! else falls back to the table's average width.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::host::{MeasuredBox, TextMeasurer};

// ────────────────────────────────────────────────────────────────────────────
// Typefaces
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Typeface {
    /// Humanist sans-serif.
    #[default]
    Inter,
    /// Old-style serif, roughly 85% of Inter's widths.
    EbGaramond,
    /// Condensed display sans-serif, roughly 68% of Inter's widths.
    Oswald,
}

impl FromStr for Typeface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inter" => Ok(Typeface::Inter),
            "eb-garamond" | "garamond" => Ok(Typeface::EbGaramond),
            "oswald" => Ok(Typeface::Oswald),
            other => Err(format!("unknown typeface '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static glyph-width table, widths in em.
pub struct FontMetricTable {
    pub typeface: Typeface,
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Width of a string in em units.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }
}

/// Returns the static metric table for a typeface.
pub fn get_metrics(typeface: Typeface) -> &'static FontMetricTable {
    match typeface {
        Typeface::Inter => &INTER_TABLE,
        Typeface::EbGaramond => &EB_GARAMOND_TABLE,
        Typeface::Oswald => &OSWALD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tier scale and measurer
// ────────────────────────────────────────────────────────────────────────────

/// Linear tier-to-pixel font size mapping: `base_px + step_px * (tier - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierScale {
    pub base_px: f32,
    pub step_px: f32,
}

impl Default for TierScale {
    fn default() -> Self {
        Self {
            base_px: 12.0,
            step_px: 2.0,
        }
    }
}

impl TierScale {
    pub fn font_px(&self, tier: u8) -> f32 {
        self.base_px + self.step_px * f32::from(tier.saturating_sub(1))
    }
}

/// [`TextMeasurer`] backed by a [`FontMetricTable`].
///
/// Box width is the text advance plus horizontal padding on both sides, box
/// height is `font_px * line_height`. Both are rounded up to whole pixels, the
/// way a browser reports outer sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricMeasurer {
    pub typeface: Typeface,
    pub scale: TierScale,
    pub line_height: f32,
    pub padding_px: f32,
}

impl Default for MetricMeasurer {
    fn default() -> Self {
        Self::new(Typeface::default())
    }
}

impl MetricMeasurer {
    pub fn new(typeface: Typeface) -> Self {
        Self {
            typeface,
            scale: TierScale::default(),
            line_height: 1.2,
            padding_px: 2.0,
        }
    }
}

impl TextMeasurer for MetricMeasurer {
    fn measure(&self, text: &str, tier: u8) -> MeasuredBox {
        let font_px = self.scale.font_px(tier);
        let advance = get_metrics(self.typeface).measure_em(text) * font_px;
        MeasuredBox {
            width: f64::from((advance + 2.0 * self.padding_px).ceil()),
            height: f64::from((font_px * self.line_height).ceil()),
            font_size: format!("{font_px}px"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Inter.
static INTER_TABLE: FontMetricTable = FontMetricTable {
    typeface: Typeface::Inter,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
};

/// EB Garamond.
static EB_GARAMOND_TABLE: FontMetricTable = FontMetricTable {
    typeface: Typeface::EbGaramond,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.21, 0.26, 0.32, 0.48, 0.48, 0.76, 0.57, 0.19, 0.28, 0.28, 0.33, 0.50, 0.24, 0.28, 0.24, 0.26,
        // 0     1     2     3     4     5     6     7     8     9
        0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48,
        // :     ;     <     =     >     ?     @
        0.24, 0.24, 0.50, 0.50, 0.50, 0.43, 0.87,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.57, 0.52, 0.52, 0.57, 0.48, 0.43, 0.57, 0.57, 0.21, 0.33, 0.52, 0.45, 0.66,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.57, 0.61, 0.48, 0.61, 0.52, 0.43, 0.48, 0.57, 0.57, 0.76, 0.52, 0.52, 0.48,
        // [     \     ]     ^     _     `
        0.24, 0.26, 0.24, 0.40, 0.48, 0.29,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.48, 0.48, 0.43, 0.48, 0.48, 0.26, 0.48, 0.48, 0.19, 0.19, 0.45, 0.19, 0.71,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.48, 0.48, 0.48, 0.48, 0.28, 0.37, 0.33, 0.48, 0.43, 0.61, 0.43, 0.43, 0.37,
        // {     |     }     ~
        0.28, 0.22, 0.28, 0.50,
    ],
    average_char_width: 0.44,
};

/// Oswald.
static OSWALD_TABLE: FontMetricTable = FontMetricTable {
    typeface: Typeface::Oswald,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.17, 0.20, 0.26, 0.38, 0.38, 0.61, 0.46, 0.15, 0.23, 0.23, 0.27, 0.40, 0.19, 0.23, 0.19, 0.21,
        // 0     1     2     3     4     5     6     7     8     9
        0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38,
        // :     ;     <     =     >     ?     @
        0.19, 0.19, 0.40, 0.40, 0.40, 0.34, 0.69,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.46, 0.41, 0.41, 0.46, 0.38, 0.34, 0.46, 0.46, 0.17, 0.27, 0.41, 0.36, 0.53,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.46, 0.49, 0.38, 0.49, 0.41, 0.34, 0.38, 0.46, 0.46, 0.61, 0.41, 0.41, 0.38,
        // [     \     ]     ^     _     `
        0.19, 0.21, 0.19, 0.32, 0.38, 0.23,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.38, 0.38, 0.34, 0.38, 0.38, 0.21, 0.38, 0.38, 0.15, 0.15, 0.36, 0.15, 0.56,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.38, 0.38, 0.38, 0.38, 0.23, 0.30, 0.27, 0.38, 0.34, 0.49, 0.34, 0.34, 0.30,
        // {     |     }     ~
        0.23, 0.18, 0.23, 0.40,
    ],
    average_char_width: 0.35,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_em_empty_is_zero() {
        assert_eq!(get_metrics(Typeface::Inter).measure_em(""), 0.0);
    }

    #[test]
    fn test_measure_em_ascii() {
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00
        let width = get_metrics(Typeface::Inter).measure_em("Rust");
        assert!((width - 2.00).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_non_ascii_uses_average_width() {
        let table = get_metrics(Typeface::Inter);
        assert!((table.measure_em("é") - table.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_tier_scale_is_linear() {
        let scale = TierScale::default();
        assert_eq!(scale.font_px(1), 12.0);
        assert_eq!(scale.font_px(5), 20.0);
        assert_eq!(scale.font_px(10), 30.0);
        assert_eq!(scale.font_px(0), 12.0);
    }

    #[test]
    fn test_measurer_rounds_up_to_whole_pixels() {
        let m = MetricMeasurer::default();
        // tier 1 → 12px; "Rust" advance 24px + 4px padding; height 14.4 → 15
        let b = m.measure("Rust", 1);
        assert_eq!(b.width, 28.0);
        assert_eq!(b.height, 15.0);
        assert_eq!(b.font_size, "12px");
    }

    #[test]
    fn test_higher_tier_measures_larger() {
        let m = MetricMeasurer::default();
        let small = m.measure("Raptor", 1);
        let large = m.measure("Raptor", 10);
        assert!(large.width > small.width);
        assert!(large.height > small.height);
    }

    #[test]
    fn test_condensed_typeface_is_narrower() {
        let text = "distributed caching layer";
        let oswald = MetricMeasurer::new(Typeface::Oswald).measure(text, 5);
        let inter = MetricMeasurer::new(Typeface::Inter).measure(text, 5);
        let garamond = MetricMeasurer::new(Typeface::EbGaramond).measure(text, 5);
        assert!(oswald.width < garamond.width);
        assert!(garamond.width < inter.width);
    }

    #[test]
    fn test_typeface_from_str() {
        assert_eq!("Inter".parse::<Typeface>(), Ok(Typeface::Inter));
        assert_eq!("garamond".parse::<Typeface>(), Ok(Typeface::EbGaramond));
        assert_eq!(" oswald ".parse::<Typeface>(), Ok(Typeface::Oswald));
        assert!("comic-sans".parse::<Typeface>().is_err());
    }
}
