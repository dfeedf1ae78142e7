//! Colors with an alpha channel and per-element styling
//!
//! Elements are configured with plain [`Rgb888`] colors. When drawing, the
//! element's transparency mask is appended as a fourth channel, producing an
//! [`Rgba`] pixel for the raster.

use embedded_graphics::pixelcolor::raw::RawU32;
use embedded_graphics::pixelcolor::{PixelColor, Rgb888, RgbColor};

use crate::constants::{DEFAULT_ELEMENT_COLOR, OPAQUE};

/// An 8-bit per channel color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (0 = transparent, 255 = opaque)
    pub a: u8,
}

impl PixelColor for Rgba {
    type Raw = RawU32;
}

impl Rgba {
    /// Fully transparent black, the background of compositing layers
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Append an alpha channel to an RGB color
    pub fn from_rgb(color: Rgb888, alpha: u8) -> Self {
        Self::new(color.r(), color.g(), color.b(), alpha)
    }

    /// Drop the alpha channel
    pub fn to_rgb(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }

    /// Composite `src` over `self` (Porter-Duff source-over)
    pub fn over(self, src: Rgba) -> Rgba {
        match src.a {
            0 => return self,
            OPAQUE => return src,
            _ => {}
        }

        let src_a = src.a as f32 / 255.0;
        let dst_a = self.a as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let blend = |s: u8, d: u8| -> u8 {
            let value = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };

        Rgba::new(
            blend(src.r, self.r),
            blend(src.g, self.g),
            blend(src.b, self.b),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        )
    }
}

impl From<Rgb888> for Rgba {
    fn from(color: Rgb888) -> Self {
        Self::from_rgb(color, OPAQUE)
    }
}

impl From<Rgba> for Rgb888 {
    fn from(color: Rgba) -> Self {
        color.to_rgb()
    }
}

/// Visual style shared by every plot element
///
/// A `None` color means the corresponding part is not drawn at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    /// Outline / stroke color
    pub color: Option<Rgb888>,
    /// Fill color (area under a graph, circle interior)
    pub fill_color: Option<Rgb888>,
    /// Alpha applied to every color of the element (255 = opaque)
    pub transparency_mask: u8,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            color: Some(DEFAULT_ELEMENT_COLOR),
            fill_color: None,
            transparency_mask: OPAQUE,
        }
    }
}

impl ElementStyle {
    /// Style with the given outline color and no fill
    pub const fn stroke(color: Rgb888) -> Self {
        Self {
            color: Some(color),
            fill_color: None,
            transparency_mask: OPAQUE,
        }
    }

    /// Set the outline color (`None` disables the outline)
    pub fn with_color(mut self, color: Option<Rgb888>) -> Self {
        self.color = color;
        self
    }

    /// Set the fill color (`None` disables the fill)
    pub fn with_fill(mut self, fill_color: Option<Rgb888>) -> Self {
        self.fill_color = fill_color;
        self
    }

    /// Set the transparency mask
    pub fn with_transparency(mut self, transparency_mask: u8) -> Self {
        self.transparency_mask = transparency_mask;
        self
    }

    /// Whether the element can draw straight onto the shared image
    pub fn is_opaque(&self) -> bool {
        self.transparency_mask == OPAQUE
    }

    /// Append this style's transparency mask to `base`
    pub fn resolve(&self, base: Option<Rgb888>) -> Option<Rgba> {
        base.map(|color| Rgba::from_rgb(color, self.transparency_mask))
    }

    /// Outline color with transparency applied
    pub fn stroke_color(&self) -> Option<Rgba> {
        self.resolve(self.color)
    }

    /// Fill color with transparency applied
    pub fn fill(&self) -> Option<Rgba> {
        self.resolve(self.fill_color)
    }
}
