//! In-memory RGBA image that plot elements draw into.
//!
//! [`Raster`] implements `DrawTarget<Color = Rgba>`, so every
//! `embedded-graphics` primitive can be drawn onto it directly. Drawing
//! replaces pixels; blending only happens through [`Raster::composite`], which
//! is how partially transparent elements are merged onto the shared image.

use core::convert::Infallible;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::color::Rgba;

/// Owned RGBA pixel buffer, row-major, origin at the top-left
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Raster {
    /// Allocate an image filled with `background`
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    /// Allocate a fully transparent layer
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, Rgba::TRANSPARENT)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel at `(x, y)`, or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    /// All pixels, row-major
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Iterate pixels together with their coordinates
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba)> + '_ {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, color)| (i as u32 % width, i as u32 / width, *color))
    }

    /// Flatten into `[r, g, b, a, r, g, b, a, ...]` bytes
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    /// Alpha-composite `layer` over this image
    ///
    /// Both images must have the same size; extra pixels on either side are
    /// ignored.
    pub fn composite(&mut self, layer: &Raster) {
        debug_assert_eq!(self.size(), layer.size(), "Layer size mismatch");

        for (dst, src) in self.pixels.iter_mut().zip(layer.pixels.iter()) {
            *dst = dst.over(*src);
        }
    }

    /// Resample to a smaller size by averaging every source pixel that falls
    /// into each destination pixel (box filter)
    ///
    /// Colors are averaged weighted by alpha so transparent pixels do not
    /// darken their neighbours.
    pub fn downsample(&self, width: u32, height: u32) -> Raster {
        let width = width.max(1);
        let height = height.max(1);
        trace!(
            "Downsampling {}x{} to {}x{}",
            self.width, self.height, width, height
        );

        if self.width == 0 || self.height == 0 {
            return Raster::transparent(width, height);
        }

        let x_spans = box_spans(self.width, width);
        let y_spans = box_spans(self.height, height);
        let mut out = Vec::with_capacity(width as usize * height as usize);

        for &(y_start, y_end) in &y_spans {
            for &(x_start, x_end) in &x_spans {
                let mut sums = [0u64; 4];
                let mut count = 0u64;

                for y in y_start..y_end {
                    for x in x_start..x_end {
                        let p = self.pixels[self.index(x, y)];
                        let a = p.a as u64;
                        sums[0] += p.r as u64 * a;
                        sums[1] += p.g as u64 * a;
                        sums[2] += p.b as u64 * a;
                        sums[3] += a;
                        count += 1;
                    }
                }

                out.push(average(sums, count));
            }
        }

        Raster {
            width,
            height,
            pixels: out,
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// Write a single pixel, ignoring coordinates outside the image
    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let idx = self.index(x as usize, y as usize);
            self.pixels[idx] = color;
        }
    }
}

/// Source index ranges `[start, end)` covered by each destination index
fn box_spans(source: u32, destination: u32) -> Vec<(usize, usize)> {
    let source = source as usize;
    let destination = destination as usize;

    (0..destination)
        .map(|i| {
            let start = (i * source / destination).min(source - 1);
            let end = ((i + 1) * source).div_ceil(destination).clamp(start + 1, source);
            (start, end)
        })
        .collect()
}

fn average(sums: [u64; 4], count: u64) -> Rgba {
    if count == 0 || sums[3] == 0 {
        return Rgba::TRANSPARENT;
    }

    let channel = |sum: u64| ((sum + sums[3] / 2) / sums[3]).min(255) as u8;
    Rgba::new(
        channel(sums[0]),
        channel(sums[1]),
        channel(sums[2]),
        ((sums[3] + count / 2) / count).min(255) as u8,
    )
}

impl OriginDimensions for Raster {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Raster {
    type Color = Rgba;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y..=bottom_right.y {
            let row = self.index(area.top_left.x as usize, y as usize);
            let end = row + area.size.width as usize;
            self.pixels[row..end].fill(color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}
