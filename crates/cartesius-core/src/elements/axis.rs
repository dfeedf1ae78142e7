//! Axis lines with optional ticks, grid lines and tick labels
//!
//! A horizontal axis is the line `y = offset` spanning the whole visible
//! width; a vertical axis is `x = offset` spanning the visible height. Axes
//! never contribute to a plot's bounds.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;

use crate::bounds::Bounds;
use crate::color::{ElementStyle, Rgba};
use crate::constants::{
    DEFAULT_AXES_COLOR, DEFAULT_TICK_SPACING, LABEL_OFFSET_PX, MAX_AXIS_LABEL_LENGTH,
    MAX_LABEL_PRECISION, MAX_TICKS_PER_AXIS, TICK_HALF_LENGTH_PX,
};
use crate::raster::Raster;
use crate::{CartesiusError, CartesiusResult};

use super::{PlotElement, RenderContext, draw_segment, render_layered};

/// Direction an axis runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Along the x direction (the x-axis)
    Horizontal,
    /// Along the y direction (the y-axis)
    Vertical,
}

/// Where a tick label sits relative to its tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPosition {
    LeftUp,
    LeftCenter,
    LeftDown,
    CenterUp,
    Center,
    CenterDown,
    RightUp,
    RightCenter,
    RightDown,
}

impl LabelPosition {
    /// `(horizontal, vertical)` direction, each -1, 0 or 1; vertical 1 is up
    pub fn direction(self) -> (i32, i32) {
        match self {
            LabelPosition::LeftUp => (-1, 1),
            LabelPosition::LeftCenter => (-1, 0),
            LabelPosition::LeftDown => (-1, -1),
            LabelPosition::CenterUp => (0, 1),
            LabelPosition::Center => (0, 0),
            LabelPosition::CenterDown => (0, -1),
            LabelPosition::RightUp => (1, 1),
            LabelPosition::RightCenter => (1, 0),
            LabelPosition::RightDown => (1, -1),
        }
    }

    fn alignment(self) -> Alignment {
        match self.direction().0 {
            -1 => Alignment::Right,
            0 => Alignment::Center,
            _ => Alignment::Left,
        }
    }

    fn baseline(self) -> Baseline {
        match self.direction().1 {
            1 => Baseline::Bottom,
            0 => Baseline::Middle,
            _ => Baseline::Top,
        }
    }
}

/// An axis line
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    orientation: Orientation,
    detached: bool,
    offset: f64,
    tick_spacing: Option<f64>,
    grid_color: Option<Rgb888>,
    label_color: Option<Rgb888>,
    label_position: LabelPosition,
    style: ElementStyle,
    bounds: Bounds,
}

impl Axis {
    /// Axis through the origin, without ticks, grid or labels
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            detached: false,
            offset: 0.0,
            tick_spacing: None,
            grid_color: None,
            label_color: None,
            label_position: match orientation {
                Orientation::Horizontal => LabelPosition::CenterDown,
                Orientation::Vertical => LabelPosition::LeftCenter,
            },
            style: ElementStyle::stroke(DEFAULT_AXES_COLOR),
            bounds: Bounds::EMPTY,
        }
    }

    /// The x-axis
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// The y-axis
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// Axis a coordinate system starts with: ticks every unit
    pub(crate) fn default_for(orientation: Orientation) -> Self {
        Self {
            tick_spacing: Some(DEFAULT_TICK_SPACING),
            ..Self::new(orientation)
        }
    }

    /// An extra axis crossing the other direction at `offset`
    ///
    /// Detached axes are added to a plot like any other element instead of
    /// replacing its x-axis or y-axis.
    pub fn detached(orientation: Orientation, offset: f64) -> CartesiusResult<Self> {
        if !offset.is_finite() {
            return Err(CartesiusError::precondition(format!(
                "axis offset must be finite, got {offset}"
            )));
        }

        Ok(Self {
            detached: true,
            offset,
            ..Self::new(orientation)
        })
    }

    /// Draw a tick every `spacing` user units
    pub fn with_ticks(mut self, spacing: f64) -> CartesiusResult<Self> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(CartesiusError::configuration(format!(
                "tick spacing must be positive, got {spacing}"
            )));
        }

        self.tick_spacing = Some(spacing);
        Ok(self)
    }

    /// Remove tick marks (and with them grid lines and labels)
    pub fn without_ticks(mut self) -> Self {
        self.tick_spacing = None;
        self
    }

    /// Draw grid lines through every tick, beneath all plot elements
    pub fn with_grid(mut self, color: Rgb888) -> Self {
        self.grid_color = Some(color);
        self
    }

    /// Label every tick with its value
    pub fn with_labels(mut self, color: Rgb888) -> Self {
        self.label_color = Some(color);
        self
    }

    /// Set where labels sit relative to their ticks
    pub fn with_label_position(mut self, position: LabelPosition) -> Self {
        self.label_position = position;
        self
    }

    /// Set the visual style of the axis line and ticks
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Direction the axis runs in
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether this is an x-axis
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Whether this is a y-axis
    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    /// Whether this axis is added as a regular element
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Coordinate at which the axis crosses the other direction
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Distance between ticks, if ticks are drawn
    pub fn tick_spacing(&self) -> Option<f64> {
        self.tick_spacing
    }

    /// Draw this axis' grid lines onto the shared image
    pub fn render_grid(&self, target: &mut Raster, ctx: &RenderContext) {
        let Some(color) = self.style.resolve(self.grid_color) else {
            return;
        };

        render_layered(target, self.style.transparency_mask, |layer| {
            let Ok(()) = self.draw_grid(color, layer, ctx);
        });
    }

    fn draw_grid<D: DrawTarget<Color = Rgba>>(
        &self,
        color: Rgba,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        let m = &ctx.mapper;
        let (spacing, ticks) = self.ticks(ctx);

        for value in ticks {
            // Slot axes already draw a line through the origin
            if !self.detached && is_zero(value, spacing) {
                continue;
            }

            let (from, to) = match self.orientation {
                Orientation::Horizontal => (m.map(value, m.bottom()), m.map(value, m.top())),
                Orientation::Vertical => (m.map(m.left(), value), m.map(m.right(), value)),
            };
            draw_segment(from, to, color, ctx, target)?;
        }

        Ok(())
    }

    /// Effective tick spacing and tick values within the visible range
    ///
    /// The spacing widens by factors of 10 until at most
    /// [`MAX_TICKS_PER_AXIS`] ticks are visible.
    fn ticks(&self, ctx: &RenderContext) -> (f64, Vec<f64>) {
        let Some(mut spacing) = self.tick_spacing else {
            return (0.0, Vec::new());
        };

        let m = &ctx.mapper;
        let (low, high) = match self.orientation {
            Orientation::Horizontal => (m.left(), m.right()),
            Orientation::Vertical => (m.bottom(), m.top()),
        };

        while (high - low) / spacing > MAX_TICKS_PER_AXIS as f64 {
            spacing *= 10.0;
        }

        let first = (low / spacing).ceil() as i64;
        let last = (high / spacing).floor() as i64;
        let values = (first..=last).map(|k| k as f64 * spacing).collect();

        (spacing, values)
    }

    /// Pixel position of the tick for `value`
    fn tick_anchor(&self, value: f64, ctx: &RenderContext) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => ctx.mapper.map(value, self.offset),
            Orientation::Vertical => ctx.mapper.map(self.offset, value),
        }
    }

    fn draw_ticks<D: DrawTarget<Color = Rgba>>(
        &self,
        color: Rgba,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        let half = (TICK_HALF_LENGTH_PX * ctx.scale as i32) as f64;
        let (_, ticks) = self.ticks(ctx);

        for value in ticks {
            let (x, y) = self.tick_anchor(value, ctx);
            let (from, to) = match self.orientation {
                Orientation::Horizontal => ((x, y - half), (x, y + half)),
                Orientation::Vertical => ((x - half, y), (x + half, y)),
            };
            draw_segment(from, to, color, ctx, target)?;
        }

        Ok(())
    }

    fn draw_labels<D: DrawTarget<Color = Rgba>>(
        &self,
        color: Rgba,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        let (spacing, ticks) = self.ticks(ctx);
        let precision = label_precision(spacing);
        let font = if ctx.scale >= 2 { &FONT_10X20 } else { &FONT_6X10 };
        let character_style = MonoTextStyle::new(font, color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.label_position.alignment())
            .baseline(self.label_position.baseline())
            .build();

        let distance = (TICK_HALF_LENGTH_PX + LABEL_OFFSET_PX) * ctx.scale as i32;
        let (dx, dy) = self.label_position.direction();

        for value in ticks {
            // Both default axes cross at the origin; a label there would overlap
            if !self.detached && is_zero(value, spacing) {
                continue;
            }

            let (x, y) = self.tick_anchor(value, ctx);
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }

            let position = Point::new(
                x.round() as i32 + dx * distance,
                y.round() as i32 - dy * distance,
            );
            let Some(label) = format_label(value, precision) else {
                continue;
            };
            Text::with_text_style(label.as_str(), position, character_style, text_style)
                .draw(target)?;
        }

        Ok(())
    }
}

impl PlotElement for Axis {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn reload_bounds(&mut self) {
        // Axes span whatever is visible and never widen the plot
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn draw<D: DrawTarget<Color = Rgba>>(
        &self,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        let m = &ctx.mapper;

        if let Some(color) = self.style.stroke_color() {
            let (from, to) = match self.orientation {
                Orientation::Horizontal => {
                    (m.map(m.left(), self.offset), m.map(m.right(), self.offset))
                }
                Orientation::Vertical => {
                    (m.map(self.offset, m.bottom()), m.map(self.offset, m.top()))
                }
            };
            draw_segment(from, to, color, ctx, target)?;
            self.draw_ticks(color, target, ctx)?;
        }

        if let Some(color) = self.style.resolve(self.label_color) {
            self.draw_labels(color, target, ctx)?;
        }

        Ok(())
    }
}

fn is_zero(value: f64, spacing: f64) -> bool {
    value.abs() < spacing * 1e-9
}

/// Fewest decimals that print every multiple of `spacing` exactly
fn label_precision(spacing: f64) -> usize {
    (0..=MAX_LABEL_PRECISION)
        .find(|&precision| {
            let scaled = spacing * 10f64.powi(precision as i32);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0)
        })
        .unwrap_or(MAX_LABEL_PRECISION)
}

/// Format a tick value into a fixed-capacity string
///
/// Values whose fixed notation does not fit fall back to exponent notation.
/// Returns `None` only if neither form fits.
fn format_label(value: f64, precision: usize) -> Option<String<MAX_AXIS_LABEL_LENGTH>> {
    // Avoid printing "-0" for values that round to zero
    let value = if value.abs() < 0.5 * 10f64.powi(-(precision as i32)) {
        0.0
    } else {
        value
    };

    let mut s = String::new();
    if core::fmt::write(&mut s, format_args!("{:.*}", precision, value)).is_ok() {
        return Some(s);
    }

    s.clear();
    core::fmt::write(&mut s, format_args!("{:.*e}", precision, value)).ok()?;
    Some(s)
}
