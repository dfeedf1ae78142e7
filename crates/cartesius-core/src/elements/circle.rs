//! Circle with optional fill
//!
//! The footprint and the drawn ellipse both use the full radius around the
//! center. After aspect correction one user unit has the same pixel length on
//! both axes, so the ellipse is a circle; with user-fixed bounds of a
//! different ratio it stretches with the axes.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Ellipse, PrimitiveStyleBuilder, Rectangle};

use crate::bounds::{Bounds, DataPoint};
use crate::color::{ElementStyle, Rgba};
use crate::constants::LARGE_SHAPE_FACTOR;
use crate::{CartesiusError, CartesiusResult};

use super::{PlotElement, RenderContext};

/// A circle in user space
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: DataPoint,
    radius: f64,
    style: ElementStyle,
    bounds: Bounds,
}

impl Circle {
    /// Create a circle; fails unless the center is finite and `radius > 0`
    pub fn new(x: f64, y: f64, radius: f64) -> CartesiusResult<Self> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(CartesiusError::precondition(format!(
                "circle center must be finite, got ({x}, {y})"
            )));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CartesiusError::precondition(format!(
                "circle radius must be positive, got {radius}"
            )));
        }

        let mut circle = Self {
            center: DataPoint::new(x, y),
            radius,
            style: ElementStyle::default(),
            bounds: Bounds::EMPTY,
        };
        circle.reload_bounds();
        Ok(circle)
    }

    /// Set the visual style
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Center point
    pub fn center(&self) -> DataPoint {
        self.center
    }

    /// Radius in user units
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Pixel extent `(left, top, right, bottom)` of the full-radius box
    fn pixel_extent(&self, ctx: &RenderContext) -> (f64, f64, f64, f64) {
        let (left, top) = ctx
            .mapper
            .map(self.center.x - self.radius, self.center.y + self.radius);
        let (right, bottom) = ctx
            .mapper
            .map(self.center.x + self.radius, self.center.y - self.radius);

        (left, top, right, bottom)
    }

    /// Pixel bounding box of the drawn ellipse
    ///
    /// Only meaningful for boxes near the image; larger ones are drawn row
    /// by row instead.
    fn pixel_box(&self, ctx: &RenderContext) -> Rectangle {
        let (left, top, right, bottom) = self.pixel_extent(ctx);

        let top_left = Point::new(left.round() as i32, top.round() as i32);
        let width = (right.round() - left.round()).max(1.0) as u32;
        let height = (bottom.round() - top.round()).max(1.0) as u32;

        Rectangle::new(top_left, Size::new(width, height))
    }
}

/// Fill and outline an ellipse one visible pixel row at a time
///
/// The work is bounded by the image height however large the ellipse is.
fn draw_rows<D: DrawTarget<Color = Rgba>>(
    (left, top, right, bottom): (f64, f64, f64, f64),
    stroke: Option<Rgba>,
    fill: Option<Rgba>,
    ctx: &RenderContext,
    target: &mut D,
) -> Result<(), D::Error> {
    let area = target.bounding_box();
    let Some(bottom_right) = area.bottom_right() else {
        return Ok(());
    };

    let center = ((left + right) / 2.0, (top + bottom) / 2.0);
    let outer = ((right - left) / 2.0, (bottom - top) / 2.0);
    let line = ctx.line_width() as f64;
    let inner = (outer.0 - line, outer.1 - line);

    let first_row = (top.floor() as i64).max(area.top_left.y as i64) as i32;
    let last_row = (bottom.ceil() as i64).min(bottom_right.y as i64) as i32;

    for y in first_row..=last_row {
        let Some((start, end)) = row_span(center, outer, y) else {
            continue;
        };

        let Some(stroke) = stroke else {
            if let Some(fill) = fill {
                fill_run(start, end, y, fill, target)?;
            }
            continue;
        };

        match row_span(center, inner, y) {
            Some((inner_start, inner_end)) => {
                fill_run(start, inner_start, y, stroke, target)?;
                if let Some(fill) = fill {
                    fill_run(inner_start, inner_end, y, fill, target)?;
                }
                fill_run(inner_end, end, y, stroke, target)?;
            }
            None => fill_run(start, end, y, stroke, target)?,
        }
    }

    Ok(())
}

/// Horizontal extent of an ellipse at the center of pixel row `y`
fn row_span((cx, cy): (f64, f64), (rx, ry): (f64, f64), y: i32) -> Option<(f64, f64)> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }

    let dy = (y as f64 + 0.5 - cy) / ry;
    if dy.abs() > 1.0 {
        return None;
    }

    let half = rx * (1.0 - dy * dy).sqrt();
    Some((cx - half, cx + half))
}

/// Fill the pixels of row `y` whose centers lie in `[start, end)`, clamped
/// to the target
fn fill_run<D: DrawTarget<Color = Rgba>>(
    start: f64,
    end: f64,
    y: i32,
    color: Rgba,
    target: &mut D,
) -> Result<(), D::Error> {
    let area = target.bounding_box();
    let Some(bottom_right) = area.bottom_right() else {
        return Ok(());
    };

    let low = (area.top_left.x - 1) as f64;
    let high = (bottom_right.x + 1) as f64;
    let first = (start - 0.5).ceil().clamp(low, high) as i32;
    let last = ((end - 0.5).ceil() - 1.0).clamp(low, high) as i32;
    if first > last {
        return Ok(());
    }

    target.fill_solid(
        &Rectangle::new(Point::new(first, y), Size::new((last - first + 1) as u32, 1)),
        color,
    )
}

impl PlotElement for Circle {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn reload_bounds(&mut self) {
        let DataPoint { x, y } = self.center;
        self.bounds = [
            DataPoint::new(x + self.radius, y),
            DataPoint::new(x - self.radius, y),
            DataPoint::new(x, y + self.radius),
            DataPoint::new(x, y - self.radius),
        ]
        .into_iter()
        .fold(Bounds::EMPTY, Bounds::update_point);
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn draw<D: DrawTarget<Color = Rgba>>(
        &self,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        let stroke = self.style.stroke_color();
        let fill = self.style.fill();
        if stroke.is_none() && fill.is_none() {
            return Ok(());
        }

        let extent = self.pixel_extent(ctx);
        let (left, top, right, bottom) = extent;
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return Ok(());
        }

        let (width, height) = ctx.mapper.image_size();
        let margin = ctx.clip_margin();
        if right < -margin || left > width + margin || bottom < -margin || top > height + margin {
            return Ok(());
        }

        if right - left > LARGE_SHAPE_FACTOR * (width + 2.0 * margin)
            || bottom - top > LARGE_SHAPE_FACTOR * (height + 2.0 * margin)
        {
            return draw_rows(extent, stroke, fill, ctx, target);
        }

        let area = self.pixel_box(ctx);
        let mut builder = PrimitiveStyleBuilder::new();
        if let Some(color) = stroke {
            builder = builder.stroke_color(color).stroke_width(ctx.line_width());
        }
        if let Some(color) = fill {
            builder = builder.fill_color(color);
        }

        Ellipse::new(area.top_left, area.size)
            .into_styled(builder.build())
            .draw(target)
    }
}
