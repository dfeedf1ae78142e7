//! Straight line segment between two user-space points

use embedded_graphics::prelude::*;

use crate::bounds::{Bounds, DataPoint};
use crate::color::{ElementStyle, Rgba};

use super::{PlotElement, RenderContext, draw_segment};

/// A single straight segment
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    start: DataPoint,
    end: DataPoint,
    style: ElementStyle,
    bounds: Bounds,
}

impl Line {
    /// Create a segment from `start` to `end`
    pub fn new(start: impl Into<DataPoint>, end: impl Into<DataPoint>) -> Self {
        let mut line = Self {
            start: start.into(),
            end: end.into(),
            style: ElementStyle::default(),
            bounds: Bounds::EMPTY,
        };
        line.reload_bounds();
        line
    }

    /// Set the visual style
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Start point
    pub fn start(&self) -> DataPoint {
        self.start
    }

    /// End point
    pub fn end(&self) -> DataPoint {
        self.end
    }
}

impl PlotElement for Line {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn reload_bounds(&mut self) {
        self.bounds = Bounds::EMPTY
            .update_point(self.start)
            .update_point(self.end);
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn draw<D: DrawTarget<Color = Rgba>>(
        &self,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        let Some(color) = self.resolved_color(self.style.color) else {
            return Ok(());
        };

        draw_segment(
            ctx.mapper.map_data(self.start),
            ctx.mapper.map_data(self.end),
            color,
            ctx,
            target,
        )
    }
}
