//! Graph of a unary real function
//!
//! The function is sampled once at construction over `[start, end)` with a
//! fixed step; the samples, not the function, are what gets drawn.

use embedded_graphics::prelude::*;
use log::{debug, warn};

use crate::bounds::{Bounds, DataPoint};
use crate::color::{ElementStyle, Rgba};
use crate::constants::{DEFAULT_FUNCTION_STEP, MAX_FUNCTION_SAMPLES};
use crate::{CartesiusError, CartesiusResult};

use super::series::{draw_connected_series, series_bounds};
use super::{PlotElement, RenderContext};

/// A function sampled at `start + i * step`
#[derive(Debug, Clone, PartialEq)]
pub struct GraphFunction {
    start: f64,
    end: f64,
    step: f64,
    points: Vec<DataPoint>,
    style: ElementStyle,
    bounds: Bounds,
}

impl GraphFunction {
    /// Sample `function` over `[start, end)` every `step` units
    ///
    /// Takes `floor((end - start) / step)` samples. Fails unless
    /// `start < end`, `step > 0` and all three are finite.
    pub fn new<F>(function: F, start: f64, end: f64, step: f64) -> CartesiusResult<Self>
    where
        F: Fn(f64) -> f64,
    {
        if !(start.is_finite() && end.is_finite()) || start >= end {
            return Err(CartesiusError::precondition(format!(
                "function domain start ({start}) must be less than end ({end})"
            )));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(CartesiusError::precondition(format!(
                "function step must be positive, got {step}"
            )));
        }

        let count = ((end - start) / step).floor();
        if count > MAX_FUNCTION_SAMPLES as f64 {
            return Err(CartesiusError::precondition(format!(
                "sampling [{start}, {end}) every {step} would take {count} samples (max {MAX_FUNCTION_SAMPLES})"
            )));
        }

        let points: Vec<DataPoint> = (0..count as usize)
            .map(|i| {
                let x = start + i as f64 * step;
                DataPoint::new(x, function(x))
            })
            .collect();

        let skipped = points.iter().filter(|p| !p.is_finite()).count();
        if skipped > 0 {
            warn!(
                "{} of {} function samples are not finite and will be left out",
                skipped,
                points.len()
            );
        }
        debug!(
            "Sampled function over [{}, {}) into {} points",
            start,
            end,
            points.len()
        );

        let mut graph = Self {
            start,
            end,
            step,
            points,
            style: ElementStyle::default(),
            bounds: Bounds::EMPTY,
        };
        graph.reload_bounds();
        Ok(graph)
    }

    /// Sample with the default step of 0.1 user units
    pub fn with_default_step<F>(function: F, start: f64, end: f64) -> CartesiusResult<Self>
    where
        F: Fn(f64) -> f64,
    {
        Self::new(function, start, end, DEFAULT_FUNCTION_STEP)
    }

    /// Set the visual style
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Sampled points in increasing `x` order
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Sampled domain `(start, end)`
    pub fn domain(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Distance between samples
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl PlotElement for GraphFunction {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn reload_bounds(&mut self) {
        self.bounds = series_bounds(&self.points);
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn draw<D: DrawTarget<Color = Rgba>>(
        &self,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        draw_connected_series(&self.points, &self.style, ctx, target)
    }
}
