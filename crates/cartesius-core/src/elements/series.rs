//! Connected point series shared by function graphs and key-value graphs
//!
//! Consecutive points are joined with straight segments. With a fill color,
//! the area between each segment and the user-space `y = 0` baseline is filled
//! column by column before the segment's outline is drawn on top.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::bounds::{Bounds, DataPoint};
use crate::color::{ElementStyle, Rgba};

use super::{RenderContext, draw_segment};

/// Footprint of a point series
pub(super) fn series_bounds(points: &[DataPoint]) -> Bounds {
    points
        .iter()
        .copied()
        .fold(Bounds::EMPTY, Bounds::update_point)
}

/// Draw a series with linear interpolation and optional fill to the baseline
///
/// Segments with a non-finite endpoint are skipped, leaving a gap.
pub(super) fn draw_connected_series<D: DrawTarget<Color = Rgba>>(
    points: &[DataPoint],
    style: &ElementStyle,
    ctx: &RenderContext,
    target: &mut D,
) -> Result<(), D::Error> {
    if points.len() < 2 {
        return Ok(());
    }

    let stroke = style.stroke_color();
    let fill = style.fill();
    if stroke.is_none() && fill.is_none() {
        return Ok(());
    }

    let (_, baseline) = ctx.mapper.map(0.0, 0.0);

    for pair in points.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if !previous.is_finite() || !current.is_finite() {
            continue;
        }

        let from = ctx.mapper.map_data(previous);
        let to = ctx.mapper.map_data(current);

        if let Some(fill) = fill {
            fill_to_baseline(from, to, baseline, fill, target)?;
        }
        if let Some(stroke) = stroke {
            draw_segment(from, to, stroke, ctx, target)?;
        }
    }

    Ok(())
}

/// Fill the quadrilateral `(x0, baseline) (x0, y0) (x1, y1) (x1, baseline)`
///
/// Works one pixel column at a time, clamped to the image, so the cost is
/// bounded by the visible width regardless of how far the shape extends.
fn fill_to_baseline<D: DrawTarget<Color = Rgba>>(
    from: (f64, f64),
    to: (f64, f64),
    baseline: f64,
    color: Rgba,
    target: &mut D,
) -> Result<(), D::Error> {
    let (mut x0, mut y0) = from;
    let (mut x1, mut y1) = to;
    if x0 > x1 {
        core::mem::swap(&mut x0, &mut x1);
        core::mem::swap(&mut y0, &mut y1);
    }

    let area = target.bounding_box();
    let Some(bottom_right) = area.bottom_right() else {
        return Ok(());
    };

    let first = (x0.round() as i32).max(area.top_left.x);
    let last = (x1.round() as i32).min(bottom_right.x);
    let dx = x1 - x0;
    let row_min = (area.top_left.y - 1) as f64;
    let row_max = (bottom_right.y + 1) as f64;

    for x in first..=last {
        let t = if dx > 0.0 {
            ((x as f64 - x0) / dx).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let y_line = y0 + (y1 - y0) * t;

        let top = y_line.min(baseline).clamp(row_min, row_max).round() as i32;
        let bottom = y_line.max(baseline).clamp(row_min, row_max).round() as i32;
        let height = (bottom - top + 1) as u32;

        target.fill_solid(
            &Rectangle::new(Point::new(x, top), Size::new(1, height)),
            color,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BACKGROUND_COLOR;
    use crate::mapper::CoordinateMapper;
    use crate::raster::Raster;
    use embedded_graphics::pixelcolor::Rgb888;

    const RED: Rgba = Rgba::new(255, 0, 0, 255);

    fn ctx() -> RenderContext {
        let bounds = Bounds::new(0.0, 10.0, -5.0, 5.0)
            .unwrap()
            .with_image_size(100, 100);
        RenderContext::new(CoordinateMapper::new(&bounds).unwrap(), 1)
    }

    #[test]
    fn test_fill_reaches_baseline() {
        let mut image = Raster::new(100, 100, BACKGROUND_COLOR);
        fill_to_baseline((20.0, 20.0), (40.0, 20.0), 50.0, RED, &mut image).unwrap();

        assert_eq!(image.pixel(30, 20), Some(RED));
        assert_eq!(image.pixel(30, 35), Some(RED));
        assert_eq!(image.pixel(30, 50), Some(RED));
        assert_eq!(image.pixel(30, 60), Some(BACKGROUND_COLOR));
        assert_eq!(image.pixel(30, 10), Some(BACKGROUND_COLOR));
        assert_eq!(image.pixel(50, 30), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_fill_below_baseline_for_negative_values() {
        let mut image = Raster::new(100, 100, BACKGROUND_COLOR);
        fill_to_baseline((40.0, 80.0), (20.0, 80.0), 50.0, RED, &mut image).unwrap();

        assert_eq!(image.pixel(30, 65), Some(RED));
        assert_eq!(image.pixel(30, 40), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_fill_far_outside_is_clamped() {
        let mut image = Raster::new(100, 100, BACKGROUND_COLOR);
        fill_to_baseline((-1e9, -1e9), (1e9, -1e9), 50.0, RED, &mut image).unwrap();

        assert_eq!(image.pixel(0, 0), Some(RED));
        assert_eq!(image.pixel(99, 50), Some(RED));
        assert_eq!(image.pixel(50, 70), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_outline_drawn_over_fill() {
        let style = ElementStyle::stroke(Rgb888::new(0, 0, 0)).with_fill(Some(Rgb888::new(255, 0, 0)));
        let points = [DataPoint::new(2.0, 2.0), DataPoint::new(8.0, 2.0)];
        let mut image = Raster::new(100, 100, BACKGROUND_COLOR);

        draw_connected_series(&points, &style, &ctx(), &mut image).unwrap();

        // y = 2 maps to row 30, the baseline y = 0 to row 50
        assert_eq!(image.pixel(50, 30), Some(Rgba::new(0, 0, 0, 255)));
        assert_eq!(image.pixel(50, 40), Some(RED));
    }

    #[test]
    fn test_non_finite_segments_are_skipped() {
        let style = ElementStyle::default();
        let points = [
            DataPoint::new(1.0, 1.0),
            DataPoint::new(2.0, f64::NAN),
            DataPoint::new(3.0, 1.0),
        ];
        let mut image = Raster::new(100, 100, BACKGROUND_COLOR);

        draw_connected_series(&points, &style, &ctx(), &mut image).unwrap();
        assert!(image.pixels().iter().all(|p| *p == BACKGROUND_COLOR));
    }

    #[test]
    fn test_series_bounds() {
        let bounds = series_bounds(&[DataPoint::new(1.0, -2.0), DataPoint::new(-3.0, 4.0)]);
        assert_eq!(bounds.left(), Some(-3.0));
        assert_eq!(bounds.right(), Some(1.0));
        assert_eq!(bounds.bottom(), Some(-2.0));
        assert_eq!(bounds.top(), Some(4.0));
    }
}
