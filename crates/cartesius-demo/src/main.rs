//! Renders a gallery of cartesius plots to PNG files.
//!
//! Uses the `embedded-graphics-simulator` output image to encode PNGs, so no
//! window or SDL installation is needed.
//!
//! # Usage
//!
//! ```text
//! cartesius-demo [OUTPUT_DIR] [OPTIONS.toml]
//! ```
//!
//! `OPTIONS.toml` holds any subset of the render options:
//!
//! ```toml
//! axis_units_equal_length = true
//! hide_x_axis = false
//! hide_y_axis = false
//! antialiasing_factor = 2.0
//! ```

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use log::info;

use cartesius_core::constants::{DEFAULT_GRID_COLOR, DEFAULT_LABEL_COLOR};
use cartesius_core::{
    Axis, CartesiusResult, Circle, CoordinateSystem, ElementStyle, GraphFunction, KeyValueGraph,
    Line, Orientation, Raster, RenderOptions,
};

/// Where images go when no directory is given.
const DEFAULT_OUTPUT_DIR: &str = "target/cartesius-demo";

/// Size of every rendered image.
const IMAGE_WIDTH_PX: u32 = 640;
const IMAGE_HEIGHT_PX: u32 = 400;

/// Supersampling used unless an options file says otherwise.
const DEFAULT_ANTIALIASING: f64 = 2.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output_dir = PathBuf::from(
        args.next()
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
    );
    let options = match args.next() {
        Some(path) => load_options(Path::new(&path))?,
        None => RenderOptions::default().with_antialiasing(DEFAULT_ANTIALIASING),
    };
    info!("Render options: {:?}", options);

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let plots = gallery().map_err(|e| anyhow!("building gallery: {e}"))?;
    for (name, mut plot) in plots {
        let image = plot
            .render(IMAGE_WIDTH_PX, IMAGE_HEIGHT_PX, &options)
            .map_err(|e| anyhow!("rendering {name}: {e}"))?;

        let path = output_dir.join(format!("{name}.png"));
        save_png(&image, &path)?;
        info!("Wrote {} ({})", path.display(), plot.bounds());
    }

    Ok(())
}

/// Read render options from a TOML file
fn load_options(path: &Path) -> anyhow::Result<RenderOptions> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_options(&text).with_context(|| format!("parsing {}", path.display()))
}

fn parse_options(text: &str) -> anyhow::Result<RenderOptions> {
    let options: RenderOptions = toml::from_str(text)?;
    options.validate().map_err(|e| anyhow!("{e}"))?;
    Ok(options)
}

/// Every demo plot with its file name
fn gallery() -> CartesiusResult<Vec<(&'static str, CoordinateSystem)>> {
    Ok(vec![
        ("sine", sine()?),
        ("circles", circles()?),
        ("key_value", key_value()?),
        ("fixed_bounds", fixed_bounds()?),
    ])
}

/// Two periods of a filled sine wave under a labelled grid
fn sine() -> CartesiusResult<CoordinateSystem> {
    let mut plot = CoordinateSystem::new();

    plot.add(
        Axis::horizontal()
            .with_ticks(PI / 2.0)?
            .with_grid(DEFAULT_GRID_COLOR)
            .with_labels(DEFAULT_LABEL_COLOR),
    );
    plot.add(
        Axis::vertical()
            .with_ticks(0.5)?
            .with_grid(DEFAULT_GRID_COLOR)
            .with_labels(DEFAULT_LABEL_COLOR),
    );
    plot.add(
        GraphFunction::new(f64::sin, -2.0 * PI, 2.0 * PI, 0.02)?.with_style(
            ElementStyle::stroke(Rgb888::new(20, 60, 160))
                .with_fill(Some(Rgb888::new(90, 140, 230)))
                .with_transparency(160),
        ),
    );
    plot.add(
        GraphFunction::with_default_step(|x| 0.5 * (x / 2.0).cos(), -2.0 * PI, 2.0 * PI)?
            .with_style(ElementStyle::stroke(Rgb888::new(200, 40, 40))),
    );

    Ok(plot)
}

/// Overlapping translucent circles
fn circles() -> CartesiusResult<CoordinateSystem> {
    let mut plot = CoordinateSystem::new();

    let colors = [
        Rgb888::new(230, 60, 60),
        Rgb888::new(60, 180, 80),
        Rgb888::new(60, 90, 230),
    ];
    for (i, color) in colors.into_iter().enumerate() {
        let angle = i as f64 * 2.0 * PI / 3.0;
        plot.add(
            Circle::new(angle.cos(), angle.sin(), 1.5)?.with_style(
                ElementStyle::stroke(color)
                    .with_fill(Some(color))
                    .with_transparency(110),
            ),
        );
    }
    plot.add(Circle::new(0.0, 0.0, 3.0)?);

    Ok(plot)
}

/// Monthly values from an ordered map, in a fixed window
fn key_value() -> CartesiusResult<CoordinateSystem> {
    let rainfall: BTreeMap<u8, f64> = [
        (1, 78.0),
        (2, 61.0),
        (3, 55.0),
        (4, 42.0),
        (5, 38.0),
        (6, 24.0),
        (7, 12.0),
        (8, 18.0),
        (9, 35.0),
        (10, 64.0),
        (11, 88.0),
        (12, 92.0),
    ]
    .into();

    let mut plot = CoordinateSystem::with_extent(0.0, 13.0, -10.0, 100.0)?;
    plot.add(Axis::horizontal().with_labels(DEFAULT_LABEL_COLOR).with_ticks(1.0)?);
    plot.add(Axis::vertical().with_labels(DEFAULT_LABEL_COLOR).with_ticks(10.0)?);
    plot.add(
        KeyValueGraph::from_map(rainfall)?.with_style(
            ElementStyle::stroke(Rgb888::new(30, 110, 60)).with_fill(Some(Rgb888::new(150, 210, 160))),
        ),
    );

    Ok(plot)
}

/// User-fixed window with a detached axis
fn fixed_bounds() -> CartesiusResult<CoordinateSystem> {
    let mut plot = CoordinateSystem::with_extent(-1.0, 7.0, -1.0, 4.0)?;

    plot.add(Axis::detached(Orientation::Horizontal, 3.0)?.with_ticks(1.0)?);
    plot.add(Line::new((0.0, 0.0), (6.0, 3.0)));
    plot.add(
        Line::new((0.0, 3.0), (6.0, 0.0))
            .with_style(ElementStyle::stroke(Rgb888::new(200, 120, 0))),
    );
    // Partly outside the window
    plot.add(
        Circle::new(6.5, 3.5, 1.0)?
            .with_style(ElementStyle::default().with_fill(Some(Rgb888::new(250, 220, 80)))),
    );

    Ok(plot)
}

/// Encode an opaque raster as PNG
fn save_png(image: &Raster, path: &Path) -> anyhow::Result<()> {
    let (width, height) = image.size();
    let mut display = SimulatorDisplay::<Rgb888>::new(Size::new(width, height));

    let pixels = image
        .enumerate_pixels()
        .map(|(x, y, color)| Pixel(Point::new(x as i32, y as i32), color.to_rgb()));
    let Ok(()) = display.draw_iter(pixels);

    let output_settings = OutputSettingsBuilder::new().build();
    display
        .to_rgb_output_image(&output_settings)
        .save_png(path)
        .with_context(|| format!("writing {}", path.display()))
}
