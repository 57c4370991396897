//! Plain-text point files.
//!
//! One point per line as whitespace-separated `x y`; extra columns are
//! ignored and lines that do not start with two numbers (comments included)
//! are skipped.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use nalgebra::Point2;
use point_grid::{to_fixed, FixedPoint, GridFinderParams};

#[derive(thiserror::Error, Debug)]
pub enum PointFileError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn parse_line(line: &str) -> Option<(f64, f64)> {
    let mut tokens = line.split_whitespace();
    let x: f64 = tokens.next()?.parse().ok()?;
    let y: f64 = tokens.next()?.parse().ok()?;
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

pub fn parse_points(text: &str) -> Vec<FixedPoint> {
    text.lines()
        .filter_map(parse_line)
        .map(|(x, y)| to_fixed(x, y))
        .collect()
}

pub fn read_points(path: &Path) -> Result<Vec<FixedPoint>, PointFileError> {
    let text = fs::read_to_string(path)?;
    Ok(parse_points(&text))
}

/// Load finder parameters from JSON. Missing fields keep their defaults.
pub fn load_params(path: &Path) -> Result<GridFinderParams, PointFileError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Write `# x y` followed by one `x y` line per point.
pub fn write_points<W: Write>(out: &mut W, points: &[Point2<f64>]) -> io::Result<()> {
    writeln!(out, "# x y")?;
    for p in points {
        writeln!(out, "{:.6} {:.6}", p.x, p.y)?;
    }
    Ok(())
}
