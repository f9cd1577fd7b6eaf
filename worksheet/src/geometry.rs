//! Planar geometry over parcel boundaries.

use geo::{
    geometry::{Coord, Line, MultiLineString, MultiPolygon},
    BoundingRect, EuclideanLength, Intersects,
};

/// Maximum piece length, in feet, used when measuring contour length
/// inside a parcel.
pub const MAX_PIECE_FT: f64 = 2.0;

/// Returns the length of `lines` that falls inside `boundary`.
///
/// Each segment is cut into pieces no longer than `max_piece`, and a
/// piece counts when its midpoint touches the boundary or its
/// interior. This tolerates contours that run along, or stop exactly
/// on, the parcel line.
pub fn length_inside(
    boundary: &MultiPolygon<f64>,
    lines: &MultiLineString<f64>,
    max_piece: f64,
) -> f64 {
    lines
        .iter()
        .flat_map(|line_string| line_string.lines())
        .map(|line| line_length_inside(boundary, line, max_piece))
        .sum()
}

fn line_length_inside(boundary: &MultiPolygon<f64>, line: Line<f64>, max_piece: f64) -> f64 {
    let length = line.euclidean_length();
    if length == 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pieces = (length / max_piece).ceil().max(1.0) as usize;
    #[allow(clippy::cast_precision_loss)]
    let piece_len = length / pieces as f64;
    let delta = line.delta();
    let inside = midpoints(pieces)
        .filter(|t| {
            let mid = Coord {
                x: line.start.x + delta.x * t,
                y: line.start.y + delta.y * t,
            };
            boundary.intersects(&mid)
        })
        .count();
    #[allow(clippy::cast_precision_loss)]
    let inside = inside as f64;
    inside * piece_len
}

/// Returns the grid of cell centres covering `boundary`'s bounding
/// box that fall inside `boundary`.
///
/// The grid has `max(2, floor(sqrt(samples)))` cells per side.
pub fn sample_grid(boundary: &MultiPolygon<f64>, samples: usize) -> Vec<Coord<f64>> {
    let Some(bbox) = boundary.bounding_rect() else {
        return Vec::new();
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let per_side = ((samples as f64).sqrt().floor() as usize).max(2);
    let (min, width, height) = (bbox.min(), bbox.width(), bbox.height());
    let mut points = Vec::new();
    for fx in midpoints(per_side) {
        for fy in midpoints(per_side) {
            let coord = Coord {
                x: min.x + fx * width,
                y: min.y + fy * height,
            };
            if boundary.intersects(&coord) {
                points.push(coord);
            }
        }
    }
    points
}

/// Yields the centres of `n` equal cells of the unit interval.
fn midpoints(n: usize) -> impl Iterator<Item = f64> {
    #[allow(clippy::cast_precision_loss)]
    let step = 1.0 / n as f64;
    (0..n).map(move |i| {
        #[allow(clippy::cast_precision_loss)]
        let i = i as f64;
        (i + 0.5) * step
    })
}
