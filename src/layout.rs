//! Hexagonal column layout.
//!
//! Turns a rectangular row/column count into the ground-plane positions of a tightly
//! packed field of hexagonal columns with a diameter of one world unit.
//!
//! Rows advance along x by [`ROW_SPACING`], columns inside a row advance along z by
//! [`COLUMN_SPACING`] (√3/2) and every even row is pushed by [`EVEN_ROW_OFFSET`]
//! along z. Only even rows are shifted, which leaves the field's boundary ragged on
//! one side. That matches the reference look and is kept on purpose.

use crate::errors::{Error, Result};

/// Distance between two neighbouring rows along x.
pub const ROW_SPACING: f32 = 0.75;
/// Distance between two neighbouring columns of a row along z (√3/2).
pub const COLUMN_SPACING: f32 = 0.866_025_4;
/// Extra z offset applied to even rows.
pub const EVEN_ROW_OFFSET: f32 = 0.5;
/// Largest field a layout may describe. Every point becomes its own mesh.
pub const MAX_POINTS: usize = 1 << 24;

/// A column's footprint position on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPoint {
    pub x: f32,
    pub z: f32,
}

impl LayoutPoint {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

impl From<(f32, f32)> for LayoutPoint {
    fn from((x, z): (f32, f32)) -> Self {
        Self { x, z }
    }
}

impl From<LayoutPoint> for cgmath::Vector2<f32> {
    fn from(point: LayoutPoint) -> Self {
        cgmath::Vector2::new(point.x, point.z)
    }
}

/// Lay out `row_count * columns_per_row` column positions in row-major order.
///
/// Returns [`Error::InvalidArgument`] if either count is negative or the field would
/// hold more than [`MAX_POINTS`] points.
pub fn generate_layout(
    row_count: i32,
    columns_per_row: i32,
    origin_x: f32,
    origin_z: f32,
) -> Result<Vec<LayoutPoint>> {
    if row_count < 0 || columns_per_row < 0 {
        return Err(Error::InvalidArgument(format!(
            "layout counts must be non-negative, got {} rows and {} columns per row",
            row_count, columns_per_row
        )));
    }

    let count = (row_count as usize)
        .checked_mul(columns_per_row as usize)
        .filter(|&count| count <= MAX_POINTS)
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{} rows of {} columns exceed the {} point limit",
                row_count, columns_per_row, MAX_POINTS
            ))
        })?;

    let mut points = Vec::with_capacity(count);
    for i in 0..row_count {
        let x = origin_x + i as f32 * ROW_SPACING;
        let z_offset = if i % 2 == 0 {
            origin_z + EVEN_ROW_OFFSET
        } else {
            origin_z
        };
        points.extend((0..columns_per_row).map(|j| LayoutPoint {
            x,
            z: z_offset + j as f32 * COLUMN_SPACING,
        }));
    }
    Ok(points)
}
