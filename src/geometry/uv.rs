// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! UV coordinates and their pixel discretization

use crate::error::{ExportError, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Normalized texture coordinate, one per face corner
pub type UvPoint = Point2<f64>;

/// Convert between bottom-left and top-left origin conventions (`v' = 1 - v`)
pub fn flip_v(uv: &UvPoint) -> UvPoint {
    UvPoint::new(uv.x, 1.0 - uv.y)
}

/// UV point scaled to image pixels and rounded.
///
/// Ordering is lexicographic on `(x, y)`, which is the sort order the
/// classifier relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Discretize a UV point at the given image size.
    ///
    /// Halves round to even so that corner identity matches the records
    /// already produced by the existing toolchain.
    pub fn from_uv(uv: &UvPoint, image_size: u32) -> Self {
        let size = f64::from(image_size);
        Self {
            x: (uv.x * size).round_ties_even() as i64,
            y: (uv.y * size).round_ties_even() as i64,
        }
    }
}

/// The UV corners of one face, in the mesh's winding order.
///
/// Always holds 3 or 4 points.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceUvSet(Vec<UvPoint>);

impl FaceUvSet {
    pub fn new(points: Vec<UvPoint>) -> Result<Self> {
        match points.len() {
            3 | 4 => Ok(Self(points)),
            n => Err(ExportError::Shape(n)),
        }
    }

    pub fn from_slice(points: &[UvPoint]) -> Result<Self> {
        Self::new(points.to_vec())
    }

    /// Copy of this set with every corner flipped vertically
    pub fn flipped(&self) -> Self {
        Self(self.0.iter().map(flip_v).collect())
    }

    pub fn is_quad(&self) -> bool {
        self.0.len() == 4
    }
}

impl Deref for FaceUvSet {
    type Target = [UvPoint];

    fn deref(&self) -> &[UvPoint] {
        &self.0
    }
}
