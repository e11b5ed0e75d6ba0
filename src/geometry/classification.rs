// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! UV face classification
//!
//! Works out, from the UV corners of a quad or right triangle, whether the
//! mapping is mirrored, which corner of the texture rectangle a triangle
//! covers and how many 90° clockwise steps bring the first corner of the
//! face to the canonical position. The `.rec` and `.mqo` writers both go
//! through [`canonical_corners`], so the two files always agree.

use super::uv::{PixelPoint, UvPoint};
use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};

/// Texture page size the toolchain works with
pub const DEFAULT_IMAGE_SIZE: u32 = 256;

/// Largest texture page size accepted by the exporters
pub const MAX_IMAGE_SIZE: u32 = 65_536;

/// Texture mirroring, as seen from the UV winding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flip {
    Normal,
    Mirrored,
}

impl Flip {
    /// `1` for normal, `-1` for mirrored
    pub fn sign(self) -> i64 {
        match self {
            Flip::Normal => 1,
            Flip::Mirrored => -1,
        }
    }

    fn from_winding(clockwise: bool) -> Self {
        if clockwise {
            Flip::Normal
        } else {
            Flip::Mirrored
        }
    }
}

/// Which part of the texture rectangle a face covers.
///
/// Triangles are named after the rectangle corner holding their right angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Quad,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl ShapeType {
    /// Numeric code used in StrPix material names
    pub fn code(self) -> u8 {
        match self {
            ShapeType::Quad | ShapeType::TopLeft => 0,
            ShapeType::TopRight => 2,
            ShapeType::BottomRight => 4,
            ShapeType::BottomLeft => 6,
        }
    }
}

/// Result of classifying one UV face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub flip: Flip,
    pub shape: ShapeType,
    /// Number of 90° clockwise rotations, `0..=3`
    pub rotation: u8,
}

impl Classification {
    pub fn new(flip: Flip, shape: ShapeType, rotation: u8) -> Self {
        Self {
            flip,
            shape,
            rotation,
        }
    }

    /// StrPix material name for the face at `face_index`: `<±(index+1)>_<code>_0`
    pub fn material_name(&self, face_index: usize) -> String {
        format!(
            "{}_{}_0",
            self.flip.sign() * (face_index as i64 + 1),
            self.shape.code()
        )
    }
}

/// Sorted corner roles, shared by classification and bounding boxes.
///
/// Quad roles follow the sorted frame: `p1` bottom-left, `p2` bottom-right,
/// `p3` top-right, `p4` top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CornerLayout {
    Quad {
        p1: PixelPoint,
        p2: PixelPoint,
        p3: PixelPoint,
        p4: PixelPoint,
    },
    /// Two corners share the minimum x: the right angle is on the left edge
    LeftPair {
        p1: PixelPoint,
        p4: PixelPoint,
        p: PixelPoint,
    },
    /// A single leftmost corner: the right angle is on the right edge
    RightPair {
        p: PixelPoint,
        p2: PixelPoint,
        p3: PixelPoint,
    },
}

/// Discretized corners of a face in canonical input order
#[derive(Debug, Clone)]
pub(crate) struct CanonicalCorners {
    /// First corner after reindexing, before sorting
    pub first: PixelPoint,
    /// All corners after reindexing, before sorting
    pub unsorted: Vec<PixelPoint>,
    pub layout: CornerLayout,
}

/// Reindex, discretize and sort the corners of a face.
///
/// Quads are reindexed `[c0, c3, c2, c1]` and triangles `[c0, c2, c1]`
/// before anything else happens. Existing `.rec`/`.mqo` consumers depend on
/// this order.
pub(crate) fn canonical_corners(points: &[UvPoint], image_size: u32) -> Result<CanonicalCorners> {
    let reordered = match points {
        [c0, c1, c2, c3] => vec![c0, c3, c2, c1],
        [c0, c1, c2] => vec![c0, c2, c1],
        _ => return Err(ExportError::Shape(points.len())),
    };

    let unsorted: Vec<PixelPoint> = reordered
        .into_iter()
        .map(|uv| PixelPoint::from_uv(uv, image_size))
        .collect();
    let first = unsorted[0];

    let mut sorted = unsorted.clone();
    sorted.sort();

    let layout = match sorted[..] {
        [a, b, c, d] => CornerLayout::Quad {
            p1: a,
            p4: b,
            p2: c,
            p3: d,
        },
        [a, b, c] if a.x == b.x => CornerLayout::LeftPair { p1: a, p4: b, p: c },
        [a, b, c] => CornerLayout::RightPair { p: a, p2: b, p3: c },
        _ => return Err(ExportError::Shape(sorted.len())),
    };

    Ok(CanonicalCorners {
        first,
        unsorted,
        layout,
    })
}

/// Winding test under a y-down, x-right image convention.
///
/// Sums `(x2 - x1) * (y2 + y1)` over the closed polygon; a positive sum is
/// clockwise. Accumulates in `i128` so large pages cannot overflow.
pub fn is_clockwise(points: &[PixelPoint]) -> bool {
    let n = points.len();
    let sum: i128 = (0..n)
        .map(|i| {
            let v1 = points[i];
            let v2 = points[(i + 1) % n];
            let dx = i128::from(v2.x) - i128::from(v1.x);
            let sy = i128::from(v2.y) + i128::from(v1.y);
            dx.saturating_mul(sy)
        })
        .fold(0i128, |acc, term| acc.saturating_add(term));
    sum > 0
}

/// Classify the UV corners of a quad or right triangle
pub fn classify(points: &[UvPoint], image_size: u32) -> Result<Classification> {
    let corners = canonical_corners(points, image_size)?;
    let flip = Flip::from_winding(is_clockwise(&corners.unsorted));
    let first = corners.first;
    let mirrored = flip == Flip::Mirrored;

    let classification = match corners.layout {
        CornerLayout::Quad { p1, p2, p3, p4 } => {
            // p3 has no branch when mirrored and p1/p4 share a value; the
            // downstream formats expect exactly this table.
            let rotation = if !mirrored {
                if first == p1 {
                    1
                } else if first == p3 {
                    3
                } else if first == p2 {
                    2
                } else {
                    0
                }
            } else if first == p1 {
                3
            } else if first == p2 {
                1
            } else if first == p4 {
                3
            } else {
                0
            };
            Classification::new(flip, ShapeType::Quad, rotation)
        }
        CornerLayout::LeftPair { p4, p, .. } => {
            let shape = if mirrored {
                ShapeType::BottomRight
            } else {
                ShapeType::BottomLeft
            };
            let rotation = triangle_rotation(first, p4, p, mirrored);
            Classification::new(flip, shape, rotation)
        }
        CornerLayout::RightPair { p, p2, .. } => {
            let shape = if mirrored {
                ShapeType::TopLeft
            } else {
                ShapeType::TopRight
            };
            let rotation = triangle_rotation(first, p2, p, mirrored);
            Classification::new(flip, shape, rotation)
        }
    };

    Ok(classification)
}

/// Rotation lookup shared by both triangle layouts: `paired` is the second
/// corner of the shared edge, `opposite` the corner across from it.
fn triangle_rotation(
    first: PixelPoint,
    paired: PixelPoint,
    opposite: PixelPoint,
    mirrored: bool,
) -> u8 {
    if first == paired {
        if mirrored {
            1
        } else {
            2
        }
    } else if first == opposite {
        if mirrored {
            2
        } else {
            1
        }
    } else {
        0
    }
}
