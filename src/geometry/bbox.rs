// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pixel-space bounding boxes of UV faces

use super::classification::{canonical_corners, CornerLayout};
use super::uv::{PixelPoint, UvPoint};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in texture pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn at(origin: PixelPoint, width: i64, height: i64) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// Minimal rectangle around the UV corners of a quad or right triangle
    pub fn from_uvs(points: &[UvPoint], image_size: u32) -> Result<Self> {
        let corners = canonical_corners(points, image_size)?;
        Ok(Self::from_layout(&corners.layout))
    }

    pub(crate) fn from_layout(layout: &CornerLayout) -> Self {
        match *layout {
            CornerLayout::Quad { p1, p2, p4, .. } => Self::at(p1, p2.x - p1.x, p4.y - p1.y),
            CornerLayout::LeftPair { p1, p4, p } => Self::at(p1, p.x - p1.x, p4.y - p1.y),
            CornerLayout::RightPair { p, p2, p3 } => {
                let origin = if p.y == p2.y {
                    p
                } else {
                    PixelPoint::new(p.x, p2.y)
                };
                Self::at(origin, p3.x - p.x, p3.y - p2.y)
            }
        }
    }

    /// True when either side is shorter than one pixel
    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }

    pub fn area(&self) -> i64 {
        self.width * self.height
    }
}
