// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - UV classification and mesh representation

mod bbox;
mod classification;
mod mesh;
mod uv;

pub use bbox::PixelRect;
pub use classification::{
    classify, is_clockwise, Classification, Flip, ShapeType, DEFAULT_IMAGE_SIZE, MAX_IMAGE_SIZE,
};
pub use mesh::{Mesh, Polygon, Scene, UvLayer};
pub use uv::{flip_v, FaceUvSet, PixelPoint, UvPoint};
