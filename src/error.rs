// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export error types

use thiserror::Error;

/// Errors raised while classifying UVs or exporting a mesh.
///
/// All of these abort the current export. They describe problems with the
/// input data (re-unwrap, re-triangulate, select something) rather than
/// transient failures, so nothing is retried.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing selected to export
    #[error("no active object to export")]
    NoActiveTarget,

    /// A polygon with more than four corners was found
    #[error(
        "object \"{object}\" contains ngons (face {face} has {sides} vertices); \
         convert to quads/triangles and unwrap the mesh again"
    )]
    UnsupportedGeometry {
        object: String,
        face: usize,
        sides: usize,
    },

    /// The mesh has no usable UV layer
    #[error("object \"{object}\" has no UV data: {reason}")]
    MissingUvData { object: String, reason: &'static str },

    /// A UV face whose bounding box collapses to zero pixels
    #[error(
        "degenerate UV face{}: bounding box is {width}x{height} pixels",
        .face.map(|f| format!(" {}", f)).unwrap_or_default()
    )]
    DegenerateFace {
        face: Option<usize>,
        width: i64,
        height: i64,
    },

    /// The classifier only understands triangles and quads
    #[error("UV face must have 3 or 4 corners, got {0}")]
    Shape(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Attach the face index to a face-level error raised by a helper that
    /// only saw the UV corners.
    pub(crate) fn at_face(self, face: usize) -> Self {
        match self {
            ExportError::DegenerateFace { width, height, .. } => ExportError::DegenerateFace {
                face: Some(face),
                width,
                height,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_message_includes_face() {
        let err = ExportError::DegenerateFace {
            face: None,
            width: 0,
            height: 12,
        };
        assert_eq!(
            err.to_string(),
            "degenerate UV face: bounding box is 0x12 pixels"
        );

        let err = err.at_face(7);
        assert_eq!(
            err.to_string(),
            "degenerate UV face 7: bounding box is 0x12 pixels"
        );
    }

    #[test]
    fn test_at_face_leaves_other_errors_alone() {
        let err = ExportError::Shape(5).at_face(3);
        assert!(matches!(err, ExportError::Shape(5)));
    }
}
