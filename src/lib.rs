// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! TRLE texture export
//!
//! Classifies the UV mapping of quad and right-triangle faces and writes it
//! out as TextureAdd texture records (`.rec`) and StrPix-compatible
//! Metasequoia scenes (`.mqo`).

pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod geometry;
pub mod io;

pub use config::ExportConfig;
pub use error::{ExportError, Result};
pub use exporter::{ExportSummary, Exporter, FaceReport};
pub use geometry::{
    classify, is_clockwise, Classification, FaceUvSet, Flip, Mesh, Scene, ShapeType, UvPoint,
};
pub use io::{build_record, import_obj_file, MqoDocument, Rec, TextureRecord};

use std::path::Path;

/// Write the texture records of an OBJ file's first object to `output`
pub fn export_rec_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> anyhow::Result<ExportSummary> {
    let scene = import_obj_file(input)?;
    Ok(Exporter::new().export_rec(&scene, output.as_ref())?)
}

/// Write an OBJ file's first object as a Metasequoia scene to `output`
pub fn export_mqo_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> anyhow::Result<ExportSummary> {
    let scene = import_obj_file(input)?;
    Ok(Exporter::new().export_mqo(&scene, output.as_ref())?)
}
