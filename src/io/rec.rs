// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! TextureAdd texture record (`.rec`) builder and writer

use super::writer::write_atomic;
use crate::error::{ExportError, Result};
use crate::geometry::{FaceUvSet, Mesh, PixelRect, UvPoint, DEFAULT_IMAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const REC_HEADER_HEAD: &str = concat!(
    "#TextureAdd Texture Records File\n",
    "\n",
    "If you edit these by hand here is the texture format to follow...\n",
    "\n",
    "[Texture#]\n",
    "X(0 - 255)\n",
    "Y(0 - 255)\n",
    "Width(1 - 256)\n",
    "Height(1 - 256)\n",
    "FlipX(-1 or 0)\n",
    "FlipY(-1 or 0)\n",
    "Page(1 and up)\n",
    "\n",
    "If you edit the textures by hand make sure the amount of textures is correct...\n",
    "[Amount_Of_Textures]\n",
);

const REC_HEADER_TAIL: &str = concat!(
    "\n",
    "\n",
    "You can edit the textures starting from [Texture2], don't edit or remove [Texture1], ",
    "you can remove textures by deleting the texture block, and changing the amount of ",
    "textures up top to the correct value...",
);

/// One rectangular region of a texture page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRecord {
    /// 1-based position in the file, assigned by [`Rec::append`]
    pub index: usize,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub flip_x: i8,
    pub flip_y: i8,
    pub page: u32,
}

impl TextureRecord {
    /// Record with both flip flags set and page 1
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            index: 0,
            x,
            y,
            width,
            height,
            flip_x: -1,
            flip_y: -1,
            page: 1,
        }
    }

    pub fn from_rect(rect: PixelRect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }

    /// Placeholder the toolchain reserves as `[Texture1]`
    pub fn sentinel() -> Self {
        Self::new(0, 0, 1, 1).with_flips(0, 0)
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_flips(mut self, flip_x: i8, flip_y: i8) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }
}

impl fmt::Display for TextureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n[Texture{}]\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            self.index, self.x, self.y, self.width, self.height, self.flip_x, self.flip_y, self.page
        )
    }
}

/// Derive the texture record covering a face's UVs.
///
/// `points` must already use a top-left origin.
pub fn build_record(points: &[UvPoint], image_size: u32, page: u32) -> Result<TextureRecord> {
    let rect = PixelRect::from_uvs(points, image_size)?;
    if rect.is_degenerate() {
        return Err(ExportError::DegenerateFace {
            face: None,
            width: rect.width,
            height: rect.height,
        });
    }
    Ok(TextureRecord::from_rect(rect).with_page(page))
}

/// Ordered collection of texture records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rec {
    records: Vec<TextureRecord>,
}

impl Rec {
    /// New container holding only the sentinel record
    pub fn new() -> Self {
        let mut rec = Self {
            records: Vec::new(),
        };
        rec.append(TextureRecord::sentinel());
        rec
    }

    /// Append a record, assigning the next index; returns that index
    pub fn append(&mut self, mut record: TextureRecord) -> usize {
        record.index = self.records.len() + 1;
        self.records.push(record);
        record.index
    }

    /// Record count, sentinel included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: the sentinel is never removed
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TextureRecord] {
        &self.records
    }

    /// Render the complete `.rec` file
    pub fn serialize(&self) -> String {
        let capacity = REC_HEADER_HEAD.len() + REC_HEADER_TAIL.len() + self.len() * 32;
        let mut out = String::with_capacity(capacity);
        out.push_str(REC_HEADER_HEAD);
        out.push_str(&self.len().to_string());
        out.push_str(REC_HEADER_TAIL);
        for record in &self.records {
            out.push_str(&record.to_string());
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.serialize())?;
        Ok(())
    }
}

impl Default for Rec {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for building texture records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecOptions {
    pub image_size: u32,
    pub page: u32,
}

impl Default for RecOptions {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            page: 1,
        }
    }
}

/// Build one texture record per polygon of `mesh`
pub fn export(mesh: &Mesh, options: &RecOptions) -> Result<Rec> {
    export_with_progress(mesh, options, |_| {})
}

/// Like [`export`], calling `on_face` after each polygon is processed
pub fn export_with_progress(
    mesh: &Mesh,
    options: &RecOptions,
    mut on_face: impl FnMut(usize),
) -> Result<Rec> {
    let layer = mesh.ensure_uvs()?;
    mesh.ensure_no_ngons()?;

    tracing::info!(
        "building texture records for \"{}\" ({} faces)",
        mesh.name,
        mesh.polygon_count()
    );

    let mut rec = Rec::new();
    for face in 0..mesh.polygon_count() {
        let uvs = FaceUvSet::from_slice(mesh.face_uvs(layer, face))?.flipped();
        let record = build_record(&uvs, options.image_size, options.page)
            .map_err(|e| e.at_face(face))?;
        let index = rec.append(record);
        tracing::debug!(
            "face {} -> [Texture{}] {}x{} at ({}, {})",
            face,
            index,
            record.width,
            record.height,
            record.x,
            record.y
        );
        on_face(face);
    }

    Ok(rec)
}
