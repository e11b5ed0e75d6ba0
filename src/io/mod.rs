// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - importing meshes and writing .rec / .mqo files

pub mod mqo;
pub mod rec;
mod importer;
mod writer;

pub use importer::{import_obj_file, parse_obj, UV_LAYER_NAME};
pub use mqo::{export_face, transform_vertex, winding_order, MqoDocument, MqoOptions, SceneFace};
pub use rec::{build_record, Rec, RecOptions, TextureRecord};
