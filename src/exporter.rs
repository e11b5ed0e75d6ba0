// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exporter API tying configuration, scene selection and writers together

use crate::config::ExportConfig;
use crate::error::Result;
use crate::geometry::{classify, Classification, Mesh, PixelRect, Scene};
use crate::io::{self, MqoDocument, Rec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub object: String,
    pub faces: usize,
    /// Texture records (.rec) or materials (.mqo) written
    pub entries: usize,
    pub path: PathBuf,
}

/// Classification of one face, as reported by `classify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceReport {
    pub face: usize,
    pub corners: usize,
    #[serde(flatten)]
    pub classification: Classification,
    pub flip_sign: i64,
    pub shape_code: u8,
    /// Top-left origin bounding box, as it would appear in the .rec file
    pub bounds: PixelRect,
}

/// Main entry point for exports
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    /// Create an exporter with default settings
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
        }
    }

    /// Create an exporter with a validated configuration
    pub fn with_config(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Mesh to export: the configured object, or the scene's active one
    pub fn target<'a>(&self, scene: &'a Scene) -> Result<&'a Mesh> {
        match &self.config.object {
            Some(name) => scene.find(name).ok_or(crate::error::ExportError::NoActiveTarget),
            None => scene.active_mesh(),
        }
    }

    /// Build texture records for the target mesh
    pub fn build_rec(&self, scene: &Scene, on_face: impl FnMut(usize)) -> Result<Rec> {
        let mesh = self.target(scene)?;
        io::rec::export_with_progress(mesh, &self.config.rec_options(), on_face)
    }

    /// Build the Metasequoia document for the target mesh, or for every
    /// object when `all_objects` is set
    pub fn build_mqo(&self, scene: &Scene, mut on_face: impl FnMut(usize)) -> Result<MqoDocument> {
        let mut document = MqoDocument::new(self.config.mqo_options());
        if self.config.all_objects {
            for mesh in &scene.objects {
                document.add_mesh_with_progress(mesh, &mut on_face)?;
            }
        } else {
            document.add_mesh_with_progress(self.target(scene)?, on_face)?;
        }
        Ok(document)
    }

    /// Faces an export will visit
    pub fn face_count(&self, scene: &Scene) -> usize {
        if self.config.all_objects {
            scene.objects.iter().map(Mesh::polygon_count).sum()
        } else {
            self.target(scene).map(Mesh::polygon_count).unwrap_or(0)
        }
    }

    /// Write the target mesh's texture records to `path`
    pub fn export_rec(&self, scene: &Scene, path: &Path) -> Result<ExportSummary> {
        self.export_rec_with_progress(scene, path, |_| {})
    }

    pub fn export_rec_with_progress(
        &self,
        scene: &Scene,
        path: &Path,
        on_face: impl FnMut(usize),
    ) -> Result<ExportSummary> {
        let mesh = self.target(scene)?;
        let rec = self.build_rec(scene, on_face)?;

        tracing::info!(".rec export: writing {}", path.display());
        rec.write(path)?;
        tracing::info!(".rec export: created {} ({} records)", path.display(), rec.len());

        Ok(ExportSummary {
            object: mesh.name.clone(),
            faces: mesh.polygon_count(),
            entries: rec.len(),
            path: path.to_path_buf(),
        })
    }

    /// Write the target mesh as a Metasequoia file to `path`
    pub fn export_mqo(&self, scene: &Scene, path: &Path) -> Result<ExportSummary> {
        self.export_mqo_with_progress(scene, path, |_| {})
    }

    pub fn export_mqo_with_progress(
        &self,
        scene: &Scene,
        path: &Path,
        on_face: impl FnMut(usize),
    ) -> Result<ExportSummary> {
        let document = self.build_mqo(scene, on_face)?;
        let object = if self.config.all_objects {
            let names: Vec<&str> = scene.objects.iter().map(|m| m.name.as_str()).collect();
            names.join(", ")
        } else {
            self.target(scene)?.name.clone()
        };

        tracing::info!(".mqo export: writing {}", path.display());
        document.write(path)?;
        tracing::info!(
            ".mqo export: created {} ({} objects)",
            path.display(),
            document.object_count()
        );

        Ok(ExportSummary {
            object,
            faces: document.face_count(),
            entries: document.material_count(),
            path: path.to_path_buf(),
        })
    }

    /// Classify every face of the target mesh without writing anything
    pub fn classify_faces(&self, scene: &Scene) -> Result<Vec<FaceReport>> {
        let mesh = self.target(scene)?;
        let layer = mesh.ensure_uvs()?;
        mesh.ensure_no_ngons()?;

        (0..mesh.polygon_count())
            .map(|face| {
                let uvs = mesh.face_uvs(layer, face);
                let classification = classify(uvs, self.config.image_size)?;
                let flipped: Vec<_> = uvs.iter().map(crate::geometry::flip_v).collect();
                let bounds = PixelRect::from_uvs(&flipped, self.config.image_size)?;
                Ok(FaceReport {
                    face,
                    corners: uvs.len(),
                    classification,
                    flip_sign: classification.flip.sign(),
                    shape_code: classification.shape.code(),
                    bounds,
                })
            })
            .collect()
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::geometry::{Flip, ShapeType};

    const TWO_OBJECTS: &str = "\
o Floor
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 0.25 0
vt 0.25 0.25
vt 0 0.25
f 1/1 2/2 3/3 4/4
o Ramp
v 0 0 1
v 1 0 1
v 0 1 1
vt 0.5 0.5
vt 0.75 0.5
vt 0.5 0.75
f 5/5 6/6 7/7
";

    #[test]
    fn test_target_defaults_to_active_object() {
        let scene = io::parse_obj(TWO_OBJECTS, "x").unwrap();
        let exporter = Exporter::new();
        assert_eq!(exporter.target(&scene).unwrap().name, "Floor");

        let exporter = Exporter::with_config(ExportConfig {
            object: Some("Ramp".to_string()),
            ..ExportConfig::default()
        })
        .unwrap();
        assert_eq!(exporter.target(&scene).unwrap().name, "Ramp");

        let exporter = Exporter::with_config(ExportConfig {
            object: Some("Ceiling".to_string()),
            ..ExportConfig::default()
        })
        .unwrap();
        assert!(matches!(exporter.target(&scene), Err(ExportError::NoActiveTarget)));
    }

    #[test]
    fn test_with_config_validates() {
        let config = ExportConfig {
            scale: 5000.0,
            ..ExportConfig::default()
        };
        assert!(matches!(Exporter::with_config(config), Err(ExportError::InvalidConfig(_))));
    }

    #[test]
    fn test_classify_faces() {
        let scene = io::parse_obj(TWO_OBJECTS, "x").unwrap();
        let exporter = Exporter::with_config(ExportConfig {
            object: Some("Ramp".to_string()),
            ..ExportConfig::default()
        })
        .unwrap();

        let reports = exporter.classify_faces(&scene).unwrap();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.corners, 3);
        assert_eq!(report.classification.flip, Flip::Normal);
        assert_eq!(report.classification.shape, ShapeType::BottomLeft);
        assert_eq!(report.classification.rotation, 0);
        assert_eq!(report.shape_code, 6);
        assert_eq!(report.bounds, PixelRect::new(128, 64, 64, 64));
    }

    #[test]
    fn test_with_config_rejects_oversized_pages() {
        let config = ExportConfig {
            image_size: 3_000_000_000,
            ..ExportConfig::default()
        };
        assert!(matches!(Exporter::with_config(config), Err(ExportError::InvalidConfig(_))));
    }

    #[test]
    fn test_mqo_all_objects_share_material_list() {
        let scene = io::parse_obj(TWO_OBJECTS, "x").unwrap();
        let exporter = Exporter::with_config(ExportConfig {
            all_objects: true,
            ..ExportConfig::default()
        })
        .unwrap();
        assert_eq!(exporter.face_count(&scene), 2);

        let mut seen = Vec::new();
        let document = exporter.build_mqo(&scene, |face| seen.push(face)).unwrap();
        assert_eq!(seen, vec![0, 0]);
        assert_eq!(document.object_count(), 2);
        assert_eq!(document.face_count(), 2);
        assert_eq!(document.material_count(), 2);

        let text = document.serialize();
        assert!(text.contains("Material  2 {\n\t\"1_0_0\""));
        assert!(text.contains("\n\t\"1_6_0\""));
        assert!(text.contains("Object \"Floor\" {"));
        assert!(text.contains("Object \"Ramp\" {"));
        assert!(text.contains("\t\t4 V(3 2 1 0) M(0) UV("));
        // The second object's materials follow the first object's
        assert!(text.contains("\t\t3 V(0 2 1) M(1) UV("));
    }

    #[test]
    fn test_build_rec_counts_progress() {
        let scene = io::parse_obj(TWO_OBJECTS, "x").unwrap();
        let mut seen = Vec::new();
        let rec = Exporter::new().build_rec(&scene, |face| seen.push(face)).unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(seen, vec![0]);
    }
}
