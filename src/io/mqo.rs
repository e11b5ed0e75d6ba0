// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Metasequoia (`.mqo`) exporter for StrPix

use super::writer::write_atomic;
use crate::error::{ExportError, Result};
use crate::geometry::{
    classify, flip_v, Classification, Mesh, Polygon, UvPoint, DEFAULT_IMAGE_SIZE,
};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MQO_PREAMBLE: &str = concat!(
    "Metasequoia Document\n",
    "Format Text Ver 1.0\n",
    "\n",
    "Scene {\n",
    "    pos 0.0000 0.0000 1500.0000\n",
    "    lookat 0.0000 0.0000 0.0000\n",
    "    head -0.5236\n",
    "    pich 0.5236\n",
    "    bank 0.0000\n",
    "    ortho 0\n",
    "    zoom2 5.0000\n",
    "    amb 0.250 0.250 0.250\n",
    "    dirlights 1 {\n",
    "        light {\n",
    "            dir 0.408 0.408 0.816\n",
    "            color 1.000 1.000 1.000\n",
    "        }\n",
    "    }\n",
    "}\n",
);

const OBJECT_SETTINGS: &str = concat!(
    "\tdepth 0\n",
    "\tfolding 0\n",
    "\tscale 1.0 1.0 1.0\n",
    "\trotation 1.0 1.0 1.0\n",
    "\ttranslation 1.0 1.0 1.0\n",
    "\tvisible 15\n",
    "\tlocking 0\n",
    "\tshading 1\n",
    "\tfacet 59.5\n",
    "\tcolor 0.898 0.498 0.698\n",
    "\tcolor_type 0\n",
);

const STRPIX_MATERIAL: &str =
    " col(1.000 1.000 1.000 1.000) dif(0.800) amb(0.600) emi(0.000) spc(0.000) power(5)";

pub const MIN_SCALE: f64 = 0.001;
pub const MAX_SCALE: f64 = 1000.0;

/// Parameters for the Metasequoia export
#[derive(Debug, Clone, PartialEq)]
pub struct MqoOptions {
    pub scale: f64,
    /// Texture file referenced by every material
    pub texture: Option<String>,
    /// Emit one StrPix material per face
    pub materials: bool,
    pub image_size: u32,
}

impl Default for MqoOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            texture: None,
            materials: true,
            image_size: DEFAULT_IMAGE_SIZE,
        }
    }
}

/// A face ready to be written, corners reordered for the swapped up-axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFace {
    pub vertex_indices: Vec<usize>,
    pub material_index: usize,
    pub uv_corners: Vec<UvPoint>,
    pub classification: Classification,
}

/// Corner order for an `n`-gon rotated `rotation` steps: reversed winding
/// starting at corner `-rotation`.
pub fn winding_order(n: usize, rotation: u8) -> Vec<usize> {
    let r = usize::from(rotation) % n;
    (0..n).map(|k| (2 * n - k - r) % n).collect()
}

/// Map Z-up coordinates to Y-up without mirroring: `(x, y, z) -> (x, z, -y)`
pub fn transform_vertex(position: &Point3<f64>, scale: f64) -> Point3<f64> {
    Point3::new(position.x * scale, position.z * scale, -position.y * scale)
}

/// Reorder a polygon's vertex indices and UV corners in lockstep.
///
/// With per-face materials the material index is the face index, otherwise
/// the polygon's own material.
pub fn export_face(
    face_index: usize,
    polygon: &Polygon,
    uvs: &[UvPoint],
    classification: Classification,
    per_face_materials: bool,
) -> SceneFace {
    let order = winding_order(polygon.loop_total(), classification.rotation);
    SceneFace {
        vertex_indices: order.iter().map(|&i| polygon.vertices[i]).collect(),
        material_index: if per_face_materials {
            face_index
        } else {
            polygon.material_index
        },
        uv_corners: order.iter().map(|&i| uvs[i]).collect(),
        classification,
    }
}

/// Metasequoia document under construction
#[derive(Debug, Clone)]
pub struct MqoDocument {
    options: MqoOptions,
    materials: Vec<String>,
    objects: Vec<String>,
    face_count: usize,
}

impl MqoDocument {
    pub fn new(options: MqoOptions) -> Self {
        Self {
            options,
            materials: Vec::new(),
            objects: Vec::new(),
            face_count: 0,
        }
    }

    pub fn options(&self) -> &MqoOptions {
        &self.options
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Add a mesh as an `Object` block
    pub fn add_mesh(&mut self, mesh: &Mesh) -> Result<()> {
        self.add_mesh_with_progress(mesh, |_| {})
    }

    /// Like [`MqoDocument::add_mesh`], calling `on_face` after each polygon.
    ///
    /// Nothing is added unless the whole mesh converts.
    pub fn add_mesh_with_progress(
        &mut self,
        mesh: &Mesh,
        mut on_face: impl FnMut(usize),
    ) -> Result<()> {
        mesh.ensure_no_ngons()?;
        let layer = mesh.ensure_uvs()?;

        tracing::info!(
            "exporting \"{}\" ({} vertices, {} faces)",
            mesh.name,
            mesh.vertex_count(),
            mesh.polygon_count()
        );

        let material_base = self.materials.len();
        let mut materials = Vec::new();
        let mut block = String::new();

        block.push_str(&format!("Object \"{}\" {{\n", mesh.name));
        block.push_str(OBJECT_SETTINGS);

        block.push_str(&format!("\tvertex {} {{\n", mesh.vertex_count()));
        for position in &mesh.vertices {
            let p = transform_vertex(position, self.options.scale);
            block.push_str(&format!("\t\t{:.5} {:.5} {:.5}\n", p.x, p.y, p.z));
        }
        block.push_str("\t}\n");

        block.push_str(&format!("\tface {} {{\n", mesh.polygon_count()));
        for (index, polygon) in mesh.polygons.iter().enumerate() {
            let uvs = mesh.face_uvs(layer, index);
            let classification = classify(uvs, self.options.image_size)?;
            let mut face =
                export_face(index, polygon, uvs, classification, self.options.materials);
            if self.options.materials {
                face.material_index += material_base;
                materials.push(self.material_line(&classification.material_name(index)));
            }
            tracing::debug!(
                "face {}: {:?} flip {} rotation {}",
                index,
                classification.shape,
                classification.flip.sign(),
                classification.rotation
            );
            block.push_str(&face_line(&face));
            on_face(index);
        }
        block.push_str("\t}\n}\n");

        self.face_count += mesh.polygon_count();
        self.materials.extend(materials);
        self.objects.push(block);
        Ok(())
    }

    fn material_line(&self, name: &str) -> String {
        match &self.options.texture {
            Some(texture) => format!("\t\"{}\"{} tex(\"{}\")\n", name, STRPIX_MATERIAL, texture),
            None => format!("\t\"{}\"{}\n", name, STRPIX_MATERIAL),
        }
    }

    /// Render the complete `.mqo` file
    pub fn serialize(&self) -> String {
        let mut out = String::from(MQO_PREAMBLE);
        if self.options.materials {
            out.push_str(&format!("Material  {} {{\n", self.materials.len()));
            for material in &self.materials {
                out.push_str(material);
            }
            out.push_str("}\n");
        }
        for object in &self.objects {
            out.push_str(object);
        }
        out.push_str("\nEof\n");
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if self.objects.is_empty() {
            return Err(ExportError::NoActiveTarget);
        }
        write_atomic(path, &self.serialize())?;
        Ok(())
    }
}

/// One `face` chunk line, UVs back in top-left origin
fn face_line(face: &SceneFace) -> String {
    let indices: Vec<String> = face.vertex_indices.iter().map(|i| i.to_string()).collect();
    let uvs: Vec<String> = face
        .uv_corners
        .iter()
        .map(|uv| {
            let uv = flip_v(uv);
            format!("{:.5} {:.5}", uv.x, uv.y)
        })
        .collect();
    format!(
        "\t\t{} V({}) M({}) UV({})\n",
        face.vertex_indices.len(),
        indices.join(" "),
        face.material_index,
        uvs.join(" ")
    )
}

/// Build a single-object document for `mesh`
pub fn export(mesh: &Mesh, options: &MqoOptions) -> Result<MqoDocument> {
    let mut document = MqoDocument::new(options.clone());
    document.add_mesh(mesh)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Flip, ShapeType, UvLayer};
    use approx::assert_relative_eq;

    fn square_mesh() -> Mesh {
        let mut mesh = Mesh::new("Plane");
        mesh.add_vertex(Point3::new(-1.0, -1.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, -1.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(-1.0, 1.0, 0.0));
        mesh.add_polygon(vec![0, 1, 2, 3], 0);
        mesh.add_uv_layer(UvLayer::new(
            "UVMap",
            vec![
                UvPoint::new(0.0, 0.0),
                UvPoint::new(0.5, 0.0),
                UvPoint::new(0.5, 0.5),
                UvPoint::new(0.0, 0.5),
            ],
        ));
        mesh
    }

    #[test]
    fn test_winding_order() {
        assert_eq!(winding_order(4, 0), vec![0, 3, 2, 1]);
        assert_eq!(winding_order(4, 1), vec![3, 2, 1, 0]);
        assert_eq!(winding_order(4, 2), vec![2, 1, 0, 3]);
        assert_eq!(winding_order(4, 3), vec![1, 0, 3, 2]);
        assert_eq!(winding_order(3, 0), vec![0, 2, 1]);
        assert_eq!(winding_order(3, 1), vec![2, 1, 0]);
        assert_eq!(winding_order(3, 2), vec![1, 0, 2]);
    }

    #[test]
    fn test_transform_vertex_swaps_up_axis() {
        let p = transform_vertex(&Point3::new(1.0, 2.0, 3.0), 2.0);
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 6.0);
        assert_relative_eq!(p.z, -4.0);
    }

    #[test]
    fn test_export_face_reorders_in_lockstep() {
        let polygon = Polygon::new(vec![10, 11, 12, 13], 0, 5);
        let uvs: Vec<UvPoint> = (0..4).map(|i| UvPoint::new(i as f64, 0.0)).collect();
        let c = Classification::new(Flip::Normal, ShapeType::Quad, 1);

        let face = export_face(2, &polygon, &uvs, c, true);
        assert_eq!(face.vertex_indices, vec![13, 12, 11, 10]);
        let us: Vec<f64> = face.uv_corners.iter().map(|uv| uv.x).collect();
        assert_eq!(us, vec![3.0, 2.0, 1.0, 0.0]);
        assert_eq!(face.material_index, 2);

        let face = export_face(2, &polygon, &uvs, c, false);
        assert_eq!(face.material_index, 5);
    }

    #[test]
    fn test_export_single_quad() {
        let doc = export(&square_mesh(), &MqoOptions::default()).unwrap();
        let text = doc.serialize();

        assert!(text.starts_with("Metasequoia Document\nFormat Text Ver 1.0\n\nScene {\n"));
        assert!(text.contains(
            concat!(
                "Material  1 {\n\t\"1_0_0\" col(1.000 1.000 1.000 1.000) dif(0.800) amb(0.600) ",
                "emi(0.000) spc(0.000) power(5)\n}\n"
            )
        ));
        assert!(text.contains("Object \"Plane\" {\n\tdepth 0\n"));
        assert!(text.contains("\tvertex 4 {\n\t\t-1.00000 0.00000 1.00000\n"));
        // rotation 1: [v3, v2, v1, v0]
        assert!(text.contains(
            concat!(
                "\tface 1 {\n\t\t4 V(3 2 1 0) M(0) ",
                "UV(0.00000 0.50000 0.50000 0.50000 0.50000 1.00000 0.00000 1.00000)\n\t}\n}\n"
            )
        ));
        assert!(text.ends_with("}\n\nEof\n"));
        assert_eq!(doc.face_count(), 1);
        assert_eq!(doc.material_count(), 1);
    }

    #[test]
    fn test_texture_reference_and_disabled_materials() {
        let options = MqoOptions {
            texture: Some("level.tga".to_string()),
            ..MqoOptions::default()
        };
        let text = export(&square_mesh(), &options).unwrap().serialize();
        assert!(text.contains("power(5) tex(\"level.tga\")\n"));

        let options = MqoOptions {
            materials: false,
            ..MqoOptions::default()
        };
        let text = export(&square_mesh(), &options).unwrap().serialize();
        assert!(!text.contains("Material"));
        assert!(text.contains(" M(0) "));
    }

    #[test]
    fn test_ngon_leaves_document_untouched() {
        let mut mesh = square_mesh();
        mesh.add_vertex(Point3::new(0.0, 2.0, 0.0));
        mesh.add_polygon(vec![0, 1, 2, 4, 3], 0);
        mesh.uv_layers[0].data.extend(vec![UvPoint::origin(); 5]);

        let mut doc = MqoDocument::new(MqoOptions::default());
        assert!(matches!(
            doc.add_mesh(&mesh),
            Err(ExportError::UnsupportedGeometry { sides: 5, .. })
        ));
        assert_eq!(doc.object_count(), 0);
        assert_eq!(doc.material_count(), 0);
    }

    #[test]
    fn test_second_mesh_offsets_material_indices() {
        let mut doc = MqoDocument::new(MqoOptions::default());
        doc.add_mesh(&square_mesh()).unwrap();
        let mut second = square_mesh();
        second.name = "Copy".to_string();
        doc.add_mesh(&second).unwrap();

        assert_eq!(doc.object_count(), 2);
        assert_eq!(doc.face_count(), 2);
        assert_eq!(doc.material_count(), 2);

        let text = doc.serialize();
        // Names restart per object, indices do not
        assert_eq!(text.matches("\t\"1_0_0\" col(").count(), 2);
        assert!(text.contains("Material  2 {\n"));
        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("\t\t4 V(")).collect();
        assert_eq!(faces.len(), 2);
        assert!(faces[0].contains(" M(0) "));
        assert!(faces[1].contains(" M(1) "));
        assert!(text.find("Object \"Plane\"").unwrap() < text.find("Object \"Copy\"").unwrap());
    }

    #[test]
    fn test_polygon_materials_are_not_offset() {
        let options = MqoOptions {
            materials: false,
            ..MqoOptions::default()
        };
        let mut doc = MqoDocument::new(options);
        doc.add_mesh(&square_mesh()).unwrap();
        doc.add_mesh(&square_mesh()).unwrap();
        assert_eq!(doc.material_count(), 0);
        assert_eq!(doc.serialize().matches(" M(0) ").count(), 2);
    }
}
