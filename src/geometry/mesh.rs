// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon mesh and scene representation handed to the exporters

use super::uv::UvPoint;
use crate::error::{ExportError, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Polygon referencing mesh vertices.
///
/// Corner `k` of the polygon owns loop `loop_start + k` in every UV layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<usize>,
    pub loop_start: usize,
    pub material_index: usize,
}

impl Polygon {
    pub fn new(vertices: Vec<usize>, loop_start: usize, material_index: usize) -> Self {
        Self {
            vertices,
            loop_start,
            material_index,
        }
    }

    /// Number of corners
    pub fn loop_total(&self) -> usize {
        self.vertices.len()
    }

    pub fn loops(&self) -> Range<usize> {
        self.loop_start..self.loop_start + self.loop_total()
    }

    pub fn is_ngon(&self) -> bool {
        self.loop_total() > 4
    }
}

/// Per-corner texture coordinates, indexed by loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvLayer {
    pub name: String,
    pub data: Vec<UvPoint>,
}

impl UvLayer {
    pub fn new(name: impl Into<String>, data: Vec<UvPoint>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Polygon mesh with UV layers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Point3<f64>>,
    pub polygons: Vec<Polygon>,
    pub uv_layers: Vec<UvLayer>,
    pub materials: Vec<String>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    /// Append a polygon after the existing loops and return its index
    pub fn add_polygon(&mut self, vertices: Vec<usize>, material_index: usize) -> usize {
        let index = self.polygons.len();
        let loop_start = self.loop_count();
        self.polygons.push(Polygon::new(vertices, loop_start, material_index));
        index
    }

    pub fn add_uv_layer(&mut self, layer: UvLayer) {
        self.uv_layers.push(layer);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Total number of face corners
    pub fn loop_count(&self) -> usize {
        self.polygons.last().map_or(0, |p| p.loop_start + p.loop_total())
    }

    /// First UV layer, checked to cover every face corner
    pub fn ensure_uvs(&self) -> Result<&UvLayer> {
        let missing = |reason| ExportError::MissingUvData {
            object: self.name.clone(),
            reason,
        };

        let layer = self.uv_layers.first().ok_or_else(|| missing("no UV layers"))?;
        if layer.data.is_empty() {
            return Err(missing("no data for first UV layer"));
        }
        if layer.data.len() < self.loop_count() {
            return Err(missing("first UV layer does not cover every face corner"));
        }
        Ok(layer)
    }

    /// Reject meshes containing polygons with more than four corners
    pub fn ensure_no_ngons(&self) -> Result<()> {
        match self.polygons.iter().position(Polygon::is_ngon) {
            Some(face) => Err(ExportError::UnsupportedGeometry {
                object: self.name.clone(),
                face,
                sides: self.polygons[face].loop_total(),
            }),
            None => Ok(()),
        }
    }

    /// UV corners of a face, in mesh winding order
    ///
    /// `layer` must come from [`Mesh::ensure_uvs`].
    pub fn face_uvs<'a>(&self, layer: &'a UvLayer, face: usize) -> &'a [UvPoint] {
        &layer.data[self.polygons[face].loops()]
    }
}

/// Set of meshes with an optional active one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<Mesh>,
    pub active: Option<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object; the first object added becomes active
    pub fn add_object(&mut self, mesh: Mesh) -> usize {
        let index = self.objects.len();
        self.objects.push(mesh);
        if self.active.is_none() {
            self.active = Some(index);
        }
        index
    }

    pub fn find(&self, name: &str) -> Option<&Mesh> {
        self.objects.iter().find(|m| m.name == name)
    }

    /// Make the object called `name` active
    pub fn select(&mut self, name: &str) -> Result<()> {
        let index = self
            .objects
            .iter()
            .position(|m| m.name == name)
            .ok_or(ExportError::NoActiveTarget)?;
        self.active = Some(index);
        Ok(())
    }

    pub fn active_mesh(&self) -> Result<&Mesh> {
        self.active
            .and_then(|i| self.objects.get(i))
            .ok_or(ExportError::NoActiveTarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> Mesh {
        let mut mesh = Mesh::new("quad");
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_polygon(vec![0, 1, 2, 3], 0);
        mesh.add_polygon(vec![0, 1, 2], 0);
        mesh
    }

    #[test]
    fn test_loops_are_contiguous() {
        let mesh = quad_mesh();
        assert_eq!(mesh.polygons[0].loops(), 0..4);
        assert_eq!(mesh.polygons[1].loops(), 4..7);
        assert_eq!(mesh.loop_count(), 7);
    }

    #[test]
    fn test_ensure_uvs() {
        let mut mesh = quad_mesh();
        assert!(matches!(
            mesh.ensure_uvs(),
            Err(ExportError::MissingUvData { reason: "no UV layers", .. })
        ));

        mesh.add_uv_layer(UvLayer::new("UVMap", Vec::new()));
        assert!(matches!(
            mesh.ensure_uvs(),
            Err(ExportError::MissingUvData { reason: "no data for first UV layer", .. })
        ));

        mesh.uv_layers[0].data = vec![UvPoint::origin(); 7];
        let layer = mesh.ensure_uvs().unwrap();
        assert_eq!(mesh.face_uvs(layer, 1).len(), 3);
    }

    #[test]
    fn test_ensure_no_ngons() {
        let mut mesh = quad_mesh();
        assert!(mesh.ensure_no_ngons().is_ok());

        mesh.add_vertex(Point3::new(0.5, 1.5, 0.0));
        mesh.add_polygon(vec![0, 1, 2, 4, 3], 0);
        match mesh.ensure_no_ngons() {
            Err(ExportError::UnsupportedGeometry { face, sides, .. }) => {
                assert_eq!(face, 2);
                assert_eq!(sides, 5);
            }
            other => panic!("expected UnsupportedGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_scene_selection() {
        let mut scene = Scene::new();
        assert!(matches!(scene.active_mesh(), Err(ExportError::NoActiveTarget)));

        scene.add_object(quad_mesh());
        scene.add_object(Mesh::new("other"));
        assert_eq!(scene.active_mesh().unwrap().name, "quad");

        scene.select("other").unwrap();
        assert_eq!(scene.active_mesh().unwrap().name, "other");
        assert!(matches!(scene.select("missing"), Err(ExportError::NoActiveTarget)));
    }
}
