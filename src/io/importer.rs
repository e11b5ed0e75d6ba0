// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ importer

use crate::geometry::{Mesh, Scene, UvLayer, UvPoint};
use anyhow::{anyhow, bail, Context, Result};
use nalgebra::Point3;
use std::fs;
use std::path::Path;

/// Name of the UV layer created for imported texture coordinates
pub const UV_LAYER_NAME: &str = "UVMap";

/// Import an .obj file into a scene, one mesh per `o` statement
pub fn import_obj_file(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read OBJ file: {}", path.display()))?;

    let default_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Object");

    parse_obj(&source, default_name)
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))
}

/// Object being assembled while reading
struct ObjectBuilder {
    mesh: Mesh,
    /// Global index of this object's first vertex
    vertex_base: usize,
    uvs: Vec<UvPoint>,
    /// Whether faces carry texture coordinates, decided by the first face
    has_uvs: Option<bool>,
    material: usize,
}

impl ObjectBuilder {
    fn new(name: &str, vertex_base: usize) -> Self {
        Self {
            mesh: Mesh::new(name),
            vertex_base,
            uvs: Vec::new(),
            has_uvs: None,
            material: 0,
        }
    }

    fn use_material(&mut self, name: &str) {
        self.material = match self.mesh.materials.iter().position(|m| m == name) {
            Some(index) => index,
            None => {
                self.mesh.materials.push(name.to_string());
                self.mesh.materials.len() - 1
            }
        };
    }

    fn is_empty(&self) -> bool {
        self.mesh.vertices.is_empty() && self.mesh.polygons.is_empty()
    }

    fn finish(mut self) -> Mesh {
        if self.has_uvs == Some(true) {
            self.mesh.add_uv_layer(UvLayer::new(UV_LAYER_NAME, self.uvs));
        }
        self.mesh
    }
}

/// Parse OBJ source text.
///
/// Statements before the first `o` belong to an object called `default_name`.
/// Faces may only reference vertices declared inside their own object.
pub fn parse_obj(source: &str, default_name: &str) -> Result<Scene> {
    let mut scene = Scene::new();
    let mut vertex_total = 0usize;
    let mut tex_coords: Vec<UvPoint> = Vec::new();
    let mut current: Option<ObjectBuilder> = None;

    for (line_no, line) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let keyword = match parts.next() {
            Some(keyword) => keyword,
            None => continue,
        };
        let args: Vec<&str> = parts.collect();

        match keyword {
            "o" => {
                if let Some(done) = current.take() {
                    if !done.is_empty() {
                        scene.add_object(done.finish());
                    }
                }
                let name = if args.is_empty() {
                    default_name.to_string()
                } else {
                    args.join(" ")
                };
                current = Some(ObjectBuilder::new(&name, vertex_total));
            }
            "v" => {
                let object = current
                    .get_or_insert_with(|| ObjectBuilder::new(default_name, vertex_total));
                let coords = parse_floats::<3>(&args)
                    .with_context(|| format!("line {}: bad vertex", line_no))?;
                object.mesh.add_vertex(Point3::new(coords[0], coords[1], coords[2]));
                vertex_total += 1;
            }
            "vt" => {
                let coords = parse_floats::<2>(&args)
                    .with_context(|| format!("line {}: bad texture coordinate", line_no))?;
                tex_coords.push(UvPoint::new(coords[0], coords[1]));
            }
            "usemtl" => {
                let object = current
                    .get_or_insert_with(|| ObjectBuilder::new(default_name, vertex_total));
                object.use_material(&args.join(" "));
            }
            "f" => {
                let object = current
                    .get_or_insert_with(|| ObjectBuilder::new(default_name, vertex_total));
                add_face(object, &args, vertex_total, &tex_coords)
                    .with_context(|| format!("line {}: bad face", line_no))?;
            }
            _ => {
                tracing::trace!("line {}: ignoring '{}'", line_no, keyword);
            }
        }
    }

    if let Some(done) = current.take() {
        if !done.is_empty() {
            scene.add_object(done.finish());
        }
    }

    tracing::debug!("parsed {} object(s) from OBJ source", scene.objects.len());
    Ok(scene)
}

fn add_face(
    object: &mut ObjectBuilder,
    args: &[&str],
    vertex_total: usize,
    tex_coords: &[UvPoint],
) -> Result<()> {
    if args.len() < 3 {
        bail!("face needs at least 3 corners, got {}", args.len());
    }

    let mut vertices = Vec::with_capacity(args.len());
    let mut uvs = Vec::with_capacity(args.len());
    for corner in args {
        let mut refs = corner.split('/');
        let v = refs.next().unwrap_or("");
        let global = resolve_index(v, vertex_total)?;
        let local = global
            .checked_sub(object.vertex_base)
            .filter(|&i| i < object.mesh.vertex_count())
            .ok_or_else(|| {
                anyhow!("vertex {} does not belong to object \"{}\"", v, object.mesh.name)
            })?;
        vertices.push(local);

        match refs.next() {
            Some(vt) if !vt.is_empty() => {
                let index = resolve_index(vt, tex_coords.len())?;
                uvs.push(tex_coords[index]);
            }
            _ => {}
        }
    }

    let face_has_uvs = match uvs.len() {
        0 => false,
        n if n == vertices.len() => true,
        _ => bail!("face mixes corners with and without texture coordinates"),
    };
    match object.has_uvs {
        None => object.has_uvs = Some(face_has_uvs),
        Some(expected) if expected != face_has_uvs => {
            bail!(
                "object \"{}\" mixes faces with and without texture coordinates",
                object.mesh.name
            );
        }
        Some(_) => {}
    }

    object.uvs.extend(uvs);
    let material = object.material;
    object.mesh.add_polygon(vertices, material);
    Ok(())
}

/// Resolve a 1-based or negative (relative) OBJ index against `count` items
fn resolve_index(token: &str, count: usize) -> Result<usize> {
    let raw: i64 = token.parse().with_context(|| format!("invalid index '{}'", token))?;
    let resolved = match raw {
        0 => bail!("OBJ indices start at 1"),
        r if r > 0 => (r - 1) as usize,
        r => {
            let back = r.unsigned_abs() as usize;
            if back > count {
                bail!("relative index {} out of range", r);
            }
            count - back
        }
    };
    if resolved >= count {
        bail!("index {} out of range ({} declared)", raw, count);
    }
    Ok(resolved)
}

fn parse_floats<const N: usize>(args: &[&str]) -> Result<[f64; N]> {
    if args.len() < N {
        bail!("expected {} numbers, got {}", N, args.len());
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(args) {
        *slot = token.parse().with_context(|| format!("invalid number '{}'", token))?;
    }
    Ok(out)
}
