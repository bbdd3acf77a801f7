//! glTF import into a [`SceneGraph`] and load-progress bookkeeping.

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use gltf::mesh::Mode;
use log::{debug, info, warn};
use std::path::Path;

use crate::scene::{Material, Mesh, NodeId, SceneGraph, SceneNode, TextureBinding, TextureSource, Transform};

/// Loads the glTF file at `path` under a new root node and returns that root.
pub fn load_gltf(graph: &mut SceneGraph, path: impl AsRef<Path>) -> Result<NodeId> {
    let path = path.as_ref();
    info!("Loading glTF file: {:?}", path);

    let (document, buffers, _images) =
        gltf::import(path).context(format!("Failed to load glTF file: {:?}", path))?;
    import_document(graph, &document, &buffers)
}

/// Loads a glTF or GLB held in memory. External buffer URIs are not resolved.
pub fn load_gltf_slice(graph: &mut SceneGraph, bytes: &[u8]) -> Result<NodeId> {
    let (document, buffers, _images) = gltf::import_slice(bytes).context("Failed to parse glTF data")?;
    import_document(graph, &document, &buffers)
}

fn import_document(
    graph: &mut SceneGraph,
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<NodeId> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file contains no scenes")?;

    debug!(
        "glTF: {} nodes, {} meshes, {} materials",
        document.nodes().count(),
        document.meshes().count(),
        document.materials().count()
    );

    let root = graph.add_root(SceneNode::new(scene.name().unwrap_or("Scene")));
    for node in scene.nodes() {
        import_node(graph, root, &node, buffers)?;
    }

    info!("Imported {} scene nodes", graph.descendants(root).len());
    Ok(root)
}

fn import_node(
    graph: &mut SceneGraph,
    parent: NodeId,
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
) -> Result<()> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let name = node
        .name()
        .or_else(|| node.mesh().and_then(|m| m.name()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut scene_node = SceneNode::new(name).with_transform(Transform {
        translation: Vec3::from_array(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from_array(scale),
    });

    if let Some(mesh) = node.mesh() {
        if let Some((mesh, material)) = import_mesh(&mesh, buffers)? {
            scene_node = scene_node.with_mesh(mesh, material);
        }
    }

    let id = graph.add_child(parent, scene_node);
    for child in node.children() {
        import_node(graph, id, &child, buffers)?;
    }
    Ok(())
}

/// Merges all triangle primitives of a glTF mesh. The first primitive's material wins.
fn import_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Result<Option<(Mesh, Material)>> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut material = None;

    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            warn!(
                "Skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let base = positions.len() as u32;
        let primitive_positions: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(Vec3::from_array)
            .collect();

        match reader.read_indices() {
            Some(read) => indices.extend(read.into_u32().map(|i| i + base)),
            None => indices.extend((0..primitive_positions.len() as u32).map(|i| i + base)),
        }
        positions.extend(primitive_positions);

        if material.is_none() {
            material = Some(import_material(&primitive.material()));
        }
    }

    if positions.is_empty() {
        return Ok(None);
    }
    Ok(Some((Mesh::new(positions, indices), material.unwrap_or_default())))
}

fn import_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    Material {
        base_color: pbr.base_color_factor(),
        map: pbr.base_color_texture().map(|info| TextureBinding {
            source: TextureSource::Image(info.texture().index()),
            mapping: Default::default(),
        }),
        env_map_intensity: 1.0,
        double_sided: material.double_sided(),
    }
}

/// Counts asset loads and reports overall progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_started(&mut self) {
        self.total += 1;
    }

    pub fn item_finished(&mut self) {
        self.loaded = (self.loaded + 1).min(self.total);
    }

    /// Whole percent, rounded.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.loaded as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.loaded == self.total
    }
}
