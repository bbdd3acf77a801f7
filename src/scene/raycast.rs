use glam::{Mat4, Vec3};

use super::graph::{NodeId, SceneGraph};
use super::mesh::Mesh;
use crate::math::{intersect_aabb, moller_trumbore_intersect, Ray};

/// A ray hit on a mesh node, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

impl SceneGraph {
    /// Intersects `ray` with every visible mesh below `root` (not `root` itself) and returns the
    /// hits nearest first. Equal distances keep depth-first order. Hidden nodes hide their subtree.
    pub fn raycast(&self, root: NodeId, ray: &Ray) -> Vec<Intersection> {
        let mut hits = Vec::new();
        let root_world = self.world_matrix(root);
        for &child in &self.node(root).children {
            self.raycast_node(child, &root_world, ray, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn raycast_node(&self, id: NodeId, parent_world: &Mat4, ray: &Ray, hits: &mut Vec<Intersection>) {
        let node = self.node(id);
        if !node.visible {
            return;
        }
        let world = *parent_world * node.transform.matrix();

        if let Some(distance) = node.mesh.as_ref().and_then(|mesh| nearest_hit(mesh, &world, ray)) {
            hits.push(Intersection {
                node: id,
                distance,
                point: ray.at(distance),
            });
        }

        for &child in &node.children {
            self.raycast_node(child, &world, ray, hits);
        }
    }
}

fn nearest_hit(mesh: &Mesh, world: &Mat4, ray: &Ray) -> Option<f32> {
    let bounds = mesh.bounds.transformed(world);
    // Flat meshes get a sliver of thickness so the slab test cannot reject them on round-off
    let pad = Vec3::splat(1e-4);
    intersect_aabb(ray.origin, ray.direction, bounds.min - pad, bounds.max + pad)?;

    mesh.triangles()
        .filter_map(|[a, b, c]| {
            moller_trumbore_intersect(
                ray.origin,
                ray.direction,
                world.transform_point3(a),
                world.transform_point3(b),
                world.transform_point3(c),
            )
        })
        .map(|hit| hit.t)
        .min_by(f32::total_cmp)
}
