mod graph;
mod mesh;
mod raycast;

pub use graph::{NodeId, SceneGraph, SceneNode, Transform};
pub use mesh::{Material, Mesh, TextureBinding, TextureSource};
pub use raycast::Intersection;
