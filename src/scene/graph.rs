use glam::{Mat4, Quat, Vec3};

use super::mesh::{Material, Mesh};

/// Index of a node inside its [`SceneGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub material: Option<Material>,
    pub visible: bool,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::IDENTITY,
            mesh: None,
            material: None,
            visible: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh, material: Material) -> Self {
        self.mesh = Some(mesh);
        self.material = Some(material);
        self
    }
}

/// Arena-backed node hierarchy. Nodes are never removed, so ids stay valid for the graph's lifetime.
#[derive(Debug, Default, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a parentless node.
    pub fn add_root(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        node.parent = Some(parent);
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// First node named `name` in depth-first pre-order, starting with `root` itself.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        if self.nodes[root.0].name == name {
            return Some(root);
        }
        self.descendants(root)
            .into_iter()
            .find(|&id| self.nodes[id.0].name == name)
    }

    /// All nodes below `root` in depth-first pre-order, `root` excluded.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let local = self.nodes[id.0].transform.matrix();
        match self.nodes[id.0].parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    pub fn world_rotation(&self, id: NodeId) -> Quat {
        let (_, rotation, _) = self.world_matrix(id).to_scale_rotation_translation();
        rotation
    }

    /// Converts a world-space point into the local space of `id`.
    pub fn world_to_local(&self, id: NodeId, point: Vec3) -> Vec3 {
        self.world_matrix(id).inverse().transform_point3(point)
    }

    /// Visits every material under `root`, `root` included.
    pub fn for_each_material_mut(&mut self, root: NodeId, mut f: impl FnMut(&mut Material)) {
        let mut ids = vec![root];
        ids.extend(self.descendants(root));
        for id in ids {
            if let Some(material) = self.nodes[id.0].material.as_mut() {
                f(material);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn sample_graph() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(
            SceneNode::new("Root").with_transform(Transform {
                scale: Vec3::splat(2.0),
                ..Transform::IDENTITY
            }),
        );
        let body = graph.add_child(
            root,
            SceneNode::new("Body").with_transform(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))),
        );
        let glass = graph.add_child(
            body,
            SceneNode::new("Glass2").with_transform(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        );
        (graph, root, body, glass)
    }

    #[test]
    fn find_by_name_includes_root_and_descendants() {
        let (graph, root, _, glass) = sample_graph();
        assert_eq!(graph.find_by_name(root, "Root"), Some(root));
        assert_eq!(graph.find_by_name(root, "Glass2"), Some(glass));
        assert_eq!(graph.find_by_name(root, "PlayButton"), None);
    }

    #[test]
    fn find_by_name_prefers_depth_first_order() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::new("Root"));
        let a = graph.add_child(root, SceneNode::new("A"));
        let deep = graph.add_child(a, SceneNode::new("Dup"));
        graph.add_child(root, SceneNode::new("Dup"));
        assert_eq!(graph.find_by_name(root, "Dup"), Some(deep));
    }

    #[test]
    fn descendants_are_preorder() {
        let (graph, root, body, glass) = sample_graph();
        assert_eq!(graph.descendants(root), vec![body, glass]);
    }

    #[test]
    fn world_position_composes_parents() {
        let (graph, _, _, glass) = sample_graph();
        let p = graph.world_position(glass);
        assert!((p - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn world_to_local_inverts_world_matrix() {
        let (graph, _, body, glass) = sample_graph();
        let world = graph.world_position(glass);
        let local = graph.world_to_local(body, world);
        assert!((local - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn world_rotation_accumulates() {
        let mut graph = SceneGraph::new();
        let rotated = Transform {
            rotation: Quat::from_rotation_y(FRAC_PI_2),
            ..Transform::IDENTITY
        };
        let root = graph.add_root(SceneNode::new("Root").with_transform(rotated));
        let child = graph.add_child(root, SceneNode::new("Child").with_transform(rotated));
        let q = graph.world_rotation(child);
        assert!(q.angle_between(Quat::from_rotation_y(2.0 * FRAC_PI_2)) < 1e-2);
    }
}
