use glam::Vec2;
use std::collections::HashMap;
use std::fmt;

use crate::camera::PerspectiveCamera;
use crate::input::Viewport;
use crate::scene::{Intersection, NodeId, SceneGraph};

/// Behaviors a walkman button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Play,
    Pause,
    SeekForward,
    SeekBackward,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Play => "play",
            Action::Pause => "pause",
            Action::SeekForward => "seek-forward",
            Action::SeekBackward => "seek-backward",
        };
        f.write_str(name)
    }
}

/// Node to action bindings. A node carries at most one action; unbound nodes are inert.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    bindings: HashMap<NodeId, Action>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `action` to `node`, returning the action it replaces.
    pub fn bind(&mut self, node: NodeId, action: Action) -> Option<Action> {
        self.bindings.insert(node, action)
    }

    pub fn action_for(&self, node: NodeId) -> Option<Action> {
        self.bindings.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Maps a pointer press to the action of the frontmost object under it.
#[derive(Debug, Clone)]
pub struct InteractionResolver {
    root: NodeId,
    table: ActionTable,
}

impl InteractionResolver {
    pub fn new(root: NodeId, table: ActionTable) -> Self {
        Self { root, table }
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    /// Nearest intersection under the pointer, bound or not.
    pub fn pick(
        &self,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        viewport: Viewport,
        client: Vec2,
    ) -> Option<Intersection> {
        let ray = camera.ray_from_ndc(viewport.to_ndc(client));
        graph.raycast(self.root, &ray).into_iter().next()
    }

    /// The action to run for a press at `client`, if the frontmost hit carries one.
    pub fn resolve(
        &self,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        viewport: Viewport,
        client: Vec2,
    ) -> Option<(NodeId, Action)> {
        let hit = self.pick(graph, camera, viewport, client)?;
        self.table.action_for(hit.node).map(|action| (hit.node, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::scene::{Material, Mesh, SceneNode, Transform};
    use glam::Vec3;

    fn button(name: &str, x: f32, z: f32) -> SceneNode {
        SceneNode::new(name)
            .with_transform(Transform::from_translation(Vec3::new(x, 0.0, z)))
            .with_mesh(Mesh::plane(1.0, 1.0), Material::default())
    }

    fn setup() -> (SceneGraph, NodeId, NodeId, NodeId, PerspectiveCamera, Viewport) {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::new("Model"));
        let play = graph.add_child(root, button("PlayButton", -2.0, 0.0));
        let deco = graph.add_child(root, button("Decal", 2.0, 0.0));
        let camera = PerspectiveCamera::new(
            &CameraConfig {
                position: [0.0, 0.0, 10.0],
                ..CameraConfig::default()
            },
            1.0,
        );
        (graph, root, play, deco, camera, Viewport::new(500.0, 500.0))
    }

    fn client_for(camera: &PerspectiveCamera, viewport: Viewport, point: Vec3) -> Vec2 {
        let ndc = camera.project(point).unwrap();
        Vec2::new(
            (ndc.x + 1.0) / 2.0 * viewport.width,
            (1.0 - ndc.y) / 2.0 * viewport.height,
        )
    }

    #[test]
    fn bound_object_resolves_to_its_action() {
        let (graph, root, play, _, camera, viewport) = setup();
        let mut table = ActionTable::new();
        table.bind(play, Action::Play);
        let resolver = InteractionResolver::new(root, table);

        let client = client_for(&camera, viewport, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(resolver.resolve(&graph, &camera, viewport, client), Some((play, Action::Play)));
    }

    #[test]
    fn unbound_object_is_inert() {
        let (graph, root, play, deco, camera, viewport) = setup();
        let mut table = ActionTable::new();
        table.bind(play, Action::Play);
        let resolver = InteractionResolver::new(root, table);

        let client = client_for(&camera, viewport, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(resolver.pick(&graph, &camera, viewport, client).map(|h| h.node), Some(deco));
        assert_eq!(resolver.resolve(&graph, &camera, viewport, client), None);
    }

    #[test]
    fn empty_space_resolves_to_nothing() {
        let (graph, root, play, _, camera, viewport) = setup();
        let mut table = ActionTable::new();
        table.bind(play, Action::Play);
        let resolver = InteractionResolver::new(root, table);
        assert_eq!(resolver.resolve(&graph, &camera, viewport, Vec2::new(250.0, 10.0)), None);
    }

    #[test]
    fn occluding_object_wins_even_without_action() {
        let (mut graph, root, play, _, camera, viewport) = setup();
        // Decorative cover in front of the play button
        graph.add_child(root, button("Cover", -2.0, 1.0));
        let mut table = ActionTable::new();
        table.bind(play, Action::Play);
        let resolver = InteractionResolver::new(root, table);

        let client = client_for(&camera, viewport, Vec3::new(-2.0, 0.0, 1.0));
        assert_eq!(resolver.resolve(&graph, &camera, viewport, client), None);
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut table = ActionTable::new();
        let (_, _, play, _, _, _) = setup();
        assert_eq!(table.bind(play, Action::Play), None);
        assert_eq!(table.bind(play, Action::Pause), Some(Action::Play));
        assert_eq!(table.len(), 1);
        assert_eq!(table.action_for(play), Some(Action::Pause));
    }

    #[test]
    fn action_names() {
        assert_eq!(Action::SeekForward.to_string(), "seek-forward");
        assert_eq!(Action::Play.to_string(), "play");
    }
}
