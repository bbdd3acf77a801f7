//! Puts the video on the walkman's screen, either on a generated quad posed from the screen mesh
//! or directly on the screen mesh's material.

use glam::{EulerRot, Quat, Vec3};
use log::{debug, info, warn};
use std::f32::consts::PI;

use crate::config::{OverlayConfig, OverlayStrategy};
use crate::math::{aspect_fit, TextureMapping};
use crate::media::VideoTexture;
use crate::scene::{Material, Mesh, NodeId, SceneGraph, SceneNode, TextureBinding, TextureSource, Transform};

pub const OVERLAY_NODE_NAME: &str = "VideoOverlay";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    NoTexture,
    TextureReady,
    /// Quad exists but stays hidden until playback starts.
    QuadCreated(NodeId),
    QuadVisible(NodeId),
    /// Video applied to the screen mesh's own material.
    MaterialBound(NodeId),
}

/// One-shot notification that the overlay quad exists. A show request made before it fires is
/// kept and honored when it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadSignal {
    Pending { show_requested: bool },
    Fired(NodeId),
}

impl QuadSignal {
    /// Returns the quad if it already exists, otherwise remembers the request.
    pub fn request_show(&mut self) -> Option<NodeId> {
        match self {
            QuadSignal::Pending { show_requested } => {
                *show_requested = true;
                None
            }
            QuadSignal::Fired(node) => Some(*node),
        }
    }

    /// Marks the quad as created. Returns whether a show request was waiting. Later calls are
    /// ignored.
    pub fn fire(&mut self, node: NodeId) -> bool {
        match *self {
            QuadSignal::Pending { show_requested } => {
                *self = QuadSignal::Fired(node);
                show_requested
            }
            QuadSignal::Fired(_) => false,
        }
    }
}

/// Local pose of the overlay quad under the screen's parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPose {
    pub parent: NodeId,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

/// Derives the quad pose from the screen node's current world transform.
pub fn overlay_pose(graph: &SceneGraph, screen: NodeId, config: &OverlayConfig) -> Option<OverlayPose> {
    let parent = graph.parent(screen)?;
    let world_position = graph.world_position(screen);
    let world_rotation = graph.world_rotation(screen);

    let translation = graph.world_to_local(parent, world_position) + Vec3::from_array(config.offset);

    let turned = world_rotation * Quat::from_rotation_y(PI);
    let (x, y, z) = turned.to_euler(EulerRot::XYZ);
    let [nx, ny, nz] = config.rotation_nudge;
    let rotation = Quat::from_euler(EulerRot::XYZ, x + nx, y + ny, z + nz);

    Some(OverlayPose {
        parent,
        translation,
        rotation,
        scale: config.scale,
    })
}

/// Tracks model and texture readiness and places the video once both are in.
#[derive(Debug, Clone)]
pub struct OverlayPlacement {
    config: OverlayConfig,
    model_ready: bool,
    texture_ready: bool,
    state: OverlayState,
    signal: QuadSignal,
}

impl OverlayPlacement {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            model_ready: false,
            texture_ready: false,
            state: OverlayState::NoTexture,
            signal: QuadSignal::Pending {
                show_requested: false,
            },
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn strategy(&self) -> OverlayStrategy {
        self.config.strategy
    }

    pub fn is_ready(&self) -> bool {
        self.model_ready && self.texture_ready
    }

    pub fn mark_model_ready(&mut self) {
        self.model_ready = true;
    }

    pub fn mark_texture_ready(&mut self) {
        self.texture_ready = true;
        if self.state == OverlayState::NoTexture {
            self.state = OverlayState::TextureReady;
        }
    }

    fn mapping_for(&self, target_aspect: f32, texture: &VideoTexture) -> TextureMapping {
        if self.config.crop_to_fit {
            aspect_fit(target_aspect, texture.aspect())
        } else {
            TextureMapping::IDENTITY
        }
    }

    /// Places the video if both model and texture are ready and nothing was placed yet.
    /// `target` is the screen anchor for quads or the screen surface for material binding.
    pub fn try_place(
        &mut self,
        graph: &mut SceneGraph,
        target: Option<NodeId>,
        texture: &VideoTexture,
    ) -> Option<NodeId> {
        if !self.is_ready() || self.state != OverlayState::TextureReady {
            return None;
        }
        let Some(target) = target else {
            warn!("screen node not found; video overlay skipped");
            return None;
        };

        match self.config.strategy {
            OverlayStrategy::Quad => self.create_quad(graph, target, texture),
            OverlayStrategy::ScreenMaterial => {
                self.bind_screen_material(graph, target, texture);
                Some(target)
            }
        }
    }

    fn create_quad(&mut self, graph: &mut SceneGraph, screen: NodeId, texture: &VideoTexture) -> Option<NodeId> {
        let Some(pose) = overlay_pose(graph, screen, &self.config) else {
            warn!("screen node '{}' has no parent; video overlay skipped", graph.node(screen).name);
            return None;
        };

        let material = Material {
            map: Some(TextureBinding {
                source: TextureSource::Video,
                mapping: self.mapping_for(self.config.width / self.config.height, texture),
            }),
            double_sided: true,
            ..Material::default()
        };
        let mut node = SceneNode::new(OVERLAY_NODE_NAME)
            .with_transform(Transform {
                translation: pose.translation,
                rotation: pose.rotation,
                scale: Vec3::splat(pose.scale),
            })
            .with_mesh(Mesh::plane(self.config.width, self.config.height), material);
        node.visible = false;

        let quad = graph.add_child(pose.parent, node);
        info!("video overlay quad created under '{}'", graph.node(pose.parent).name);
        self.state = OverlayState::QuadCreated(quad);

        if self.signal.fire(quad) {
            self.show(graph, quad);
        }
        Some(quad)
    }

    fn bind_screen_material(&mut self, graph: &mut SceneGraph, surface: NodeId, texture: &VideoTexture) {
        let aspect = graph
            .node(surface)
            .mesh
            .as_ref()
            .map(Mesh::face_aspect)
            .unwrap_or(f32::NAN);
        let mapping = self.mapping_for(aspect, texture);
        let node = graph.node_mut(surface);
        let material = node.material.get_or_insert_with(Material::default);
        material.map = Some(TextureBinding {
            source: TextureSource::Video,
            mapping,
        });
        info!("video bound to '{}' material", node.name);
        self.state = OverlayState::MaterialBound(surface);
    }

    /// Shows the quad now, or as soon as it is created.
    pub fn request_visible(&mut self, graph: &mut SceneGraph) {
        match self.signal.request_show() {
            Some(quad) => self.show(graph, quad),
            None => debug!("overlay quad not created yet; will show on creation"),
        }
    }

    fn show(&mut self, graph: &mut SceneGraph, quad: NodeId) {
        graph.node_mut(quad).visible = true;
        self.state = OverlayState::QuadVisible(quad);
        debug!("overlay quad visible");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{UVec2, Vec2};

    fn walkman() -> (SceneGraph, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::new("Model").with_transform(Transform {
            scale: Vec3::splat(200.0),
            ..Transform::IDENTITY
        }));
        let body = graph.add_child(
            root,
            SceneNode::new("Body").with_transform(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        );
        let screen = graph.add_child(
            body,
            SceneNode::new("Glass2")
                .with_transform(Transform::from_translation(Vec3::new(0.5, 0.0, 0.2)))
                .with_mesh(Mesh::plane(4.0, 3.0), Material::default()),
        );
        (graph, body, screen)
    }

    fn texture() -> VideoTexture {
        VideoTexture::new(UVec2::new(1280, 720))
    }

    #[test]
    fn pose_is_screen_position_in_parent_space_plus_offset() {
        let (graph, body, screen) = walkman();
        let config = OverlayConfig {
            offset: [0.0, 0.0, 0.0],
            rotation_nudge: [0.0, 0.0, 0.0],
            ..OverlayConfig::default()
        };
        let pose = overlay_pose(&graph, screen, &config).unwrap();
        assert_eq!(pose.parent, body);
        assert!((pose.translation - Vec3::new(0.5, 0.0, 0.2)).length() < 1e-4);
        assert!(pose.rotation.angle_between(Quat::from_rotation_y(PI)) < 1e-2);

        let nudged = overlay_pose(&graph, screen, &OverlayConfig::default()).unwrap();
        assert!((nudged.translation - Vec3::new(0.0, 0.06, 0.25)).length() < 1e-4);
        assert_eq!(nudged.scale, 0.29);
    }

    #[test]
    fn parentless_screen_has_no_pose() {
        let mut graph = SceneGraph::new();
        let lone = graph.add_root(SceneNode::new("Glass2"));
        assert!(overlay_pose(&graph, lone, &OverlayConfig::default()).is_none());
    }

    #[test]
    fn quad_waits_for_both_flags() {
        let (mut graph, _, screen) = walkman();
        let mut placement = OverlayPlacement::new(OverlayConfig::default());
        placement.mark_model_ready();
        assert_eq!(placement.try_place(&mut graph, Some(screen), &texture()), None);
        assert_eq!(placement.state(), OverlayState::NoTexture);

        placement.mark_texture_ready();
        assert_eq!(placement.state(), OverlayState::TextureReady);
        let quad = placement.try_place(&mut graph, Some(screen), &texture()).unwrap();
        assert_eq!(placement.state(), OverlayState::QuadCreated(quad));
        assert!(!graph.node(quad).visible);

        // Created once only
        assert_eq!(placement.try_place(&mut graph, Some(screen), &texture()), None);
    }

    #[test]
    fn texture_first_then_model_also_creates() {
        let (mut graph, _, screen) = walkman();
        let mut placement = OverlayPlacement::new(OverlayConfig::default());
        placement.mark_texture_ready();
        assert_eq!(placement.try_place(&mut graph, Some(screen), &texture()), None);
        placement.mark_model_ready();
        assert!(placement.try_place(&mut graph, Some(screen), &texture()).is_some());
    }

    #[test]
    fn show_request_after_creation_is_immediate() {
        let (mut graph, _, screen) = walkman();
        let mut placement = OverlayPlacement::new(OverlayConfig::default());
        placement.mark_model_ready();
        placement.mark_texture_ready();
        let quad = placement.try_place(&mut graph, Some(screen), &texture()).unwrap();
        placement.request_visible(&mut graph);
        assert!(graph.node(quad).visible);
        assert_eq!(placement.state(), OverlayState::QuadVisible(quad));
    }

    #[test]
    fn show_request_before_creation_is_honored_on_creation() {
        let (mut graph, _, screen) = walkman();
        let mut placement = OverlayPlacement::new(OverlayConfig::default());
        placement.request_visible(&mut graph);
        placement.mark_texture_ready();
        placement.mark_model_ready();
        let quad = placement.try_place(&mut graph, Some(screen), &texture()).unwrap();
        assert!(graph.node(quad).visible);
        assert_eq!(placement.state(), OverlayState::QuadVisible(quad));
    }

    #[test]
    fn quad_texture_is_cropped_to_quad_aspect() {
        let (mut graph, _, screen) = walkman();
        let mut placement = OverlayPlacement::new(OverlayConfig::default());
        placement.mark_model_ready();
        placement.mark_texture_ready();
        let four_by_three = VideoTexture::new(UVec2::new(640, 480));
        let quad = placement.try_place(&mut graph, Some(screen), &four_by_three).unwrap();
        let map = graph.node(quad).material.as_ref().unwrap().map.unwrap();
        assert_eq!(map.source, TextureSource::Video);
        assert!((map.mapping.repeat - Vec2::new(1.0, 0.75)).length() < 1e-5);
        assert!((map.mapping.offset - Vec2::new(0.0, 0.125)).length() < 1e-5);
    }

    #[test]
    fn missing_screen_leaves_state_untouched() {
        let (mut graph, _, _) = walkman();
        let mut placement = OverlayPlacement::new(OverlayConfig::default());
        placement.mark_model_ready();
        placement.mark_texture_ready();
        assert_eq!(placement.try_place(&mut graph, None, &texture()), None);
        assert_eq!(placement.state(), OverlayState::TextureReady);
    }

    #[test]
    fn screen_material_strategy_creates_no_geometry() {
        let (mut graph, _, screen) = walkman();
        let before = graph.len();
        let mut placement = OverlayPlacement::new(OverlayConfig {
            strategy: OverlayStrategy::ScreenMaterial,
            ..OverlayConfig::default()
        });
        placement.mark_model_ready();
        placement.mark_texture_ready();
        assert_eq!(placement.try_place(&mut graph, Some(screen), &texture()), Some(screen));
        assert_eq!(graph.len(), before);
        assert_eq!(placement.state(), OverlayState::MaterialBound(screen));

        // 4:3 screen showing 16:9 video keeps height and crops width
        let map = graph.node(screen).material.as_ref().unwrap().map.unwrap();
        assert!((map.mapping.repeat - Vec2::new(0.75, 1.0)).length() < 1e-5);
        assert!((map.mapping.offset - Vec2::new(0.125, 0.0)).length() < 1e-5);
    }

    #[test]
    fn signal_fires_once() {
        let mut signal = QuadSignal::Pending { show_requested: true };
        let (_, body, screen) = walkman();
        assert!(signal.fire(body));
        assert!(!signal.fire(screen));
        assert_eq!(signal.request_show(), Some(body));
    }
}
