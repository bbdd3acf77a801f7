use glam::{Vec2, Vec3};
use log::{error, info, warn};

use crate::camera::PerspectiveCamera;
use crate::config::{OverlayStrategy, SceneConfig};
use crate::controls::OrbitControls;
use crate::error::{MediaError, SetupError};
use crate::input::{PointerInput, Viewport};
use crate::interaction::{Action, ActionTable, InteractionResolver};
use crate::lighting::LightRig;
use crate::media::{seek_backward, seek_forward, VideoSource, VideoTexture};
use crate::overlay::{OverlayPlacement, OverlayState};
use crate::scene::{NodeId, SceneGraph};

/// Everything the walkman page keeps alive: graph, camera, controls, media and overlay state.
/// Event handlers are methods, so there is no shared global state.
pub struct WalkmanScene<V: VideoSource> {
    config: SceneConfig,
    graph: SceneGraph,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    lights: LightRig,
    viewport: Viewport,
    model_root: Option<NodeId>,
    resolver: Option<InteractionResolver>,
    video: V,
    texture: Option<VideoTexture>,
    overlay: OverlayPlacement,
}

impl<V: VideoSource> WalkmanScene<V> {
    pub fn new(config: SceneConfig, video: V, viewport: Viewport) -> Self {
        let camera = PerspectiveCamera::new(&config.camera, viewport.aspect());
        let controls = OrbitControls::new(&config.controls);
        let overlay = OverlayPlacement::new(config.overlay.clone());
        let lights = LightRig::from_config(&config.lighting);
        Self {
            config,
            graph: SceneGraph::new(),
            camera,
            controls,
            lights,
            viewport,
            model_root: None,
            resolver: None,
            video,
            texture: None,
            overlay,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// For loaders that build the model into this scene's graph before [`Self::attach_model`].
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut V {
        &mut self.video
    }

    pub fn texture(&self) -> Option<&VideoTexture> {
        self.texture.as_ref()
    }

    pub fn model_root(&self) -> Option<NodeId> {
        self.model_root
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    /// Whether pointer presses can trigger actions.
    pub fn is_interactive(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn actions(&self) -> Option<&ActionTable> {
        self.resolver.as_ref().map(InteractionResolver::table)
    }

    /// Finishes model loading: scales and lights the model, binds the buttons and places the
    /// video if it is ready. A binding failure is returned but leaves the model displayed.
    pub fn attach_model(&mut self, root: NodeId) -> Result<(), SetupError> {
        let model = &self.config.model;
        {
            let node = self.graph.node_mut(root);
            node.transform.translation = Vec3::ZERO;
            node.transform.scale = Vec3::splat(model.scale);
        }
        let intensity = model.env_map_intensity;
        self.graph
            .for_each_material_mut(root, |material| material.env_map_intensity = intensity);

        self.controls.target = Vec3::ZERO;
        self.controls.update(&mut self.camera, 0.0);

        self.model_root = Some(root);
        self.overlay.mark_model_ready();

        let installed = self.install_controls(root);
        match &installed {
            Ok(table) => info!("Model controls ready ({} buttons)", table.len()),
            Err(e) => warn!("Model controls not installed: {e}"),
        }
        let result = installed.map(|table| {
            self.resolver = Some(InteractionResolver::new(root, table));
        });

        self.try_place_overlay();
        result
    }

    fn install_controls(&self, root: NodeId) -> Result<ActionTable, SetupError> {
        let names = &self.config.nodes;
        let find = |role: &'static str, name: &str| {
            self.graph
                .find_by_name(root, name)
                .ok_or_else(|| SetupError::MissingNode {
                    role,
                    name: name.to_string(),
                })
        };

        let play = find("play button", &names.play)?;
        let pause = find("pause button", &names.pause)?;
        let forward = find("forward button", &names.forward)?;
        let backward = find("backward button", &names.backward)?;
        find("screen", &names.screen)?;
        find("screen surface", &names.screen_surface)?;

        let mut table = ActionTable::new();
        table.bind(play, Action::Play);
        table.bind(pause, Action::Pause);
        table.bind(forward, Action::SeekForward);
        table.bind(backward, Action::SeekBackward);
        Ok(table)
    }

    /// The video source reports frame data: build its texture and place it if the model is in.
    pub fn video_ready(&mut self) -> Result<(), MediaError> {
        let texture = VideoTexture::from_source(&self.video)?;
        info!("Video texture created ({}x{})", texture.size.x, texture.size.y);
        self.texture = Some(texture);
        self.overlay.mark_texture_ready();
        self.try_place_overlay();
        Ok(())
    }

    fn try_place_overlay(&mut self) {
        let (Some(root), Some(texture)) = (self.model_root, self.texture.as_ref()) else {
            return;
        };
        let name = match self.overlay.strategy() {
            OverlayStrategy::Quad => &self.config.nodes.screen,
            OverlayStrategy::ScreenMaterial => &self.config.nodes.screen_surface,
        };
        let target = self.graph.find_by_name(root, name);
        self.overlay.try_place(&mut self.graph, target, texture);
    }

    /// Handles a pointer gesture, returning the action a press triggered.
    pub fn handle_pointer(&mut self, input: PointerInput) -> Option<Action> {
        match input {
            PointerInput::Down(client) => {
                self.controls.interaction_start();
                // Presses are the user gesture that unlocks playback
                self.video.user_gesture();
                self.pointer_down(client)
            }
            PointerInput::Drag(delta) => {
                self.controls.interaction_start();
                self.controls.rotate_by_pixels(delta);
                None
            }
            PointerInput::Hover(_) | PointerInput::Wheel(_) => {
                self.controls.interaction_start();
                None
            }
            PointerInput::Up => {
                self.controls.interaction_end();
                None
            }
        }
    }

    /// Runs the action bound to the frontmost object under `client`, if any.
    pub fn pointer_down(&mut self, client: Vec2) -> Option<Action> {
        let resolver = self.resolver.as_ref()?;
        let (_, action) = resolver.resolve(&self.graph, &self.camera, self.viewport, client)?;
        self.dispatch(action);
        Some(action)
    }

    pub fn dispatch(&mut self, action: Action) {
        info!("{action} button pressed");
        let step = self.config.seek.step_secs;
        match action {
            Action::Play => {
                self.controls.auto_rotate = false;
                match self.video.play() {
                    Ok(()) => {
                        self.video.set_muted(false);
                        self.video.set_volume(1.0);
                        info!("Video started");
                        if self.overlay.strategy() == OverlayStrategy::Quad {
                            self.overlay.request_visible(&mut self.graph);
                        }
                    }
                    Err(e) => error!("Video play failed: {e}"),
                }
            }
            Action::Pause => self.video.pause(),
            Action::SeekForward => seek_forward(&mut self.video, step),
            Action::SeekBackward => seek_backward(&mut self.video, step),
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    /// Per-frame camera update.
    pub fn update(&mut self, delta_secs: f32) {
        self.controls.update(&mut self.camera, delta_secs);
    }

    /// Client position of `node`'s mesh center (or origin when it has no mesh), if it is in
    /// front of the camera.
    pub fn client_position_of(&self, node: NodeId) -> Option<Vec2> {
        let local = self.graph.node(node).mesh.as_ref().map_or(Vec3::ZERO, |m| m.bounds.center());
        let world = self.graph.world_matrix(node).transform_point3(local);
        let ndc = self.camera.project(world)?;
        Some(Vec2::new(
            (ndc.x + 1.0) / 2.0 * self.viewport.width,
            (1.0 - ndc.y) / 2.0 * self.viewport.height,
        ))
    }
}
