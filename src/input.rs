use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

/// Drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Client position (origin top-left, y down) to device space (-1..1, y up).
    pub fn to_ndc(&self, client: Vec2) -> Vec2 {
        Vec2::new(
            client.x / self.width * 2.0 - 1.0,
            -(client.y / self.height) * 2.0 + 1.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Up,
    Drag(Vec2),
    /// Pointer moved with no button held.
    Hover(Vec2),
    Wheel(f32),
}

/// Folds winit window events into pointer gestures.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Option<Vec2>,
    pressed: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &WindowEvent) -> Option<PointerInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.button(*state == ElementState::Pressed),
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                Some(PointerInput::Wheel(amount))
            }
            WindowEvent::Touch(touch) => {
                let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        self.position = Some(location);
                        self.button(true)
                    }
                    TouchPhase::Moved => self.cursor_moved(location),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.button(false),
                }
            }
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> Option<PointerInput> {
        let previous = self.position.replace(position);
        match (previous, self.pressed) {
            (Some(old), true) => Some(PointerInput::Drag(position - old)),
            (None, true) => None,
            (_, false) => Some(PointerInput::Hover(position)),
        }
    }

    pub fn button(&mut self, pressed: bool) -> Option<PointerInput> {
        if pressed == self.pressed {
            return None;
        }
        self.pressed = pressed;
        if pressed {
            self.position.map(PointerInput::Down)
        } else {
            Some(PointerInput::Up)
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // winit events carry opaque device ids, so these drive the tracker through its own methods

    #[test]
    fn ndc_corners() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
    }

    #[test]
    fn press_reports_down_at_cursor() {
        let mut tracker = PointerTracker::new();
        tracker.cursor_moved(Vec2::new(10.0, 20.0));
        assert_eq!(tracker.button(true), Some(PointerInput::Down(Vec2::new(10.0, 20.0))));
        assert!(tracker.is_pressed());
    }

    #[test]
    fn press_without_position_is_ignored() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.button(true), None);
    }

    #[test]
    fn move_while_pressed_is_drag() {
        let mut tracker = PointerTracker::new();
        tracker.cursor_moved(Vec2::new(10.0, 10.0));
        tracker.button(true);
        assert_eq!(
            tracker.cursor_moved(Vec2::new(15.0, 7.0)),
            Some(PointerInput::Drag(Vec2::new(5.0, -3.0)))
        );
        assert_eq!(tracker.button(false), Some(PointerInput::Up));
        assert_eq!(
            tracker.cursor_moved(Vec2::new(20.0, 7.0)),
            Some(PointerInput::Hover(Vec2::new(20.0, 7.0)))
        );
    }

    #[test]
    fn move_without_press_is_hover() {
        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.cursor_moved(Vec2::new(3.0, 4.0)),
            Some(PointerInput::Hover(Vec2::new(3.0, 4.0)))
        );
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn repeated_press_is_reported_once() {
        let mut tracker = PointerTracker::new();
        tracker.cursor_moved(Vec2::ONE);
        assert!(tracker.button(true).is_some());
        assert!(tracker.button(true).is_none());
    }
}
