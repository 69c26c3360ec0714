use std::sync::Arc;
use std::time::Duration;

use crate::globe::{GridSpec, LandShape};
use crate::render::FrameRequest;

/// Rotation of one globe instance, in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    /// Advanced by the clock, never wrapped explicitly
    pub auto_rotation: f64,
    /// Pitch accumulated from vertical drags
    pub manual_rotation_x: f64,
    /// Yaw accumulated from horizontal drags
    pub manual_rotation_y: f64,
}

/// Pointer interaction state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Holds the last pointer position seen during the drag
    Dragging { last: (f64, f64) },
}

/// A single touch contact in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

/// Owns the rotation state: drag input, the auto-rotation clock and the
/// per-frame request builder. Pointer samples are folded in immediately, so
/// the latest position always wins and nothing is queued.
#[derive(Debug, Clone)]
pub struct Controller {
    rotation: RotationState,
    drag: DragState,
    /// Radians per pixel of drag
    sensitivity: f64,
    /// Radians per second
    speed: f64,
    tilt: f64,
}

impl Controller {
    pub fn new(grid: &GridSpec, sensitivity: f64) -> Self {
        Self {
            rotation: RotationState::default(),
            drag: DragState::Idle,
            sensitivity,
            speed: grid.auto_rotation_speed,
            tilt: grid.tilt(),
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Advance the auto-rotation clock. Independent of drag state.
    pub fn advance(&mut self, dt: Duration) {
        self.rotation.auto_rotation += self.speed * dt.as_secs_f64();
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag = DragState::Dragging { last: (x, y) };
    }

    /// Horizontal motion turns yaw, vertical motion turns pitch
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let DragState::Dragging { last } = self.drag else {
            return;
        };
        self.nudge(x - last.0, y - last.1);
        self.drag = DragState::Dragging { last: (x, y) };
    }

    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Only single-touch gestures drag
    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        if let [t] = touches {
            self.pointer_down(t.x, t.y);
        }
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) {
        if let [t] = touches {
            self.pointer_move(t.x, t.y);
        }
    }

    pub fn touch_end(&mut self) {
        self.pointer_up();
    }

    /// Apply a drag delta in pixels without going through the pointer state
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.rotation.manual_rotation_y += dx * self.sensitivity;
        self.rotation.manual_rotation_x += dy * self.sensitivity;
    }

    /// Drop accumulated drag rotation; the clock keeps its angle
    pub fn reset_manual(&mut self) {
        self.rotation.manual_rotation_x = 0.0;
        self.rotation.manual_rotation_y = 0.0;
    }

    /// Composed (pitch, yaw) for the next frame
    pub fn frame_angles(&self) -> (f64, f64) {
        (
            self.tilt + self.rotation.manual_rotation_x,
            self.rotation.auto_rotation + self.rotation.manual_rotation_y,
        )
    }

    /// Build the worker message for frame `seq`
    pub fn frame_request(&self, seq: u64, shapes: &Arc<[LandShape]>, grid: &GridSpec) -> FrameRequest {
        let (rotation_x, rotation_y) = self.frame_angles();
        FrameRequest {
            seq,
            rotation_x,
            rotation_y,
            shapes: Arc::clone(shapes),
            grid: *grid,
        }
    }
}
