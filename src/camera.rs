//! First-person fly camera.
//!
//! The pose is a position plus a bearing (rotation about +Y, 0 looks down +X)
//! and a pitch (positive looks up). Input is sampled once per frame into a
//! [`CameraInput`] and applied with [`CameraPose::update`].

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// Pitch stays this far away from straight up or down.
const PITCH_MARGIN: f32 = 0.001;

/// Tuning for movement, look speed and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Units per second.
    pub move_speed: f32,
    /// Radians per second for keyboard turning.
    pub turn_speed: f32,
    /// Radians per pixel of mouse movement.
    pub mouse_sensitivity: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the look-at point in front of the camera.
    pub focus_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 25.0,
            turn_speed: 0.5 * PI,
            mouse_sensitivity: 0.0025,
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 5000.0,
            focus_distance: 100.0,
        }
    }
}

/// Input state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Move along the camera's up vector.
    pub rise: bool,
    /// Move against the camera's up vector.
    pub sink: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Flight-style: raises the pitch.
    pub nose_up: bool,
    /// Flight-style: lowers the pitch.
    pub nose_down: bool,
    /// Cursor offset from the window center in pixels (y grows downwards).
    pub mouse_delta: Vec2,
}

/// Camera position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Radians, wrapped to `[-pi, pi]`.
    pub bearing: f32,
    /// Radians, clamped just inside `(-pi/2, pi/2)`.
    pub pitch: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(-50.0, 10.0, 0.0),
            bearing: 0.0,
            pitch: 0.0,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, bearing: f32, pitch: f32) -> Self {
        let mut pose = Self {
            position,
            bearing,
            pitch,
        };
        pose.normalize();
        pose
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (sb, cb) = self.bearing.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cb * cp, sp, sb * cp)
    }

    /// Unit vector to the camera's left, always horizontal.
    pub fn left(&self) -> Vec3 {
        let (sb, cb) = self.bearing.sin_cos();
        Vec3::new(sb, 0.0, -cb)
    }

    /// Unit vector perpendicular to forward and left.
    pub fn up(&self) -> Vec3 {
        let (sb, cb) = self.bearing.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-cb * sp, cp, -sb * sp)
    }

    /// Point the camera looks at.
    pub fn focus(&self, settings: &CameraSettings) -> Vec3 {
        self.position + self.forward() * settings.focus_distance
    }

    /// Apply one frame of input, `dt` seconds long.
    pub fn update(&mut self, input: &CameraInput, settings: &CameraSettings, dt: f32) {
        let turn = settings.turn_speed * dt;
        if input.turn_right {
            self.bearing += turn;
        }
        if input.turn_left {
            self.bearing -= turn;
        }
        if input.nose_up {
            self.pitch += turn;
        }
        if input.nose_down {
            self.pitch -= turn;
        }

        let step = settings.move_speed * dt;
        let mut delta = Vec3::ZERO;
        if input.forward {
            delta += self.forward();
        }
        if input.backward {
            delta -= self.forward();
        }
        if input.strafe_left {
            delta += self.left();
        }
        if input.strafe_right {
            delta -= self.left();
        }
        if input.rise {
            delta += self.up();
        }
        if input.sink {
            delta -= self.up();
        }
        self.position += delta * step;

        self.look(input.mouse_delta, settings);
    }

    /// Mouse look: positive x turns right, positive y (downwards) lowers the pitch.
    pub fn look(&mut self, mouse_delta: Vec2, settings: &CameraSettings) {
        self.bearing += mouse_delta.x * settings.mouse_sensitivity;
        self.pitch -= mouse_delta.y * settings.mouse_sensitivity;
        self.normalize();
    }

    fn normalize(&mut self) {
        if self.bearing > PI {
            self.bearing -= 2.0 * PI;
        }
        if self.bearing < -PI {
            self.bearing += 2.0 * PI;
        }
        let max_pitch = FRAC_PI_2 - PITCH_MARGIN;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
    }

    /// Get view matrix
    pub fn view_matrix(&self, settings: &CameraSettings) -> Mat4 {
        Mat4::look_at_rh(self.position, self.focus(settings), Vec3::Y)
    }

    /// Get projection matrix for a viewport aspect ratio (width / height).
    pub fn projection_matrix(settings: &CameraSettings, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(settings.fov_y, aspect_ratio, settings.near, settings.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self, settings: &CameraSettings, aspect_ratio: f32) -> Mat4 {
        Self::projection_matrix(settings, aspect_ratio) * self.view_matrix(settings)
    }
}
