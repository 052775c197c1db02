//! Orbit camera, projection and the camera uniform.
//!
//! The [`OrbitCamera`] circles a target point. Its eye sits at
//! `target + radius * (cos α sin β, cos β, sin α sin β)`, so `alpha` is the azimuth
//! around +y and `beta` the angle down from +y. Once attached to a surface it reacts
//! to left-drag (orbit) and the mouse wheel (zoom).

use std::f32::consts::PI;

use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::config::CameraRig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const BETA_LIMIT: f32 = 0.01;

/// Input tuning for an attached orbit camera.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Cursor pixels per radian of rotation.
    pub angular_sensibility: f32,
    /// Wheel lines per world unit of zoom.
    pub wheel_precision: f32,
    pub lower_radius_limit: f32,
    pub upper_radius_limit: f32,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            angular_sensibility: 1000.0,
            wheel_precision: 3.0,
            lower_radius_limit: 1.0,
            upper_radius_limit: 400.0,
            dragging: false,
            last_cursor: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Point3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub controls: OrbitControls,
    attached: bool,
}

impl OrbitCamera {
    pub fn new(alpha: f32, beta: f32, radius: f32, target: impl Into<Point3<f32>>) -> Self {
        Self {
            alpha,
            beta,
            radius,
            target: target.into(),
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 2000.0,
            controls: OrbitControls::default(),
            attached: false,
        }
    }

    pub fn from_rig(rig: &CameraRig) -> Self {
        Self {
            fovy: Deg(rig.fovy_degrees),
            znear: rig.znear,
            zfar: rig.zfar,
            ..Self::new(rig.alpha, rig.beta, rig.radius, rig.target)
        }
    }

    pub fn position(&self) -> Point3<f32> {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + Vector3::new(cos_a * sin_b, cos_b, sin_a * sin_b) * self.radius
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }

    /// Start reacting to pointer input from the surface.
    pub fn attach_control(&mut self) {
        self.attached = true;
    }

    pub fn detach_control(&mut self) {
        self.attached = false;
        self.controls.dragging = false;
        self.controls.last_cursor = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn rotate(&mut self, d_alpha: f32, d_beta: f32) {
        self.alpha += d_alpha;
        self.beta = (self.beta + d_beta).clamp(BETA_LIMIT, PI - BETA_LIMIT);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius - delta).clamp(
            self.controls.lower_radius_limit,
            self.controls.upper_radius_limit,
        );
    }

    pub fn on_button(&mut self, pressed: bool) {
        if self.attached {
            self.controls.dragging = pressed;
        }
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        if !self.attached {
            return;
        }
        if let (true, Some((last_x, last_y))) = (self.controls.dragging, self.controls.last_cursor)
        {
            let sensibility = self.controls.angular_sensibility;
            let dx = (x - last_x) as f32 / sensibility;
            let dy = (y - last_y) as f32 / sensibility;
            self.rotate(-dx, -dy);
        }
        self.controls.last_cursor = Some((x, y));
    }

    /// `lines` > 0 zooms in.
    pub fn on_wheel(&mut self, lines: f32) {
        if self.attached {
            self.zoom(lines / self.controls.wheel_precision);
        }
    }

    /// Feed a window event. Returns `true` if the camera consumed it.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        if !self.attached {
            return false;
        }
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.on_button(*state == ElementState::Pressed);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x, position.y);
                self.controls.dragging
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    // ~20px per line on most platforms
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                self.on_wheel(lines);
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    /// A projection with the camera's lens settings.
    pub fn for_camera(camera: &OrbitCamera, width: u32, height: u32) -> Self {
        Self::new(width, height, camera.fovy, camera.znear, camera.zfar)
    }

    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &OrbitCamera, projection: &Projection) {
        self.view_position = camera.position().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera uniform buffer and its bind group, owned by the wgpu engine.
#[derive(Debug)]
pub struct CameraResources {
    pub projection: Projection,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, projection: Projection) -> Self {
        use wgpu::util::DeviceExt;

        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            projection,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, camera: &OrbitCamera) {
        self.uniform.update_view_proj(camera, &self.projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{EuclideanSpace, InnerSpace};

    use super::*;

    fn reference_camera() -> OrbitCamera {
        OrbitCamera::from_rig(&CameraRig::default())
    }

    #[test]
    fn reference_rig_looks_down_from_negative_z() {
        let eye = reference_camera().position();
        assert!(eye.x.abs() < 1e-5);
        assert!((eye.y - 10.0 * (PI / 2.5).cos()).abs() < 1e-5);
        assert!((eye.z + 10.0 * (PI / 2.5).sin()).abs() < 1e-5);
        assert!((eye.to_vec().magnitude() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn detached_camera_ignores_input() {
        let mut camera = reference_camera();
        camera.on_button(true);
        camera.on_cursor_moved(0.0, 0.0);
        camera.on_cursor_moved(500.0, 0.0);
        camera.on_wheel(3.0);
        assert_eq!(camera, reference_camera());
    }

    #[test]
    fn dragging_orbits_and_wheel_zooms() {
        let mut camera = reference_camera();
        camera.attach_control();
        camera.on_cursor_moved(100.0, 100.0);
        camera.on_button(true);
        camera.on_cursor_moved(600.0, 100.0);
        assert!((camera.alpha - (-PI / 2.0 - 0.5)).abs() < 1e-5);

        camera.on_button(false);
        camera.on_cursor_moved(0.0, 0.0);
        assert!((camera.alpha - (-PI / 2.0 - 0.5)).abs() < 1e-5);

        camera.on_wheel(3.0);
        assert!((camera.radius - 9.0).abs() < 1e-5);
    }

    #[test]
    fn elevation_stays_above_poles() {
        let mut camera = reference_camera();
        camera.rotate(0.0, 10.0);
        assert!(camera.beta < PI);
        camera.rotate(0.0, -20.0);
        assert!(camera.beta > 0.0);
    }
}
