use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::camera::OPENGL_TO_WGPU_MATRIX;

/// A directional light. `position` only orients the shadow projection.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub name: String,
    pub direction: Vector3<f32>,
    pub position: Vector3<f32>,
    pub colour: [f32; 3],
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(
        name: impl Into<String>,
        direction: impl Into<Vector3<f32>>,
        position: impl Into<Vector3<f32>>,
    ) -> Self {
        Self {
            name: name.into(),
            direction: direction.into(),
            position: position.into(),
            colour: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }

    /// Orthographic view-projection from the light's position along its direction,
    /// covering `extent` units to each side.
    pub fn view_proj(&self, extent: f32) -> Matrix4<f32> {
        let dir = self.direction.normalize();
        let up = if dir.y.abs() > 0.99 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);
        let view = Matrix4::look_to_rh(eye, dir, up);
        let proj = cgmath::ortho(-extent, extent, -extent, extent, -extent * 4.0, extent * 4.0);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}
