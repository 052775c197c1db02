//! CPU-side mesh geometry.
//!
//! [`Geometry`] holds an indexed triangle list of [`ModelVertex`] values. The
//! builders here produce the three primitive shapes a scene needs (hexagonal
//! columns, heightmap-displaced grounds and the skybox cube). Geometry is
//! engine-agnostic; an [`Engine`](crate::engine::Engine) uploads it.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3, Zero};

use crate::errors::{Error, Result};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// An indexed triangle list, counter-clockwise front faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// A prism with `tessellation` flat sides, centred on the origin.
    ///
    /// With a tessellation of 6 this is the hexagonal column used by the hex field.
    pub fn cylinder(diameter: f32, height: f32, tessellation: u32) -> Result<Self> {
        if tessellation < 3 {
            return Err(Error::InvalidArgument(format!(
                "a cylinder needs at least 3 sides, got {}",
                tessellation
            )));
        }
        let radius = diameter / 2.0;
        let half = height / 2.0;
        let angle = |k: u32| k as f32 / tessellation as f32 * TAU;
        let rim = |a: f32, y: f32| [radius * a.cos(), y, radius * a.sin()];

        let mut geometry = Geometry::default();

        for k in 0..tessellation {
            let (a0, a1) = (angle(k), angle(k + 1));
            let mid = (a0 + a1) / 2.0;
            let normal = [mid.cos(), 0.0, mid.sin()];
            let (u0, u1) = (
                k as f32 / tessellation as f32,
                (k + 1) as f32 / tessellation as f32,
            );
            let side = |position, tex_coords| ModelVertex {
                position,
                tex_coords,
                normal,
            };
            let base = geometry.vertices.len() as u32;
            geometry.vertices.extend([
                side(rim(a0, -half), [u0, 1.0]),
                side(rim(a1, -half), [u1, 1.0]),
                side(rim(a1, half), [u1, 0.0]),
                side(rim(a0, half), [u0, 0.0]),
            ]);
            geometry
                .indices
                .extend([base, base + 3, base + 2, base, base + 2, base + 1]);
        }

        for (y, up) in [(half, true), (-half, false)] {
            let normal = [0.0, if up { 1.0 } else { -1.0 }, 0.0];
            let centre = geometry.vertices.len() as u32;
            geometry.vertices.push(ModelVertex {
                position: [0.0, y, 0.0],
                tex_coords: [0.5, 0.5],
                normal,
            });
            geometry.vertices.extend((0..tessellation).map(|k| {
                let a = angle(k);
                ModelVertex {
                    position: rim(a, y),
                    tex_coords: [0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin()],
                    normal,
                }
            }));
            for k in 0..tessellation {
                let current = centre + 1 + k;
                let next = centre + 1 + (k + 1) % tessellation;
                if up {
                    geometry.indices.extend([centre, next, current]);
                } else {
                    geometry.indices.extend([centre, current, next]);
                }
            }
        }

        Ok(geometry)
    }

    /// A `width` × `height` grid of `subdivisions` × `subdivisions` cells, displaced
    /// along +y by the heightmap.
    ///
    /// Samples are reduced to a single gradient with the luminance weights
    /// `(0.3, 0.59, 0.11)` and mapped linearly onto `min_height..=max_height`.
    /// Row 0 of the image lies at `z = +height / 2`.
    pub fn ground_from_heightmap(
        heightmap: &image::RgbImage,
        width: f32,
        height: f32,
        subdivisions: u32,
        min_height: f32,
        max_height: f32,
    ) -> Result<Self> {
        if subdivisions == 0 {
            return Err(Error::InvalidArgument(
                "a heightmap ground needs at least one subdivision".to_string(),
            ));
        }
        let (map_width, map_height) = heightmap.dimensions();
        if map_width == 0 || map_height == 0 {
            return Err(Error::InvalidArgument("heightmap image is empty".to_string()));
        }

        // Vertex indices are u32, so the whole grid must be addressable by one
        let vertex_count = subdivisions
            .checked_add(1)
            .and_then(|stride| stride.checked_mul(stride))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "{} subdivisions exceed the u32 vertex index range",
                    subdivisions
                ))
            })?;

        let s = subdivisions;
        let stride = s + 1;
        let mut vertices = Vec::with_capacity(vertex_count as usize);
        for row in 0..=s {
            for col in 0..=s {
                let u = col as f32 / s as f32;
                let v = row as f32 / s as f32;
                let px = (u * (map_width - 1) as f32) as u32;
                let py = (v * (map_height - 1) as f32) as u32;
                let [r, g, b] = heightmap.get_pixel(px, py).0;
                let gradient = (r as f32 * 0.3 + g as f32 * 0.59 + b as f32 * 0.11) / 255.0;
                vertices.push(ModelVertex {
                    position: [
                        u * width - width / 2.0,
                        min_height + (max_height - min_height) * gradient,
                        height / 2.0 - v * height,
                    ],
                    tex_coords: [u, v],
                    normal: [0.0; 3],
                });
            }
        }

        let mut indices = Vec::with_capacity(s as usize * s as usize * 6);
        for row in 0..s {
            for col in 0..s {
                let i0 = row * stride + col;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                indices.extend([i0, i1, i2, i1, i3, i2]);
            }
        }

        let mut geometry = Geometry { vertices, indices };
        geometry.compute_smooth_normals();
        Ok(geometry)
    }

    /// An axis-aligned cube with outward facing sides, centred on the origin.
    pub fn cuboid(size: f32) -> Self {
        let h = size / 2.0;
        // (normal, u, v) with u × v == normal
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let mut geometry = Geometry::default();
        for (normal, u, v) in faces {
            let (n, u, v) = (Vector3::from(normal), Vector3::from(u), Vector3::from(v));
            let base = geometry.vertices.len() as u32;
            for (su, sv, uv) in [
                (-1.0, -1.0, [0.0, 1.0]),
                (1.0, -1.0, [1.0, 1.0]),
                (1.0, 1.0, [1.0, 0.0]),
                (-1.0, 1.0, [0.0, 0.0]),
            ] {
                let position = (n + u * su + v * sv) * h;
                geometry.vertices.push(ModelVertex {
                    position: position.into(),
                    tex_coords: uv,
                    normal,
                });
            }
            geometry
                .indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        geometry
    }

    /// Axis-aligned `(min, max)` corners, `None` for empty geometry.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v.position[axis]);
                hi[axis] = hi[axis].max(v.position[axis]);
            }
            (lo, hi)
        }))
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn compute_smooth_normals(&mut self) {
        let mut normals = vec![Vector3::<f32>::zero(); self.vertices.len()];
        for tri in self.indices.chunks(3) {
            let p0 = Vector3::from(self.vertices[tri[0] as usize].position);
            let p1 = Vector3::from(self.vertices[tri[1] as usize].position);
            let p2 = Vector3::from(self.vertices[tri[2] as usize].position);
            // Area weighted: the cross product is left unnormalised
            let face = (p1 - p0).cross(p2 - p0);
            for &i in tri {
                normals[i as usize] += face;
            }
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = if normal.magnitude2() > f32::EPSILON {
                normal.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(g: &Geometry, tri: &[u32]) -> Vector3<f32> {
        let p = |i: u32| Vector3::from(g.vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]))
    }

    #[test]
    fn hex_column_has_six_sides_and_two_caps() {
        let g = Geometry::cylinder(1.0, 0.8, 6).unwrap();
        assert_eq!(g.vertices.len(), 6 * 4 + 2 * 7);
        assert_eq!(g.triangle_count(), 6 * 2 + 2 * 6);

        let (lo, hi) = g.bounds().unwrap();
        assert!((lo[1] + 0.4).abs() < 1e-6);
        assert!((hi[1] - 0.4).abs() < 1e-6);
        assert!(hi[0] <= 0.5 + 1e-6 && lo[0] >= -0.5 - 1e-6);
    }

    #[test]
    fn cylinder_triangles_face_outwards() {
        let g = Geometry::cylinder(1.0, 1.0, 6).unwrap();
        for tri in g.indices.chunks(3) {
            let n = face_normal(&g, tri);
            let centroid = tri
                .iter()
                .map(|&i| Vector3::from(g.vertices[i as usize].position))
                .fold(Vector3::zero(), |acc, p| acc + p)
                / 3.0;
            assert!(n.dot(centroid) > 0.0, "inward facing triangle {:?}", tri);
        }
    }

    #[test]
    fn cylinder_rejects_degenerate_tessellation() {
        assert!(matches!(
            Geometry::cylinder(1.0, 1.0, 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn heightmap_remaps_luminance_to_height_range() {
        let mut map = image::RgbImage::new(2, 2);
        map.put_pixel(0, 0, image::Rgb([255, 255, 255]));
        let g = Geometry::ground_from_heightmap(&map, 10.0, 10.0, 1, 2.0, 4.0).unwrap();

        assert_eq!(g.vertices.len(), 4);
        assert_eq!(g.indices.len(), 6);
        // top-left sample is white, the rest black
        assert!((g.vertices[0].position[1] - 4.0).abs() < 1e-4);
        assert_eq!(g.vertices[0].position[0], -5.0);
        assert_eq!(g.vertices[0].position[2], 5.0);
        assert!(g.vertices[1..].iter().all(|v| (v.position[1] - 2.0).abs() < 1e-6));
    }

    #[test]
    fn flat_heightmap_faces_up() {
        let map = image::RgbImage::from_pixel(4, 4, image::Rgb([128, 128, 128]));
        let g = Geometry::ground_from_heightmap(&map, 8.0, 8.0, 3, 0.0, 1.0).unwrap();
        assert_eq!(g.vertices.len(), 16);
        assert_eq!(g.indices.len(), 3 * 3 * 6);
        for tri in g.indices.chunks(3) {
            assert!(face_normal(&g, tri).y > 0.0);
        }
        assert!(g.vertices.iter().all(|v| (v.normal[1] - 1.0).abs() < 1e-5));
    }

    #[test]
    fn heightmap_grid_beyond_u32_indices_is_rejected() {
        let map = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
        for subdivisions in [65_536, u32::MAX] {
            assert!(matches!(
                Geometry::ground_from_heightmap(&map, 1.0, 1.0, subdivisions, 0.0, 1.0),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn cuboid_spans_size() {
        let g = Geometry::cuboid(1000.0);
        assert_eq!(g.vertices.len(), 24);
        assert_eq!(g.bounds(), Some(([-500.0; 3], [500.0; 3])));
        for tri in g.indices.chunks(3) {
            let n = face_normal(&g, tri);
            let p = Vector3::from(g.vertices[tri[0] as usize].position);
            assert!(n.dot(p) > 0.0);
        }
    }
}
