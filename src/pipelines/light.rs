use wgpu::util::DeviceExt;

use crate::data_structures::{light::DirectionalLight, texture::Texture};

/// Light data as seen by the mesh and shadow shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    view_proj: [[f32; 4]; 4],
    direction: [f32; 3],
    intensity: f32,
    colour: [f32; 3],
    // Size of one shadow map texel in uv space, 0 while no shadow map exists
    shadow_texel: f32,
}

impl LightUniform {
    pub fn new(
        light: &DirectionalLight,
        ortho_extent: f32,
        shadow_resolution: Option<u32>,
    ) -> Self {
        use cgmath::InnerSpace;
        Self {
            view_proj: light.view_proj(ortho_extent).into(),
            direction: light.direction.normalize().into(),
            intensity: light.intensity,
            colour: light.colour,
            shadow_texel: shadow_resolution.map_or(0.0, |r| 1.0 / r.max(1) as f32),
        }
    }
}

impl Default for LightUniform {
    /// A dim light straight down, used until the scene registers its own.
    fn default() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            direction: [0.0, -1.0, 0.0],
            intensity: 0.0,
            colour: [1.0, 1.0, 1.0],
            shadow_texel: 0.0,
        }
    }
}

/// The light uniform together with the shadow map it is sampled against.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub shadow_map: Texture,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    /// `shadow_map` is a 1x1 placeholder until a shadow generator is created.
    pub fn new(device: &wgpu::Device, uniform: LightUniform, shadow_map: Texture) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer, &shadow_map);
        Self {
            uniform,
            buffer,
            shadow_map,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Swap in a new shadow map and rebuild the bind group that samples it.
    pub fn set_shadow_map(&mut self, device: &wgpu::Device, shadow_map: Texture) {
        self.bind_group = mk_bind_group(device, &self.bind_group_layout, &self.buffer, &shadow_map);
        self.shadow_map = shadow_map;
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Depth,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
    shadow_map: &Texture,
) -> wgpu::BindGroup {
    let fallback;
    let sampler = match &shadow_map.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = device.create_sampler(&wgpu::SamplerDescriptor {
                compare: Some(wgpu::CompareFunction::LessEqual),
                ..Default::default()
            });
            &fallback
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&shadow_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("light_bind_group"),
    })
}
