//! The wgpu engine.
//!
//! [`WgpuEngine`] implements [`Engine`] on top of wgpu. Resources created through the
//! trait live in id-keyed tables. Every frame runs two passes:
//!
//! 1. shadow pass: depth of every registered caster from the light's view
//! 2. main pass: lit meshes, back-face culled or double sided per material, then
//!    the nodes pinned to infinite distance (the sky box) behind everything else
//!

use std::{collections::HashMap, sync::Arc};

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{CameraResources, OrbitCamera, Projection},
    config::{EngineOptions, ShadowSettings},
    context::Context,
    data_structures::{
        instance::{Instance, InstanceRaw},
        light::DirectionalLight,
        model::Geometry,
        scene_graph::{Material, MaterialId, MeshId, MeshNode, Scene, TextureId},
        shadow::ShadowGenerator,
        texture::Texture,
    },
    engine::Engine,
    errors::{Error, Result},
    pipelines::{
        basic::{self, MaterialUniform},
        light::{LightResources, LightUniform},
        shadow::ShadowResources,
        skybox,
    },
    resources::CubeFaces,
};

/// Vertex, index and instance buffers of one uploaded mesh.
#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub instance_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, name: &str, geometry: &Geometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Instance Buffer", name)),
            contents: bytemuck::cast_slice(&[Instance::new().to_raw(false)]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            vertex_buffer,
            index_buffer,
            instance_buffer,
            num_indices: geometry.indices.len() as u32,
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}

#[derive(Debug)]
struct GpuTexture {
    texture: Texture,
    cube: bool,
}

#[derive(Debug)]
enum GpuMaterial {
    Standard {
        bind_group: wgpu::BindGroup,
        backface_culling: bool,
    },
    Sky {
        bind_group: wgpu::BindGroup,
    },
}

/// Everything that lives on the device. Dropped as a whole on dispose.
struct Gpu {
    ctx: Context,
    camera: CameraResources,
    has_camera: bool,
    light: LightResources,
    has_light: bool,
    shadow: Option<ShadowResources>,
    material_layout: wgpu::BindGroupLayout,
    cube_layout: wgpu::BindGroupLayout,
    mesh_pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    skybox_pipeline: wgpu::RenderPipeline,
    white: Texture,
    default_material: GpuMaterial,
    meshes: HashMap<MeshId, GpuMesh>,
    textures: HashMap<TextureId, GpuTexture>,
    materials: HashMap<MaterialId, GpuMaterial>,
    next_id: u32,
}

impl Gpu {
    fn new(ctx: Context) -> Self {
        let device = &ctx.device;
        let camera = CameraResources::new(
            device,
            Projection::new(ctx.config.width, ctx.config.height, cgmath::Deg(45.0), 0.1, 2000.0),
        );
        let light = LightResources::new(
            device,
            LightUniform::default(),
            Texture::create_shadow_map(device, 1),
        );

        let material_layout = basic::material_layout(device);
        let cube_layout = skybox::cube_layout(device);
        let mesh_pipeline = basic::mk_mesh_pipeline(
            device,
            &ctx.config,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            Some(wgpu::Face::Back),
        );
        let double_sided_pipeline = basic::mk_mesh_pipeline(
            device,
            &ctx.config,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            None,
        );
        let skybox_pipeline = skybox::mk_skybox_pipeline(
            device,
            &ctx.config,
            &cube_layout,
            &camera.bind_group_layout,
        );

        let white = Texture::create_white(device, &ctx.queue);
        let default_material =
            standard_material(device, &material_layout, &white, &Material::default());

        Self {
            ctx,
            camera,
            has_camera: false,
            light,
            has_light: false,
            shadow: None,
            material_layout,
            cube_layout,
            mesh_pipeline,
            double_sided_pipeline,
            skybox_pipeline,
            white,
            default_material,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn material_of(&self, node: &MeshNode) -> &GpuMaterial {
        node.material
            .and_then(|id| self.materials.get(&id))
            .unwrap_or(&self.default_material)
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        let camera = scene
            .camera()
            .ok_or_else(|| Error::Engine("scene has no camera".to_string()))?;
        self.camera.update(&self.ctx.queue, camera);

        let generator = scene.shadow_generator();
        if let Some(light) = scene.light() {
            let extent =
                generator.map_or(ShadowSettings::default().ortho_extent, |g| g.ortho_extent());
            let texel = self.shadow.as_ref().map(|s| s.resolution);
            self.light.write(&self.ctx.queue, LightUniform::new(light, extent, texel));
        }

        for node in scene.nodes() {
            if let Some(mesh) = self.meshes.get(&node.id) {
                let raw: InstanceRaw = node.transform.to_raw(node.receive_shadows);
                self.ctx
                    .queue
                    .write_buffer(&mesh.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
            } else {
                log::warn!("Node {:?} references unknown mesh {:?}", node.name, node.id);
            }
        }

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                self.ctx.reconfigure();
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Timeout => {
                log::warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            e => return Err(Error::Engine(format!("surface error: {:?}", e))),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if let (Some(shadow), Some(generator)) = (&self.shadow, generator) {
            let mut pass = shadow.begin_pass(&mut encoder, &self.light.shadow_map);
            for caster in generator.casters() {
                if let Some(mesh) = self.meshes.get(&caster) {
                    mesh.draw(&mut pass);
                }
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let (finite, infinite) = scene.draw_order();

            for node in finite {
                let Some(mesh) = self.meshes.get(&node.id) else {
                    continue;
                };
                match self.material_of(node) {
                    GpuMaterial::Standard {
                        bind_group,
                        backface_culling,
                    } => {
                        pass.set_pipeline(if *backface_culling {
                            &self.mesh_pipeline
                        } else {
                            &self.double_sided_pipeline
                        });
                        pass.set_bind_group(0, bind_group, &[]);
                        pass.set_bind_group(1, &self.camera.bind_group, &[]);
                        pass.set_bind_group(2, &self.light.bind_group, &[]);
                        mesh.draw(&mut pass);
                    }
                    GpuMaterial::Sky { .. } => {
                        log::warn!("{:?} uses a sky material at a finite distance", node.name)
                    }
                }
            }

            for node in infinite {
                let (Some(mesh), GpuMaterial::Sky { bind_group }) =
                    (self.meshes.get(&node.id), self.material_of(node))
                else {
                    log::warn!("{:?} is at infinite distance without a sky material", node.name);
                    continue;
                };
                pass.set_pipeline(&self.skybox_pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.set_bind_group(1, &self.camera.bind_group, &[]);
                mesh.draw(&mut pass);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

fn standard_material(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    diffuse: &Texture,
    material: &Material,
) -> GpuMaterial {
    let uniform = MaterialUniform::new(
        material.diffuse_colour,
        material.specular_colour,
        material.diffuse_texture.is_some(),
    );
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Material Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    let fallback;
    let sampler = match &diffuse.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = device.create_sampler(&wgpu::SamplerDescriptor::default());
            &fallback
        }
    };
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&diffuse.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("material_bind_group"),
    });
    GpuMaterial::Standard {
        bind_group,
        backface_culling: material.backface_culling,
    }
}

/// [`Engine`] backed by wgpu, drawing into a winit window.
pub struct WgpuEngine {
    gpu: Option<Gpu>,
}

impl WgpuEngine {
    fn gpu(&mut self) -> Result<&mut Gpu> {
        self.gpu
            .as_mut()
            .ok_or_else(|| Error::Engine("engine has been disposed".to_string()))
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.gpu.as_ref().map(|gpu| gpu.ctx.window())
    }

    pub fn request_redraw(&self) {
        if let Some(window) = self.window() {
            window.request_redraw();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.gpu.is_none()
    }
}

impl Engine for WgpuEngine {
    type Surface = Arc<Window>;

    async fn create(surface: Arc<Window>, options: &EngineOptions) -> Result<Self> {
        let ctx = Context::new(surface, options).await?;
        Ok(Self {
            gpu: Some(Gpu::new(ctx)),
        })
    }

    fn create_mesh(&mut self, name: &str, geometry: &Geometry) -> Result<MeshId> {
        if geometry.indices.is_empty() {
            return Err(Error::Engine(format!("mesh {:?} has no triangles", name)));
        }
        let gpu = self.gpu()?;
        let id = MeshId(gpu.next_id());
        let mesh = GpuMesh::new(&gpu.ctx.device, name, geometry);
        gpu.meshes.insert(id, mesh);
        Ok(id)
    }

    fn create_texture(&mut self, name: &str, image: &image::RgbaImage) -> Result<TextureId> {
        let gpu = self.gpu()?;
        let id = TextureId(gpu.next_id());
        let texture = Texture::from_rgba(&gpu.ctx.device, &gpu.ctx.queue, image, Some(name));
        gpu.textures.insert(id, GpuTexture { texture, cube: false });
        Ok(id)
    }

    fn create_cube_texture(&mut self, name: &str, faces: &CubeFaces) -> Result<TextureId> {
        let gpu = self.gpu()?;
        let id = TextureId(gpu.next_id());
        let texture = Texture::from_cube_faces(&gpu.ctx.device, &gpu.ctx.queue, faces, Some(name));
        gpu.textures.insert(id, GpuTexture { texture, cube: true });
        Ok(id)
    }

    fn create_material(&mut self, name: &str, material: &Material) -> Result<MaterialId> {
        let gpu = self.gpu()?;
        let lookup = |id: TextureId, cube: bool| match gpu.textures.get(&id) {
            Some(entry) if entry.cube == cube => Ok(&entry.texture),
            Some(_) => Err(Error::Engine(format!(
                "material {:?}: texture {:?} has the wrong dimension",
                name, id
            ))),
            None => Err(Error::Engine(format!(
                "material {:?}: unknown texture {:?}",
                name, id
            ))),
        };

        let gpu_material = match material.reflection_texture {
            Some(cube) => GpuMaterial::Sky {
                bind_group: skybox::mk_bind_group(
                    &gpu.ctx.device,
                    &gpu.cube_layout,
                    lookup(cube, true)?,
                )?,
            },
            None => {
                let diffuse = match material.diffuse_texture {
                    Some(id) => lookup(id, false)?,
                    None => &gpu.white,
                };
                standard_material(&gpu.ctx.device, &gpu.material_layout, diffuse, material)
            }
        };
        let id = MaterialId(gpu.next_id());
        gpu.materials.insert(id, gpu_material);
        Ok(id)
    }

    fn create_camera(&mut self, camera: &OrbitCamera) -> Result<()> {
        let gpu = self.gpu()?;
        gpu.camera.projection =
            Projection::for_camera(camera, gpu.ctx.config.width, gpu.ctx.config.height);
        gpu.camera.update(&gpu.ctx.queue, camera);
        gpu.has_camera = true;
        Ok(())
    }

    fn attach_control(&mut self, camera: &mut OrbitCamera) -> Result<()> {
        if !self.gpu()?.has_camera {
            return Err(Error::Engine(
                "attach_control before create_camera".to_string(),
            ));
        }
        camera.attach_control();
        Ok(())
    }

    fn create_light(&mut self, light: &DirectionalLight) -> Result<()> {
        let gpu = self.gpu()?;
        let uniform = LightUniform::new(light, ShadowSettings::default().ortho_extent, None);
        gpu.light.write(&gpu.ctx.queue, uniform);
        gpu.has_light = true;
        Ok(())
    }

    fn create_shadow_generator(&mut self, generator: &ShadowGenerator) -> Result<()> {
        let gpu = self.gpu()?;
        if !gpu.has_light {
            return Err(Error::Engine(format!(
                "shadow generator for {:?} created before its light",
                generator.light_name()
            )));
        }
        let resolution = generator.resolution();
        let shadow_map = Texture::create_shadow_map(&gpu.ctx.device, resolution);
        gpu.light.set_shadow_map(&gpu.ctx.device, shadow_map);
        gpu.shadow = Some(ShadowResources::new(
            &gpu.ctx.device,
            resolution,
            &gpu.light.buffer,
        ));
        Ok(())
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.gpu()?.render(scene)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if gpu.ctx.resize(width, height) {
            gpu.camera.projection.resize(width, height);
        }
    }

    fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            log::info!(
                "Releasing {} meshes, {} textures, {} materials",
                gpu.meshes.len(),
                gpu.textures.len(),
                gpu.materials.len()
            );
        }
    }
}
