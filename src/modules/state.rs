use std::iter;
use log::{debug, error, info};
use winit::{
    event::*,
    window::Window,
};
use crate::modules::assets::gltf_loader::load_model_gltf;
use crate::modules::camera::{camera, orbit_controller::OrbitController};
use crate::modules::core::{
    light::LightsUniform,
    point_shadow::SHADOW_LAYERS,
    scene::{self, Scene},
    texture::{self, ShadowMap},
};
use crate::modules::environment::cycle::Cycle;
use crate::modules::pipelines::{render_pipeline::RenderPipeline, shadow_pipeline::ShadowPipeline};
use crate::modules::setting::Setting;
use crate::modules::utils::functions::{calculate_fps, to_fixed_2};

const FPS_LOG_INTERVAL: u64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("unable to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter")]
    NoAdapter,
    #[error("unable to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

pub struct State<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: RenderPipeline,
    shadow_pipeline: ShadowPipeline,
    shadow_map: ShadowMap,
    camera: camera::Camera,
    projection: camera::Projection,
    pub orbit_controller: OrbitController,
    pub mouse_pressed: bool,
    depth_texture: texture::Texture,
    pub window: &'a Window,
    scene: Scene,
    cycle: Cycle,
    rng: fastrand::Rng,
    frame_count: u64,
}

impl<'a> State<'a> {
    pub async fn new(window: &'a Window) -> Result<State<'a>, StateError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(StateError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // shaders write linear colors, the view format does the sRGB encoding
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format.remove_srgb_suffix(),
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![surface_format.add_srgb_suffix()],
            desired_maximum_frame_latency: 2,
        };

        let setting = Setting::read().await;

        let mut camera = camera::Camera::looking_at((0.0, 1.0, 4.0), (0.0, 0.0, 0.0));
        let projection = camera::Projection::for_scene(config.width, config.height);
        let mut orbit_controller = OrbitController::new(&camera, [0.0, 0.0, 0.0], config.height);
        orbit_controller.update_camera(&mut camera);

        let depth_texture = texture::Texture::create_depth_texture(&device, &config, "depth_texture");
        let shadow_map_size = setting.shadow_map_size.clamp(1, device.limits().max_texture_dimension_2d);
        let shadow_map = ShadowMap::new(&device, shadow_map_size, SHADOW_LAYERS as u32);

        let cycle = Cycle::new(setting.cycle, setting.fog);
        let mut lights = LightsUniform::new(setting.cycle.ambient_intensity, setting.fog.color);
        lights.apply(&cycle.frame());

        let mut render_pipeline = RenderPipeline::new(
            &device,
            &config,
            Some(texture::Texture::DEPTH_FORMAT),
            lights,
            &shadow_map,
        );
        render_pipeline.uniforms.camera.update_view_proj(&camera, &projection);
        let shadow_pipeline = ShadowPipeline::new(&device);

        let mut scene = Scene::new();
        match load_model_gltf(&setting.model_file, &device, &queue, &render_pipeline, &shadow_pipeline).await {
            Ok(gltf_scene) => {
                for object in gltf_scene.objects {
                    scene.add(object);
                }
                scene.add_materials(gltf_scene.materials);
                let matched = scene.apply_shadow_flags(&setting.shadow_casters, &setting.shadow_receivers);
                info!(
                    "{} objects and {} materials in scene, {matched} shadow flags applied",
                    scene.len(),
                    scene.materials().len()
                );
            }
            Err(e) => error!("unable to load {}: {e:#}", setting.model_file),
        }
        scene.compute_world_matrices();
        scene.update_objects_buffers(&queue);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            shadow_pipeline,
            shadow_map,
            camera,
            projection,
            orbit_controller,
            mouse_pressed: false,
            depth_texture,
            window,
            scene,
            cycle,
            rng: fastrand::Rng::new(),
            frame_count: 0,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            info!("new size {new_size:#?}");
            self.size = new_size;
            self.config.width = std::cmp::min(new_size.width, self.device.limits().max_texture_dimension_2d);
            self.config.height = std::cmp::min(new_size.height, self.device.limits().max_texture_dimension_2d);
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = texture::Texture::create_depth_texture(&self.device, &self.config, "depth_texture");
            self.projection.resize(new_size.width, new_size.height);
            self.orbit_controller.set_viewport_height(new_size.height);
        }
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseWheel { delta, .. } => {
                self.orbit_controller.process_scroll(delta);
                true
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.mouse_pressed = *state == ElementState::Pressed;
                true
            }
            _ => false,
        }
    }

    pub fn update(&mut self, dt: instant::Duration) {
        self.orbit_controller.update_camera(&mut self.camera);
        self.render_pipeline.uniforms.camera.update_view_proj(&self.camera, &self.projection);

        let frame = self.cycle.update(&mut self.rng);
        let uniforms = &mut self.render_pipeline.uniforms;
        uniforms.lights.apply(&frame);
        uniforms.shadows.update(&uniforms.lights.point_light_positions());
        self.render_pipeline.write_uniforms(&self.queue);
        self.shadow_pipeline.write_faces(&self.queue, &self.render_pipeline.uniforms.shadows);

        self.frame_count += 1;
        if self.frame_count % FPS_LOG_INTERVAL == 0 {
            let fps = calculate_fps(dt.as_secs_f64() * 1000.0);
            debug!(
                "{} fps, angle {}, fog {:?} at {}",
                to_fixed_2(fps),
                to_fixed_2(frame.angle),
                frame.fog_phase,
                to_fixed_2(frame.fog_density)
            );
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.config.format.add_srgb_suffix()),
            ..Default::default()
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        use scene::DrawScene;
        for (layer_view, face) in self.shadow_map.layer_views.iter().zip(&self.shadow_pipeline.faces) {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: layer_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            shadow_pass.set_pipeline(&self.shadow_pipeline.pipeline);
            shadow_pass.set_bind_group(0, &face.bind_group, &[]);
            shadow_pass.draw_scene_shadows(&self.scene);
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline.pipeline);
            render_pass.set_bind_group(0, &self.render_pipeline.global_bind_group, &[]);
            render_pass.draw_scene(&self.scene);
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
