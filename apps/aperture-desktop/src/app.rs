use anyhow::{Context, Result};
use glam::{Vec2, Vec3};

use aperture_common::{Event, Key, MouseButton, Viewport};
use aperture_input::InputTracker;
use aperture_render::{Camera, CameraConstants, Transform};
use aperture_render_wgpu::{CLEAR_COLOR, FrameRing, SceneRenderer};
use aperture_runtime::{AppHooks, Platform, TickContext};

use crate::overlay::EguiOverlay;
use crate::platform::DesktopPlatform;

/// The composed application: camera + view transform, the frame ring,
/// the demo scene, and the diagnostic overlay, wired into the driver
/// through all three hooks.
pub struct HostApp {
    camera: Camera,
    view: Transform,
    ring: FrameRing,
    scene: Option<SceneRenderer>,
    overlay: EguiOverlay,
    viewport: Viewport,
}

impl HostApp {
    pub fn new(platform: &DesktopPlatform, shader_path: &str) -> Result<Self> {
        let gpu = platform.gpu();
        let (width, height) = platform.framebuffer_size();

        let mut camera = Camera::default();
        camera.set_size(width, height);

        let ring = FrameRing::new(
            &gpu.device,
            gpu.color_format(),
            gpu.depth_format,
            width as i32,
            height as i32,
        );

        // The shader is a required startup asset; a missing file aborts
        // before the loop starts.
        let shader_source =
            aperture_assets::read_text(shader_path).context("required scene shader is missing")?;
        let scene = match SceneRenderer::new(
            &gpu.device,
            &gpu.queue,
            &shader_source,
            ring.bind_group_layout(),
            gpu.color_format(),
            gpu.depth_format,
        ) {
            Ok(scene) => Some(scene),
            Err(err) => {
                tracing::error!("scene renderer unavailable, frames will only clear: {err}");
                None
            }
        };

        let overlay = EguiOverlay::new(&gpu.device, gpu.color_format());

        Ok(Self {
            camera,
            view: Transform {
                rotation: Vec2::ZERO,
                position: Vec3::new(0.0, 0.8, 3.0),
            },
            ring,
            scene,
            overlay,
            viewport: Viewport::new(0, 0, width as i32, height as i32),
        })
    }

    /// WASD/Space/Ctrl movement with a Shift boost, right-button mouse
    /// look.
    fn apply_fly_controls(&mut self, dt: f32, input: &InputTracker) {
        let speed = if input.is_key_held(Key::ShiftLeft) {
            9.0
        } else {
            3.0
        };
        let forward = -self.view.forward();
        let right = self.view.right();

        let mut motion = Vec3::ZERO;
        if input.is_key_held(Key::W) {
            motion += forward;
        }
        if input.is_key_held(Key::S) {
            motion -= forward;
        }
        if input.is_key_held(Key::D) {
            motion += right;
        }
        if input.is_key_held(Key::A) {
            motion -= right;
        }
        if input.is_key_held(Key::Space) {
            motion += Vec3::Y;
        }
        if input.is_key_held(Key::ControlLeft) {
            motion -= Vec3::Y;
        }
        if motion != Vec3::ZERO {
            self.view.position += motion.normalize() * speed * dt;
        }

        if input.is_mouse_held(MouseButton::Right) {
            let look = input.cursor_delta().as_vec2() * 0.2;
            self.view.rotation.x += look.x;
            self.view.rotation.y = (self.view.rotation.y + look.y).clamp(-89.0, 89.0);
        }
    }

    fn render_frame(&mut self, ctx: &mut TickContext<'_, DesktopPlatform>) {
        if self.viewport.is_degenerate() {
            return;
        }
        if self.ring.current().target().is_none() {
            // Degraded slot; skip until the next successful resize.
            return;
        }
        if !ctx.platform.acquire_frame() {
            return;
        }

        let gpu = ctx.platform.gpu();
        let slot = self.ring.current();
        let Some(target) = slot.target() else {
            return;
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view(),
                    // Reversed z: the far plane clears to 0.0.
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                ..Default::default()
            });
            if let Some(scene) = &self.scene {
                scene.draw(&mut pass, slot.bind_group());
            }
        }

        self.overlay.paint(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            target.color_view(),
            target.size(),
        );

        if let Some(surface) = ctx.platform.pending_texture() {
            target.blit_to(&mut encoder, surface);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl AppHooks<DesktopPlatform> for HostApp {
    const HANDLES_EVENTS: bool = true;
    const HANDLES_UPDATE: bool = true;
    const HANDLES_RENDER: bool = true;

    fn filter_event(&mut self, event: &Event) -> bool {
        self.overlay.handle_event(event)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut TickContext<'_, DesktopPlatform>) {
        match *event {
            Event::WindowResize { width, height } => {
                if width > 0 && height > 0 {
                    self.camera.set_size(width as u32, height as u32);
                }
                ctx.platform.resize_surface(width, height);
                self.ring
                    .resize(&ctx.platform.gpu().device, width, height);
            }
            Event::FramebufferResize { width, height } => {
                self.viewport = Viewport::new(0, 0, width, height);
            }
            _ => {}
        }
    }

    fn on_update(&mut self, dt: f64, ctx: &mut TickContext<'_, DesktopPlatform>) {
        let dt = (dt as f32).min(0.1);
        self.apply_fly_controls(dt, ctx.input);

        // This tick's constants go to the current slot while the GPU may
        // still consume the previous slot's.
        let constants = CameraConstants::new(&self.camera, &self.view);
        self.ring
            .write_constants(&ctx.platform.gpu().queue, &constants);

        self.overlay.begin_tick(dt, ctx.platform.scale_factor());
    }

    fn on_render(&mut self, ctx: &mut TickContext<'_, DesktopPlatform>) {
        self.render_frame(ctx);
        // Once per tick regardless of skips, so the ring keeps cycling.
        self.ring.advance();
    }
}
