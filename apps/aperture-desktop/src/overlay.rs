use std::time::Instant;

use aperture_common::{ButtonAction, Event, Key, Modifiers, MouseButton};

/// egui diagnostic layer: frame-time readout composited into the
/// offscreen color target before the blit.
///
/// It receives every host event first; events egui wants (pointer over a
/// widget, focused text field) are reported as consumed, halting further
/// dispatch for that event only.
pub struct EguiOverlay {
    ctx: egui::Context,
    renderer: egui_wgpu::Renderer,
    events: Vec<egui::Event>,
    cursor: egui::Pos2,
    pixels_per_point: f32,
    predicted_dt: f32,
    frame_ms: f32,
    start: Instant,
}

impl EguiOverlay {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        Self {
            ctx: egui::Context::default(),
            renderer: egui_wgpu::Renderer::new(device, color_format, None, 1, false),
            events: Vec::new(),
            cursor: egui::Pos2::ZERO,
            pixels_per_point: 1.0,
            predicted_dt: 1.0 / 60.0,
            frame_ms: 16.6,
            start: Instant::now(),
        }
    }

    /// Feed one host event; returns whether the overlay consumed it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match *event {
            Event::MouseMove { x, y } => {
                self.cursor = egui::pos2(
                    x as f32 / self.pixels_per_point,
                    y as f32 / self.pixels_per_point,
                );
                self.events.push(egui::Event::PointerMoved(self.cursor));
                false
            }
            Event::MouseButton { button, action, mods } => {
                if let Some(button) = pointer_button(button) {
                    self.events.push(egui::Event::PointerButton {
                        pos: self.cursor,
                        button,
                        pressed: action == ButtonAction::Press,
                        modifiers: egui_modifiers(mods),
                    });
                }
                self.ctx.wants_pointer_input()
            }
            Event::Key { key, action, mods, .. } => {
                if let Some(key) = egui_key(key) {
                    self.events.push(egui::Event::Key {
                        key,
                        physical_key: None,
                        pressed: action == ButtonAction::Press,
                        repeat: false,
                        modifiers: egui_modifiers(mods),
                    });
                }
                self.ctx.wants_keyboard_input()
            }
            Event::Focus { focused } => {
                self.events.push(egui::Event::WindowFocused(focused));
                false
            }
            _ => false,
        }
    }

    /// Per-tick bookkeeping before the render pass runs.
    pub fn begin_tick(&mut self, dt: f32, pixels_per_point: f32) {
        self.predicted_dt = dt;
        self.pixels_per_point = pixels_per_point;
        self.frame_ms = self.frame_ms * 0.95 + dt * 1000.0 * 0.05;
    }

    /// Run the UI and paint it onto `view` (load, not clear).
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: (u32, u32),
    ) {
        let (width, height) = size_in_pixels;
        self.ctx.set_pixels_per_point(self.pixels_per_point);

        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(
                    width as f32 / self.pixels_per_point,
                    height as f32 / self.pixels_per_point,
                ),
            )),
            time: Some(self.start.elapsed().as_secs_f64()),
            predicted_dt: self.predicted_dt,
            events: std::mem::take(&mut self.events),
            ..Default::default()
        };

        let frame_ms = self.frame_ms;
        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("frame_stats"))
                .fixed_pos(egui::pos2(8.0, 8.0))
                .show(ctx, |ui| {
                    ui.label(format!(
                        "average {:.3} ms/frame ({:.1} FPS)",
                        frame_ms,
                        1000.0 / frame_ms.max(0.001)
                    ));
                });
        });

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<egui::PointerButton> {
    match button {
        MouseButton::Left => Some(egui::PointerButton::Primary),
        MouseButton::Right => Some(egui::PointerButton::Secondary),
        MouseButton::Middle => Some(egui::PointerButton::Middle),
        MouseButton::Back => Some(egui::PointerButton::Extra1),
        MouseButton::Forward => Some(egui::PointerButton::Extra2),
        MouseButton::Other(_) => None,
    }
}

fn egui_modifiers(mods: Modifiers) -> egui::Modifiers {
    egui::Modifiers {
        alt: mods.contains(Modifiers::ALT),
        ctrl: mods.contains(Modifiers::CONTROL),
        shift: mods.contains(Modifiers::SHIFT),
        mac_cmd: false,
        command: mods.contains(Modifiers::CONTROL),
    }
}

/// Only the keys the overlay's widgets can use.
fn egui_key(key: Key) -> Option<egui::Key> {
    let key = match key {
        Key::Escape => egui::Key::Escape,
        Key::Enter => egui::Key::Enter,
        Key::Tab => egui::Key::Tab,
        Key::Backspace => egui::Key::Backspace,
        Key::Space => egui::Key::Space,
        Key::ArrowUp => egui::Key::ArrowUp,
        Key::ArrowDown => egui::Key::ArrowDown,
        Key::ArrowLeft => egui::Key::ArrowLeft,
        Key::ArrowRight => egui::Key::ArrowRight,
        _ => return None,
    };
    Some(key)
}
