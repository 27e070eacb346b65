use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use aperture_common::{ButtonAction, Event, Key, Modifiers, MouseButton};
use aperture_runtime::Platform;

use crate::gpu::Gpu;

/// winit-backed [`Platform`]: pumps the event loop each tick, translates
/// winit callbacks into the host event union, and owns surface
/// acquisition and presentation.
pub struct DesktopPlatform {
    event_loop: EventLoop<()>,
    collector: EventCollector,
    window: Arc<Window>,
    gpu: Gpu,
    pending: Option<wgpu::SurfaceTexture>,
}

impl DesktopPlatform {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut collector = EventCollector {
            title: title.to_owned(),
            initial_size: PhysicalSize::new(width.max(1), height.max(1)),
            window: None,
            queue: VecDeque::new(),
            modifiers: Modifiers::empty(),
            close_requested: false,
        };

        // The window is created by the first `resumed` callback.
        while collector.window.is_none() && !collector.close_requested {
            let _ = event_loop.pump_app_events(Some(Duration::from_millis(16)), &mut collector);
        }
        let window = collector
            .window
            .clone()
            .context("event loop produced no window")?;

        let size = window.inner_size();
        let gpu = Gpu::new(window.clone(), size.width, size.height)?;

        Ok(Self {
            event_loop,
            collector,
            window,
            gpu,
            pending: None,
        })
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    /// Reconfigure the surface for a new size; degenerate sizes are left
    /// for the render path's skip state.
    pub fn resize_surface(&mut self, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        self.gpu.resize(width as u32, height as u32);
    }

    /// Acquire this tick's surface texture (the blit destination).
    /// Returns false when no frame is available this tick; a lost or
    /// outdated surface is reconfigured for the next one.
    pub fn acquire_frame(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        match self.gpu.surface.get_current_texture() {
            Ok(frame) => {
                self.pending = Some(frame);
                true
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                false
            }
            Err(err) => {
                tracing::error!("surface error: {err}");
                false
            }
        }
    }

    pub fn pending_texture(&self) -> Option<&wgpu::Texture> {
        self.pending.as_ref().map(|frame| &frame.texture)
    }
}

impl Platform for DesktopPlatform {
    fn pump_events(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.collector);
        if let PumpStatus::Exit(_) = status {
            self.collector.close_requested = true;
        }
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.collector.queue.pop_front()
    }

    fn should_close(&self) -> bool {
        self.collector.close_requested
    }

    fn window_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        // winit reports physical pixels only; the logical/pixel split of
        // other windowing stacks collapses to one size here.
        self.window_size()
    }

    fn swap_buffers(&mut self) {
        if let Some(frame) = self.pending.take() {
            self.window.pre_present_notify();
            frame.present();
        }
    }
}

/// `ApplicationHandler` that translates winit callbacks into the event
/// union, drained by the driver through `poll_event`.
struct EventCollector {
    title: String,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    queue: VecDeque<Event>,
    modifiers: Modifiers,
    close_requested: bool,
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
                self.queue.push_back(Event::WindowClose);
            }
            WindowEvent::Resized(size) => {
                // One physical size feeds both resize events of the union.
                let (width, height) = (size.width as i32, size.height as i32);
                self.queue.push_back(Event::WindowResize { width, height });
                self.queue
                    .push_back(Event::FramebufferResize { width, height });
            }
            WindowEvent::ModifiersChanged(new) => {
                self.modifiers = translate_modifiers(new.state());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(translated) = self.translate_key_event(&event) {
                    self.queue.push_back(translated);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.queue.push_back(Event::MouseButton {
                    button: translate_mouse_button(button),
                    action: translate_state(state),
                    mods: self.modifiers,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.queue.push_back(Event::MouseMove {
                    x: position.x,
                    y: position.y,
                });
            }
            WindowEvent::Focused(focused) => {
                self.queue.push_back(Event::Focus { focused });
            }
            _ => {}
        }
    }
}

impl EventCollector {
    fn translate_key_event(&self, event: &KeyEvent) -> Option<Event> {
        // OS key repeats never become fresh edges.
        if event.repeat {
            return None;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let key = translate_key(code)?;
        Some(Event::Key {
            key,
            // winit does not surface raw scancodes.
            scancode: 0,
            action: translate_state(event.state),
            mods: self.modifiers,
        })
    }
}

fn translate_state(state: ElementState) -> ButtonAction {
    match state {
        ElementState::Pressed => ButtonAction::Press,
        ElementState::Released => ButtonAction::Release,
    }
}

fn translate_modifiers(state: ModifiersState) -> Modifiers {
    let mut mods = Modifiers::empty();
    if state.shift_key() {
        mods |= Modifiers::SHIFT;
    }
    if state.control_key() {
        mods |= Modifiers::CONTROL;
    }
    if state.alt_key() {
        mods |= Modifiers::ALT;
    }
    if state.super_key() {
        mods |= Modifiers::SUPER;
    }
    mods
}

fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Back,
        winit::event::MouseButton::Forward => MouseButton::Forward,
        winit::event::MouseButton::Other(id) => MouseButton::Other(id),
    }
}

fn translate_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Space => Key::Space,
        KeyCode::Enter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ShiftRight => Key::ShiftRight,
        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::ControlRight => Key::ControlRight,
        KeyCode::AltLeft => Key::AltLeft,
        KeyCode::AltRight => Key::AltRight,
        KeyCode::SuperLeft => Key::SuperLeft,
        KeyCode::SuperRight => Key::SuperRight,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        _ => return None,
    };
    Some(key)
}
