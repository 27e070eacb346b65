use aperture_common::Event;

/// The window/event-source collaborator the driver runs against.
///
/// `pump_events` refreshes platform state; `poll_event` then yields a
/// finite sequence that restarts each tick. Implementations own
/// presentation: `swap_buffers` makes the frame rendered this tick
/// visible.
pub trait Platform {
    fn pump_events(&mut self);
    fn poll_event(&mut self) -> Option<Event>;
    fn should_close(&self) -> bool;
    fn window_size(&self) -> (u32, u32);
    fn framebuffer_size(&self) -> (u32, u32);
    fn swap_buffers(&mut self);
}
