use aperture_common::Event;
use aperture_input::InputTracker;

use crate::Platform;

/// Per-tick view handed to the hooks: the platform (for sizes, surface
/// access, reconfiguration) and read-only input queries.
pub struct TickContext<'a, P: Platform> {
    pub platform: &'a mut P,
    pub input: &'a InputTracker,
}

/// The optional-hook contract an application composes against.
///
/// Capabilities are declared once, at composition time, through the
/// associated consts; the driver consults them as compile-time constants,
/// so an undeclared hook costs nothing and is never invoked. The provided
/// method bodies are no-ops so an application implements only the subset
/// it declares.
///
/// `filter_event` is the overlay/diagnostic seam: it sees every event
/// before the input tracker does, and returning `true` consumes the
/// event, halting further dispatch for that event only.
pub trait AppHooks<P: Platform> {
    const HANDLES_EVENTS: bool = false;
    const HANDLES_UPDATE: bool = false;
    const HANDLES_RENDER: bool = false;

    fn filter_event(&mut self, _event: &Event) -> bool {
        false
    }

    fn on_event(&mut self, _event: &Event, _ctx: &mut TickContext<'_, P>) {}

    fn on_update(&mut self, _dt: f64, _ctx: &mut TickContext<'_, P>) {}

    fn on_render(&mut self, _ctx: &mut TickContext<'_, P>) {}
}
