use aperture_input::InputTracker;
use tracing::{debug, trace};

use crate::{AppHooks, FrameClock, Platform, TickContext};

/// Owns the platform, the application hook set, and the input tracker,
/// and sequences them once per tick:
///
/// 1. measure `dt`,
/// 2. pump and fully drain platform events, dispatching each in fixed
///    order: overlay filter, input tracker, application event hook,
/// 3. advance the input tracker,
/// 4. update hook (if declared),
/// 5. render hook (if declared),
/// 6. present.
pub struct Driver<P: Platform, A: AppHooks<P>> {
    platform: P,
    app: A,
    input: InputTracker,
    clock: FrameClock,
}

impl<P: Platform, A: AppHooks<P>> Driver<P, A> {
    pub fn new(platform: P, app: A) -> Self {
        Self {
            platform,
            app,
            input: InputTracker::new(),
            clock: FrameClock::new(),
        }
    }

    /// Run ticks until the platform signals close. This is the only
    /// termination path.
    pub fn run(&mut self) {
        while !self.platform.should_close() {
            self.tick();
        }
        debug!("close requested, leaving the loop");
    }

    /// One full tick. Public so tests and external schedulers can step
    /// the loop manually.
    pub fn tick(&mut self) {
        let dt = self.clock.tick();
        trace!(dt, "tick");

        self.platform.pump_events();
        while let Some(event) = self.platform.poll_event() {
            if self.app.filter_event(&event) {
                trace!(?event, "consumed by overlay");
                continue;
            }
            self.input.handle_event(&event);
            if A::HANDLES_EVENTS {
                let mut ctx = TickContext {
                    platform: &mut self.platform,
                    input: &self.input,
                };
                self.app.on_event(&event, &mut ctx);
            }
        }
        self.input.tick();

        if A::HANDLES_UPDATE {
            let mut ctx = TickContext {
                platform: &mut self.platform,
                input: &self.input,
            };
            self.app.on_update(dt, &mut ctx);
        }

        if A::HANDLES_RENDER {
            let mut ctx = TickContext {
                platform: &mut self.platform,
                input: &self.input,
            };
            self.app.on_render(&mut ctx);
        }

        self.platform.swap_buffers();
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aperture_common::{ButtonAction, Event, Key, Modifiers, MouseButton};
    use aperture_input::ButtonState;
    use std::collections::VecDeque;

    /// Scripted event source: one batch of events per tick, closing once
    /// the script runs dry.
    struct ScriptedPlatform {
        script: VecDeque<Vec<Event>>,
        queue: VecDeque<Event>,
        pumps: usize,
        swaps: usize,
    }

    impl ScriptedPlatform {
        fn new(script: Vec<Vec<Event>>) -> Self {
            Self {
                script: script.into(),
                queue: VecDeque::new(),
                pumps: 0,
                swaps: 0,
            }
        }
    }

    impl Platform for ScriptedPlatform {
        fn pump_events(&mut self) {
            self.pumps += 1;
            if let Some(events) = self.script.pop_front() {
                self.queue.extend(events);
            }
        }

        fn poll_event(&mut self) -> Option<Event> {
            self.queue.pop_front()
        }

        fn should_close(&self) -> bool {
            self.script.is_empty() && self.queue.is_empty()
        }

        fn window_size(&self) -> (u32, u32) {
            (640, 480)
        }

        fn framebuffer_size(&self) -> (u32, u32) {
            (640, 480)
        }

        fn swap_buffers(&mut self) {
            self.swaps += 1;
        }
    }

    fn key_event(action: ButtonAction) -> Event {
        Event::Key {
            key: Key::W,
            scancode: 0,
            action,
            mods: Modifiers::empty(),
        }
    }

    #[derive(Default)]
    struct UpdateOnly {
        updates: usize,
        renders: usize,
    }

    impl<P: Platform> AppHooks<P> for UpdateOnly {
        const HANDLES_UPDATE: bool = true;

        fn on_update(&mut self, _dt: f64, _ctx: &mut TickContext<'_, P>) {
            self.updates += 1;
        }

        // Present in the impl but not declared; must never run.
        fn on_render(&mut self, _ctx: &mut TickContext<'_, P>) {
            self.renders += 1;
        }
    }

    #[test]
    fn update_only_hook_set_never_renders() {
        let platform = ScriptedPlatform::new(vec![Vec::new(); 5]);
        let mut driver = Driver::new(platform, UpdateOnly::default());
        driver.run();
        assert_eq!(driver.app().updates, 5);
        assert_eq!(driver.app().renders, 0);
        assert_eq!(driver.platform().swaps, 5);
    }

    #[derive(Default)]
    struct Sequenced {
        log: Vec<&'static str>,
    }

    impl<P: Platform> AppHooks<P> for Sequenced {
        const HANDLES_UPDATE: bool = true;
        const HANDLES_RENDER: bool = true;

        fn on_update(&mut self, _dt: f64, _ctx: &mut TickContext<'_, P>) {
            self.log.push("update");
        }

        fn on_render(&mut self, _ctx: &mut TickContext<'_, P>) {
            self.log.push("render");
        }
    }

    #[test]
    fn hooks_run_update_then_render_once_per_tick() {
        let platform = ScriptedPlatform::new(vec![Vec::new(); 3]);
        let mut driver = Driver::new(platform, Sequenced::default());
        driver.run();
        assert_eq!(
            driver.app().log,
            vec!["update", "render", "update", "render", "update", "render"]
        );
    }

    #[derive(Default)]
    struct ConsumingOverlay {
        seen: Vec<Event>,
    }

    impl<P: Platform> AppHooks<P> for ConsumingOverlay {
        const HANDLES_EVENTS: bool = true;

        fn filter_event(&mut self, event: &Event) -> bool {
            matches!(event, Event::Key { .. })
        }

        fn on_event(&mut self, event: &Event, _ctx: &mut TickContext<'_, P>) {
            self.seen.push(*event);
        }
    }

    #[test]
    fn consumed_event_halts_dispatch_for_that_event_only() {
        let platform = ScriptedPlatform::new(vec![vec![
            key_event(ButtonAction::Press),
            Event::MouseMove { x: 5.0, y: 6.0 },
        ]]);
        let mut driver = Driver::new(platform, ConsumingOverlay::default());
        driver.tick();

        // The key event never reached the tracker or the handler; the
        // mouse move reached both.
        assert_eq!(driver.input().key_state(Key::W), ButtonState::None);
        assert_eq!(driver.app().seen, vec![Event::MouseMove { x: 5.0, y: 6.0 }]);
    }

    #[derive(Default)]
    struct EdgeObserver {
        state_at_dispatch: Vec<ButtonState>,
        down_per_tick: Vec<bool>,
        held_per_tick: Vec<bool>,
    }

    impl<P: Platform> AppHooks<P> for EdgeObserver {
        const HANDLES_EVENTS: bool = true;
        const HANDLES_UPDATE: bool = true;

        fn on_event(&mut self, event: &Event, ctx: &mut TickContext<'_, P>) {
            if let Event::Key { key, .. } = event {
                self.state_at_dispatch.push(ctx.input.key_state(*key));
            }
        }

        fn on_update(&mut self, _dt: f64, ctx: &mut TickContext<'_, P>) {
            self.down_per_tick.push(ctx.input.is_key_down(Key::W));
            self.held_per_tick.push(ctx.input.is_key_held(Key::W));
        }
    }

    #[test]
    fn input_edges_are_ticked_before_the_update_hook() {
        let platform = ScriptedPlatform::new(vec![
            vec![key_event(ButtonAction::Press)],
            Vec::new(),
            vec![key_event(ButtonAction::Release)],
            Vec::new(),
        ]);
        let mut driver = Driver::new(platform, EdgeObserver::default());
        driver.run();

        // The tracker records the edge before the handler sees the event.
        assert_eq!(
            driver.app().state_at_dispatch,
            vec![ButtonState::JustPress, ButtonState::JustRelease]
        );
        // Down exactly on the press tick, held until the release tick.
        assert_eq!(driver.app().down_per_tick, vec![true, false, false, false]);
        assert_eq!(driver.app().held_per_tick, vec![true, true, false, false]);
    }

    struct NoHooks;

    impl<P: Platform> AppHooks<P> for NoHooks {}

    #[test]
    fn close_signal_is_the_only_termination_path() {
        let platform = ScriptedPlatform::new(vec![
            vec![Event::MouseButton {
                button: MouseButton::Left,
                action: ButtonAction::Press,
                mods: Modifiers::empty(),
            }],
            Vec::new(),
        ]);
        let mut driver = Driver::new(platform, NoHooks);
        driver.run();
        assert_eq!(driver.platform().pumps, 2);
        assert_eq!(driver.platform().swaps, 2);
        assert!(driver.platform().should_close());
    }
}
