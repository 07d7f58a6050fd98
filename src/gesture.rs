//! Press/move/release state machine.
//!
//! [`GestureController`] knows nothing about where input comes from. The
//! browser layer feeds it pointer coordinates plus the raw event, which is
//! handed through untouched to every hook.
//!
//! ```text
//! Idle --press--> Pressed --gated move--> Dragging --release--> Idle
//!                    \------------release (click)------------/
//! ```

use derivative::Derivative;

use crate::{
    config::{Axis, GestureOptions},
    events::{DragEvent, EventBus, HandlerResult, PatchOrVeto},
    state::GestureState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// `beforeDrag` accepted the press; move/release should now be observed.
    Armed,
    Vetoed,
    /// A session is already running.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Ignored,
    /// Below the axis/debounce threshold.
    Gated,
    Started,
    Dragged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Ignored,
    Clicked,
    Dropped,
}

/// Whether a displacement counts as movement for `axis` and `debounce`.
pub fn passes_gate(axis: Axis, debounce: f64, dx: f64, dy: f64) -> bool {
    let (ax, ay) = (dx.abs(), dy.abs());
    match axis {
        Axis::None => false,
        Axis::X => ax > 0.0 && ax > debounce,
        Axis::Y => ay > 0.0 && ay > debounce,
        Axis::Both => (ax > 0.0 || ay > 0.0) && (ax > debounce || ay > debounce),
    }
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct GestureController<E> {
    options: GestureOptions,
    state: GestureState,
    phase: Phase,
    bus: EventBus<DragEvent, GestureState, E>,
}

impl<E> Default for GestureController<E> {
    fn default() -> Self {
        Self::new(GestureOptions::default())
    }
}

impl<E> GestureController<E> {
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            state: GestureState::new(),
            phase: Phase::Idle,
            bus: EventBus::new(),
        }
    }

    pub fn options(&self) -> &GestureOptions {
        &self.options
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True between an accepted press and its release.
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn on<F, R>(&mut self, event: DragEvent, handler: F)
    where
        F: FnMut(&mut GestureState, &E) -> R + 'static,
        R: Into<HandlerResult>,
    {
        self.bus.on(event, handler);
    }

    pub fn off(&mut self, event: Option<DragEvent>) {
        self.bus.off(event.as_ref());
    }

    pub fn handler_count(&self, event: DragEvent) -> usize {
        self.bus.handler_count(&event)
    }

    fn emit(&mut self, event: DragEvent, raw: &E) -> bool {
        match self.bus.emit(&event, &mut self.state, raw) {
            PatchOrVeto::Patch(patch) => {
                self.state.apply(patch);
                true
            }
            PatchOrVeto::Veto => {
                log::debug!("{event} vetoed by a handler");
                false
            }
        }
    }

    pub fn press(&mut self, x: f64, y: f64, raw: &E) -> PressOutcome {
        if self.is_active() {
            log::debug!("press ignored, session already running");
            return PressOutcome::Busy;
        }

        self.state.capture_press(x, y);
        if !self.emit(DragEvent::BeforeDrag, raw) {
            return PressOutcome::Vetoed;
        }
        self.phase = Phase::Pressed;
        PressOutcome::Armed
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, raw: &E) -> MoveOutcome {
        if !self.is_active() {
            return MoveOutcome::Ignored;
        }

        self.state.capture_move(x, y);
        let (dx, dy) = self.state.displacement();
        if !passes_gate(self.options.axis, self.options.debounce(), dx, dy) {
            return MoveOutcome::Gated;
        }

        let outcome = if self.phase == Phase::Pressed {
            self.phase = Phase::Dragging;
            self.state.dragging = true;
            self.emit(DragEvent::DragStart, raw);
            MoveOutcome::Started
        } else {
            MoveOutcome::Dragged
        };
        self.emit(DragEvent::Dragging, raw);
        outcome
    }

    pub fn release(&mut self, raw: &E) -> ReleaseOutcome {
        if !self.is_active() {
            return ReleaseOutcome::Ignored;
        }

        let outcome = if self.state.dragging {
            ReleaseOutcome::Dropped
        } else {
            self.emit(DragEvent::Click, raw);
            ReleaseOutcome::Clicked
        };
        self.emit(DragEvent::DragEnd, raw);

        self.state.dragging = false;
        self.phase = Phase::Idle;
        outcome
    }

    /// Returns to idle without emitting anything. Handlers and extras stay.
    pub fn abort(&mut self) {
        self.state.dragging = false;
        self.phase = Phase::Idle;
    }

    /// Drops every handler and abandons a running session without emitting.
    pub fn teardown(&mut self) {
        self.bus.off(None);
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::state::{AccRange, Bounds, Patch};

    type Controller = GestureController<()>;
    type Log = Rc<RefCell<Vec<(DragEvent, f64, f64)>>>;

    fn recording(options: GestureOptions) -> (Controller, Log) {
        let mut controller = Controller::new(options);
        let log: Log = Rc::default();
        for event in [
            DragEvent::BeforeDrag,
            DragEvent::DragStart,
            DragEvent::Dragging,
            DragEvent::DragEnd,
            DragEvent::Click,
        ] {
            let log = log.clone();
            controller.on(event, move |state: &mut GestureState, _: &()| {
                let (x, y) = state.current();
                log.borrow_mut().push((event, x, y));
            });
        }
        (controller, log)
    }

    fn names(log: &Log) -> Vec<DragEvent> {
        log.borrow().iter().map(|(e, _, _)| *e).collect()
    }

    #[test]
    fn gate_per_axis() {
        assert!(!passes_gate(Axis::None, 0.0, 50.0, 50.0));
        assert!(!passes_gate(Axis::X, 0.0, 0.0, 10.0));
        assert!(passes_gate(Axis::X, 0.0, -1.0, 0.0));
        assert!(!passes_gate(Axis::Y, 0.0, 10.0, 0.0));
        assert!(passes_gate(Axis::Y, 0.0, 0.0, 1.0));
        assert!(!passes_gate(Axis::Both, 0.0, 0.0, 0.0));
        assert!(passes_gate(Axis::Both, 0.0, 0.0, -0.5));
    }

    #[test]
    fn gate_respects_debounce() {
        assert!(!passes_gate(Axis::Both, 5.0, 5.0, -5.0));
        assert!(passes_gate(Axis::Both, 5.0, 0.0, 5.1));
        assert!(!passes_gate(Axis::X, 5.0, 4.0, 100.0));
        assert!(passes_gate(Axis::X, 5.0, -6.0, 0.0));
    }

    #[test]
    fn press_then_release_is_a_click() {
        let (mut c, log) = recording(GestureOptions::default());

        assert_eq!(c.press(0.0, 0.0, &()), PressOutcome::Armed);
        assert_eq!(c.phase(), Phase::Pressed);
        assert!(!c.state().dragging());
        assert_eq!(c.release(&()), ReleaseOutcome::Clicked);

        assert_eq!(
            names(&log),
            [DragEvent::BeforeDrag, DragEvent::Click, DragEvent::DragEnd]
        );
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn drag_session_emits_start_once() {
        let (mut c, log) = recording(GestureOptions::default());

        c.press(0.0, 0.0, &());
        assert_eq!(c.pointer_move(10.0, 0.0, &()), MoveOutcome::Started);
        assert!(c.state().dragging());
        assert_eq!(c.pointer_move(20.0, 0.0, &()), MoveOutcome::Dragged);
        assert_eq!(c.release(&()), ReleaseOutcome::Dropped);

        assert_eq!(
            *log.borrow(),
            [
                (DragEvent::BeforeDrag, 0.0, 0.0),
                (DragEvent::DragStart, 10.0, 0.0),
                (DragEvent::Dragging, 10.0, 0.0),
                (DragEvent::Dragging, 20.0, 0.0),
                (DragEvent::DragEnd, 20.0, 0.0),
            ]
        );
        assert!(!c.state().dragging());
    }

    #[test]
    fn gated_moves_fire_nothing() {
        let (mut c, log) = recording(GestureOptions::default().with_debounce(3.0));

        c.press(0.0, 0.0, &());
        assert_eq!(c.pointer_move(2.0, -3.0, &()), MoveOutcome::Gated);
        assert_eq!(c.state().current(), (2.0, -3.0));
        c.release(&());

        assert_eq!(
            names(&log),
            [DragEvent::BeforeDrag, DragEvent::Click, DragEvent::DragEnd]
        );
    }

    #[test]
    fn veto_keeps_controller_idle() {
        let (mut c, log) = recording(GestureOptions::default());
        c.on(DragEvent::BeforeDrag, |_: &mut GestureState, _: &()| false);

        assert_eq!(c.press(0.0, 0.0, &()), PressOutcome::Vetoed);
        assert_eq!(c.pointer_move(40.0, 40.0, &()), MoveOutcome::Ignored);
        assert_eq!(c.release(&()), ReleaseOutcome::Ignored);
        assert_eq!(names(&log), [DragEvent::BeforeDrag]);
    }

    #[test]
    fn vetoed_patch_is_discarded() {
        let mut c = Controller::default();
        c.on(DragEvent::BeforeDrag, |_: &mut GestureState, _: &()| {
            Patch::new().with("armed", true)
        });
        c.on(DragEvent::BeforeDrag, |_: &mut GestureState, _: &()| false);

        c.press(1.0, 1.0, &());
        assert!(c.state().extra("armed").is_none());
    }

    #[test]
    fn second_press_during_session_is_busy() {
        let (mut c, log) = recording(GestureOptions::default());
        c.press(0.0, 0.0, &());
        assert_eq!(c.press(5.0, 5.0, &()), PressOutcome::Busy);
        assert_eq!(c.state().origin(), (0.0, 0.0));
        assert_eq!(names(&log), [DragEvent::BeforeDrag]);
    }

    #[test]
    fn extras_survive_between_sessions() {
        let mut c = Controller::default();
        c.on(DragEvent::Dragging, |state: &mut GestureState, _: &()| {
            let (dx, _) = state.displacement();
            Patch::new().with("lastDx", dx)
        });

        c.press(0.0, 0.0, &());
        c.pointer_move(12.0, 0.0, &());
        c.release(&());
        c.press(100.0, 100.0, &());

        assert_eq!(c.state().number("lastDx"), Some(12.0));
    }

    #[test]
    fn hooks_may_narrow_acc_range_directly() {
        let mut c = Controller::default();
        let range = AccRange::new(Bounds::new(-50.0, 100.0), Bounds::UNBOUNDED);
        c.on(DragEvent::BeforeDrag, move |state: &mut GestureState, _: &()| {
            state.set_acc_range(range);
        });

        c.press(0.0, 0.0, &());
        assert_eq!(c.state().acc_range(), range);
    }

    #[test]
    fn abort_returns_to_idle_silently() {
        let (mut c, log) = recording(GestureOptions::default());
        c.press(0.0, 0.0, &());
        c.pointer_move(8.0, 0.0, &());
        c.abort();

        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.state().dragging());
        assert_eq!(c.release(&()), ReleaseOutcome::Ignored);
        assert_eq!(c.press(1.0, 1.0, &()), PressOutcome::Armed);
        assert_eq!(c.handler_count(DragEvent::DragEnd), 1);
        assert_eq!(
            names(&log),
            [
                DragEvent::BeforeDrag,
                DragEvent::DragStart,
                DragEvent::Dragging,
                DragEvent::BeforeDrag,
            ]
        );
    }

    #[test]
    fn teardown_drops_handlers_and_session() {
        let (mut c, log) = recording(GestureOptions::default());
        c.press(0.0, 0.0, &());
        c.pointer_move(3.0, 0.0, &());
        c.teardown();

        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.state().dragging());
        assert_eq!(c.handler_count(DragEvent::Dragging), 0);
        c.press(0.0, 0.0, &());
        assert_eq!(log.borrow().len(), 3);
    }
}
