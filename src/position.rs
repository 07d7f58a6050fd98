//! Offset math used by the convenience wrapper.
//!
//! The translate carried across sessions lives in the gesture extras so it
//! survives between presses:
//!
//! - `originTranslateX/Y`: translate at the start of the session,
//! - `translateX/Y`: running translate, updated on every `dragging`.

use crate::state::{AccRange, Bounds, GestureState, Patch};

pub const ORIGIN_TRANSLATE_X: &str = "originTranslateX";
pub const ORIGIN_TRANSLATE_Y: &str = "originTranslateY";
pub const TRANSLATE_X: &str = "translateX";
pub const TRANSLATE_Y: &str = "translateY";

pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    hi.min(lo.max(value))
}

pub fn clamp_to(value: f64, bounds: Bounds) -> f64 {
    clamp(value, bounds.min, bounds.max)
}

/// Session displacement clamped to the state's accumulation range.
pub fn accumulated_offset(state: &GestureState) -> (f64, f64) {
    let (dx, dy) = state.displacement();
    let AccRange { x, y } = state.acc_range();
    (clamp_to(dx, x), clamp_to(dy, y))
}

/// `beforeDrag`: remember where the previous session left the element.
pub fn capture_origin_translate(state: &GestureState) -> Patch {
    Patch::new()
        .with(ORIGIN_TRANSLATE_X, state.number(TRANSLATE_X).unwrap_or(0.0))
        .with(ORIGIN_TRANSLATE_Y, state.number(TRANSLATE_Y).unwrap_or(0.0))
}

/// Translate to render for the current move. Without position holding every
/// session starts from zero.
pub fn current_translate(state: &GestureState, hold_position: bool) -> (f64, f64) {
    let (acc_x, acc_y) = accumulated_offset(state);
    if !hold_position {
        return (acc_x, acc_y);
    }
    (
        acc_x + state.number(ORIGIN_TRANSLATE_X).unwrap_or(0.0),
        acc_y + state.number(ORIGIN_TRANSLATE_Y).unwrap_or(0.0),
    )
}

/// `dragging`: store the running translate.
pub fn track_translate(state: &GestureState, hold_position: bool) -> Patch {
    let (x, y) = current_translate(state, hold_position);
    Patch::new().with(TRANSLATE_X, x).with(TRANSLATE_Y, y)
}

/// `click`: a session without movement leaves the translate where it was.
pub fn restore_origin_translate(state: &GestureState) -> Patch {
    Patch::new()
        .with(TRANSLATE_X, state.number(ORIGIN_TRANSLATE_X).unwrap_or(0.0))
        .with(TRANSLATE_Y, state.number(ORIGIN_TRANSLATE_Y).unwrap_or(0.0))
}

pub fn translate_css(x: f64, y: f64) -> String {
    format!("translate({}px, {}px)", x, y)
}

/// Accumulation range keeping a target box inside a zone box, both given as
/// `(left, top, right, bottom)`.
pub fn zone_range(zone: (f64, f64, f64, f64), target: (f64, f64, f64, f64)) -> AccRange {
    let (zl, zt, zr, zb) = zone;
    let (tl, tt, tr, tb) = target;
    AccRange::new(Bounds::new(zl - tl, zr - tr), Bounds::new(zt - tt, zb - tb))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(origin: (f64, f64), current: (f64, f64), range: AccRange) -> GestureState {
        let mut state = GestureState::new();
        state.capture_press(origin.0, origin.1);
        state.capture_move(current.0, current.1);
        state.set_acc_range(range);
        state
    }

    #[test]
    fn clamp_keeps_value_in_bounds() {
        assert_eq!(clamp(300.0, -50.0, 100.0), 100.0);
        assert_eq!(clamp(-200.0, -50.0, 100.0), -50.0);
        assert_eq!(clamp(12.0, -50.0, 100.0), 12.0);
    }

    #[test]
    fn accumulated_offset_uses_range() {
        let range = AccRange::new(Bounds::new(-50.0, 100.0), Bounds::UNBOUNDED);
        let state = state_with((0.0, 0.0), (300.0, -999.0), range);
        assert_eq!(accumulated_offset(&state), (100.0, -999.0));

        let state = state_with((0.0, 0.0), (-200.0, 0.0), range);
        assert_eq!(accumulated_offset(&state).0, -50.0);
    }

    #[test]
    fn held_translate_adds_origin() {
        let mut state = state_with((0.0, 0.0), (10.0, 5.0), AccRange::default());
        state.apply(Patch::new().with(TRANSLATE_X, 40.0).with(TRANSLATE_Y, -4.0));
        state.apply(capture_origin_translate(&state));

        assert_eq!(current_translate(&state, true), (50.0, 1.0));
        assert_eq!(current_translate(&state, false), (10.0, 5.0));
    }

    #[test]
    fn click_restores_origin_translate() {
        let mut state = state_with((0.0, 0.0), (0.0, 0.0), AccRange::default());
        state.apply(Patch::new().with(ORIGIN_TRANSLATE_X, 7.0).with(ORIGIN_TRANSLATE_Y, 8.0));
        state.apply(Patch::new().with(TRANSLATE_X, 99.0).with(TRANSLATE_Y, 99.0));

        state.apply(restore_origin_translate(&state));
        assert_eq!(state.number(TRANSLATE_X), Some(7.0));
        assert_eq!(state.number(TRANSLATE_Y), Some(8.0));
    }

    #[test]
    fn css_formats_whole_pixels_without_fraction() {
        assert_eq!(translate_css(500.0, 500.0), "translate(500px, 500px)");
        assert_eq!(translate_css(-2.5, 0.0), "translate(-2.5px, 0px)");
    }

    #[test]
    fn zone_range_of_collapsed_target() {
        let range = zone_range((0.0, 0.0, 500.0, 500.0), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(range.x, Bounds::new(0.0, 500.0));
        assert_eq!(range.y, Bounds::new(0.0, 500.0));
    }
}
