use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString};
use web_sys::HtmlElement;

/// Which displacement counts as movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    #[default]
    Both,
    X,
    Y,
    None,
}

impl Axis {
    /// Unknown names fall back to [`Axis::Both`].
    pub fn parse_or_default(name: &str) -> Self {
        Axis::from_str(name).unwrap_or_default()
    }
}

/// Options fixed for the lifetime of one attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOptions {
    pub axis: Axis,
    debounce: f64,
    pub use_capturing: bool,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            axis: Axis::Both,
            debounce: 0.0,
            use_capturing: true,
        }
    }
}

impl GestureOptions {
    pub fn new(axis: Axis, debounce: f64, use_capturing: bool) -> Self {
        Self {
            axis,
            debounce: sanitize_debounce(debounce),
            use_capturing,
        }
    }

    pub fn with_axis(self, axis: Axis) -> Self {
        Self { axis, ..self }
    }

    pub fn with_debounce(self, debounce: f64) -> Self {
        Self {
            debounce: sanitize_debounce(debounce),
            ..self
        }
    }

    pub fn with_capturing(self, use_capturing: bool) -> Self {
        Self {
            use_capturing,
            ..self
        }
    }

    pub fn debounce(&self) -> f64 {
        self.debounce
    }
}

/// NaN, negative and infinite thresholds become 0.
pub fn sanitize_debounce(debounce: f64) -> f64 {
    if debounce.is_finite() && debounce >= 0.0 {
        debounce
    } else {
        log::warn!("ignoring malformed debounce {debounce}, using 0");
        0.0
    }
}

/// Where the press listener lives.
#[derive(Clone, Debug, Default)]
pub enum DragHandle {
    /// The drag target itself.
    #[default]
    Target,
    /// First descendant of the target matching the selector.
    Selector(String),
    Element(HtmlElement),
}

/// Settings of the convenience wrapper.
#[derive(Clone, Debug, Default)]
pub struct DraggableConfig {
    pub gesture: GestureOptions,
    pub drag_handle: DragHandle,
    /// Element whose bounding box confines the drag.
    pub drag_zone: Option<HtmlElement>,
    pub use_substitute: bool,
    pub substitute_class: Option<String>,
    /// Keep the translate of the previous session.
    pub hold_position: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = GestureOptions::default();
        assert_eq!(options.axis, Axis::Both);
        assert_eq!(options.debounce(), 0.0);
        assert!(options.use_capturing);
    }

    #[test]
    fn malformed_debounce_falls_back_to_zero() {
        assert_eq!(GestureOptions::default().with_debounce(f64::NAN).debounce(), 0.0);
        assert_eq!(GestureOptions::default().with_debounce(-3.0).debounce(), 0.0);
        assert_eq!(
            GestureOptions::new(Axis::X, f64::INFINITY, false).debounce(),
            0.0
        );
        assert_eq!(GestureOptions::default().with_debounce(4.5).debounce(), 4.5);
    }

    #[test]
    fn axis_names_parse() {
        assert_eq!(Axis::parse_or_default("x"), Axis::X);
        assert_eq!(Axis::parse_or_default("none"), Axis::None);
        assert_eq!(Axis::parse_or_default("diagonal"), Axis::Both);
        assert_eq!(Axis::Y.to_string(), "y");
    }
}
