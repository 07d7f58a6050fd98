//! Gesture state shared between the controller and its hooks.
//!
//! [`GestureState`] splits into two halves:
//!
//! - system fields (`dragging`, origin, current position and the accumulation
//!   range) that only the controller moves, and
//! - an open mapping of extras that hooks fill in through [`Patch`]es.
//!
//! Patches can never reach the system half: keys named after a system field are
//! dropped when the patch is applied (see [`SYSTEM_FIELDS`]).

use std::collections::HashMap;

/// Names a patch may not write.
pub const SYSTEM_FIELDS: [&str; 6] = [
    "dragging", "originX", "originY", "currentX", "currentY", "accRange",
];

pub fn is_system_field(key: &str) -> bool {
    SYSTEM_FIELDS.contains(&key)
}

/// Value carried by an extra field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Partial update of the extras returned by a hook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: HashMap<String, Value>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Patch::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Shallow merge, `other` wins on shared keys.
    pub fn merge(&mut self, other: Patch) {
        self.fields.extend(other.fields);
    }

    /// Drops every key that names a system field.
    pub fn strip_system_fields(&mut self) {
        self.fields.retain(|key, _| !is_system_field(key));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Patch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Patch {
    type Item = (String, Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Inclusive bounds, `min <= max` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccRange {
    pub x: Bounds,
    pub y: Bounds,
}

impl AccRange {
    pub fn new(x: Bounds, y: Bounds) -> Self {
        Self { x, y }
    }
}

/// State of one draggable element, alive from attach until teardown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    pub(crate) dragging: bool,
    pub(crate) origin_x: f64,
    pub(crate) origin_y: f64,
    pub(crate) current_x: f64,
    pub(crate) current_y: f64,
    acc_range: AccRange,
    extras: HashMap<String, Value>,
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    pub fn current(&self) -> (f64, f64) {
        (self.current_x, self.current_y)
    }

    /// Session displacement `(current - origin)`.
    pub fn displacement(&self) -> (f64, f64) {
        (
            self.current_x - self.origin_x,
            self.current_y - self.origin_y,
        )
    }

    pub fn acc_range(&self) -> AccRange {
        self.acc_range
    }

    /// Hooks holding the live state may narrow the range, typically in
    /// `beforeDrag`. Patches cannot.
    pub fn set_acc_range(&mut self, range: AccRange) {
        self.acc_range = range;
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.extra(key).and_then(Value::as_number)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.extra(key).and_then(Value::as_bool)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.extra(key).and_then(Value::as_text)
    }

    pub fn extras(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.extras.iter()
    }

    /// Direct write to an extra. System field names are refused.
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if is_system_field(&key) {
            return false;
        }
        self.extras.insert(key, value.into());
        true
    }

    pub fn remove_extra(&mut self, key: &str) -> Option<Value> {
        self.extras.remove(key)
    }

    /// Merge rule: system keys are stripped, every other key overrides.
    pub fn apply(&mut self, mut patch: Patch) {
        patch.strip_system_fields();
        self.extras.extend(patch);
    }

    pub(crate) fn capture_press(&mut self, x: f64, y: f64) {
        self.origin_x = x;
        self.origin_y = y;
        self.current_x = x;
        self.current_y = y;
    }

    pub(crate) fn capture_move(&mut self, x: f64, y: f64) {
        self.current_x = x;
        self.current_y = y;
    }
}
