use std::str::FromStr;

use js_sys::{Array, Function, Object, Reflect};
use serde::Deserialize;
use tsify::Tsify;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{HtmlElement, MouseEvent};

use crate::{
    common::install_console_logger,
    config::{Axis, DragHandle, DraggableConfig, GestureOptions},
    dom::{attach, Registration},
    draggable::draggable as make_wrapped,
    errors::{log_and_convert_error, DragError, IntoJsError},
    events::{DragEvent, HandlerResult},
    state::{is_system_field, AccRange, Bounds, GestureState, Patch, Value},
    warn,
};

/// A number, or anything else (which is ignored).
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Other(serde::de::IgnoredAny),
}

#[derive(Deserialize, Tsify, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JsPartialOptions {
    #[tsify(optional, type = "\"both\" | \"x\" | \"y\" | \"none\"")]
    pub axis: Option<String>,
    #[tsify(optional, type = "number")]
    debounce: Option<LooseNumber>,
    #[tsify(optional)]
    pub use_capturing: Option<bool>,
    #[tsify(optional)]
    pub use_substitute: Option<bool>,
    #[tsify(optional)]
    pub substitute_class: Option<String>,
    #[tsify(optional)]
    pub hold_position: Option<bool>,
}

impl From<JsPartialOptions> for GestureOptions {
    fn from(partial: JsPartialOptions) -> Self {
        let default = GestureOptions::default();
        let debounce = match partial.debounce {
            Some(LooseNumber::Number(n)) => n,
            Some(LooseNumber::Other(_)) => {
                warn("debounce must be a number, using 0");
                0.0
            }
            None => default.debounce(),
        };
        GestureOptions::new(
            partial
                .axis
                .as_deref()
                .map(Axis::parse_or_default)
                .unwrap_or(default.axis),
            debounce,
            partial.use_capturing.unwrap_or(default.use_capturing),
        )
    }
}

impl From<JsPartialOptions> for DraggableConfig {
    fn from(partial: JsPartialOptions) -> Self {
        let default = DraggableConfig::default();
        let use_substitute = partial.use_substitute.unwrap_or(default.use_substitute);
        let substitute_class = partial.substitute_class.clone();
        let hold_position = partial.hold_position.unwrap_or(default.hold_position);
        Self {
            gesture: partial.into(),
            use_substitute,
            substitute_class,
            hold_position,
            ..default
        }
    }
}

fn parse_options(options: &JsValue) -> Result<JsPartialOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(JsPartialOptions::default());
    }
    serde_wasm_bindgen::from_value(options.clone()).map_err(JsValue::from)
}

fn element_option(options: &JsValue, key: &str) -> Result<Option<JsValue>, JsValue> {
    if !options.is_object() {
        return Ok(None);
    }
    let value = Reflect::get(options, &JsValue::from_str(key))?;
    Ok((!value.is_undefined() && !value.is_null()).then_some(value))
}

/// JS handle returned by `makeDraggable` and `draggable`.
#[wasm_bindgen]
pub struct DragContext {
    registration: Registration,
}

#[wasm_bindgen]
impl DragContext {
    /// Registers `callback(state, event)` for one of `beforeDrag`, `dragStart`,
    /// `dragging`, `dragEnd` or `click`.
    pub fn on(&self, event_name: &str, callback: Function) -> Result<(), JsValue> {
        let event = DragEvent::from_str(event_name)
            .map_err(|_| JsValue::from_str(&format!("unknown drag event: {}", event_name)))?;
        self.registration
            .on(event, move |state: &mut GestureState, raw: &MouseEvent| {
                let object = state_to_js(state);
                let returned = callback.call2(&JsValue::NULL, &object, raw.as_ref());
                // Writes made before a throw are kept too.
                read_back_state(&object, state);
                match returned {
                    Ok(returned) => handler_result_from_js(&returned),
                    Err(err) => {
                        warn(&format!("drag handler threw: {:?}", err.as_string()));
                        HandlerResult::Nothing
                    }
                }
            })
            .map_err(IntoJsError::into_js_error)
    }

    pub fn off(&self, event_name: Option<String>) -> Result<(), JsValue> {
        let event = match event_name {
            Some(name) => Some(
                DragEvent::from_str(&name)
                    .map_err(|_| JsValue::from_str(&format!("unknown drag event: {}", name)))?,
            ),
            None => None,
        };
        self.registration
            .off(event)
            .map_err(IntoJsError::into_js_error)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self
            .registration
            .state()
            .map_err(IntoJsError::into_js_error)?;
        Ok(state_to_js(&state).into())
    }

    #[wasm_bindgen(getter = dragHandler)]
    pub fn drag_handler(&self) -> HtmlElement {
        self.registration.handle().clone()
    }

    pub fn destroy(&self) {
        self.registration.destroy();
    }
}

fn init_js_runtime() {
    console_error_panic_hook::set_once();
    install_console_logger(log::LevelFilter::Warn);
}

/// Core attach: only the gesture options are read.
#[wasm_bindgen(js_name = makeDraggable)]
pub fn make_draggable(element: &HtmlElement, options: JsValue) -> Result<Option<DragContext>, JsValue> {
    init_js_runtime();
    let gesture: GestureOptions = parse_options(&options)?.into();
    let attachment = attach(element, gesture).map_err(log_and_convert_error)?;
    Ok(attachment
        .registration()
        .map(|registration| DragContext { registration }))
}

/// Wrapper attach honouring `dragHandler`, `dragZone`, `useSubstitute`,
/// `substituteClass` and `holdPosition`.
#[wasm_bindgen]
pub fn draggable(element: &HtmlElement, options: JsValue) -> Result<Option<DragContext>, JsValue> {
    init_js_runtime();
    let mut config: DraggableConfig = parse_options(&options)?.into();

    if let Some(handler) = element_option(&options, "dragHandler")? {
        config.drag_handle = match handler.as_string() {
            Some(selector) => DragHandle::Selector(selector),
            None => DragHandle::Element(handler.dyn_into::<HtmlElement>().map_err(|_| {
                DragError::Other("dragHandler must be a selector or an element".to_string())
                    .into_js_error()
            })?),
        };
    }
    if let Some(zone) = element_option(&options, "dragZone")? {
        config.drag_zone = Some(zone.dyn_into::<HtmlElement>().map_err(|_| {
            DragError::Other("dragZone must be an element".to_string()).into_js_error()
        })?);
    }

    let attachment = make_wrapped(element, config).map_err(log_and_convert_error)?;
    Ok(attachment
        .registration()
        .map(|registration| DragContext { registration }))
}

fn set(target: &Object, key: &str, value: &JsValue) {
    // Reflect::set only fails on frozen or exotic targets; a fresh Object is neither.
    let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

fn bounds_to_js(bounds: Bounds) -> JsValue {
    Array::of2(&bounds.min.into(), &bounds.max.into()).into()
}

fn value_to_js(value: &Value) -> JsValue {
    match value {
        Value::Null => JsValue::NULL,
        Value::Bool(b) => JsValue::from_bool(*b),
        Value::Number(n) => JsValue::from_f64(*n),
        Value::Text(s) => JsValue::from_str(s),
    }
}

fn state_to_js(state: &GestureState) -> Object {
    let object = Object::new();
    for (key, value) in state.extras() {
        set(&object, key, &value_to_js(value));
    }
    let (origin_x, origin_y) = state.origin();
    let (current_x, current_y) = state.current();
    set(&object, "dragging", &state.dragging().into());
    set(&object, "originX", &origin_x.into());
    set(&object, "originY", &origin_y.into());
    set(&object, "currentX", &current_x.into());
    set(&object, "currentY", &current_y.into());

    let range = Object::new();
    set(&range, "x", &bounds_to_js(state.acc_range().x));
    set(&range, "y", &bounds_to_js(state.acc_range().y));
    set(&object, "accRange", &range);
    object
}

fn value_from_js(value: &JsValue) -> Option<Value> {
    if value.is_null() || value.is_undefined() {
        Some(Value::Null)
    } else if let Some(b) = value.as_bool() {
        Some(Value::Bool(b))
    } else if let Some(n) = value.as_f64() {
        Some(Value::Number(n))
    } else {
        value.as_string().map(Value::Text)
    }
}

fn bounds_from_js(value: &JsValue, fallback: Bounds) -> Bounds {
    if !Array::is_array(value) {
        return fallback;
    }
    let pair: &Array = value.unchecked_ref();
    match (pair.get(0).as_f64(), pair.get(1).as_f64()) {
        (Some(min), Some(max)) => Bounds::new(min, max),
        _ => fallback,
    }
}

fn acc_range_from_js(object: &Object, current: AccRange) -> AccRange {
    let range = Reflect::get(object, &JsValue::from_str("accRange")).unwrap_or(JsValue::UNDEFINED);
    if !range.is_object() {
        return current;
    }
    let axis = |key: &str| Reflect::get(&range, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED);
    AccRange::new(
        bounds_from_js(&axis("x"), current.x),
        bounds_from_js(&axis("y"), current.y),
    )
}

/// Copies what a JS hook wrote on its state object back into `state`.
/// System coordinates are ignored; `accRange` and extras are kept.
fn read_back_state(object: &Object, state: &mut GestureState) {
    let mut written = Patch::new();
    for entry in Object::entries(object).iter() {
        let entry: Array = entry.unchecked_into();
        let Some(key) = entry.get(0).as_string() else {
            continue;
        };
        if is_system_field(&key) {
            continue;
        }
        match value_from_js(&entry.get(1)) {
            Some(value) if state.extra(&key) != Some(&value) => written.insert(key, value),
            Some(_) => {}
            None => warn(&format!("drag handler stored an unsupported value for {}", key)),
        }
    }
    state.apply(written);
    let range = acc_range_from_js(object, state.acc_range());
    state.set_acc_range(range);
}

fn handler_result_from_js(returned: &JsValue) -> HandlerResult {
    if let Some(flag) = returned.as_bool() {
        return HandlerResult::Flag(flag);
    }
    if Array::is_array(returned) || returned.is_function() {
        return HandlerResult::Nothing;
    }
    let Some(object) = returned.dyn_ref::<Object>() else {
        return HandlerResult::Nothing;
    };

    let mut patch = Patch::new();
    for entry in Object::entries(object).iter() {
        let entry: Array = entry.unchecked_into();
        let Some(key) = entry.get(0).as_string() else {
            continue;
        };
        match value_from_js(&entry.get(1)) {
            Some(value) => patch.insert(key, value),
            None => warn(&format!("drag handler returned an unsupported value for {}", key)),
        }
    }
    HandlerResult::Patch(patch)
}
