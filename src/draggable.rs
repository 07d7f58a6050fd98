//! Convenience wrapper built on the gesture hooks: drag handle lookup, drag
//! zone confinement, ghost substitutes and position holding.

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, MouseEvent};

use crate::{
    common::{rect_edges, window},
    config::{DragHandle, DraggableConfig},
    dom::{attach, Attachment, Registration},
    errors::{log_and_convert_error, DragError, DragResult},
    events::DragEvent,
    position::{
        accumulated_offset, capture_origin_translate, current_translate,
        restore_origin_translate, track_translate, translate_css, zone_range, TRANSLATE_X,
        TRANSLATE_Y,
    },
    state::GestureState,
};

/// Makes `target` draggable with the wrapper behaviours of `config`.
pub fn draggable(target: &HtmlElement, config: DraggableConfig) -> DragResult<Attachment> {
    let handle = resolve_handle(target, &config.drag_handle)?;
    match attach(&handle, config.gesture)? {
        Attachment::Created(registration) => {
            install(&registration, target.clone(), config)?;
            Ok(Attachment::Created(registration))
        }
        Attachment::AlreadyAttached => Ok(Attachment::AlreadyAttached),
    }
}

fn resolve_handle(target: &HtmlElement, handle: &DragHandle) -> DragResult<HtmlElement> {
    match handle {
        DragHandle::Target => Ok(target.clone()),
        DragHandle::Element(element) => Ok(element.clone()),
        DragHandle::Selector(selector) => target
            .query_selector(selector)?
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| DragError::HandleNotFound(selector.clone())),
    }
}

struct Session {
    target: HtmlElement,
    substitute: Option<HtmlElement>,
}

impl Session {
    fn active(&self) -> &HtmlElement {
        self.substitute.as_ref().unwrap_or(&self.target)
    }
}

fn install(
    registration: &Registration,
    target: HtmlElement,
    config: DraggableConfig,
) -> DragResult<()> {
    let DraggableConfig {
        drag_zone,
        use_substitute,
        substitute_class,
        hold_position,
        ..
    } = config;
    let session = Rc::new(RefCell::new(Session {
        target,
        substitute: None,
    }));

    let shared = session.clone();
    registration.on(
        DragEvent::BeforeDrag,
        move |state: &mut GestureState, _: &MouseEvent| {
            if let Some(zone) = &drag_zone {
                let session = shared.borrow();
                let range = zone_range(
                    rect_edges(&zone.get_bounding_client_rect()),
                    rect_edges(&session.target.get_bounding_client_rect()),
                );
                state.set_acc_range(range);
            }
            hold_position.then(|| capture_origin_translate(state))
        },
    )?;

    if use_substitute {
        let shared = session.clone();
        registration.on(
            DragEvent::DragStart,
            move |_: &mut GestureState, _: &MouseEvent| {
                let mut session = shared.borrow_mut();
                match create_substitute(&session.target, substitute_class.as_deref()) {
                    Ok(substitute) => session.substitute = Some(substitute),
                    Err(err) => {
                        log_and_convert_error(err);
                    }
                }
            },
        )?;
    }

    let shared = session.clone();
    registration.on(
        DragEvent::Dragging,
        move |state: &mut GestureState, _: &MouseEvent| {
            let session = shared.borrow();
            let (x, y) = if session.substitute.is_some() {
                accumulated_offset(state)
            } else {
                current_translate(state, hold_position)
            };
            apply_translate(session.active(), x, y);
            track_translate(state, hold_position)
        },
    )?;

    if hold_position {
        registration.on(
            DragEvent::Click,
            |state: &mut GestureState, _: &MouseEvent| restore_origin_translate(state),
        )?;
    }

    registration.on(
        DragEvent::DragEnd,
        move |state: &mut GestureState, _: &MouseEvent| {
            let mut session = session.borrow_mut();
            if let Some(substitute) = session.substitute.take() {
                substitute.remove();
                if hold_position {
                    let x = state.number(TRANSLATE_X).unwrap_or(0.0);
                    let y = state.number(TRANSLATE_Y).unwrap_or(0.0);
                    apply_translate(&session.target, x, y);
                }
            }
        },
    )?;

    Ok(())
}

fn apply_translate(element: &HtmlElement, x: f64, y: f64) {
    if let Err(err) = element
        .style()
        .set_property("transform", &translate_css(x, y))
    {
        log_and_convert_error(DragError::from(err));
    }
}

/// Fixed-position wrapper around a deep clone of `source`, laid over it.
fn create_substitute(source: &HtmlElement, class: Option<&str>) -> DragResult<HtmlElement> {
    let document = window()?
        .document()
        .ok_or_else(|| DragError::Other("no document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| DragError::Other("no document body".to_string()))?;
    let rect = source.get_bounding_client_rect();

    let wrapper = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)?;
    let style = wrapper.style();
    style.set_property("position", "fixed")?;
    style.set_property("z-index", "99999")?;
    style.set_property("cursor", "pointer")?;
    style.set_property("top", &format!("{}px", rect.top()))?;
    style.set_property("left", &format!("{}px", rect.left()))?;
    style.set_property("width", &format!("{}px", rect.width()))?;
    style.set_property("height", &format!("{}px", rect.height()))?;
    style.set_property("overflow", "hidden")?;
    if let Some(class) = class {
        wrapper.class_list().add_1(class)?;
    }

    wrapper.append_child(&source.clone_node_with_deep(true)?)?;
    body.append_child(&wrapper)?;
    Ok(wrapper)
}
