use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{HtmlElement, MouseEvent};

use crate::{
    common::{client_point, generate_id, set_body_user_select, window},
    config::GestureOptions,
    errors::{log_and_convert_error, DragError, DragResult},
    events::{DragEvent, HandlerResult},
    gesture::{GestureController, PressOutcome},
    log,
    state::GestureState,
    warn,
};

/// Attribute marking an element as already draggable. Holds the registration id.
pub const DRAGGABLE_FLAG: &str = "tiny-draggable";

type Listener = Closure<dyn FnMut(MouseEvent)>;

struct Listeners {
    press: Listener,
    moved: Listener,
    released: Listener,
}

impl Listeners {
    fn new(inner: Weak<Inner>) -> Self {
        let weak = inner.clone();
        let press = Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_press(&event);
            }
        }) as Box<dyn FnMut(_)>);

        let weak = inner.clone();
        let moved = Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_move(&event);
            }
        }) as Box<dyn FnMut(_)>);

        let released = Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Some(inner) = inner.upgrade() {
                inner.on_release(&event);
            }
        }) as Box<dyn FnMut(_)>);

        Self {
            press,
            moved,
            released,
        }
    }
}

struct Inner {
    handle: HtmlElement,
    id: String,
    use_capturing: bool,
    controller: RefCell<GestureController<MouseEvent>>,
    listeners: Listeners,
    /// Move/release listeners are on the window.
    session: Cell<bool>,
    /// Release that arrived while a handler held the controller.
    pending_release: RefCell<Option<MouseEvent>>,
    destroyed: Cell<bool>,
}

impl Inner {
    /// Runs `f` on the controller unless destroyed or already borrowed by a
    /// handler further up the stack. A release or destroy requested from
    /// inside `f` is completed before returning.
    fn with_controller<T>(
        &self,
        f: impl FnOnce(&mut GestureController<MouseEvent>) -> T,
    ) -> Option<T> {
        if self.destroyed.get() {
            return None;
        }
        let Ok(mut controller) = self.controller.try_borrow_mut() else {
            warn("pointer input re-entered a running drag handler, ignoring it");
            return None;
        };
        let out = f(&mut controller);
        let pending = self.pending_release.borrow_mut().take();
        if let Some(event) = pending {
            controller.release(&event);
        }
        if self.destroyed.get() {
            controller.teardown();
        }
        Some(out)
    }

    fn on_press(&self, event: &MouseEvent) {
        let (x, y) = client_point(event);
        if self.with_controller(|c| c.press(x, y, event)) != Some(PressOutcome::Armed) {
            return;
        }
        if self.destroyed.get() {
            return;
        }
        if let Err(err) = self.install_session() {
            log_and_convert_error(err);
            // Nothing would ever deliver the release, drop the session quietly.
            if let Err(err) = self.uninstall_session() {
                log_and_convert_error(err);
            }
            if let Ok(mut controller) = self.controller.try_borrow_mut() {
                controller.abort();
            }
        }
    }

    fn on_move(&self, event: &MouseEvent) {
        let (x, y) = client_point(event);
        self.with_controller(|c| c.pointer_move(x, y, event));
    }

    fn on_release(&self, event: &MouseEvent) {
        // Listeners go first so a failing handler cannot leave the page mid-drag.
        if let Err(err) = self.uninstall_session() {
            log_and_convert_error(err);
        }
        if self.controller.try_borrow_mut().is_err() {
            // A handler dispatched the release itself; finish it once that
            // handler returns.
            *self.pending_release.borrow_mut() = Some(event.clone());
            return;
        }
        self.with_controller(|c| c.release(event));
    }

    fn install_session(&self) -> DragResult<()> {
        let window = window()?;
        window.add_event_listener_with_callback(
            "mousemove",
            self.listeners.moved.as_ref().unchecked_ref(),
        )?;
        window.add_event_listener_with_callback(
            "mouseup",
            self.listeners.released.as_ref().unchecked_ref(),
        )?;
        self.session.set(true);
        set_body_user_select("none")
    }

    fn uninstall_session(&self) -> DragResult<()> {
        if !self.session.replace(false) {
            return Ok(());
        }
        let window = window()?;
        window.remove_event_listener_with_callback(
            "mousemove",
            self.listeners.moved.as_ref().unchecked_ref(),
        )?;
        window.remove_event_listener_with_callback(
            "mouseup",
            self.listeners.released.as_ref().unchecked_ref(),
        )?;
        set_body_user_select("auto")
    }

    fn detach(&self) -> DragResult<()> {
        self.handle.remove_event_listener_with_callback_and_bool(
            "mousedown",
            self.listeners.press.as_ref().unchecked_ref(),
            self.use_capturing,
        )?;
        self.uninstall_session()?;
        if self.handle.get_attribute(DRAGGABLE_FLAG).as_deref() == Some(self.id.as_str()) {
            self.handle.remove_attribute(DRAGGABLE_FLAG)?;
        }
        Ok(())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if !self.destroyed.replace(true) {
            if let Err(err) = self.detach() {
                log_and_convert_error(err);
            }
        }
    }
}

/// Handle to one draggable element. Clones share the registration.
///
/// Dropping the last clone detaches the element just like [`Registration::destroy`].
#[derive(Clone)]
pub struct Registration {
    inner: Rc<Inner>,
}

/// Result of [`attach`].
pub enum Attachment {
    Created(Registration),
    /// The element already carries [`DRAGGABLE_FLAG`]; nothing was changed.
    AlreadyAttached,
}

impl Attachment {
    pub fn registration(self) -> Option<Registration> {
        match self {
            Attachment::Created(registration) => Some(registration),
            Attachment::AlreadyAttached => None,
        }
    }
}

/// Makes `handle` react to press/move/release.
pub fn attach(handle: &HtmlElement, options: GestureOptions) -> DragResult<Attachment> {
    if handle.has_attribute(DRAGGABLE_FLAG) {
        log("the element is already draggable");
        return Ok(Attachment::AlreadyAttached);
    }

    let inner = Rc::new_cyclic(|weak: &Weak<Inner>| Inner {
        handle: handle.clone(),
        id: generate_id(),
        use_capturing: options.use_capturing,
        controller: RefCell::new(GestureController::new(options)),
        listeners: Listeners::new(weak.clone()),
        session: Cell::new(false),
        pending_release: RefCell::new(None),
        destroyed: Cell::new(false),
    });

    handle.add_event_listener_with_callback_and_bool(
        "mousedown",
        inner.listeners.press.as_ref().unchecked_ref(),
        options.use_capturing,
    )?;
    handle.set_attribute(DRAGGABLE_FLAG, &inner.id)?;

    Ok(Attachment::Created(Registration { inner }))
}

impl Registration {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn handle(&self) -> &HtmlElement {
        &self.inner.handle
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn on<F, R>(&self, event: DragEvent, handler: F) -> DragResult<()>
    where
        F: FnMut(&mut GestureState, &MouseEvent) -> R + 'static,
        R: Into<HandlerResult>,
    {
        self.controller_mut()?.on(event, handler);
        Ok(())
    }

    pub fn off(&self, event: Option<DragEvent>) -> DragResult<()> {
        self.controller_mut()?.off(event);
        Ok(())
    }

    /// Copy of the state as of the last event.
    pub fn state(&self) -> DragResult<GestureState> {
        if self.is_destroyed() {
            return Err(DragError::Destroyed);
        }
        let controller = self
            .inner
            .controller
            .try_borrow()
            .map_err(|_| DragError::Busy)?;
        Ok(controller.state().clone())
    }

    /// Removes handlers, listeners and the marker. Safe to call from inside a
    /// handler; the controller is cleared once that handler returns.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        log("destroy drag context");
        if let Err(err) = self.inner.detach() {
            log_and_convert_error(err);
        }
        if let Ok(mut controller) = self.inner.controller.try_borrow_mut() {
            controller.teardown();
        }
    }

    fn controller_mut(
        &self,
    ) -> DragResult<std::cell::RefMut<'_, GestureController<MouseEvent>>> {
        if self.is_destroyed() {
            return Err(DragError::Destroyed);
        }
        self.inner
            .controller
            .try_borrow_mut()
            .map_err(|_| DragError::Busy)
    }
}
