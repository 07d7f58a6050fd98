//! Pointer dragging for DOM elements.
//!
//! The crate is split into a platform-free core and a thin browser binding:
//!
//! - [`events`]: ordered publish/subscribe bus whose handlers return patches or
//!   vetoes,
//! - [`gesture`]: the press/move/release state machine emitting `beforeDrag`,
//!   `dragStart`, `dragging`, `dragEnd` and `click`,
//! - [`state`] and [`position`]: gesture state, extras, and the clamping math,
//! - [`dom`] and [`draggable`]: attaching the core to an element with
//!   `web-sys`, plus the drag zone / substitute / hold position wrapper.
//!
//! With the `js` feature the crate also exports `makeDraggable` and
//! `draggable` to JavaScript.
//!
//! Diagnostics go through the `log` facade. The JS entry points install a
//! console logger at `Warn` level; Rust embedders either set their own logger
//! or call [`common::install_console_logger`].
use wasm_bindgen::prelude::*;

pub mod common;
pub mod config;
pub mod dom;
pub mod draggable;
pub mod errors;
pub mod events;
pub mod gesture;
#[cfg(feature = "js")]
pub mod js;
pub mod position;
pub mod prelude;
pub mod state;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);
}
