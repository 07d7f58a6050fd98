pub use crate::common::install_console_logger;
pub use crate::config::Axis;
pub use crate::config::DragHandle;
pub use crate::config::DraggableConfig;
pub use crate::config::GestureOptions;
pub use crate::dom::attach;
pub use crate::dom::Attachment;
pub use crate::dom::Registration;
pub use crate::dom::DRAGGABLE_FLAG;
pub use crate::draggable::draggable;
pub use crate::errors::DragError;
pub use crate::errors::DragResult;
pub use crate::events::DragEvent;
pub use crate::events::EventBus;
pub use crate::events::HandlerResult;
pub use crate::events::PatchOrVeto;
pub use crate::gesture::GestureController;
pub use crate::gesture::Phase;
pub use crate::state::AccRange;
pub use crate::state::Bounds;
pub use crate::state::GestureState;
pub use crate::state::Patch;
pub use crate::state::Value;

#[cfg(feature = "js")]
pub use crate::js::DragContext;
#[cfg(feature = "js")]
pub use crate::js::JsPartialOptions;
