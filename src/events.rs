use std::{collections::HashMap, fmt, hash::Hash};

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::state::Patch;

/// Semantic events emitted by a gesture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum DragEvent {
    BeforeDrag,
    DragStart,
    Dragging,
    DragEnd,
    Click,
}

/// What a single handler hands back.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HandlerResult {
    #[default]
    Nothing,
    Patch(Patch),
    Flag(bool),
}

impl From<()> for HandlerResult {
    fn from(_: ()) -> Self {
        HandlerResult::Nothing
    }
}

impl From<Patch> for HandlerResult {
    fn from(patch: Patch) -> Self {
        HandlerResult::Patch(patch)
    }
}

impl From<bool> for HandlerResult {
    fn from(flag: bool) -> Self {
        HandlerResult::Flag(flag)
    }
}

impl From<Option<Patch>> for HandlerResult {
    fn from(patch: Option<Patch>) -> Self {
        patch.map(HandlerResult::Patch).unwrap_or_default()
    }
}

/// Combined outcome of one emission.
///
/// A veto is all-or-nothing: patches merged before (or after) the deciding
/// `false` are dropped along with it.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOrVeto {
    Patch(Patch),
    Veto,
}

impl PatchOrVeto {
    pub fn is_veto(&self) -> bool {
        matches!(self, PatchOrVeto::Veto)
    }

    pub fn into_patch(self) -> Option<Patch> {
        match self {
            PatchOrVeto::Patch(patch) => Some(patch),
            PatchOrVeto::Veto => None,
        }
    }
}

impl Default for PatchOrVeto {
    fn default() -> Self {
        PatchOrVeto::Patch(Patch::default())
    }
}

pub type Handler<S, E> = Box<dyn FnMut(&mut S, &E) -> HandlerResult + 'static>;

/// Ordered publish/subscribe register.
///
/// Every handler of an event receives the same `(state, event)` pair. Return
/// values fold left to right: patches merge, the last boolean decides, and a
/// final `false` turns the whole emission into [`PatchOrVeto::Veto`].
pub struct EventBus<K, S, E> {
    handlers: HashMap<K, Vec<Handler<S, E>>>,
}

impl<K, S, E> Default for EventBus<K, S, E> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, S, E> EventBus<K, S, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F, R>(&mut self, event: K, mut handler: F)
    where
        F: FnMut(&mut S, &E) -> R + 'static,
        R: Into<HandlerResult>,
    {
        let boxed: Handler<S, E> =
            Box::new(move |state: &mut S, raw: &E| handler(state, raw).into());
        self.handlers.entry(event).or_default().push(boxed);
    }

    /// `None` clears every event.
    pub fn off(&mut self, event: Option<&K>) {
        match event {
            Some(event) => {
                self.handlers.remove(event);
            }
            None => self.handlers.clear(),
        }
    }

    pub fn handler_count(&self, event: &K) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }

    pub fn emit(&mut self, event: &K, state: &mut S, raw: &E) -> PatchOrVeto {
        let Some(handlers) = self.handlers.get_mut(event) else {
            return PatchOrVeto::default();
        };

        let mut merged = Patch::new();
        let mut flag = None;
        for handler in handlers.iter_mut() {
            match handler(state, raw) {
                HandlerResult::Nothing => {}
                HandlerResult::Patch(patch) => merged.merge(patch),
                HandlerResult::Flag(value) => flag = Some(value),
            }
        }

        match flag {
            Some(false) => PatchOrVeto::Veto,
            _ => PatchOrVeto::Patch(merged),
        }
    }
}

impl<K: fmt::Debug, S, E> fmt::Debug for EventBus<K, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}
