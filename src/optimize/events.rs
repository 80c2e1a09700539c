//! Event log of changes performed by the optimization components.
//!
//! Components record what they changed here; the enclosing driver reads the log to decide
//! whether another pass is worth running and to report what an optimization run did.

use crate::metadata::MethodId;

/// The kind of a recorded event, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EventKind {
    /// Caller facts were reset because a callee's facts changed
    CallersInvalidated,
    /// A field reference was rewritten to a more general class
    FieldRefGeneralized,
    /// A method reference was rewritten to a more general class
    MethodRefGeneralized,
}

/// One change performed by an optimization component.
#[derive(Debug, Clone)]
pub enum Event {
    /// The invalidation traveller reset the recorded callers of a method.
    CallersInvalidated {
        /// The method whose facts changed
        callee: MethodId,
        /// How many callers were reset and forwarded
        callers: usize,
    },
    /// The generalizer rewrote a field reference.
    FieldRefGeneralized {
        /// The method containing the rewritten instruction
        site: MethodId,
        /// Bytecode offset of the rewritten instruction
        offset: u32,
        /// Name of the class the reference now points at
        to: String,
    },
    /// The generalizer rewrote a method reference.
    MethodRefGeneralized {
        /// The method containing the rewritten instruction
        site: MethodId,
        /// Bytecode offset of the rewritten instruction
        offset: u32,
        /// Name of the class the reference now points at
        to: String,
    },
}

impl Event {
    /// The kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::CallersInvalidated { .. } => EventKind::CallersInvalidated,
            Self::FieldRefGeneralized { .. } => EventKind::FieldRefGeneralized,
            Self::MethodRefGeneralized { .. } => EventKind::MethodRefGeneralized,
        }
    }
}

/// An append-only log of optimization events.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// The number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the recorded events in order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// How many events of the given kind were recorded.
    #[must_use]
    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// Removes and returns all recorded events.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
