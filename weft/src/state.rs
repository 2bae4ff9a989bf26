//! Graph state: typed fields, patch-based updates, named merge policies.
//!
//! Every graph threads one state type through its nodes. Nodes never mutate
//! state in place; they return an update (a partial patch), and the executor
//! alone applies it through [`GraphState::apply`]. That makes `apply` the
//! single point of truth for combining contributions, which is what lets
//! fan-out branches merge without locks and checkpoint replay stay
//! deterministic.
//!
//! Two merge policies cover every field, mirroring LangGraph's reducers:
//! *replace* (last writer wins; use a [`Slot`] in the update struct) and
//! *append* (contributions concatenate; use a `Vec` in the update struct).

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Shared state threaded through a graph.
///
/// Implementations declare a closed set of typed fields with defaults
/// (`Default` on the state type) and a companion `Update` patch type.
/// `apply` must be a pure function of `(self, update)`: deterministic and
/// free of side effects, since it runs once per node and once per fan-out
/// branch in dispatch order.
pub trait GraphState: Clone + Send + Sync + 'static {
    /// Partial update produced by a node or a tool. `Default` is the empty
    /// patch: applying it changes nothing.
    type Update: Default + Send + 'static;

    /// Merges a patch into the state, field by field, per each field's policy.
    fn apply(&mut self, update: Self::Update);
}

/// State that carries a conversation log, as required by the generic
/// [`ModelNode`](crate::model::ModelNode) and
/// [`ToolNode`](crate::tool::ToolNode).
pub trait ChatState: GraphState {
    fn messages(&self) -> &[Message];

    /// Builds the patch that appends the given messages and nothing else.
    fn messages_update(messages: Vec<Message>) -> Self::Update;
}

/// Replace-policy slot in an update struct.
///
/// `Keep` (the default) leaves the field untouched; `Set` overwrites it.
/// To clear an optional field, use a `Slot<Option<T>>` and set it to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Slot<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Slot<T> {
    pub fn set(value: T) -> Self {
        Slot::Set(value)
    }
}

/// The two merge policies. Called from `GraphState::apply` implementations,
/// one line per field, so the policy of every field is visible in one place.
pub mod reducers {
    use super::Slot;

    /// Replace policy: the patched value wins; `Keep` carries the old value over.
    pub fn replace<T>(target: &mut T, slot: Slot<T>) {
        if let Slot::Set(value) = slot {
            *target = value;
        }
    }

    /// Append policy: patched items are concatenated after the existing ones.
    pub fn append<T>(target: &mut Vec<T>, mut items: Vec<T>) {
        target.append(&mut items);
    }
}
