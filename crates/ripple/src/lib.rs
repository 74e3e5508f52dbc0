pub use serde_json;
pub use ripple_core::{
    ComponentThunk, DomNode, Event, EventHandler, EventKind, RenderError, State, Store,
    StoreError, Subscription, VElement, VNode, materialize, tags,
};
pub use ripple_runtime::*;

pub mod prelude {
    pub use super::*;
    pub use serde_json::{Value, json};
}
