pub mod dom;
pub mod render;
pub mod store;
pub mod vnode;

// Re-export commonly used items
pub use dom::{DomNode, Event, EventHandler};
pub use render::{RenderError, materialize};
pub use store::{State, Store, StoreError, Subscription};
pub use vnode::{ComponentThunk, EventKind, VElement, VNode, tags};
