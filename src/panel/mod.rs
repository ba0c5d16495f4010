//! Panel interaction state: show/hide and drag positioning.
//!
//! Both pieces are plain values owned by the UI and mutated from its input
//! handlers; nothing here touches the terminal.

mod geometry;
mod visibility;

pub use geometry::{Anchor, Cursor, DragSession, PanelGeometry, PanelPosition};
pub use visibility::{ClickTarget, PanelState, Visibility};
