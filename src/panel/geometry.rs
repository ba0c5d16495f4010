//! Position and drag handling for the floating chat panel.

use ratatui::layout::{Position, Rect, Size};

/// Top-left corner of the panel in terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelPosition {
    pub left: u16,
    pub top: u16,
}

/// How the panel is placed in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Fixed distance from the bottom-right corner.
    EdgeAnchored { right: u16, bottom: u16 },
    /// Explicit top-left, set once the panel has been dragged.
    Explicit(PanelPosition),
}

/// Header cursor feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

/// An in-progress header drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// Pointer offset from the panel's top-left at press time.
    pub offset_x: u16,
    pub offset_y: u16,
}

/// Placement state of the chat panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGeometry {
    anchor: Anchor,
    size: Size,
    drag: Option<DragSession>,
}

impl PanelGeometry {
    /// A panel of `size` anchored `margin` cells from the bottom-right corner.
    pub fn new(size: Size, margin: u16) -> Self {
        Self {
            anchor: Anchor::EdgeAnchored {
                right: margin,
                bottom: margin,
            },
            size,
            drag: None,
        }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cursor(&self) -> Cursor {
        if self.is_dragging() {
            Cursor::Grabbing
        } else {
            Cursor::Grab
        }
    }

    /// Panel size as rendered, never larger than the viewport.
    fn rendered_size(&self, viewport: Size) -> Size {
        Size {
            width: self.size.width.min(viewport.width),
            height: self.size.height.min(viewport.height),
        }
    }

    /// Where the panel is drawn in `viewport`.
    ///
    /// The result always fits in the viewport; the stored position is left
    /// alone so a shrinking terminal does not move the panel permanently.
    pub fn rendered_rect(&self, viewport: Size) -> Rect {
        let size = self.rendered_size(viewport);
        let max_x = viewport.width - size.width;
        let max_y = viewport.height - size.height;
        let (x, y) = match self.anchor {
            Anchor::EdgeAnchored { right, bottom } => {
                (max_x.saturating_sub(right), max_y.saturating_sub(bottom))
            }
            Anchor::Explicit(pos) => (pos.left.min(max_x), pos.top.min(max_y)),
        };
        Rect::new(x, y, size.width, size.height)
    }

    /// Start dragging from a press on the header at `pointer`.
    pub fn press_header(&mut self, pointer: Position, viewport: Size) {
        let rect = self.rendered_rect(viewport);
        self.anchor = Anchor::Explicit(PanelPosition {
            left: rect.x,
            top: rect.y,
        });
        self.drag = Some(DragSession {
            offset_x: pointer.x.saturating_sub(rect.x),
            offset_y: pointer.y.saturating_sub(rect.y),
        });
        tracing::trace!("Drag started at {:?}", pointer);
    }

    /// Move the panel so the grabbed point follows `pointer`.
    ///
    /// Each axis is clamped to `[0, viewport - panel]`. Returns `false` when
    /// no drag is active.
    pub fn drag_to(&mut self, pointer: Position, viewport: Size) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let size = self.rendered_size(viewport);
        let left = clamp_axis(pointer.x, drag.offset_x, viewport.width, size.width);
        let top = clamp_axis(pointer.y, drag.offset_y, viewport.height, size.height);
        self.anchor = Anchor::Explicit(PanelPosition { left, top });
        true
    }

    /// End the drag, if any.
    pub fn release(&mut self) -> bool {
        self.drag.take().is_some()
    }
}

fn clamp_axis(pointer: u16, offset: u16, viewport: u16, panel: u16) -> u16 {
    let wanted = i32::from(pointer) - i32::from(offset);
    let max = (i32::from(viewport) - i32::from(panel)).max(0);
    // Both bounds are within u16 range.
    wanted.clamp(0, max) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORT: Size = Size {
        width: 100,
        height: 40,
    };

    fn geometry() -> PanelGeometry {
        PanelGeometry::new(
            Size {
                width: 60,
                height: 22,
            },
            2,
        )
    }

    #[test]
    fn test_edge_anchored_rect() {
        assert_eq!(geometry().rendered_rect(VIEWPORT), Rect::new(38, 16, 60, 22));
    }

    #[test]
    fn test_press_switches_to_explicit_and_records_offset() {
        let mut panel = geometry();
        panel.press_header(Position::new(45, 16), VIEWPORT);

        assert_eq!(
            panel.anchor(),
            Anchor::Explicit(PanelPosition { left: 38, top: 16 })
        );
        assert_eq!(
            panel.drag(),
            Some(DragSession {
                offset_x: 7,
                offset_y: 0
            })
        );
        assert_eq!(panel.cursor(), Cursor::Grabbing);
        assert_eq!(panel.rendered_rect(VIEWPORT), Rect::new(38, 16, 60, 22));
    }

    #[test]
    fn test_drag_moves_by_pointer_minus_offset() {
        let mut panel = geometry();
        panel.press_header(Position::new(45, 16), VIEWPORT);

        assert!(panel.drag_to(Position::new(20, 5), VIEWPORT));

        assert_eq!(panel.rendered_rect(VIEWPORT), Rect::new(13, 5, 60, 22));
    }

    #[test]
    fn test_drag_past_right_edge_clamps_to_viewport_minus_panel() {
        let mut panel = geometry();
        panel.press_header(Position::new(38, 16), VIEWPORT);

        panel.drag_to(Position::new(99, 39), VIEWPORT);

        assert_eq!(
            panel.anchor(),
            Anchor::Explicit(PanelPosition { left: 40, top: 18 })
        );
    }

    #[test]
    fn test_drag_past_left_edge_clamps_to_zero() {
        let mut panel = geometry();
        panel.press_header(Position::new(50, 17), VIEWPORT);

        panel.drag_to(Position::new(3, 0), VIEWPORT);

        assert_eq!(panel.anchor(), Anchor::Explicit(PanelPosition::default()));
    }

    #[test]
    fn test_panel_stays_inside_viewport_for_any_pointer() {
        let mut panel = geometry();
        panel.press_header(Position::new(60, 16), VIEWPORT);
        for x in (0..VIEWPORT.width).step_by(7) {
            for y in (0..VIEWPORT.height).step_by(3) {
                panel.drag_to(Position::new(x, y), VIEWPORT);
                let Anchor::Explicit(pos) = panel.anchor() else {
                    panic!("panel should be explicitly placed while dragging");
                };
                assert!(pos.left + 60 <= VIEWPORT.width);
                assert!(pos.top + 22 <= VIEWPORT.height);
            }
        }
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut panel = geometry();
        assert!(!panel.drag_to(Position::new(0, 0), VIEWPORT));
        assert!(matches!(panel.anchor(), Anchor::EdgeAnchored { .. }));
    }

    #[test]
    fn test_release_ends_drag_and_restores_cursor() {
        let mut panel = geometry();
        panel.press_header(Position::new(40, 16), VIEWPORT);
        assert!(panel.release());
        assert!(!panel.is_dragging());
        assert_eq!(panel.cursor(), Cursor::Grab);
        assert!(!panel.release());

        let before = panel.anchor();
        panel.drag_to(Position::new(0, 0), VIEWPORT);
        assert_eq!(panel.anchor(), before);
    }

    #[test]
    fn test_panel_larger_than_viewport_pins_to_origin() {
        let small = Size {
            width: 30,
            height: 10,
        };
        let mut panel = geometry();
        assert_eq!(panel.rendered_rect(small), Rect::new(0, 0, 30, 10));

        panel.press_header(Position::new(5, 0), small);
        panel.drag_to(Position::new(25, 8), small);
        assert_eq!(panel.rendered_rect(small), Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_explicit_position_is_clamped_when_viewport_shrinks() {
        let mut panel = geometry();
        panel.press_header(Position::new(38, 16), VIEWPORT);
        panel.drag_to(Position::new(99, 39), VIEWPORT);
        panel.release();

        let smaller = Size {
            width: 80,
            height: 30,
        };
        assert_eq!(panel.rendered_rect(smaller), Rect::new(20, 8, 60, 22));
        assert_eq!(
            panel.anchor(),
            Anchor::Explicit(PanelPosition { left: 40, top: 18 })
        );
    }
}
