//! Gesture routing
//!
//! Drag-and-drop and touch input arrive as very different event streams.
//! Each family has an adapter that turns its raw events into normalized
//! [`Gesture`]s, and one state machine turns gestures into highlight feedback
//! and, at most once per gesture, a [`SwapRequest`].
//!
//! ```text
//! Idle --Begin--> Dragging --Hover/Leave--> Dragging
//!                 Dragging --Release(other tile)--> emit swap, Idle
//!                 Dragging --Release(none/same) | Abort--> Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::config::InteractionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputFamily {
    Pointer,
    Touch,
}

/// Client-space coordinates of a pointer or touch
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The one action the router produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub from: usize,
    pub to: usize,
}

/// Family-independent gesture step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Begin { slot: usize, at: Option<Point> },
    Hover { slot: Option<usize>, at: Option<Point> },
    Leave { slot: usize },
    Release { slot: Option<usize> },
    Abort,
}

/// Highlight state the render surface mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Feedback {
    /// Slot being dragged
    pub active: Option<usize>,
    /// Slot hovered as a drop target
    pub highlighted: Option<usize>,
}

/// Translates one family's raw events into gestures
pub trait GestureAdapter {
    type Event;

    fn family(&self) -> InputFamily;

    fn translate(&mut self, event: Self::Event) -> Option<Gesture>;
}

/// HTML drag-and-drop events, already hit-tested to slots
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragInput {
    Start { slot: usize },
    Enter { slot: usize },
    Over { slot: Option<usize>, at: Point },
    Leave { slot: usize },
    Drop { slot: Option<usize> },
    End,
}

#[derive(Debug, Default)]
pub struct DragAdapter;

impl GestureAdapter for DragAdapter {
    type Event = DragInput;

    fn family(&self) -> InputFamily {
        InputFamily::Pointer
    }

    fn translate(&mut self, event: DragInput) -> Option<Gesture> {
        Some(match event {
            DragInput::Start { slot } => Gesture::Begin { slot, at: None },
            DragInput::Enter { slot } => Gesture::Hover {
                slot: Some(slot),
                at: None,
            },
            DragInput::Over { slot, at } => Gesture::Hover { slot, at: Some(at) },
            DragInput::Leave { slot } => Gesture::Leave { slot },
            DragInput::Drop { slot } => Gesture::Release { slot },
            // dragend fires after drop too; by then the gesture is already idle
            DragInput::End => Gesture::Abort,
        })
    }
}

/// Touch events, already hit-tested to slots via the touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchInput {
    Start { slot: Option<usize>, at: Point },
    Move { slot: Option<usize>, at: Point },
    End { slot: Option<usize> },
    Cancel,
}

#[derive(Debug, Default)]
pub struct TouchAdapter;

impl GestureAdapter for TouchAdapter {
    type Event = TouchInput;

    fn family(&self) -> InputFamily {
        InputFamily::Touch
    }

    fn translate(&mut self, event: TouchInput) -> Option<Gesture> {
        match event {
            // A touch that starts outside every tile never becomes a gesture
            TouchInput::Start { slot, at } => {
                slot.map(|slot| Gesture::Begin { slot, at: Some(at) })
            }
            TouchInput::Move { slot, at } => Some(Gesture::Hover { slot, at: Some(at) }),
            TouchInput::End { slot } => Some(Gesture::Release { slot }),
            TouchInput::Cancel => Some(Gesture::Abort),
        }
    }
}

/// Raw input from either family
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Drag(DragInput),
    Touch(TouchInput),
}

#[derive(Debug, Clone, Copy)]
struct GestureSession {
    family: InputFamily,
    origin: usize,
    start: Option<Point>,
}

pub struct InteractionRouter {
    drag: DragAdapter,
    touch: TouchAdapter,
    touch_threshold: f64,
    slot_count: usize,
    session: Option<GestureSession>,
    highlighted: Option<usize>,
}

impl InteractionRouter {
    pub fn new(config: &InteractionConfig, slot_count: usize) -> Self {
        Self {
            drag: DragAdapter,
            touch: TouchAdapter,
            touch_threshold: config.touch_threshold_px,
            slot_count,
            session: None,
            highlighted: None,
        }
    }

    /// Resize for a new board; drops any gesture in flight
    pub fn reset(&mut self, slot_count: usize) {
        self.slot_count = slot_count;
        self.clear();
    }

    pub fn feedback(&self) -> Feedback {
        Feedback {
            active: self.session.map(|s| s.origin),
            highlighted: self.highlighted,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn handle(&mut self, event: InputEvent) -> Option<SwapRequest> {
        let (family, gesture) = match event {
            InputEvent::Drag(input) => (self.drag.family(), self.drag.translate(input)?),
            InputEvent::Touch(input) => (self.touch.family(), self.touch.translate(input)?),
        };
        self.apply(family, gesture)
    }

    fn valid_slot(&self, slot: Option<usize>) -> Option<usize> {
        slot.filter(|&s| s < self.slot_count)
    }

    fn threshold(&self, family: InputFamily) -> f64 {
        match family {
            InputFamily::Pointer => 0.0,
            InputFamily::Touch => self.touch_threshold,
        }
    }

    fn clear(&mut self) {
        self.session = None;
        self.highlighted = None;
    }

    /// Advance the state machine by one gesture step
    pub fn apply(&mut self, family: InputFamily, gesture: Gesture) -> Option<SwapRequest> {
        let Some(session) = self.session else {
            if let Gesture::Begin { slot, at } = gesture {
                if self.valid_slot(Some(slot)).is_some() {
                    tracing::debug!(?family, slot, "gesture started");
                    self.session = Some(GestureSession {
                        family,
                        origin: slot,
                        start: at,
                    });
                    self.highlighted = None;
                }
            }
            return None;
        };

        if session.family != family {
            tracing::debug!(?family, active = ?session.family, "ignoring input from other family");
            return None;
        }

        match gesture {
            Gesture::Begin { .. } => {
                tracing::debug!(?family, "ignoring overlapping gesture start");
                None
            }
            Gesture::Hover { slot, at } => {
                let threshold = self.threshold(family);
                if let (Some(start), Some(at)) = (session.start, at) {
                    let dx = (at.x - start.x).abs();
                    let dy = (at.y - start.y).abs();
                    if threshold > 0.0 && dx <= threshold && dy <= threshold {
                        return None;
                    }
                }
                self.highlighted = self.valid_slot(slot).filter(|&s| s != session.origin);
                None
            }
            Gesture::Leave { slot } => {
                if self.highlighted == Some(slot) {
                    self.highlighted = None;
                }
                None
            }
            Gesture::Release { slot } => {
                self.clear();
                let target = self.valid_slot(slot).filter(|&s| s != session.origin);
                match target {
                    Some(to) => {
                        tracing::debug!(from = session.origin, to, "swap requested");
                        Some(SwapRequest {
                            from: session.origin,
                            to,
                        })
                    }
                    None => {
                        tracing::debug!(origin = session.origin, "gesture cancelled");
                        None
                    }
                }
            }
            Gesture::Abort => {
                self.clear();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> InteractionRouter {
        InteractionRouter::new(&InteractionConfig::default(), 9)
    }

    fn drag(router: &mut InteractionRouter, input: DragInput) -> Option<SwapRequest> {
        router.handle(InputEvent::Drag(input))
    }

    fn touch(router: &mut InteractionRouter, input: TouchInput) -> Option<SwapRequest> {
        router.handle(InputEvent::Touch(input))
    }

    #[test]
    fn test_drag_drop_emits_one_swap() {
        let mut r = router();
        assert_eq!(drag(&mut r, DragInput::Start { slot: 2 }), None);
        assert_eq!(r.feedback().active, Some(2));

        drag(&mut r, DragInput::Enter { slot: 5 });
        assert_eq!(r.feedback().highlighted, Some(5));

        assert_eq!(
            drag(&mut r, DragInput::Drop { slot: Some(5) }),
            Some(SwapRequest { from: 2, to: 5 })
        );
        assert_eq!(r.feedback(), Feedback::default());

        // dragend after the drop must not emit again
        assert_eq!(drag(&mut r, DragInput::End), None);
        assert!(r.is_idle());
    }

    #[test]
    fn test_drop_on_origin_is_cancelled() {
        let mut r = router();
        drag(&mut r, DragInput::Start { slot: 4 });
        drag(&mut r, DragInput::Over { slot: Some(4), at: Point::new(10.0, 10.0) });
        assert_eq!(r.feedback().highlighted, None);
        assert_eq!(drag(&mut r, DragInput::Drop { slot: Some(4) }), None);
        assert_eq!(r.feedback(), Feedback::default());
    }

    #[test]
    fn test_drag_end_outside_clears_highlight() {
        let mut r = router();
        drag(&mut r, DragInput::Start { slot: 0 });
        drag(&mut r, DragInput::Over { slot: Some(1), at: Point::new(120.0, 5.0) });
        assert_eq!(r.feedback().highlighted, Some(1));
        assert_eq!(drag(&mut r, DragInput::End), None);
        assert_eq!(r.feedback(), Feedback::default());
    }

    #[test]
    fn test_hover_moves_highlight_and_leave_clears_it() {
        let mut r = router();
        drag(&mut r, DragInput::Start { slot: 0 });
        drag(&mut r, DragInput::Enter { slot: 1 });
        drag(&mut r, DragInput::Enter { slot: 3 });
        assert_eq!(r.feedback().highlighted, Some(3));

        // Leaving a tile that is not highlighted changes nothing
        drag(&mut r, DragInput::Leave { slot: 1 });
        assert_eq!(r.feedback().highlighted, Some(3));

        drag(&mut r, DragInput::Leave { slot: 3 });
        assert_eq!(r.feedback().highlighted, None);
    }

    #[test]
    fn test_touch_jitter_does_not_highlight() {
        let mut r = router();
        touch(&mut r, TouchInput::Start { slot: Some(0), at: Point::new(50.0, 50.0) });
        touch(&mut r, TouchInput::Move { slot: Some(1), at: Point::new(58.0, 45.0) });
        assert_eq!(r.feedback().highlighted, None);

        touch(&mut r, TouchInput::Move { slot: Some(1), at: Point::new(61.0, 50.0) });
        assert_eq!(r.feedback().highlighted, Some(1));

        assert_eq!(
            touch(&mut r, TouchInput::End { slot: Some(1) }),
            Some(SwapRequest { from: 0, to: 1 })
        );
    }

    #[test]
    fn test_touch_outside_tiles_is_ignored() {
        let mut r = router();
        touch(&mut r, TouchInput::Start { slot: None, at: Point::new(1.0, 1.0) });
        assert!(r.is_idle());
        assert_eq!(touch(&mut r, TouchInput::End { slot: Some(3) }), None);
    }

    #[test]
    fn test_touch_released_off_board_cancels() {
        let mut r = router();
        touch(&mut r, TouchInput::Start { slot: Some(6), at: Point::new(0.0, 0.0) });
        touch(&mut r, TouchInput::Move { slot: Some(7), at: Point::new(80.0, 0.0) });
        assert_eq!(touch(&mut r, TouchInput::End { slot: None }), None);
        assert_eq!(r.feedback(), Feedback::default());
    }

    #[test]
    fn test_second_gesture_start_is_ignored() {
        let mut r = router();
        drag(&mut r, DragInput::Start { slot: 1 });
        drag(&mut r, DragInput::Start { slot: 2 });
        touch(&mut r, TouchInput::Start { slot: Some(3), at: Point::new(0.0, 0.0) });
        assert_eq!(r.feedback().active, Some(1));
        assert_eq!(
            drag(&mut r, DragInput::Drop { slot: Some(8) }),
            Some(SwapRequest { from: 1, to: 8 })
        );
    }

    #[test]
    fn test_out_of_range_slots_are_not_targets() {
        let mut r = router();
        drag(&mut r, DragInput::Start { slot: 12 });
        assert!(r.is_idle());

        drag(&mut r, DragInput::Start { slot: 0 });
        drag(&mut r, DragInput::Enter { slot: 9 });
        assert_eq!(r.feedback().highlighted, None);
        assert_eq!(drag(&mut r, DragInput::Drop { slot: Some(9) }), None);
    }

    #[test]
    fn test_reset_drops_gesture_in_flight() {
        let mut r = router();
        drag(&mut r, DragInput::Start { slot: 0 });
        drag(&mut r, DragInput::Enter { slot: 1 });
        r.reset(4);
        assert_eq!(r.feedback(), Feedback::default());
        assert_eq!(drag(&mut r, DragInput::Drop { slot: Some(1) }), None);
    }
}
