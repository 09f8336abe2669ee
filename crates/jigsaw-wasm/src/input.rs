//! Browser event wiring. Listeners sit on the grid container and hit-test
//! through the event target, so re-rendered tiles need no rebinding.

use gloo::events::{EventListener, EventListenerOptions};
use jigsaw_core::{DragInput, InputEvent, Point, TouchInput};
use wasm_bindgen::JsCast;
use web_sys::{Document, DragEvent, Element, Event, Touch, TouchEvent};

use crate::dom::{slot_of, DomElements, DomViewport};
use crate::session::Dispatcher;

fn target_slot(event: &Event) -> Option<usize> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    slot_of(&target)
}

fn touch_point(touch: &Touch) -> Point {
    Point::new(f64::from(touch.client_x()), f64::from(touch.client_y()))
}

/// Touch events target the element where the touch began, so later
/// positions are hit-tested by coordinates
fn slot_at(document: &Document, at: Point) -> Option<usize> {
    let element = document.element_from_point(at.x as f32, at.y as f32)?;
    slot_of(&element)
}

fn drag_listener<F>(
    elements: &DomElements,
    kind: &'static str,
    dispatcher: &Dispatcher,
    translate: F,
) -> EventListener
where
    F: Fn(&Event) -> Option<DragInput> + 'static,
{
    let dispatcher = dispatcher.clone();
    EventListener::new_with_options(
        &elements.grid,
        kind,
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            if let Some(input) = translate(event) {
                dispatcher.dispatch(InputEvent::Drag(input));
            }
        },
    )
}

fn touch_listener<F>(
    elements: &DomElements,
    kind: &'static str,
    dispatcher: &Dispatcher,
    translate: F,
) -> EventListener
where
    F: Fn(&TouchEvent) -> Option<TouchInput> + 'static,
{
    let dispatcher = dispatcher.clone();
    EventListener::new(&elements.grid, kind, move |event| {
        let input = event.dyn_ref::<TouchEvent>().and_then(&translate);
        if let Some(input) = input {
            dispatcher.dispatch(InputEvent::Touch(input));
        }
    })
}

fn bind_drag(elements: &DomElements, dispatcher: &Dispatcher) -> Vec<EventListener> {
    vec![
        drag_listener(elements, "dragstart", dispatcher, |event| {
            let slot = target_slot(event)?;
            let transfer = event
                .dyn_ref::<DragEvent>()
                .and_then(DragEvent::data_transfer);
            if let Some(transfer) = transfer {
                transfer.set_effect_allowed("move");
                // Firefox will not start a drag without data
                let _ = transfer.set_data("text/plain", &slot.to_string());
            }
            Some(DragInput::Start { slot })
        }),
        drag_listener(elements, "dragenter", dispatcher, |event| {
            event.prevent_default();
            target_slot(event).map(|slot| DragInput::Enter { slot })
        }),
        drag_listener(elements, "dragover", dispatcher, |event| {
            event.prevent_default();
            let drag = event.dyn_ref::<DragEvent>()?;
            if let Some(transfer) = drag.data_transfer() {
                transfer.set_drop_effect("move");
            }
            Some(DragInput::Over {
                slot: target_slot(event),
                at: Point::new(f64::from(drag.client_x()), f64::from(drag.client_y())),
            })
        }),
        drag_listener(elements, "dragleave", dispatcher, |event| {
            target_slot(event).map(|slot| DragInput::Leave { slot })
        }),
        drag_listener(elements, "drop", dispatcher, |event| {
            event.prevent_default();
            event.stop_propagation();
            Some(DragInput::Drop {
                slot: target_slot(event),
            })
        }),
        drag_listener(elements, "dragend", dispatcher, |_| Some(DragInput::End)),
    ]
}

fn bind_touch(elements: &DomElements, dispatcher: &Dispatcher) -> Vec<EventListener> {
    let move_doc = elements.document.clone();
    let end_doc = elements.document.clone();
    vec![
        touch_listener(elements, "touchstart", dispatcher, |event| {
            let at = touch_point(&event.touches().get(0)?);
            Some(TouchInput::Start {
                slot: target_slot(event),
                at,
            })
        }),
        touch_listener(elements, "touchmove", dispatcher, move |event| {
            let at = touch_point(&event.touches().get(0)?);
            Some(TouchInput::Move {
                slot: slot_at(&move_doc, at),
                at,
            })
        }),
        touch_listener(elements, "touchend", dispatcher, move |event| {
            let slot = event
                .changed_touches()
                .get(0)
                .and_then(|touch| slot_at(&end_doc, touch_point(&touch)));
            Some(TouchInput::End { slot })
        }),
        touch_listener(elements, "touchcancel", dispatcher, |_| Some(TouchInput::Cancel)),
    ]
}

/// All gesture listeners for one session
pub fn bind_grid(elements: &DomElements, dispatcher: &Dispatcher) -> Vec<EventListener> {
    let mut listeners = bind_drag(elements, dispatcher);
    listeners.extend(bind_touch(elements, dispatcher));
    listeners
}

/// Re-fit the board when the window changes size
pub fn bind_resize(elements: &DomElements, dispatcher: Dispatcher) -> Option<EventListener> {
    let viewport = DomViewport::new(elements.frame.clone());
    let window = web_sys::window()?;
    Some(EventListener::new(&window, "resize", move |_| {
        dispatcher.relayout(&viewport)
    }))
}
