//! Confetti pieces spawned into the page on a win

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use jigsaw_core::ConfettiPiece;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

/// Confetti currently in the page, each with the timer that will remove it
#[derive(Default)]
pub struct Celebration {
    pieces: Vec<(Element, Timeout)>,
}

impl Celebration {
    /// Remove every piece now and cancel pending removals
    pub fn clear(&mut self) {
        for (node, _timer) in self.pieces.drain(..) {
            node.remove();
        }
    }

    /// Forget pieces whose timer already took them out of the page
    pub fn prune(&mut self) {
        self.pieces.retain(|(node, _)| node.is_connected());
    }
}

fn spawn_piece(document: &Document, piece: &ConfettiPiece) -> Result<HtmlElement, JsValue> {
    let element = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    element.set_class_name("confetti");

    let style = element.style();
    style.set_property("left", &format!("{}%", piece.left_pct))?;
    style.set_property("background", &piece.color)?;
    style.set_property("opacity", &format!("{:.2}", piece.opacity))?;
    style.set_property("border-radius", piece.border_radius())?;
    style.set_property("--size", &format!("{}px", piece.size_px))?;
    style.set_property("--drift", &format!("{}px", piece.drift_px))?;
    style.set_property("animation", &piece.animation_css())?;
    Ok(element)
}

pub fn launch(
    document: &Document,
    burst: &[ConfettiPiece],
    celebration: &Rc<RefCell<Celebration>>,
) {
    let Some(body) = document.body() else {
        return;
    };

    let mut state = celebration.borrow_mut();
    state.prune();
    for piece in burst {
        let element = match spawn_piece(document, piece) {
            Ok(element) => element,
            Err(err) => {
                gloo::console::error!("confetti piece failed", err);
                continue;
            }
        };
        if let Err(err) = body.append_child(&element) {
            gloo::console::error!("confetti piece failed", err);
            continue;
        }

        let node: Element = element.unchecked_into();
        let expired = node.clone();
        let timer = Timeout::new(piece.lifetime_ms(), move || expired.remove());
        state.pieces.push((node, timer));
    }
}
