//! DOM side of the puzzle: cached elements, the render surface and the viewport

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use jigsaw_core::config::{AnimationConfig, ConfettiConfig};
use jigsaw_core::{
    BoardVisual, Feedback, PuzzleError, PuzzleResult, RenderCause, RenderSurface, SimpleRng, Size,
    TileVisual, Viewport,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

use crate::celebrate::{self, Celebration};

pub const PIECE_CLASS: &str = "puzzle-piece";
const PIECE_SELECTOR: &str = ".puzzle-piece";
const INDEX_ATTR: &str = "data-index";

fn missing(name: &str) -> PuzzleError {
    PuzzleError::MissingResource(name.to_string())
}

/// Elements the game needs, looked up once per page
#[derive(Clone)]
pub struct DomElements {
    pub document: Document,
    pub frame: Element,
    pub grid: HtmlElement,
    pub win_modal: Element,
    pub download_button: Option<Element>,
    pub play_again_button: Option<Element>,
    pub completed_image: Option<HtmlImageElement>,
}

impl DomElements {
    pub fn cache() -> PuzzleResult<Self> {
        let document = web_sys::window()
            .ok_or_else(|| missing("window"))?
            .document()
            .ok_or_else(|| missing("document"))?;

        let frame = document
            .query_selector(".puzzle-frame")
            .ok()
            .flatten()
            .ok_or_else(|| missing("puzzleFrame"))?;
        let grid = document
            .get_element_by_id("puzzleGrid")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| missing("puzzleGrid"))?;
        let win_modal = document
            .get_element_by_id("winModal")
            .ok_or_else(|| missing("winModal"))?;

        Ok(Self {
            download_button: document.get_element_by_id("downloadBtn"),
            play_again_button: document.get_element_by_id("playAgainBtn"),
            completed_image: document
                .get_element_by_id("completedImage")
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok()),
            document,
            frame,
            grid,
            win_modal,
        })
    }

    pub fn set_background_image(&self, src: &str) {
        let root = self
            .document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(root) = root {
            let _ = root
                .style()
                .set_property("--bg-image", &format!("url('{}')", src));
        }
    }
}

/// Slot index of the tile under (or containing) `element`
pub fn slot_of(element: &Element) -> Option<usize> {
    element
        .closest(PIECE_SELECTOR)
        .ok()
        .flatten()?
        .get_attribute(INDEX_ATTR)?
        .parse()
        .ok()
}

/// Render surface backed by one `div` per slot inside the grid element
pub struct DomSurface {
    elements: DomElements,
    animation: AnimationConfig,
    confetti: ConfettiConfig,
    pieces: Vec<HtmlElement>,
    rng: SimpleRng,
    pulse: Option<Timeout>,
    reveal: Option<Timeout>,
    celebration: Rc<RefCell<Celebration>>,
}

impl DomSurface {
    pub fn new(
        elements: DomElements,
        animation: AnimationConfig,
        confetti: ConfettiConfig,
    ) -> Self {
        elements.grid.set_inner_html("");
        let _ = elements.win_modal.class_list().remove_1("show");
        Self {
            elements,
            animation,
            confetti,
            pieces: Vec::new(),
            rng: SimpleRng::new(),
            pulse: None,
            reveal: None,
            celebration: Rc::new(RefCell::new(Celebration::default())),
        }
    }

    fn create_piece(&self, slot: usize) -> Result<HtmlElement, JsValue> {
        let piece = self
            .elements
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()?;
        piece.set_class_name(PIECE_CLASS);
        piece.set_draggable(true);
        piece.set_attribute(INDEX_ATTR, &slot.to_string())?;
        piece.set_attribute("role", "button")?;
        Ok(piece)
    }

    fn style_piece(
        piece: &HtmlElement,
        tile: &TileVisual,
        visual: &BoardVisual,
    ) -> Result<(), JsValue> {
        piece.set_attribute("aria-label", &tile.label)?;
        let style = piece.style();
        style.set_property("background-image", &format!("url({})", visual.image_src))?;
        style.set_property(
            "background-size",
            &format!("{}px {}px", visual.board_width, visual.board_height),
        )?;
        style.set_property(
            "background-position",
            &format!("{}px {}px", tile.source_offset_x, tile.source_offset_y),
        )?;
        style.set_property("width", &format!("{}px", tile.size))?;
        style.set_property("height", &format!("{}px", tile.size))?;
        Ok(())
    }

    fn try_render(&mut self, visual: &BoardVisual) -> Result<(), JsValue> {
        let grid = &self.elements.grid;
        let style = grid.style();
        style.set_property("width", &format!("{}px", visual.board_width))?;
        style.set_property("height", &format!("{}px", visual.board_height))?;
        let track = format!("repeat({}, {}px)", visual.grid_size, visual.tile_size);
        style.set_property("grid-template-columns", &track)?;
        style.set_property("grid-template-rows", &track)?;

        if self.pieces.len() != visual.tiles.len() {
            grid.set_inner_html("");
            let mut pieces = Vec::with_capacity(visual.tiles.len());
            for tile in &visual.tiles {
                let piece = self.create_piece(tile.slot)?;
                grid.append_child(&piece)?;
                pieces.push(piece);
            }
            self.pieces = pieces;
        }

        for (piece, tile) in self.pieces.iter().zip(&visual.tiles) {
            Self::style_piece(piece, tile, visual)?;
        }
        Ok(())
    }

    fn pulse(&mut self) {
        let animation = format!("swapPulse {}ms ease", self.animation.swap_duration_ms);
        for piece in &self.pieces {
            let _ = piece.style().set_property("animation", &animation);
        }
        let pieces = self.pieces.clone();
        self.pulse = Some(Timeout::new(self.animation.swap_duration_ms, move || {
            for piece in &pieces {
                let _ = piece.style().remove_property("animation");
            }
        }));
    }
}

impl RenderSurface for DomSurface {
    fn render(&mut self, visual: &BoardVisual, cause: RenderCause) {
        if let Err(err) = self.try_render(visual) {
            gloo::console::error!("render failed", err);
            return;
        }
        if cause == RenderCause::Swap {
            self.pulse();
        }
    }

    fn show_feedback(&mut self, feedback: Feedback) {
        for (slot, piece) in self.pieces.iter().enumerate() {
            let classes = piece.class_list();
            let _ = classes.toggle_with_force("dragging", feedback.active == Some(slot));
            let _ = classes.toggle_with_force("highlight", feedback.highlighted == Some(slot));
        }
    }

    fn celebrate(&mut self, visual: Option<&BoardVisual>) {
        if let (Some(image), Some(visual)) = (&self.elements.completed_image, visual) {
            image.set_src(&visual.image_src);
        }
        for piece in &self.pieces {
            let _ = piece.class_list().add_1("correct");
        }

        let burst = jigsaw_core::confetti_burst(
            &self.confetti,
            self.animation.confetti_count,
            &mut self.rng,
        );
        let document = self.elements.document.clone();
        let modal = self.elements.win_modal.clone();
        let celebration = Rc::clone(&self.celebration);
        self.reveal = Some(Timeout::new(self.animation.swap_duration_ms, move || {
            let _ = modal.class_list().add_1("show");
            celebrate::launch(&document, &burst, &celebration);
        }));
    }
}

impl Drop for DomSurface {
    fn drop(&mut self) {
        self.celebration.borrow_mut().clear();
    }
}

/// Drawable area: the puzzle frame, or the window when the frame has no size yet
pub struct DomViewport {
    frame: Element,
}

impl DomViewport {
    pub fn new(frame: Element) -> Self {
        Self { frame }
    }
}

impl Viewport for DomViewport {
    fn size(&self) -> Size {
        let rect = self.frame.get_bounding_client_rect();
        let window = web_sys::window();
        let fallback = |value: Option<Result<JsValue, JsValue>>| {
            value.and_then(Result::ok).and_then(|v| v.as_f64()).unwrap_or(0.0)
        };

        let width = if rect.width() > 0.0 {
            rect.width()
        } else {
            fallback(window.as_ref().map(|w| w.inner_width()))
        };
        let height = if rect.height() > 0.0 {
            rect.height()
        } else {
            fallback(window.as_ref().map(|w| w.inner_height()))
        };
        Size::new(width, height)
    }
}
