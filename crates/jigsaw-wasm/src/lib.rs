//! WebAssembly front end for the swap-tile jigsaw
//!
//! Binds the engine in `jigsaw-core` to the page: tiles are `div`s inside
//! `#puzzleGrid`, gestures come from HTML drag-and-drop and touch events, and
//! the win modal and confetti are plain DOM.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use jigsaw_core::{GameController, Notifier, Phase, PuzzleConfig, PuzzleError};
use wasm_bindgen::prelude::*;

mod assets;
mod celebrate;
mod dom;
mod input;
mod notify;
mod session;

// WASM tests require wasm-pack test to run
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

use dom::{DomElements, DomSurface};
use notify::AlertNotifier;
use session::Session;

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

struct App {
    config: PuzzleConfig,
    elements: DomElements,
    session: RefCell<Option<Session>>,
    buttons: RefCell<Vec<EventListener>>,
}

impl App {
    fn dispatcher(&self) -> Option<session::Dispatcher> {
        self.session.borrow().as_ref().map(Session::dispatcher)
    }

    /// Start a brand-new session, discarding the current one
    fn start(&self) {
        // Drop first so the old session's timers and listeners are gone
        // before the new surface takes over the grid
        self.session.borrow_mut().take();

        let surface = DomSurface::new(
            self.elements.clone(),
            self.config.animation.clone(),
            self.config.confetti.clone(),
        );
        let controller = match GameController::new(self.config.clone(), surface, AlertNotifier) {
            Ok(controller) => controller,
            Err(err) => {
                report(&err, &self.config);
                return;
            }
        };

        let session = Session::new(controller, &self.elements);
        let dispatcher = session.dispatcher();
        *self.session.borrow_mut() = Some(session);

        let path = self.config.image_path();
        let elements = self.elements.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let loaded = assets::load_image(&path).await;
            dispatcher.image_ready(loaded, &path, &elements);
        });
    }

    fn download(&self) {
        let Some(dispatcher) = self.dispatcher() else {
            return;
        };
        let Some(request) = dispatcher.bundle_request() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(failure) = assets::download_bundle(&request).await {
                dispatcher.download_failed(&request.url, failure);
            }
        });
    }

    fn bind_buttons(app: &Rc<Self>) {
        let mut listeners = Vec::new();
        if let Some(button) = &app.elements.download_button {
            let app = Rc::downgrade(app);
            listeners.push(EventListener::new(button, "click", move |_| {
                if let Some(app) = Weak::upgrade(&app) {
                    app.download();
                }
            }));
        }
        if let Some(button) = &app.elements.play_again_button {
            let app = Rc::downgrade(app);
            listeners.push(EventListener::new(button, "click", move |_| {
                if let Some(app) = Weak::upgrade(&app) {
                    app.start();
                }
            }));
        }
        *app.buttons.borrow_mut() = listeners;
    }
}

/// Report an error raised before a controller exists to take it
fn report(err: &PuzzleError, config: &PuzzleConfig) {
    AlertNotifier.notify(&err.notice(&config.puzzle.name));
}

/// The puzzle as seen from JavaScript
#[wasm_bindgen]
pub struct PuzzleGame {
    app: Rc<App>,
}

#[wasm_bindgen]
impl PuzzleGame {
    /// Cache the page elements and start loading the puzzle. `config_json`
    /// optionally overrides parts of the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PuzzleGame, JsValue> {
        let config = match config_json {
            Some(json) => PuzzleConfig::from_json(&json),
            None => Ok(PuzzleConfig::default()),
        };
        let fallback = PuzzleConfig::default();
        let (config, elements) = match config.and_then(|c| DomElements::cache().map(|e| (c, e))) {
            Ok(ready) => ready,
            Err(err) => {
                report(&err, &fallback);
                return Err(JsValue::from_str(&err.to_string()));
            }
        };

        let app = Rc::new(App {
            config,
            elements,
            session: RefCell::new(None),
            buttons: RefCell::new(Vec::new()),
        });
        App::bind_buttons(&app);
        app.start();
        Ok(PuzzleGame { app })
    }

    /// Throw away the current board and start over
    #[wasm_bindgen]
    pub fn play_again(&self) {
        self.app.start();
    }

    /// Fetch and save the board's download bundle
    #[wasm_bindgen]
    pub fn download(&self) {
        self.app.download();
    }

    #[wasm_bindgen]
    pub fn phase(&self) -> String {
        let phase = self.app.session.borrow().as_ref().map(Session::phase);
        match phase {
            Some(Phase::Playing) => "playing",
            Some(Phase::Won) => "won",
            Some(Phase::Failed) => "failed",
            Some(Phase::Loading) | None => "loading",
        }
        .to_string()
    }

    #[wasm_bindgen]
    pub fn is_solved(&self) -> bool {
        self.app
            .session
            .borrow()
            .as_ref()
            .is_some_and(Session::is_solved)
    }

    /// Current tile projection as a plain JS object, or `undefined`
    #[wasm_bindgen]
    pub fn visual(&self) -> JsValue {
        let visual = self.app.session.borrow().as_ref().and_then(Session::visual);
        visual
            .and_then(|v| serde_wasm_bindgen::to_value(&v).ok())
            .unwrap_or(JsValue::UNDEFINED)
    }

    /// Active configuration as JSON
    #[wasm_bindgen]
    pub fn config_json(&self) -> String {
        serde_json::to_string(&self.app.config).unwrap_or_default()
    }
}
