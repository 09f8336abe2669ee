//! One play session: the controller plus every timer and listener bound to it.
//! Dropping a session cancels its pending reveal and detaches its listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use jigsaw_core::{
    BoardVisual, BundleRequest, DownloadFailure, GameController, ImageInfo, InputEvent, Phase,
    RevealTicket, SwapOutcome,
};

use crate::dom::{DomElements, DomSurface, DomViewport};
use crate::input;
use crate::notify::AlertNotifier;

pub type DomController = GameController<DomSurface, AlertNotifier>;

pub struct Session {
    controller: Rc<RefCell<DomController>>,
    reveal: Rc<RefCell<Option<Timeout>>>,
    _listeners: Vec<EventListener>,
}

impl Session {
    pub fn new(controller: DomController, elements: &DomElements) -> Self {
        let controller = Rc::new(RefCell::new(controller));
        let reveal = Rc::new(RefCell::new(None));
        let dispatcher = Dispatcher {
            controller: Rc::downgrade(&controller),
            reveal: Rc::downgrade(&reveal),
        };

        let mut listeners = input::bind_grid(elements, &dispatcher);
        listeners.extend(input::bind_resize(elements, dispatcher));

        Self {
            controller,
            reveal,
            _listeners: listeners,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            controller: Rc::downgrade(&self.controller),
            reveal: Rc::downgrade(&self.reveal),
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.borrow().phase()
    }

    pub fn is_solved(&self) -> bool {
        self.controller.borrow().is_solved()
    }

    pub fn visual(&self) -> Option<BoardVisual> {
        self.controller.borrow().visual()
    }
}

/// Weak handle that event callbacks use to reach the session; goes inert
/// once the session is dropped.
#[derive(Clone)]
pub struct Dispatcher {
    controller: Weak<RefCell<DomController>>,
    reveal: Weak<RefCell<Option<Timeout>>>,
}

impl Dispatcher {
    pub fn dispatch(&self, event: InputEvent) {
        let Some(controller) = self.controller.upgrade() else {
            return;
        };
        let outcome = controller.borrow_mut().handle_input(event);
        if let Some(SwapOutcome::Swapped { reveal, .. }) = outcome {
            self.schedule(reveal);
        }
    }

    /// Replace any pending reveal timer with one for `ticket`
    fn schedule(&self, ticket: Option<RevealTicket>) {
        let Some(slot) = self.reveal.upgrade() else {
            return;
        };
        let timer = ticket.map(|ticket| {
            let controller = self.controller.clone();
            Timeout::new(ticket.delay_ms, move || {
                if let Some(controller) = controller.upgrade() {
                    controller.borrow_mut().reveal(ticket);
                }
            })
        });
        *slot.borrow_mut() = timer;
    }

    pub fn image_ready(
        &self,
        loaded: Result<ImageInfo, String>,
        path: &str,
        elements: &DomElements,
    ) {
        let Some(controller) = self.controller.upgrade() else {
            gloo::console::log!("session replaced before image load finished");
            return;
        };
        match loaded {
            Ok(image) => {
                elements.set_background_image(&image.src);
                let viewport = DomViewport::new(elements.frame.clone());
                let ticket = controller.borrow_mut().image_loaded(image, &viewport);
                if ticket.is_some() {
                    self.schedule(ticket);
                }
            }
            Err(cause) => controller.borrow_mut().image_failed(path, &cause),
        }
    }

    pub fn relayout(&self, viewport: &DomViewport) {
        if let Some(controller) = self.controller.upgrade() {
            controller.borrow_mut().relayout(viewport);
        }
    }

    pub fn bundle_request(&self) -> Option<BundleRequest> {
        let controller = self.controller.upgrade()?;
        let request = controller.borrow_mut().bundle_request();
        request
    }

    pub fn download_failed(&self, path: &str, failure: DownloadFailure) {
        if let Some(controller) = self.controller.upgrade() {
            controller.borrow_mut().download_failed(path, failure);
        }
    }
}
