//! Collaborators the game controller talks to
//!
//! The engine never touches a platform directly. A host supplies these
//! implementations (the browser front end drives the DOM with them; tests
//! record the calls).

use serde::{Deserialize, Serialize};

use crate::error::Notice;
use crate::interaction::Feedback;
use crate::layout::Size;
use crate::projection::BoardVisual;

/// Why the surface is being asked to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderCause {
    Initial,
    Swap,
    Relayout,
}

/// Decoded puzzle image as the engine sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Opaque handle the render surface can draw from (a URL in the browser)
    pub src: String,
}

pub trait RenderSurface {
    fn render(&mut self, visual: &BoardVisual, cause: RenderCause);

    fn show_feedback(&mut self, feedback: Feedback);

    /// Hand-off to the win celebration; fire and forget
    fn celebrate(&mut self, visual: Option<&BoardVisual>);
}

pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
}

/// Source of the current drawable area
pub trait Viewport {
    fn size(&self) -> Size;
}

impl Viewport for Size {
    fn size(&self) -> Size {
        *self
    }
}
