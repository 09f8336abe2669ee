//! Swap-tile jigsaw engine
//!
//! An image is cut into an N×N grid of square tiles which are shuffled; the
//! player swaps pairs of tiles until the picture is whole again. This crate
//! holds everything that does not depend on a platform: fitting the board to
//! a viewport, the tile permutation, projecting it into drawable tiles,
//! turning drag and touch gestures into swap requests, and the controller
//! that drives a session from loading to the win.

pub mod board;
pub mod celebration;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod interaction;
pub mod layout;
pub mod projection;
pub mod rng;

pub use board::{Board, Tile};
pub use celebration::{confetti_burst, ConfettiPiece};
pub use config::PuzzleConfig;
pub use controller::{BundleRequest, GameController, Phase, RevealTicket, SwapOutcome};
pub use error::{BoardError, DownloadFailure, Notice, PuzzleError, PuzzleResult};
pub use host::{ImageInfo, Notifier, RenderCause, RenderSurface, Viewport};
pub use interaction::{
    DragInput, Feedback, InputEvent, InteractionRouter, Point, SwapRequest, TouchInput,
};
pub use layout::{compute_layout, Layout, LayoutRequest, Size};
pub use projection::{project, BoardVisual, TileVisual};
pub use rng::SimpleRng;
