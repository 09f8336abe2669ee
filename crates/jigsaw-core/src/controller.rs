//! Game controller: owns the board, router and layout for one play session

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::PuzzleConfig;
use crate::error::{DownloadFailure, PuzzleError, PuzzleResult};
use crate::host::{ImageInfo, Notifier, RenderCause, RenderSurface, Viewport};
use crate::interaction::{Feedback, InputEvent, InteractionRouter};
use crate::layout::{compute_layout, Layout, LayoutRequest};
use crate::projection::{project, BoardVisual};
use crate::rng::SimpleRng;

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of one play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Loading,
    Playing,
    Won,
    /// A fatal error was reported; the session cannot continue
    Failed,
}

/// A scheduled win reveal. Only the ticket a controller handed out last is
/// honoured, and never by another controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    session: u64,
    generation: u64,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Not playing; request dropped
    Ignored,
    /// Self-swap; nothing re-rendered and no win check
    Unchanged,
    /// Slot out of range; reported to the notifier
    Rejected,
    Swapped {
        solved: bool,
        reveal: Option<RevealTicket>,
    },
}

/// Where to fetch the downloadable bundle and what to save it as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRequest {
    pub url: String,
    pub filename: String,
}

pub struct GameController<S, N> {
    config: PuzzleConfig,
    session: u64,
    generation: u64,
    phase: Phase,
    board: Option<Board>,
    image: Option<ImageInfo>,
    layout: Layout,
    router: InteractionRouter,
    rng: SimpleRng,
    pending_reveal: Option<RevealTicket>,
    surface: S,
    notifier: N,
}

impl<S: RenderSurface, N: Notifier> GameController<S, N> {
    pub fn new(config: PuzzleConfig, surface: S, notifier: N) -> PuzzleResult<Self> {
        Self::with_rng(config, surface, notifier, SimpleRng::new())
    }

    /// Create a controller with a specific RNG for reproducible shuffles
    pub fn with_rng(
        config: PuzzleConfig,
        surface: S,
        notifier: N,
        rng: SimpleRng,
    ) -> PuzzleResult<Self> {
        config.validate()?;
        let session = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
        tracing::info!(session, board = %config.puzzle.name, "session created");
        Ok(Self {
            router: InteractionRouter::new(&config.interaction, 0),
            config,
            session,
            generation: 0,
            phase: Phase::Loading,
            board: None,
            image: None,
            layout: Layout::EMPTY,
            rng,
            pending_reveal: None,
            surface,
            notifier,
        })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn feedback(&self) -> Feedback {
        self.router.feedback()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn is_solved(&self) -> bool {
        self.board.as_ref().is_some_and(Board::is_solved)
    }

    /// Current projection, if the layout is drawable
    pub fn visual(&self) -> Option<BoardVisual> {
        let board = self.board.as_ref()?;
        let image = self.image.as_ref()?;
        project(
            board,
            &self.layout,
            self.config.grid.gap,
            self.config.grid.padding,
            &image.src,
        )
    }

    fn render(&mut self, cause: RenderCause) {
        match self.visual() {
            Some(visual) => self.surface.render(&visual, cause),
            None => tracing::warn!(?cause, "layout not renderable; skipping render"),
        }
    }

    fn layout_for(&self, image: &ImageInfo, viewport: &impl Viewport) -> Layout {
        let request =
            LayoutRequest::new(image.width, image.height, viewport.size(), &self.config.grid);
        compute_layout(&request)
    }

    /// The single reporting boundary for user-visible errors
    pub fn report(&mut self, err: &PuzzleError) {
        tracing::error!(session = self.session, error = %err, "puzzle error");
        if err.is_fatal() && self.phase != Phase::Won {
            self.phase = Phase::Failed;
            self.pending_reveal = None;
        }
        let notice = err.notice(&self.config.puzzle.name);
        self.notifier.notify(&notice);
    }

    /// Image decoded: lay out, shuffle and start playing
    pub fn image_loaded(
        &mut self,
        image: ImageInfo,
        viewport: &impl Viewport,
    ) -> Option<RevealTicket> {
        if self.phase != Phase::Loading {
            tracing::warn!(phase = ?self.phase, "image arrived outside loading; ignoring");
            return None;
        }

        let board = match Board::shuffled(self.config.grid.size, &mut self.rng) {
            Ok(board) => board,
            Err(err) => {
                self.report(&PuzzleError::InvalidConfig(err.to_string()));
                return None;
            }
        };

        self.layout = self.layout_for(&image, viewport);
        self.router.reset(board.len());
        self.board = Some(board);
        self.image = Some(image);
        self.phase = Phase::Playing;
        tracing::info!(session = self.session, layout = ?self.layout, "puzzle ready");

        self.render(RenderCause::Initial);

        // Only a one-tile board can arrive solved
        if self.is_solved() {
            Some(self.schedule_reveal())
        } else {
            None
        }
    }

    /// Image could not be loaded; fatal for this session
    pub fn image_failed(&mut self, path: &str, cause: &str) {
        self.report(&PuzzleError::AssetLoad {
            path: path.to_string(),
            cause: cause.to_string(),
        });
    }

    /// Recompute geometry after the viewport changed
    pub fn relayout(&mut self, viewport: &impl Viewport) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        let layout = self.layout_for(image, viewport);
        if layout != self.layout {
            self.layout = layout;
            self.render(RenderCause::Relayout);
        }
    }

    /// Route raw input; returns the swap outcome when the gesture produced one
    pub fn handle_input(&mut self, event: InputEvent) -> Option<SwapOutcome> {
        if self.phase != Phase::Playing {
            return None;
        }
        let before = self.router.feedback();
        let request = self.router.handle(event);
        let after = self.router.feedback();
        if after != before {
            self.surface.show_feedback(after);
        }
        request.map(|req| self.request_swap(req.from, req.to))
    }

    /// Apply a swap, re-project and check for a win
    pub fn request_swap(&mut self, a: usize, b: usize) -> SwapOutcome {
        if self.phase != Phase::Playing {
            tracing::warn!(phase = ?self.phase, a, b, "swap ignored outside play");
            return SwapOutcome::Ignored;
        }
        let Some(board) = self.board.as_mut() else {
            return SwapOutcome::Ignored;
        };

        match board.swap(a, b) {
            Ok(false) => SwapOutcome::Unchanged,
            Ok(true) => {
                self.generation += 1;
                self.pending_reveal = None;
                self.render(RenderCause::Swap);

                let solved = self.is_solved();
                tracing::debug!(a, b, solved, "swapped");
                let reveal = solved.then(|| self.schedule_reveal());
                SwapOutcome::Swapped { solved, reveal }
            }
            Err(err) => {
                tracing::warn!(a, b, "swap rejected");
                self.report(&err.into());
                SwapOutcome::Rejected
            }
        }
    }

    fn schedule_reveal(&mut self) -> RevealTicket {
        let ticket = RevealTicket {
            session: self.session,
            generation: self.generation,
            delay_ms: self.config.animation.win_delay_ms,
        };
        self.pending_reveal = Some(ticket);
        ticket
    }

    /// Fire a scheduled reveal. Stale tickets are ignored.
    pub fn reveal(&mut self, ticket: RevealTicket) -> bool {
        if self.phase != Phase::Playing || self.pending_reveal != Some(ticket) {
            tracing::warn!(session = self.session, "stale reveal ignored");
            return false;
        }
        self.pending_reveal = None;
        if !self.is_solved() {
            return false;
        }

        self.phase = Phase::Won;
        tracing::info!(session = self.session, "puzzle solved");
        let visual = self.visual();
        self.surface.celebrate(visual.as_ref());
        true
    }

    /// Resolve the bundle download, reporting when none is configured
    pub fn bundle_request(&mut self) -> Option<BundleRequest> {
        let url = self.config.bundle_path();
        let filename = self.config.bundle_filename().map(str::to_string);
        match (url, filename) {
            (Some(url), Some(filename)) => Some(BundleRequest { url, filename }),
            _ => {
                self.report(&PuzzleError::MissingBundle);
                None
            }
        }
    }

    pub fn download_failed(&mut self, path: &str, failure: DownloadFailure) {
        self.report(&PuzzleError::Download {
            path: path.to_string(),
            failure,
        });
    }
}
