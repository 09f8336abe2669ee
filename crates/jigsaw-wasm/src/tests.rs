//! Browser tests for the DOM bindings

#[cfg(test)]
mod tests {
    use crate::dom::{slot_of, DomElements, DomSurface, PIECE_CLASS};
    use crate::notify::AlertNotifier;
    use crate::session::Session;
    use gloo::timers::future::TimeoutFuture;
    use jigsaw_core::config::{AnimationConfig, ConfettiConfig};
    use jigsaw_core::{
        project, Board, Feedback, GameController, ImageInfo, Layout, Phase, PuzzleConfig,
        PuzzleError, RenderCause, RenderSurface,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{Document, Element, HtmlElement};

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    /// Build the minimal page the game expects and return its root
    fn mount_page() -> Element {
        let document = document();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(
            r#"<div class="puzzle-frame" style="width: 800px; height: 600px">
                 <div id="puzzleGrid"></div>
               </div>
               <div id="winModal"><img id="completedImage"></div>"#,
        );
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    fn visual() -> jigsaw_core::BoardVisual {
        let mut board = Board::solved(3).unwrap();
        board.swap(0, 8).unwrap();
        let layout = Layout {
            tile_size: 50,
            board_width: 50 * 3 + 4 + 16,
            board_height: 50 * 3 + 4 + 16,
        };
        project(&board, &layout, 2, 16, "puzzle.png").unwrap()
    }

    fn config(grid_size: usize, win_delay_ms: u32) -> PuzzleConfig {
        let mut config = PuzzleConfig::default();
        config.grid.size = grid_size;
        config.animation.win_delay_ms = win_delay_ms;
        config.animation.swap_duration_ms = 0;
        config.animation.confetti_count = 4;
        config
    }

    /// Build a session the way the app does and feed it a decoded image
    fn start_session(elements: &DomElements, config: PuzzleConfig) -> Session {
        let surface = DomSurface::new(
            elements.clone(),
            config.animation.clone(),
            config.confetti.clone(),
        );
        let controller = GameController::new(config, surface, AlertNotifier).unwrap();
        let session = Session::new(controller, elements);
        let image = ImageInfo {
            width: 300,
            height: 300,
            src: "puzzle.png".to_string(),
        };
        session
            .dispatcher()
            .image_ready(Ok(image), "puzzle.png", elements);
        session
    }

    fn modal_shown(elements: &DomElements) -> bool {
        elements.win_modal.class_list().contains("show")
    }

    fn confetti_in_page() -> u32 {
        document().get_elements_by_class_name("confetti").length()
    }

    #[wasm_bindgen_test]
    fn test_cache_reports_missing_grid() {
        let root = mount_page();
        document().get_element_by_id("puzzleGrid").unwrap().remove();

        match DomElements::cache() {
            Err(PuzzleError::MissingResource(name)) => assert_eq!(name, "puzzleGrid"),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("cache should fail without a grid"),
        }
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_render_builds_one_piece_per_slot() {
        let root = mount_page();
        let elements = DomElements::cache().unwrap();
        let mut surface = DomSurface::new(
            elements.clone(),
            AnimationConfig::default(),
            ConfettiConfig::default(),
        );

        surface.render(&visual(), RenderCause::Initial);

        let pieces = elements.grid.get_elements_by_class_name(PIECE_CLASS);
        assert_eq!(pieces.length(), 9);

        let first = pieces.item(0).unwrap();
        assert_eq!(slot_of(&first), Some(0));
        assert_eq!(first.get_attribute("aria-label").as_deref(), Some("Puzzle piece 1"));

        let first: HtmlElement = first.dyn_into().unwrap();
        assert_eq!(
            first.style().get_property_value("background-position").unwrap(),
            "-100px -100px"
        );
        assert_eq!(first.style().get_property_value("width").unwrap(), "50px");

        drop(surface);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_feedback_toggles_classes() {
        let root = mount_page();
        let elements = DomElements::cache().unwrap();
        let mut surface = DomSurface::new(
            elements.clone(),
            AnimationConfig::default(),
            ConfettiConfig::default(),
        );
        surface.render(&visual(), RenderCause::Initial);

        surface.show_feedback(Feedback {
            active: Some(1),
            highlighted: Some(4),
        });
        let pieces = elements.grid.get_elements_by_class_name(PIECE_CLASS);
        assert!(pieces.item(1).unwrap().class_list().contains("dragging"));
        assert!(pieces.item(4).unwrap().class_list().contains("highlight"));

        surface.show_feedback(Feedback::default());
        assert!(!pieces.item(1).unwrap().class_list().contains("dragging"));
        assert!(!pieces.item(4).unwrap().class_list().contains("highlight"));

        drop(surface);
        root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_dropping_session_cancels_pending_reveal() {
        let root = mount_page();
        let elements = DomElements::cache().unwrap();

        // A one-tile board is solved on load and schedules its reveal
        let session = start_session(&elements, config(1, 50));
        assert_eq!(session.phase(), Phase::Playing);
        drop(session);

        TimeoutFuture::new(200).await;
        assert!(!modal_shown(&elements));
        assert_eq!(confetti_in_page(), 0);
        root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_replacing_won_session_resets_page() {
        let root = mount_page();
        let elements = DomElements::cache().unwrap();

        let session = start_session(&elements, config(1, 0));
        TimeoutFuture::new(100).await;
        assert_eq!(session.phase(), Phase::Won);
        assert!(modal_shown(&elements));
        assert_eq!(confetti_in_page(), 4);

        drop(session);
        let session = start_session(&elements, config(3, 0));
        assert_eq!(session.phase(), Phase::Playing);
        assert!(!modal_shown(&elements));
        assert_eq!(confetti_in_page(), 0);
        let pieces = elements.grid.get_elements_by_class_name(PIECE_CLASS);
        assert_eq!(pieces.length(), 9);

        drop(session);
        root.remove();
    }
}
