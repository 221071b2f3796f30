//! Coin Flip entry point
//!
//! Native builds run in the terminal; web builds bind to DOM buttons.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod native_game {
    use std::io::{self, Stdout, Write, stdout};
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use crossterm::{
        cursor,
        event::{self, Event, KeyCode, KeyEventKind},
        execute, terminal,
    };

    use coin_flip::audio::{AudioManager, TerminalBell};
    use coin_flip::renderer::TerminalRenderer;
    use coin_flip::sim::{FlipEvent, SeededDraw, VirtualClock};
    use coin_flip::{CoinFlipController, Settings, Side};

    type Game = CoinFlipController<VirtualClock<FlipEvent>, SeededDraw>;

    const FRAME: Duration = Duration::from_millis(33); // ~30 fps

    pub fn run() -> io::Result<()> {
        let mut settings = Settings::load();
        let fallback_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let seed = settings.resolve_seed(fallback_seed);

        let audio = AudioManager::with_settings(Some(Box::new(TerminalBell)), &settings);
        let mut game = CoinFlipController::seeded(seed, audio);

        let result = {
            let _terminal = TerminalGuard::enter()?;
            game_loop(&mut stdout(), &mut game, &mut settings)
        };
        game.teardown();

        let session = game.session();
        println!("Final {}", session.score_line());
        result
    }

    /// Raw mode plus alternate screen, restored on drop (including error paths)
    struct TerminalGuard;

    impl TerminalGuard {
        fn enter() -> io::Result<Self> {
            terminal::enable_raw_mode()?;
            // From here on Drop undoes raw mode even if the screen switch fails
            let guard = TerminalGuard;
            let mut out = stdout();
            execute!(
                out,
                terminal::EnterAlternateScreen,
                cursor::Hide,
                terminal::DisableLineWrap,
            )?;
            Ok(guard)
        }
    }

    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let mut out = stdout();
            let _ = execute!(
                out,
                terminal::LeaveAlternateScreen,
                cursor::Show,
                terminal::EnableLineWrap,
            );
            let _ = terminal::disable_raw_mode();
        }
    }

    fn game_loop(out: &mut Stdout, game: &mut Game, settings: &mut Settings) -> io::Result<()> {
        let mut renderer = TerminalRenderer::new();
        let mut last_tick = Instant::now();

        loop {
            let frame_start = Instant::now();

            // Input
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            let _ = game.choose_side(Side::Heads);
                        }
                        KeyCode::Char('t') | KeyCode::Char('T') => {
                            let _ = game.choose_side(Side::Tails);
                        }
                        KeyCode::Char('r') | KeyCode::Char(' ') | KeyCode::Enter => {
                            let _ = game.reset();
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') => {
                            let muted = settings.toggle_muted();
                            game.audio_mut().set_muted(muted);
                            settings.save();
                            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                        }
                        _ => {}
                    },
                    Event::Resize(_, _) => renderer.invalidate(),
                    _ => {}
                }
            }

            // Feed whole elapsed milliseconds, carry the remainder
            let elapsed_ms = last_tick.elapsed().as_millis() as u64;
            if elapsed_ms > 0 {
                last_tick += Duration::from_millis(elapsed_ms);
                game.advance(elapsed_ms);
            }

            renderer.draw(out, &game.view())?;
            out.flush()?;

            if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement};

    use coin_flip::audio::{AudioManager, AudioSink, WebAudio};
    use coin_flip::sim::{FlipEvent, SeededDraw, VirtualClock};
    use coin_flip::{CoinFlipController, GamePhase, SessionView, Settings, Side};

    /// Game instance holding all state
    struct Game {
        controller: CoinFlipController<VirtualClock<FlipEvent>, SeededDraw>,
        last_time: f64,
        /// Sub-millisecond time not yet fed to the controller
        carry_ms: f64,
        last_view: Option<SessionView>,
        settings: Settings,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let sink = WebAudio::new().map(|a| Box::new(a) as Box<dyn AudioSink>);
            let audio = AudioManager::with_settings(sink, &settings);
            Self {
                controller: CoinFlipController::seeded(seed, audio),
                last_time: 0.0,
                carry_ms: 0.0,
                last_view: None,
                settings,
            }
        }

        /// Flip mute, apply it and persist the preference
        fn toggle_mute(&mut self, document: &Document) {
            let muted = self.settings.toggle_muted();
            self.controller.audio_mut().set_muted(muted);
            self.settings.save();
            set_text(document, "mute-btn", mute_label(muted));
        }

        fn update(&mut self, time: f64) {
            if self.last_time > 0.0 {
                // Clamp long gaps (backgrounded tab) to one flip
                self.carry_ms += (time - self.last_time).clamp(0.0, 2000.0);
            }
            self.last_time = time;

            let whole = self.carry_ms.floor();
            if whole >= 1.0 {
                self.carry_ms -= whole;
                self.controller.advance(whole as u64);
            }
        }

        /// Push the current view into the DOM
        fn render(&mut self, document: &Document) {
            let view = self.controller.view();
            if self.last_view.as_ref() == Some(&view) {
                return;
            }

            set_text(document, "score", &view.score_line);
            set_text(document, "result", &view.result_text);
            set_opacity(document, "coin-front", view.front_opacity);
            set_opacity(document, "coin-back", view.back_opacity);

            let show_choices = view.phase != GamePhase::Result;
            set_hidden(document, "choices", !show_choices);
            set_hidden(document, "again-btn", view.phase != GamePhase::Result);
            for id in ["heads-btn", "tails-btn"] {
                if let Some(el) = document.get_element_by_id(id) {
                    if view.choices_enabled {
                        let _ = el.remove_attribute("disabled");
                    } else {
                        let _ = el.set_attribute("disabled", "");
                    }
                }
            }

            self.last_view = Some(view);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_opacity(document: &Document, id: &str, opacity: f32) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("opacity", &opacity.to_string());
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn mute_label(muted: bool) -> &'static str {
        if muted { "Unmute" } else { "Mute" }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Coin Flip starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let settings = Settings::load();
        let seed = settings.resolve_seed(js_sys::Date::now() as u64);
        set_text(&document, "mute-btn", mute_label(settings.muted));
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        setup_buttons(&document, game.clone());
        request_animation_frame(game);

        log::info!("Coin Flip running!");
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            handler();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, side) in [("heads-btn", Side::Heads), ("tails-btn", Side::Tails)] {
            let game = game.clone();
            on_click(document, id, move || {
                let _ = game.borrow_mut().controller.choose_side(side);
            });
        }

        {
            let game = game.clone();
            on_click(document, "again-btn", move || {
                let _ = game.borrow_mut().controller.reset();
            });
        }

        let doc = document.clone();
        on_click(document, "mute-btn", move || {
            game.borrow_mut().toggle_mute(&doc);
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.render(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    init_logging();
    log::info!("Coin Flip (terminal) starting...");
    native_game::run()
}

/// The terminal UI owns stdout/stderr, so log records go to a file.
/// Without `RUST_LOG` logging stays off.
#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    let Some(path) = log_file_path(
        std::env::var_os("RUST_LOG"),
        std::env::var_os("COIN_FLIP_LOG"),
    ) else {
        return;
    };
    match std::fs::File::create(&path) {
        Ok(file) => {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
    }
}

/// Where log output goes, if anywhere
#[cfg(not(target_arch = "wasm32"))]
fn log_file_path(
    rust_log: Option<std::ffi::OsString>,
    path: Option<std::ffi::OsString>,
) -> Option<std::path::PathBuf> {
    rust_log?;
    Some(path.map(Into::into).unwrap_or_else(|| "coin-flip.log".into()))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_logging_off_without_rust_log() {
        assert_eq!(log_file_path(None, Some("x.log".into())), None);
    }

    #[test]
    fn test_logging_goes_to_file() {
        assert_eq!(
            log_file_path(Some("debug".into()), None),
            Some(PathBuf::from("coin-flip.log"))
        );
        assert_eq!(
            log_file_path(Some("info".into()), Some("/tmp/flip.log".into())),
            Some(PathBuf::from("/tmp/flip.log"))
        );
    }
}
