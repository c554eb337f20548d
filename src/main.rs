//! Canvas Pong entry point
//!
//! The browser build wires DOM events and the animation loop to the match
//! controller. The native build plays a headless demo rally for smoke
//! testing tuning files.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use canvas_pong::audio::AudioManager;
    use canvas_pong::highscores::LocalStorageStore;
    use canvas_pong::input::{self, RawInput};
    use canvas_pong::renderer::CanvasRenderer;
    use canvas_pong::{MatchController, Settings, Tuning};

    type Game = MatchController<CanvasRenderer, AudioManager, LocalStorageStore>;

    struct Shell {
        game: Game,
        settings: Settings,
    }

    impl Shell {
        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.settings.save();
            self.game.sound_mut().apply_settings(&self.settings);
            log::info!("Sound {}", if muted { "muted" } else { "on" });
        }
    }

    /// Overrides from `<script id="tuning" type="application/json">`, sized
    /// to the canvas
    fn load_tuning(document: &Document, canvas: &HtmlCanvasElement) -> Tuning {
        let base = match document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        {
            Some(json) if !json.trim().is_empty() => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }),
            _ => Tuning::default(),
        };

        let sized = base.with_playfield(canvas.width() as f32, canvas.height() as f32);
        match sized.validate() {
            Ok(()) => sized,
            Err(e) => {
                log::warn!("Canvas size rejected ({}), using default court", e);
                base
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Canvas Pong starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let tuning = load_tuning(&document, &canvas);
        let settings = Settings::load();
        let renderer = CanvasRenderer::new(&canvas)?;
        let audio = AudioManager::new(&settings);
        let store = LocalStorageStore::new();

        let seed = js_sys::Date::now() as u64;
        let game = MatchController::new(tuning, seed, renderer, audio, store);
        let shell = Rc::new(RefCell::new(Shell { game, settings }));

        setup_input_handlers(&window, &canvas, shell.clone());
        request_animation_frame(shell);

        log::info!("Canvas Pong running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        shell: Rc<RefCell<Shell>>,
    ) {
        // Key down
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut s = shell.borrow_mut();
                if input::is_mute_toggle(&key) {
                    s.toggle_mute();
                    return;
                }
                if !input::is_game_key(&key) {
                    return;
                }
                event.prevent_default();
                s.game.sound().resume();
                s.game.push_raw(RawInput::KeyDown(key));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if input::is_game_key(&key) {
                    event.prevent_default();
                    shell.borrow_mut().game.push_raw(RawInput::KeyUp(key));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move, in canvas coordinates
        {
            let shell = shell.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let top = canvas_clone.get_bounding_client_rect().top();
                let y = (event.client_y() as f64 - top) as f32;
                shell.borrow_mut().game.push_raw(RawInput::PointerMove { y });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click serves in pointer mode
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut s = shell.borrow_mut();
                s.game.sound().resume();
                s.game.push_raw(RawInput::PointerDown);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            log::error!("no window, animation loop stopped");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(shell);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(shell: Rc<RefCell<Shell>>) {
        shell.borrow_mut().game.frame();
        request_animation_frame(shell);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Canvas Pong failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Canvas Pong (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning_file(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => canvas_pong::Tuning::default(),
    };

    demo::run(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning_file(path: &str) -> Result<canvas_pong::Tuning, String> {
    let json =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    canvas_pong::Tuning::from_json(&json).map_err(|e| format!("bad tuning in {}: {}", path, e))
}

/// Bot-driven 1-player rally against the tracking paddle
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use canvas_pong::highscores::MemoryStore;
    use canvas_pong::input::InputEvent;
    use canvas_pong::platform::{LogSound, NullRenderer};
    use canvas_pong::sim::{Motion, Side};
    use canvas_pong::{MatchController, MatchOutcome, MatchPhase, Tuning};

    /// About ten minutes at 60 fps
    const MAX_FRAMES: u32 = 36_000;

    pub fn run(tuning: Tuning) {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut game = MatchController::new(tuning, seed, NullRenderer, LogSound, MemoryStore::new());

        // Defaults: 1 player, keyboard
        game.push_input(InputEvent::MenuConfirm);
        game.push_input(InputEvent::MenuConfirm);
        game.push_input(InputEvent::RequestStart);

        let mut frames = 0;
        while frames < MAX_FRAMES && game.phase() != MatchPhase::MatchEnd {
            let motion = track(&game);
            game.push_input(InputEvent::SetPaddleVelocity {
                side: Side::Left,
                motion,
            });
            game.frame();
            frames += 1;
        }

        match game.outcome() {
            Some(MatchOutcome::RallyOver { rally, best, .. }) => {
                log::info!("Demo rally ended after {} returns ({} frames, best {})", rally, frames, best);
            }
            _ => log::info!("Demo stopped after {} frames with the ball in play", frames),
        }
    }

    /// Steer the left paddle toward the ball, with a dead zone of one step
    fn track<R, S, P>(game: &MatchController<R, S, P>) -> Motion
    where
        R: canvas_pong::platform::Renderer,
        S: canvas_pong::platform::SoundSink,
        P: canvas_pong::platform::RallyStore,
    {
        let court = game.court();
        let paddle_center = court.left.pos.y + court.left.size.y / 2.0;
        let diff = court.ball.center_y() - paddle_center;
        if diff.abs() < game.tuning().paddle_speed {
            Motion::Stop
        } else if diff < 0.0 {
            Motion::Up
        } else {
            Motion::Down
        }
    }
}
