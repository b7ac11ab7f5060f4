//! Who Pays entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, Document, Event, EventTarget, HtmlCanvasElement, PointerEvent};

    use who_pays::platform::web::{CanvasSurface, WebFeedback, WindowScaler};
    use who_pays::{Game, GameCallbacks, GameOptions, Settings};

    /// An attached event listener that can be removed again
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn attach(
            target: &EventTarget,
            kind: &'static str,
            f: impl FnMut(Event) + 'static,
        ) -> Option<Self> {
            let closure = Closure::<dyn FnMut(Event)>::new(f);
            // Non-passive so touch handlers may cancel scrolling
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            ) {
                log::warn!("Could not listen for {}: {:?}", kind, e);
                return None;
            }
            Some(Self {
                target: target.clone(),
                kind,
                closure,
            })
        }

        fn detach(&self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }
    }

    /// Game plus the browser resources driving it
    struct App {
        game: Game<CanvasSurface>,
        listeners: Vec<Listener>,
        frame_request: Option<i32>,
    }

    impl App {
        fn start(app: &Rc<RefCell<App>>) {
            {
                let mut a = app.borrow_mut();
                if a.game.is_running() || !a.game.start() {
                    return;
                }
                let canvas = a.game.surface().canvas().clone();
                a.listeners = attach_input(&canvas, app);
            }
            request_animation_frame(app.clone());
        }

        fn stop(&mut self) {
            for listener in self.listeners.drain(..) {
                listener.detach();
            }
            if let Some(id) = self.frame_request.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            self.game.stop();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Who Pays starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let options = match canvas.get_attribute("data-options") {
            Some(json) => GameOptions::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Bad data-options ({}), using defaults", e);
                GameOptions::default()
            }),
            None => GameOptions::default(),
        };

        let mut game = match Game::create(
            CanvasSurface::new(canvas),
            options,
            dom_callbacks(&document),
        ) {
            Ok(game) => game.with_settings(Settings::load()),
            Err(e) => {
                log::error!("Could not create game: {}", e);
                return;
            }
        };
        if let Some(feedback) = WebFeedback::new() {
            game = game.with_feedback(feedback);
        }
        if let Some(scaler) = WindowScaler::new() {
            game = game.with_scaler(scaler);
        }
        log::info!("Game initialized with seed: {}", game.seed());

        let app = Rc::new(RefCell::new(App {
            game,
            listeners: Vec::new(),
            frame_request: None,
        }));

        setup_lifecycle(&app);
        setup_play_again(&app);
        App::start(&app);

        log::info!("Who Pays running!");
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Mirror game notifications into the host page
    fn dom_callbacks(document: &Document) -> GameCallbacks {
        let (d1, d2, d3, d4) = (
            document.clone(),
            document.clone(),
            document.clone(),
            document.clone(),
        );
        GameCallbacks::default()
            .on_phase_change(move |phase| {
                if let Some(body) = d1.body() {
                    let _ = body.set_attribute("data-phase", phase.as_str());
                }
            })
            .on_countdown_tick(move |secs| set_text(&d2, "countdown", &secs.to_string()))
            .on_winner(move |winner, count| {
                set_text(&d3, "status", &format!("Player {} of {} pays", winner + 1, count))
            })
            .on_not_enough_players(move |touches, required| {
                set_text(
                    &d4,
                    "status",
                    &format!("Need {} fingers, {} down", required, touches),
                )
            })
    }

    fn attach_input(canvas: &HtmlCanvasElement, app: &Rc<RefCell<App>>) -> Vec<Listener> {
        let target: &EventTarget = canvas.as_ref();
        let mut listeners = Vec::new();

        for kind in ["pointerdown", "pointermove", "pointerup", "pointercancel"] {
            let app = app.clone();
            let listener = Listener::attach(target, kind, move |event: Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let Ok(mut a) = app.try_borrow_mut() else {
                    return;
                };
                let id = event.pointer_id();
                let pos = a
                    .game
                    .surface()
                    .to_local(event.client_x() as f64, event.client_y() as f64);
                match kind {
                    "pointerdown" => {
                        event.prevent_default();
                        let _ = a.game.surface().canvas().set_pointer_capture(id);
                        a.game.pointer_down(id, pos);
                    }
                    "pointermove" => a.game.pointer_move(id, pos),
                    "pointerup" => a.game.pointer_up(id),
                    _ => a.game.pointer_cancel(id),
                }
            });
            listeners.extend(listener);
        }

        // Keep the page from scrolling or zooming under the fingers
        for kind in ["touchstart", "touchmove", "touchend"] {
            listeners.extend(Listener::attach(target, kind, |event: Event| {
                event.prevent_default()
            }));
        }

        listeners
    }

    /// Pause while the page is hidden in the back/forward cache
    fn setup_lifecycle(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                app.borrow_mut().stop();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                App::start(&app);
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_play_again(app: &Rc<RefCell<App>>) {
        let Some(btn) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("play-again"))
        else {
            return;
        };

        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            app.borrow_mut().game.reset();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let frame_app = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(frame_app, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => app.borrow_mut().frame_request = Some(id),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame_request = None;
            if !a.game.is_running() {
                return;
            }
            a.game.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Who Pays (native) starting...");
    log::info!("Native mode plays one scripted round headless - run with `trunk serve` for the web version");

    demo_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_round() {
    use glam::Vec2;
    use who_pays::renderer::RecordingSurface;
    use who_pays::sim::GamePhase;
    use who_pays::{Game, GameCallbacks, GameOptions};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let callbacks = GameCallbacks::default()
        .on_phase_change(|phase| log::info!("Phase: {}", phase))
        .on_countdown_tick(|secs| log::info!("Countdown: {}", secs))
        .on_winner(|winner, count| println!("Player {} of {} pays!", winner + 1, count));

    let mut game = match Game::create(
        RecordingSurface::new(390.0, 844.0),
        GameOptions::default(),
        callbacks,
    ) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Could not create game: {}", e);
            return;
        }
    };
    if !game.start() {
        return;
    }

    let fingers = [
        Vec2::new(100.0, 220.0),
        Vec2::new(290.0, 220.0),
        Vec2::new(195.0, 620.0),
    ];
    for (id, pos) in fingers.into_iter().enumerate() {
        game.pointer_down(id as i32, pos);
    }

    let mut now = 0.0;
    while game.phase() != GamePhase::Result && now < 30_000.0 {
        game.frame(now);
        now += FRAME_MS;
    }

    // Let the confetti play out
    let end = now + 2000.0;
    while now < end {
        game.frame(now);
        now += FRAME_MS;
    }
    log::info!(
        "Last frame: {} draw commands, {} particles alive",
        game.surface().commands.len(),
        game.state().particles.len()
    );
}
