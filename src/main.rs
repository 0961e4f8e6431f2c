//! Slope Run entry point
//!
//! Wires the simulation to the page (canvas, pointer, buttons, HUD text) and
//! runs the animation-frame loop. The native build plays a headless demo run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlButtonElement, HtmlCanvasElement,
        MouseEvent, TouchEvent,
    };

    use slope_run::renderer::CanvasSurface;
    use slope_run::sim::{GameEvent, GameSimulation};
    use slope_run::{QualityPreset, Settings, Tuning, clamp_frame_dt};

    const CANVAS_ID: &str = "gameCanvas";
    const SCORE_ID: &str = "gameScore";
    const STATUS_ID: &str = "gameStatus";
    const START_ID: &str = "gameStart";
    const RESTART_ID: &str = "gameRestart";

    const START_LABEL: &str = "Start game";
    const RUNNING_LABEL: &str = "Run in progress...";
    const RUNNING_STATUS: &str = "Steer left and right, dodge the trees and pass through the gates.";
    /// Resize events are coalesced over this window (ms)
    const RESIZE_DEBOUNCE_MS: i32 = 220;

    /// Game instance holding all state
    struct Game {
        sim: GameSimulation,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        score_el: Option<Element>,
        status_el: Option<Element>,
        start_btn: Option<HtmlButtonElement>,
        last_time: f64,
        /// Whether an animation frame is currently scheduled
        looping: bool,
        resize_timer: Option<i32>,
    }

    impl Game {
        /// Match the backing store to the CSS size and tell the simulation
        fn fit_canvas(&mut self) {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let rect = self.canvas.get_bounding_client_rect();
            let dpr = window.device_pixel_ratio().max(1.0);
            self.canvas
                .set_width(((rect.width() * dpr).floor() as u32).max(1));
            self.canvas
                .set_height(((rect.height() * dpr).floor() as u32).max(1));
            self.surface.set_pixel_ratio(dpr);

            let (w, h) = (rect.width() as f32, rect.height() as f32);
            self.surface.set_size(w, h);
            self.sim.resize(w, h);
        }

        /// Pointer x relative to the canvas' left edge
        fn canvas_x(&self, client_x: f64) -> f32 {
            (client_x - self.canvas.get_bounding_client_rect().left()) as f32
        }

        /// Start (or restart) a run; returns true if a frame should be scheduled
        fn start(&mut self) -> bool {
            if !self.sim.start() {
                return false;
            }
            self.last_time = now();
            if let Some(btn) = &self.start_btn {
                btn.set_text_content(Some(RUNNING_LABEL));
                btn.set_disabled(true);
            }
            if let Some(el) = &self.status_el {
                el.set_text_content(Some(RUNNING_STATUS));
            }
            self.update_hud();
            !self.looping
        }

        /// Advance, draw and report one frame
        fn frame(&mut self, time: f64) {
            let dt = clamp_frame_dt(time - self.last_time);
            self.last_time = time;

            self.sim.advance(dt, time);
            self.draw();
            self.update_hud();

            for event in self.sim.drain_events() {
                match event {
                    GameEvent::ObstacleHit {
                        life_lost: true,
                        lives,
                    } => log::debug!("Ouch! {} lives left", lives),
                    GameEvent::GateCollected { bonus } => log::debug!("Gate +{}", bonus),
                    GameEvent::Finished { score } | GameEvent::GameOver { score } => {
                        log::info!("Run over with raw score {:.1}", score)
                    }
                    _ => {}
                }
            }

            if !self.sim.is_running() {
                self.show_idle();
            }
        }

        /// Redraw without advancing (idle canvas, after a resize)
        fn draw(&mut self) {
            self.sim.render(&mut self.surface);
        }

        /// Back to the splash controls with the terminal message
        fn show_idle(&self) {
            if let Some(btn) = &self.start_btn {
                btn.set_text_content(Some(START_LABEL));
                btn.set_disabled(false);
            }
            if let (Some(el), Some(message)) = (&self.status_el, self.sim.status_message()) {
                el.set_text_content(Some(message));
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            if let Some(el) = &self.score_el {
                el.set_text_content(Some(&format!("Score: {}", self.sim.display_score())));
            }
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
        canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
    }

    /// Balance overrides from the canvas' `data-tuning` attribute
    fn page_tuning(canvas: &HtmlCanvasElement) -> Tuning {
        match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("{}; using default tuning", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // The game is optional on most pages
        let Some(canvas) = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::info!("No #{} on this page, ski game disabled", CANVAS_ID);
            return;
        };
        let Some(ctx) = canvas_context(&canvas) else {
            log::warn!("Canvas 2D context unavailable, ski game disabled");
            return;
        };

        let mut settings = Settings::load();
        // Pages may pin a quality preset; remember it for the next visit
        if let Some(preset) = canvas
            .get_attribute("data-quality")
            .and_then(|q| QualityPreset::parse(&q))
        {
            if preset != settings.quality {
                settings.quality = preset;
                settings.save();
            }
        }
        let mut tuning = page_tuning(&canvas);
        settings.apply_to(&mut tuning);

        let seed = js_sys::Date::now() as u64;
        let mut sim = GameSimulation::new(tuning, seed);
        sim.set_scene_options(settings.scene_options());
        log::info!("Ski game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            sim,
            surface: CanvasSurface::new(ctx, 0.0, 0.0),
            canvas: canvas.clone(),
            score_el: document.get_element_by_id(SCORE_ID),
            status_el: document.get_element_by_id(STATUS_ID),
            start_btn: button(&document, START_ID),
            last_time: 0.0,
            looping: false,
            resize_timer: None,
        }));

        {
            let mut g = game.borrow_mut();
            g.fit_canvas();
            g.draw();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(game);
    }

    fn button(document: &Document, id: &str) -> Option<HtmlButtonElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.canvas_x(event.client_x() as f64);
                g.sim.set_pointer_x(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.canvas_x(touch.client_x() as f64);
                    g.sim.set_pointer_x(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in [START_ID, RESTART_ID] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let schedule = game.borrow_mut().start();
                if schedule {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Applied once the resize burst settles
        let apply = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                let mut g = game.borrow_mut();
                g.resize_timer = None;
                g.fit_canvas();
                if !g.sim.is_running() {
                    g.draw();
                }
            })
        };
        let apply_fn: js_sys::Function = apply.as_ref().unchecked_ref::<js_sys::Function>().clone();
        apply.forget();

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut g = game.borrow_mut();
            if let Some(handle) = g.resize_timer.take() {
                window.clear_timeout_with_handle(handle);
            }
            g.resize_timer = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&apply_fn, RESIZE_DEBOUNCE_MS)
                .ok();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        game.borrow_mut().looping = true;
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.frame(time);
            g.looping = g.sim.is_running();
            g.looping
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use slope_run::sim::{GameEvent, GamePhase, GameSimulation};
    use slope_run::{Settings, Tuning, consts::NOMINAL_FRAME_DT_MS};

    env_logger::init();
    log::info!("Slope Run (native) starting...");
    log::info!("Native mode plays a headless demo run - serve the wasm build for the real thing");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2024);

    let mut tuning = Tuning::default();
    Settings::load().apply_to(&mut tuning);
    let mut sim = GameSimulation::new(tuning, seed);
    sim.resize(480.0, 320.0);
    if !sim.start() {
        log::error!("Demo run failed to start");
        return;
    }

    // Weave across the slope until the run ends
    let mut now = 0.0f64;
    let mut gates = 0u32;
    let mut hits = 0u32;
    while sim.is_running() {
        now += NOMINAL_FRAME_DT_MS as f64;
        let sway = (now as f32 / 900.0).sin() * 0.4 + 0.5;
        sim.set_pointer_x(sway * 480.0);
        sim.advance(NOMINAL_FRAME_DT_MS, now);
        for event in sim.drain_events() {
            match event {
                GameEvent::GateCollected { .. } => gates += 1,
                GameEvent::ObstacleHit { life_lost: true, .. } => hits += 1,
                _ => {}
            }
        }
    }

    let outcome = match sim.phase() {
        GamePhase::Finished => "finished",
        GamePhase::GameOver => "crashed out",
        _ => "stopped",
    };
    println!(
        "Seed {}: {} after {:.1}s - score {}, distance {:.0} m, {} gates, {} hits",
        seed,
        outcome,
        now / 1000.0,
        sim.display_score(),
        sim.distance(),
        gates,
        hits
    );
    if let Some(status) = sim.status_message() {
        println!("{}", status);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
