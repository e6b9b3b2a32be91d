//! Status Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use status_arcade::audio::AudioManager;
    use status_arcade::consts::*;
    use status_arcade::input::{self, SwipeTracker};
    use status_arcade::platform;
    use status_arcade::renderer::{RenderState, runner_scene, sorter_scene};
    use status_arcade::sim::{
        GameEvent, GameKind, RunnerInput, RunnerPhase, RunnerState, SorterInput, SorterPhase,
        SorterState, runner, sorter,
    };
    use status_arcade::{HighScores, RunnerTuning, Settings, SorterTuning};


    /// The game this page hosts, with its pending input
    enum Session {
        Runner {
            state: RunnerState,
            input: RunnerInput,
            /// Where the current touch started, so lifting releases the same action
            touch_x: Option<f32>,
        },
        Sorter {
            state: SorterState,
            input: SorterInput,
            swipe: SwipeTracker,
        },
    }

    impl Session {
        fn kind(&self) -> GameKind {
            match self {
                Session::Runner { .. } => GameKind::Runner,
                Session::Sorter { .. } => GameKind::Sorter,
            }
        }

        fn world_size(&self) -> (f32, f32) {
            match self {
                Session::Runner { state, .. } => (state.tuning.width, state.tuning.height),
                Session::Sorter { state, .. } => (state.width, state.height),
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        high_scores: HighScores,
        audio: AudioManager,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(session: Session, settings: Settings) -> Self {
            let high_scores = HighScores::load(session.kind());
            let audio = AudioManager::new(&settings);
            let mut game = Self {
                session,
                settings,
                high_scores,
                audio,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
            };
            if let (Session::Runner { state, .. }, Some(best)) =
                (&mut game.session, game.high_scores.top_score())
            {
                state.set_high_score(best);
            }
            game
        }

        /// Run simulation ticks, then react to what happened
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                match &mut self.session {
                    Session::Runner { state, input, .. } => {
                        runner::tick(state, input, SIM_DT_MS);
                        input.clear_one_shots();
                    }
                    Session::Sorter { state, input, .. } => {
                        sorter::tick(state, input);
                        input.clear_one_shots();
                    }
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            let events = match &mut self.session {
                Session::Runner { state, .. } => state.take_events(),
                Session::Sorter { state, .. } => state.take_events(),
            };
            for event in events {
                self.handle_event(event);
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            self.audio.play_event(&event);
            if let Some(ms) = event.vibration_ms().filter(|_| self.settings.vibration) {
                platform::vibrate(ms);
            }
            match event {
                GameEvent::GameOver { score, .. } => {
                    let Session::Runner { state, .. } = &self.session else {
                        return;
                    };
                    let critical_hits = state.stats.critical_hits;
                    self.record_score(score, critical_hits);
                    if let (Session::Runner { state, .. }, Some(best)) =
                        (&mut self.session, self.high_scores.top_score())
                    {
                        state.set_high_score(best);
                    }
                }
                GameEvent::TimeUp { score, best_combo } => {
                    self.record_score(score, best_combo);
                }
                _ => {}
            }
        }

        fn record_score(&mut self, score: u64, detail: u32) {
            let kind = self.session.kind();
            if let Some(rank) = self.high_scores.add_score(score, detail, platform::now_ms()) {
                log::info!("New {} high score #{}: {}", kind.as_str(), rank, score);
                self.high_scores.save(kind);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let scene = match &self.session {
                Session::Runner { state, .. } => runner_scene(state, &self.settings),
                Session::Sorter { state, .. } => sorter_scene(state, &self.settings),
            };
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM. Missing elements are skipped.
        fn update_hud(&self, document: &Document) {
            let best = self.high_scores.top_score().unwrap_or(0);
            set_text(document, "high-score", &best.to_string());

            match &self.session {
                Session::Runner { state, .. } => {
                    set_text(document, "score", &state.stats.score.to_string());
                    set_text(
                        document,
                        "budget",
                        &format!("{}%", state.stats.budget.max(0.0).round()),
                    );
                    set_hidden(document, "pause-menu", state.phase != RunnerPhase::Paused);
                    let over = state.phase == RunnerPhase::Crashed;
                    set_hidden(document, "game-over", !over);
                    if over {
                        for (id, text) in state.stats.summary() {
                            set_text(document, id, &text);
                        }
                    }
                }
                Session::Sorter { state, .. } => {
                    set_text(document, "score", &state.score.to_string());
                    set_text(document, "timer", &state.time_left.to_string());
                    let combo = match state.combo_multiplier() {
                        Some(m) => format!("{} (x{})", state.combo, m),
                        None => state.combo.to_string(),
                    };
                    set_text(document, "combo", &combo);
                    set_hidden(document, "start-btn", state.phase == SorterPhase::Playing);
                    let over = state.phase == SorterPhase::Finished;
                    set_hidden(document, "game-over", !over);
                    if over {
                        set_text(document, "final-score", &state.score.to_string());
                    }
                }
            }
        }

        fn toggle_autoplay(&mut self) {
            let on = match &mut self.session {
                Session::Runner { input, .. } => {
                    input.autoplay = !input.autoplay;
                    input.autoplay
                }
                Session::Sorter { input, .. } => {
                    input.autoplay = !input.autoplay;
                    input.autoplay
                }
            };
            log::info!("Autoplay: {}", on);
        }

        fn toggle_sound(&mut self) {
            self.settings.sound = !self.settings.sound;
            self.audio.apply_settings(&self.settings);
            self.settings.save();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// JSON from a `<script type="application/json">` block, if present
    fn inline_json(document: &Document, id: &str) -> Option<String> {
        document.get_element_by_id(id)?.text_content()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Status Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let kind = canvas
            .get_attribute("data-game")
            .and_then(|v| GameKind::from_attr(&v))
            .unwrap_or(GameKind::Runner);

        let seed = js_sys::Date::now() as u64;
        let session = match kind {
            GameKind::Runner => {
                let json = inline_json(&document, "runner-tuning");
                let tuning = RunnerTuning::from_json_or_default(json.as_deref());
                Session::Runner {
                    state: RunnerState::new(seed, tuning),
                    input: RunnerInput::default(),
                    touch_x: None,
                }
            }
            GameKind::Sorter => {
                let json = inline_json(&document, "sorter-tuning");
                let tuning = SorterTuning::from_json_or_default(json.as_deref());
                let width = canvas.client_width().max(1) as f32;
                let height = canvas.client_height().max(1) as f32;
                Session::Sorter {
                    state: SorterState::new(seed, width, height, tuning),
                    input: SorterInput::default(),
                    swipe: SwipeTracker::default(),
                }
            }
        };

        // Backing store at device resolution, scene laid out in CSS pixels
        let dpr = window.device_pixel_ratio();
        let (world_w, world_h) = session.world_size();
        let width = (world_w as f64 * dpr) as u32;
        let height = (world_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new(session, Settings::load())));
        log::info!("{} initialized with seed: {}", kind.as_str(), seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, (world_w, world_h)).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        match kind {
            GameKind::Runner => setup_runner_input(&canvas, game.clone()),
            GameKind::Sorter => setup_sorter_input(&canvas, game.clone()),
        }
        setup_shared_keys(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(&canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Status Arcade running!");
    }

    /// Touch position relative to the canvas, in CSS pixels
    fn touch_x(canvas: &HtmlCanvasElement, touch: &web_sys::Touch) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        touch.client_x() as f32 - rect.left() as f32
    }

    fn setup_runner_input(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(action) = input::runner_key_down(&event.key()) else {
                    return;
                };
                // Keep space and arrows from scrolling the page
                event.prevent_default();
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Session::Runner { input, .. } = &mut g.session {
                    input.record(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(action) = input::runner_key_up(&event.key()) {
                    if let Session::Runner { input, .. } = &mut game.borrow_mut().session {
                        input.record(action);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: left half jumps, right half ducks
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let x = touch_x(&canvas_clone, &touch);
                let width = canvas_clone.client_width() as f32;
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Session::Runner { input, touch_x, .. } = &mut g.session {
                    input.record(input::runner_touch_start(x, width));
                    *touch_x = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end releases what the touch started
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let width = canvas_clone.client_width() as f32;
                if let Session::Runner { input, touch_x, .. } = &mut game.borrow_mut().session {
                    if let Some(x) = touch_x.take() {
                        input.record(input::runner_touch_end(x, width));
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_sorter_input(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(action) = input::sorter_key(&event.key()) {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    if let Session::Sorter { input, .. } = &mut g.session {
                        input.record(action);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Swipes
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let x = touch_x(&canvas_clone, &touch);
                    if let Session::Sorter { swipe, .. } = &mut game.borrow_mut().session {
                        swipe.touch_start(x);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let x = touch_x(&canvas_clone, &touch);
                if let Session::Sorter { input, swipe, .. } = &mut game.borrow_mut().session {
                    if let Some(action) = swipe.touch_end(x) {
                        input.record(action);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// `i` toggles autoplay, `m` toggles sound
    fn setup_shared_keys(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                "i" | "I" => game.borrow_mut().toggle_autoplay(),
                "m" | "M" => game.borrow_mut().toggle_sound(),
                _ => {}
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// On-screen buttons that exist in the page markup
    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        let bind = |id: &str, on_click: Box<dyn FnMut(&mut Game)>| {
            let Some(btn) = document.get_element_by_id(id) else {
                return;
            };
            let game = game.clone();
            let mut on_click = on_click;
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                on_click(&mut *g);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        };

        bind(
            "restart-btn",
            Box::new(|g| match &mut g.session {
                Session::Runner { input, .. } => input.restart = true,
                Session::Sorter { input, .. } => input.start = true,
            }),
        );
        bind(
            "start-btn",
            Box::new(|g| {
                if let Session::Sorter { input, .. } = &mut g.session {
                    input.start = true;
                }
            }),
        );
        bind(
            "keep-btn",
            Box::new(|g| {
                if let Session::Sorter { input, .. } = &mut g.session {
                    input.record(input::SorterAction::Keep);
                }
            }),
        );
        bind(
            "discard-btn",
            Box::new(|g| {
                if let Session::Sorter { input, .. } = &mut g.session {
                    input.record(input::SorterAction::Discard);
                }
            }),
        );
        bind(
            "resume-btn",
            Box::new(|g| {
                if let Session::Runner { input, .. } = &mut g.session {
                    input.resume = true;
                }
            }),
        );
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                if let Session::Runner { input, .. } = &mut game.borrow_mut().session {
                    if hidden {
                        input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    } else {
                        input.resume = true;
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Focus back on the window
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if let Session::Runner { input, .. } = &mut game.borrow_mut().session {
                    input.resume = true;
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if let Session::Runner { input, .. } = &mut game.borrow_mut().session {
                    input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// The sorter fills its container, so it follows window resizes
    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let Session::Sorter { state, .. } = &mut g.session else {
                return;
            };
            let width = canvas.client_width().max(1) as f32;
            let height = canvas.client_height().max(1) as f32;
            state.resize(width, height);

            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let (px_w, px_h) = ((width as f64 * dpr) as u32, (height as f64 * dpr) as u32);
            canvas.set_width(px_w);
            canvas.set_height(px_h);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(px_w, px_h);
                render_state.set_world_size(width, height);
            }
        });
        let _ =
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Status Arcade (native) starting...");
    log::info!("Native mode runs a headless autoplay demo - serve the wasm build to play");

    let seed = 42;
    demo::play_runner(seed);
    demo::play_sorter(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Both games played by their autoplay inputs, without a window
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use status_arcade::consts::{SIM_DT_MS, SIM_HZ};
    use status_arcade::sim::{
        GameEvent, RunnerInput, RunnerState, SorterInput, SorterPhase, SorterState, runner,
        sorter,
    };
    use status_arcade::{HighScores, RunnerTuning, SorterTuning};

    /// Simulated minutes the runner plays for
    const RUNNER_MINUTES: u64 = 2;

    pub fn play_runner(seed: u64) {
        let mut state = RunnerState::new(seed, RunnerTuning::default());
        let input = RunnerInput {
            autoplay: true,
            ..Default::default()
        };
        let mut scores = HighScores::new();
        let mut games = 0;

        let ticks = RUNNER_MINUTES * 60 * SIM_HZ as u64;
        for _ in 0..ticks {
            runner::tick(&mut state, &input, SIM_DT_MS);
            for event in state.take_events() {
                match event {
                    GameEvent::GameOver {
                        score,
                        new_high_score,
                    } => {
                        games += 1;
                        scores.add_score(score, state.stats.critical_hits, 0.0);
                        log::info!(
                            "Runner game {} over: score {}{}",
                            games,
                            score,
                            if new_high_score { " (new high score)" } else { "" }
                        );
                    }
                    GameEvent::NightMode { active } => {
                        log::debug!("Night mode {}", if active { "on" } else { "off" });
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Runner demo: {} games, current score {}, best {}, hits {} ({} critical), budget {:.0}%",
            games,
            state.stats.score,
            scores.top_score().unwrap_or(state.stats.score),
            state.stats.total_hits,
            state.stats.critical_hits,
            state.stats.budget
        );
    }

    pub fn play_sorter(seed: u64) {
        let tuning = SorterTuning::default();
        let mut state = SorterState::new(seed, 800.0, 450.0, tuning);
        let input = SorterInput {
            autoplay: true,
            ..Default::default()
        };

        // Stop once the first round ends
        loop {
            sorter::tick(&mut state, &input);
            let done = state
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::TimeUp { .. }));
            if done || state.phase == SorterPhase::Finished {
                break;
            }
        }

        log::info!(
            "Sorter demo: score {}, {} pages sorted, best combo {}",
            state.score,
            state.pages_sorted,
            state.best_combo
        );
    }
}
