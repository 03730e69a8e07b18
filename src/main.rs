//! Neural Reactor entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlSelectElement};

    use neural_reactor::audio::{AudioManager, SoundEffect};
    use neural_reactor::presentation::PresentationAdapter;
    use neural_reactor::renderer::RenderState;
    use neural_reactor::scores::{ScoreLedger, ScoreRecord};
    use neural_reactor::settings::Settings;
    use neural_reactor::sim::{
        Difficulty, ReactorEvent, ReactorState, SessionPhase, Shape, TickInput, tick,
    };

    /// Milliseconds the white completion flash stays up
    const FLASH_MS: f64 = 200.0;

    /// DOM + WebGPU presenter: draws the particle buffers and mirrors
    /// session state into the page.
    struct DomPresenter {
        render_state: RenderState,
        progress_bar: Option<web_sys::HtmlElement>,
        status_text: Option<web_sys::Element>,
        timer_text: Option<web_sys::Element>,
        holding: bool,
        reduced_motion: bool,
    }

    impl PresentationAdapter for DomPresenter {
        fn on_tick(&mut self, positions: &[f32], colors: &[f32]) {
            match self
                .render_state
                .render(positions, colors, self.holding, self.reduced_motion)
            {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn on_progress(&mut self, percent: f32) {
            if let Some(bar) = &self.progress_bar {
                let _ = bar.style().set_property("width", &format!("{percent}%"));
            }
        }

        fn on_status_change(&mut self, phase: SessionPhase) {
            self.holding = phase == SessionPhase::Holding;
            if let Some(el) = &self.status_text {
                let text = match phase {
                    SessionPhase::Idle => "SYSTEM STATUS: UNSTABLE",
                    SessionPhase::Holding => "SYSTEM STATUS: STABILIZING...",
                    SessionPhase::Completed => "SYSTEM STATUS: STABLE",
                };
                el.set_text_content(Some(text));
            }
        }

        fn on_timer(&mut self, elapsed_seconds: f64) {
            if let Some(el) = &self.timer_text {
                el.set_text_content(Some(&format!("{elapsed_seconds:.2}s")));
            }
        }
    }

    /// App instance holding all state
    struct App {
        state: ReactorState,
        presenter: Option<DomPresenter>,
        input: TickInput,
        ledger: ScoreLedger,
        settings: Settings,
        audio: AudioManager,
        last_phase: SessionPhase,
        /// Wall-clock ms until which the completion flash stays up
        flash_until: Option<f64>,
    }

    impl App {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_muted(!settings.sound);

            let mut state = ReactorState::new(seed);
            state.rebuild_field(settings.quality.particle_count());

            Self {
                state,
                presenter: None,
                input: TickInput::default(),
                ledger: ScoreLedger::load(),
                settings,
                audio,
                last_phase: SessionPhase::Idle,
                flash_until: None,
            }
        }

        /// Advance one frame: run the tick, act on its events, feed the
        /// presenter.
        fn update(&mut self, now_ms: f64) {
            let input = std::mem::take(&mut self.input);
            let events = tick(&mut self.state, &input, now_ms);

            for event in &events {
                match event {
                    ReactorEvent::HoldStarted => self.audio.play(SoundEffect::HoldStart),
                    ReactorEvent::HoldBroken => self.audio.play(SoundEffect::Explosion),
                    ReactorEvent::Completed {
                        elapsed_seconds,
                        difficulty,
                        shape,
                    } => self.complete(*elapsed_seconds, *difficulty, *shape, now_ms),
                }
            }

            // Flash timeout: back to black, then reveal the reward modal
            if let Some(until) = self.flash_until {
                if now_ms >= until {
                    self.flash_until = None;
                    set_body_background("#000000");
                    show_element("success-modal");
                }
            }

            let elapsed_seconds = match self.state.phase {
                SessionPhase::Holding => (now_ms - self.state.hold_started_ms).max(0.0) / 1000.0,
                SessionPhase::Completed => self.state.completed_elapsed_seconds,
                SessionPhase::Idle => 0.0,
            };

            if let Some(presenter) = &mut self.presenter {
                if self.state.phase != self.last_phase {
                    presenter.on_status_change(self.state.phase);
                    self.last_phase = self.state.phase;
                }
                presenter.on_progress(self.state.progress);
                presenter.on_timer(elapsed_seconds);
                presenter.on_tick(&self.state.field.positions, &self.state.field.colors);
            }
        }

        /// Completion side effects: chime, leaderboard, reward reveal
        fn complete(&mut self, elapsed_seconds: f64, difficulty: Difficulty, shape: Shape, now_ms: f64) {
            self.audio.play(SoundEffect::Complete);

            let record = ScoreRecord {
                elapsed_seconds,
                difficulty,
                shape,
                timestamp: String::from(js_sys::Date::new_0().to_iso_string()),
            };
            if let Some(rank) = self.ledger.record(record) {
                log::info!("Stabilized in {:.2}s - rank {}", elapsed_seconds, rank);
            }
            self.ledger.save();
            update_leaderboard_dom(&self.ledger);

            // Reward disclosure
            let profile = difficulty.profile();
            set_text("reward-label", profile.label);
            set_text("reward-percent", &format!("{}%", profile.reward_percent));
            set_text("reward-code", profile.reward_code);

            if self.settings.reduced_motion {
                show_element("success-modal");
            } else {
                set_body_background("#FFFFFF");
                self.flash_until = Some(now_ms + FLASH_MS);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neural Reactor starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, settings)));

        log::info!("Reactor initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;

        {
            let mut a = app.borrow_mut();
            let reduced_motion = a.settings.reduced_motion;
            a.presenter = Some(DomPresenter {
                render_state,
                progress_bar: document
                    .get_element_by_id("progress-bar")
                    .and_then(|e| e.dyn_into().ok()),
                status_text: document.get_element_by_id("status-text"),
                timer_text: document.get_element_by_id("hold-timer"),
                holding: false,
                reduced_motion,
            });
            update_leaderboard_dom(&a.ledger);
        }

        setup_hold_button(&document, app.clone());
        setup_selectors(&document, app.clone());
        setup_dismiss_button(&document, app.clone());

        request_animation_frame(app);

        log::info!("Neural Reactor running!");
    }

    fn setup_hold_button(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("stabilize-btn") else {
            log::error!("No #stabilize-btn in page");
            return;
        };

        // Mouse press
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                a.input.press = true;
                a.audio.resume(); // Browsers unlock audio on first gesture
            });
            let _ = btn
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse release - leaving the button counts as letting go
        for event_name in ["mouseup", "mouseleave"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().input.release = true;
            });
            let _ =
                btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch press
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.input.press = true;
                a.audio.resume();
            });
            let _ = btn
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch release
        for event_name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                app.borrow_mut().input.release = true;
            });
            let _ =
                btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_selectors(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        // Unknown option values are dropped here; the sim only ever sees
        // valid enum variants.
        if let Some(select) = document.get_element_by_id("difficulty-select") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(select) = target.dyn_into::<HtmlSelectElement>() else {
                    return;
                };
                match Difficulty::from_str(&select.value()) {
                    Some(d) => app.borrow_mut().input.set_difficulty = Some(d),
                    None => log::warn!("Ignoring unknown difficulty: {}", select.value()),
                }
            });
            let _ = select
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(select) = document.get_element_by_id("shape-select") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(select) = target.dyn_into::<HtmlSelectElement>() else {
                    return;
                };
                match Shape::from_str(&select.value()) {
                    Some(s) => app.borrow_mut().input.set_shape = Some(s),
                    None => log::warn!("Ignoring unknown shape: {}", select.value()),
                }
            });
            let _ = select
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_dismiss_button(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("dismiss-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().input.reset = true;
                hide_element("success-modal");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().update(time);
        request_animation_frame(app);
    }

    // --- small DOM helpers ---

    fn set_text(id: &str, text: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn show_element(id: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.class_list().remove_1("hidden");
            }
        }
    }

    fn hide_element(id: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.class_list().add_1("hidden");
            }
        }
    }

    fn set_body_background(color: &str) {
        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            let _ = body.style().set_property("background-color", color);
        }
    }

    /// Rewrite the #leaderboard list from the ledger
    fn update_leaderboard_dom(ledger: &ScoreLedger) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };

        list.set_inner_html("");
        for (i, entry) in ledger.entries.iter().enumerate() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&format!(
                    "#{} {:.2}s - {} / {}",
                    i + 1,
                    entry.elapsed_seconds,
                    entry.difficulty.as_str(),
                    entry.shape.as_str(),
                )));
                let _ = list.append_child(&li);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neural Reactor (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    // Headless sanity pass: a full easy-tier hold at 60 fps
    run_headless_hold();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless_hold() {
    use neural_reactor::sim::{ReactorEvent, ReactorState, SessionPhase, TickInput, tick};

    let mut state = ReactorState::new(0xC0FFEE);
    let press = TickInput {
        press: true,
        ..Default::default()
    };
    let mut events = tick(&mut state, &press, 0.0);
    for frame in 1..=200u32 {
        events.extend(tick(&mut state, &TickInput::default(), frame as f64 * 16.0));
    }

    assert_eq!(state.phase, SessionPhase::Completed);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ReactorEvent::Completed { .. }))
    );
    println!("✓ Headless stabilization completed at {:.2}s", state.completed_elapsed_seconds);
}
