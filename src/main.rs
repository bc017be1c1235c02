//! Wavy Tunnel entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, HtmlInputElement, TouchEvent, WheelEvent};

    use wavy_tunnel::input::{GamepadSource, InputAggregator, TouchTracker};
    use wavy_tunnel::renderer::{Overlay, RenderState, Scene, TextItem};
    use wavy_tunnel::sim::GameSession;
    use wavy_tunnel::submit::{FetchSubmitter, LEADERBOARD_PATH, ScoreSubmitter, SubmitError};
    use wavy_tunnel::{Driver, GameError, Presenter, Settings, Viewport};

    /// First connected pad, vertical stick
    struct WebGamepad;

    impl GamepadSource for WebGamepad {
        fn vertical_axis(&mut self) -> Option<f32> {
            let navigator = web_sys::window()?.navigator();
            let pads = navigator.get_gamepads().ok()?;
            let pad: web_sys::Gamepad = pads.get(0).dyn_into().ok()?;
            pad.axes().get(1).as_f64().map(|v| v as f32)
        }
    }

    /// GPU scene plus DOM HUD for text
    struct WebPresenter {
        gpu: Option<RenderState>,
    }

    impl Presenter for WebPresenter {
        fn present(&mut self, scene: &Scene) -> Result<(), GameError> {
            if let Some(ref mut gpu) = self.gpu {
                gpu.present(scene)?;
            }

            let document = web_sys::window().and_then(|w| w.document());
            if let Some(document) = document {
                if let Some(el) = hud_element(&document, "score") {
                    place_text(&el, &scene.score_label());
                }
                if let Some(el) = hud_element(&document, "gameOver") {
                    match scene.banner() {
                        Some(banner) => {
                            place_text(&el, &banner);
                            let _ = el.set_attribute("class", "");
                        }
                        None => {
                            let _ = el.set_attribute("class", "hidden");
                        }
                    }
                }
            }
            apply_overlay(scene.overlay());
            Ok(())
        }
    }

    fn hud_element(document: &web_sys::Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Text anchors are baseline-left in canvas pixels; the HUD CSS lifts
    /// each element by its own height so its bottom sits on the anchor
    fn place_text(el: &HtmlElement, item: &TextItem) {
        el.set_text_content(Some(&item.text));
        let style = el.style();
        let _ = style.set_property("left", &format!("{}px", item.pos.x));
        let _ = style.set_property("top", &format!("{}px", item.pos.y));
    }

    fn apply_overlay(overlay: Overlay) {
        let shown = |visible: bool, display: &'static str| if visible { display } else { "none" };
        set_display("restartButton", shown(overlay.restart_button, "block"));
        set_display("scoreSubmission", shown(overlay.score_submission, "block"));
        set_display("controls", shown(overlay.controls, "flex"));
    }

    /// Page state holding the driver and everything around it
    struct App {
        driver: Driver,
        presenter: WebPresenter,
        touch: TouchTracker,
        /// A frame callback is pending
        looping: bool,
    }

    fn document() -> web_sys::Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn set_display(id: &str, display: &str) {
        if let Some(el) = document().get_element_by_id(id) {
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let _ = el.style().set_property("display", display);
            }
        }
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn viewport_for(canvas: &HtmlCanvasElement) -> Viewport {
        Viewport::new(canvas.width() as f32, canvas.height() as f32)
    }

    /// Match the canvas to the window
    fn fit_canvas(canvas: &HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Wavy Tunnel starting...");

        let canvas: HtmlCanvasElement = document()
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let mut session = GameSession::new(viewport_for(&canvas), seed);
        session.settings = Settings::load();
        session.on_game_over(|score| {
            log::info!("Run ended with {} points", score);
        });
        log::info!("Game initialized with seed: {}", seed);

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

        let gpu = match RenderState::new(surface, &adapter, canvas.width(), canvas.height()).await {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                log::error!("Renderer unavailable: {}", e);
                None
            }
        };

        let input = InputAggregator::new(Box::new(WebGamepad));
        let driver = Driver::new(session, input);
        let touch = TouchTracker::new(driver.input_handle());
        let app = Rc::new(RefCell::new(App {
            driver,
            presenter: WebPresenter { gpu },
            touch,
            looping: false,
        }));

        sync_sliders(&app.borrow().driver.session().settings);
        setup_input_handlers(&canvas, app.clone());
        setup_resize(canvas.clone(), app.clone());
        setup_buttons(app.clone());
        setup_sliders(app.clone());
        setup_submission(app.clone());

        log::info!("Wavy Tunnel ready");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Arm the loop unless a frame is already pending
    fn ensure_looping(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.looping {
                return;
            }
            a.looping = true;
        }
        request_animation_frame(app);
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        let keep_going = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            match a.driver.frame(&mut a.presenter) {
                Ok(keep_going) => keep_going,
                Err(e) => {
                    log::error!("Frame failed, stopping: {}", e);
                    false
                }
            }
        };

        if keep_going {
            request_animation_frame(app);
        } else {
            app.borrow_mut().looping = false;
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Mouse wheel
        {
            let handle = app.borrow().driver.input_handle();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                handle.wheel(event.delta_y() as f32);
            });
            let _ = window.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut().touch.start(touch.client_y() as f32);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut().touch.moved(touch.client_y() as f32);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().touch.end();
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Gamepad connection is polled each tick; just note it
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                log::info!("Gamepad connected");
            });
            let _ = window.add_event_listener_with_callback(
                "gamepadconnected",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            fit_canvas(&canvas);
            let mut a = app.borrow_mut();
            a.driver.session_mut().resize(viewport_for(&canvas));
            if let Some(ref mut gpu) = a.presenter.gpu {
                gpu.resize(canvas.width(), canvas.height());
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let document = document();

        if let Some(btn) = document.get_element_by_id("playButton") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                set_display("playButton", "none");
                app.borrow_mut().driver.start();
                ensure_looping(app.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restartButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().driver.restart();
                ensure_looping(app.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn slider(id: &str) -> Option<HtmlInputElement> {
        document().get_element_by_id(id)?.dyn_into().ok()
    }

    fn sync_sliders(settings: &Settings) {
        if let Some(el) = slider("speedSlider") {
            el.set_value_as_number(settings.speed_slider() as f64);
        }
        if let Some(el) = slider("sensitivitySlider") {
            el.set_value_as_number(settings.sensitivity_slider() as f64);
        }
    }

    fn setup_sliders(app: Rc<RefCell<App>>) {
        let bind = |id: &str, apply: fn(&mut Settings, f32)| {
            let Some(el) = slider(id) else { return };
            let app = app.clone();
            let input = el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = input.value_as_number() as f32;
                if !value.is_finite() {
                    return;
                }
                let mut a = app.borrow_mut();
                let settings = &mut a.driver.session_mut().settings;
                apply(settings, value);
                settings.save();
                log::info!(
                    "Settings: speed={} sensitivity={}",
                    settings.speed,
                    settings.sensitivity
                );
            });
            let _ = el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        };

        bind("speedSlider", Settings::set_speed_slider);
        bind("sensitivitySlider", Settings::set_sensitivity_slider);
    }

    fn setup_submission(app: Rc<RefCell<App>>) {
        let Some(btn) = document().get_element_by_id("submitScoreButton") else {
            return;
        };
        let submitter = FetchSubmitter::default();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let name = document()
                .get_element_by_id("playerName")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|el| el.value())
                .unwrap_or_default();

            let submission = match app.borrow().driver.session().submission(&name) {
                Ok(submission) => submission,
                Err(e) => {
                    alert(&e.to_string());
                    return;
                }
            };

            submitter.submit(
                submission,
                Box::new(|result: Result<(), SubmitError>| match result {
                    Ok(()) => {
                        alert("Score submitted successfully!");
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href(LEADERBOARD_PATH);
                        }
                    }
                    Err(_) => alert("Failed to submit score. Please try again."),
                }),
            );
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Logs a summary line every `every` frames and the final frame
#[cfg(not(target_arch = "wasm32"))]
struct LogPresenter {
    every: u64,
    frames: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl wavy_tunnel::Presenter for LogPresenter {
    fn present(
        &mut self,
        scene: &wavy_tunnel::renderer::Scene,
    ) -> Result<(), wavy_tunnel::GameError> {
        self.frames += 1;
        if let Some(banner) = scene.banner() {
            log::info!("{} score {}", banner.text, scene.score);
        } else if self.frames % self.every == 0 {
            log::info!(
                "frame {}: score {} ball y {:.1}",
                self.frames,
                scene.score,
                scene.ball.pos.y
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use wavy_tunnel::input::InputAggregator;
    use wavy_tunnel::sim::GameSession;
    use wavy_tunnel::submit::{LogSubmitter, ScoreSubmitter, SubmitError};
    use wavy_tunnel::{Driver, Viewport, driver::autopilot_delta};

    env_logger::init();
    log::info!("Wavy Tunnel (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the web version");

    // wavy-tunnel [seed] [autopilot frames]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024u64);
    let autopilot_frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(600u64);

    let session = GameSession::new(Viewport::default(), seed);
    let mut driver = Driver::new(session, InputAggregator::default());
    let mut presenter = LogPresenter {
        every: 120,
        frames: 0,
    };

    driver.start();
    loop {
        // Steer for a while, then let go and wait for the wall
        if driver.frames() < autopilot_frames {
            let delta = autopilot_delta(driver.session());
            driver.input_handle().accumulate(delta);
        }
        match driver.frame(&mut presenter) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                log::error!("Frame failed, stopping: {}", e);
                std::process::exit(1);
            }
        }
    }

    match driver.session().submission("demo") {
        Ok(submission) => LogSubmitter.submit(
            submission,
            Box::new(|result: Result<(), SubmitError>| {
                if let Err(e) = result {
                    log::error!("{}", e);
                }
            }),
        ),
        Err(e) => log::error!("{}", e),
    }
}
