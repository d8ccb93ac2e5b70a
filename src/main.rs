//! Thumb Dodge entry point
//!
//! On wasm32 this hosts the game in a browser canvas: touch drag or device
//! tilt for input, LocalStorage-backed settings/profile, Web Audio SFX.
//! On native it runs a short headless demo of the simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, DeviceOrientationEvent, HtmlCanvasElement, TouchEvent,
    };

    use thumb_dodge::audio::{AudioManager, Sfx};
    use thumb_dodge::consts::MAX_TICK_DT;
    use thumb_dodge::sim::{
        PickupReward, RunEvent, RunPhase, RunState, TickInput, tick,
    };
    use thumb_dodge::{Profile, Settings};

    /// Game instance holding all host state
    struct Game {
        state: RunState,
        input: TickInput,
        settings: Settings,
        profile: Profile,
        audio: AudioManager,
        last_time: f64,
        /// Latest raw tilt reading, fed to the sim once per frame
        tilt_reading: Option<f32>,
        /// Thumb offset from the player center at touchstart
        drag_offset: f32,
        width: f32,
        height: f32,
    }

    impl Game {
        fn new(settings: Settings, profile: Profile, width: f32, height: f32) -> Self {
            let mut audio = AudioManager::new();
            audio.set_enabled(settings.sfx);
            let state = RunState::new(settings.run_config(width, height), rand::random());
            Self {
                state,
                input: TickInput::default(),
                settings,
                profile,
                audio,
                last_time: 0.0,
                tilt_reading: None,
                drag_offset: 0.0,
                width,
                height,
            }
        }

        /// Start a fresh run with a new seed, keeping settings/profile
        fn reset_run(&mut self) {
            let config = self.settings.run_config(self.width, self.height);
            self.state = RunState::new(config, rand::random());
            log::info!("New run, seed {}", self.state.seed);
        }

        /// One animation frame: advance the sim and redraw
        fn frame(&mut self, ctx: &CanvasRenderingContext2d, now_ms: f64) {
            if self.last_time == 0.0 {
                self.last_time = now_ms;
            }
            let dt = (((now_ms - self.last_time) / 1000.0) as f32).min(MAX_TICK_DT);
            self.last_time = now_ms;

            self.input.tilt = self.tilt_reading;
            let events = tick(&mut self.state, &self.input, dt);
            self.input.start = false;
            self.input.pause = false;

            for event in events {
                match event {
                    RunEvent::PickupCollected { reward, .. } => {
                        match reward {
                            PickupReward::Gems { amount } => self.profile.add_gems(amount),
                            PickupReward::Score { points } => self.state.score += points,
                        }
                        self.audio.play(Sfx::Pickup);
                    }
                    RunEvent::Collision { .. } => self.finish_run(),
                }
            }

            self.render(ctx);
        }

        /// Run ended: record the outcome and persist
        fn finish_run(&mut self) {
            self.audio.play(Sfx::Hit);
            let new_best = self.profile.record_run(self.state.score);
            if new_best {
                self.audio.play(Sfx::NewBest);
            }
            self.profile.save();
            log::info!(
                "Game over: score {}, best {}, {} gems banked",
                self.state.score,
                self.profile.best_score,
                self.profile.gems
            );
        }

        fn render(&self, ctx: &CanvasRenderingContext2d) {
            let (w, h) = (self.width as f64, self.height as f64);
            ctx.set_fill_style_str("#fff");
            ctx.fill_rect(0.0, 0.0, w, h);

            // Obstacles
            for obstacle in &self.state.obstacles {
                match obstacle.hue {
                    Some(hue) => ctx.set_fill_style_str(&format!("hsl({hue},70%,50%)")),
                    None => ctx.set_fill_style_str("#20324a"),
                }
                ctx.fill_rect(
                    obstacle.pos.x as f64,
                    obstacle.pos.y as f64,
                    obstacle.size.x as f64,
                    obstacle.size.y as f64,
                );
            }

            // Gems, drawn as diamonds
            ctx.set_fill_style_str("#0cf");
            for pickup in &self.state.pickups {
                let (x, y, r) = (
                    pickup.pos.x as f64,
                    pickup.pos.y as f64,
                    pickup.radius as f64,
                );
                ctx.begin_path();
                ctx.move_to(x, y - r);
                ctx.line_to(x + r, y);
                ctx.line_to(x, y + r);
                ctx.line_to(x - r, y);
                ctx.close_path();
                ctx.fill();
            }

            // Player
            let player = &self.state.player;
            ctx.begin_path();
            let _ = ctx.arc(
                player.pos.x as f64,
                player.pos.y as f64,
                player.radius as f64,
                0.0,
                TAU,
            );
            ctx.set_fill_style_str(self.profile.selected_color());
            ctx.fill();

            // HUD
            ctx.set_fill_style_str("#123");
            ctx.set_font("16px sans-serif");
            let hud_x = if self.settings.left_hand_hud { w - 130.0 } else { 12.0 };
            let _ = ctx.fill_text(&format!("Score {}", self.state.score), hud_x, 24.0);
            let _ = ctx.fill_text(&format!("Best {}", self.profile.best_score), hud_x, 44.0);
            let _ = ctx.fill_text(&format!("Gems {}", self.profile.gems), hud_x, 64.0);

            let overlay = match self.state.phase {
                RunPhase::Idle => Some("Tap to play"),
                RunPhase::Paused => Some("Paused - tap to resume"),
                RunPhase::GameOver => Some("Game over - tap to retry"),
                RunPhase::Running => None,
            };
            if let Some(text) = overlay {
                ctx.set_font("24px sans-serif");
                ctx.set_text_align("center");
                let _ = ctx.fill_text(text, w / 2.0, h / 2.0);
                ctx.set_text_align("left");
            }
        }
    }

    fn canvas_x(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<f32> {
        let touch = event.changed_touches().item(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(touch.client_x() as f32 - rect.left() as f32)
    }

    fn setup_input(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start: wake audio, start/resume the run, anchor the drag
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match g.state.phase {
                    RunPhase::Idle => g.input.start = true,
                    RunPhase::Paused => g.input.pause = true,
                    RunPhase::GameOver => {
                        g.reset_run();
                        g.input.start = true;
                    }
                    RunPhase::Running => {}
                }
                if !g.settings.tilt_controls {
                    if let Some(x) = canvas_x(&canvas_ref, &event) {
                        g.drag_offset = x - g.state.player.pos.x;
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: thumb drag
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if g.settings.tilt_controls {
                    return;
                }
                if let Some(x) = canvas_x(&canvas_ref, &event) {
                    let offset = g.drag_offset;
                    g.input.target_x = Some(x - offset);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Device tilt
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                let mut g = game.borrow_mut();
                if g.settings.tilt_controls {
                    g.tilt_reading = event.gamma().map(|gamma| gamma as f32);
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window.add_event_listener_with_callback(
                    "deviceorientation",
                    closure.as_ref().unchecked_ref(),
                );
            }
            closure.forget();
        }

        // Auto-pause when the tab is hidden
        {
            let game = game.clone();
            let Some(window) = web_sys::window() else { return };
            let Some(document) = window.document() else { return };
            let document_ref = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_ref.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == RunPhase::Running {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn request_animation_frame(callback: &Closure<dyn FnMut(f64)>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game canvas element found");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Failed to acquire 2d context");
            return;
        };

        let rect = canvas.get_bounding_client_rect();
        let (width, height) = (rect.width() as f32, rect.height() as f32);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let settings = Settings::load();
        let profile = Profile::load();
        log::info!("Thumb Dodge starting, field {width}x{height}");

        let game = Rc::new(RefCell::new(Game::new(settings, profile, width, height)));
        setup_input(&canvas, game.clone());

        // requestAnimationFrame loop
        let handle: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let handle_clone = handle.clone();
        *handle_clone.borrow_mut() = Some(Closure::new(move |now: f64| {
            game.borrow_mut().frame(&ctx, now);
            if let Some(callback) = handle.borrow().as_ref() {
                request_animation_frame(callback);
            }
        }));
        if let Some(callback) = handle_clone.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use thumb_dodge::clamp_to_field;
    use thumb_dodge::consts::FIELD_SIDE_MARGIN;
    use thumb_dodge::sim::{Config, RunEvent, RunState, TickInput, tick};

    env_logger::init();
    log::info!("Thumb Dodge (native) - headless demo run");

    let mut state = RunState::new(Config::default(), 20260807);
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        0.0,
    );

    let dt = 1.0 / 60.0;
    let mut gems = 0u32;
    while !state.is_over() && state.elapsed < 120.0 {
        // Naive pilot: sidestep the nearest descending obstacle
        let target = state
            .obstacles
            .iter()
            .filter(|o| o.pos.y < state.player.pos.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|threat| {
                let threat_mid = threat.pos.x + threat.size.x / 2.0;
                let dodge = if threat_mid < state.player.pos.x {
                    threat.pos.x + threat.size.x + state.player.radius + FIELD_SIDE_MARGIN
                } else {
                    threat.pos.x - state.player.radius - FIELD_SIDE_MARGIN
                };
                clamp_to_field(dodge, state.player.radius, state.config.field_width)
            });

        let input = TickInput {
            target_x: target,
            ..Default::default()
        };
        let events = tick(&mut state, &input, dt);
        for event in &events {
            match event {
                RunEvent::PickupCollected { .. } => gems += 1,
                RunEvent::Collision { pos } => {
                    log::info!("Hit an obstacle at ({:.0}, {:.0})", pos.x, pos.y)
                }
            }
        }
    }

    println!(
        "Survived {:.1}s - score {}, {} pickups, difficulty {:.2}",
        state.elapsed, state.score, gems, state.difficulty
    );
}
