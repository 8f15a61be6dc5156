//! Expense Drop entry point
//!
//! Handles platform-specific initialization and runs the game loop:
//! canvas + event listeners on the web, a scripted headless demo natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use expense_drop::audio::{AudioManager, SoundEffect};
    use expense_drop::highscores::HighScore;
    use expense_drop::platform::LocalStorage;
    use expense_drop::render::{self, DrawCmd, Scene, TextAlign};
    use expense_drop::settings::Settings;
    use expense_drop::sim::{GameEvent, GameState, TickInput, advance};
    use expense_drop::tuning::Tuning;

    /// How long the penalty flash stays visible (seconds)
    const PENALTY_FLASH_SECS: f32 = 0.9;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        tuning: Tuning,
        input: TickInput,
        /// Keyboard soft-drop is held, not one-shot
        soft_drop_held: bool,
        last_time: f64,
        high_score: HighScore<LocalStorage>,
        settings: Settings,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        /// Seconds left on the penalty flash
        flash_timer: f32,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, ctx: CanvasRenderingContext2d) -> Self {
            let high_score = HighScore::load(LocalStorage);
            let settings = Settings::load(&LocalStorage);
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());

            let mut state = GameState::new(seed, &tuning);
            state.high_score = high_score.best();

            Self {
                state,
                tuning,
                input: TickInput::default(),
                soft_drop_held: false,
                last_time: 0.0,
                high_score,
                settings,
                audio,
                ctx,
                flash_timer: 0.0,
            }
        }

        /// Run one simulation step and react to its cues
        fn update(&mut self, dt: f32) {
            let mut input = self.input.clone();
            input.soft_drop = input.soft_drop || self.soft_drop_held;
            advance(&mut self.state, &input, &self.tuning, dt);

            // Clear one-shot inputs after processing
            self.input = TickInput::default();

            let events: Vec<GameEvent> = self.state.events.drain(..).collect();
            for event in events {
                match event {
                    GameEvent::BlockLanded { matched: true, .. } => {
                        self.audio.play(SoundEffect::Match);
                    }
                    GameEvent::BlockLanded { matched: false, .. } => {
                        self.audio.play(SoundEffect::Mismatch);
                        if !self.settings.reduced_motion {
                            self.flash_timer = PENALTY_FLASH_SECS;
                        }
                    }
                    GameEvent::LevelUp { level } => {
                        self.audio.play(SoundEffect::LevelUp);
                        log::info!("Level up: {level}");
                    }
                    GameEvent::GameOver { score } => {
                        if self.high_score.record(score) {
                            self.audio.play(SoundEffect::HighScore);
                        } else {
                            self.audio.play(SoundEffect::GameOver);
                        }
                        self.state.high_score = self.high_score.best();
                        log::info!("Game over at score {score}");
                    }
                }
            }

            self.flash_timer = (self.flash_timer - dt).max(0.0);
        }

        /// Render the current frame and mirror the HUD into the DOM
        fn render(&self) {
            let scene = render::scene(&self.state, &self.tuning);
            paint(&self.ctx, &scene);
            self.update_hud(&scene);
        }

        fn update_hud(&self, scene: &Scene) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let set = |id: &str, value: String| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&value));
                }
            };
            set("scoreDisplay", scene.hud.score.to_string());
            set("livesDisplay", scene.hud.lives.to_string());
            set("levelDisplay", scene.hud.level.to_string());
            set("difficultyLabel", scene.hud.difficulty.to_string());
            let hs = scene.hud.high_score;
            set(
                "highScoreDisplay",
                if hs == 0 { "\u{2014}".to_string() } else { hs.to_string() },
            );

            // Penalty flash element
            if let Some(el) = document.get_element_by_id("overflow") {
                let class = if self.flash_timer > 0.0 {
                    "show"
                } else {
                    ""
                };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Reset high score and current game (the dashboard's reset control)
        fn full_reset(&mut self) {
            self.high_score.reset();
            self.state.high_score = 0;
            self.input.reset = true;
            log::info!("High score and session reset");
        }
    }

    /// Rasterize a scene onto the 2D canvas
    fn paint(ctx: &CanvasRenderingContext2d, scene: &Scene) {
        ctx.clear_rect(0.0, 0.0, scene.width as f64, scene.height as f64);

        for cmd in &scene.commands {
            match cmd {
                DrawCmd::Rect {
                    x,
                    y,
                    w,
                    h,
                    color,
                    alpha,
                } => {
                    ctx.set_fill_style_str(&rgba(*color, *alpha));
                    ctx.fill_rect(*x as f64, *y as f64, *w as f64, *h as f64);
                }
                DrawCmd::RoundedRect {
                    x,
                    y,
                    w,
                    h,
                    radius,
                    color,
                    alpha,
                    outline,
                } => {
                    rounded_rect_path(
                        ctx, *x as f64, *y as f64, *w as f64, *h as f64, *radius as f64,
                    );
                    ctx.set_fill_style_str(&rgba(*color, *alpha));
                    ctx.fill();
                    if *outline {
                        ctx.set_stroke_style_str(&rgba(0x000000, 0.2));
                        ctx.set_line_width(1.0);
                        ctx.stroke();
                    }
                }
                DrawCmd::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    alpha,
                } => {
                    ctx.begin_path();
                    ctx.move_to(*x1 as f64, *y1 as f64);
                    ctx.line_to(*x2 as f64, *y2 as f64);
                    ctx.set_stroke_style_str(&rgba(*color, *alpha));
                    ctx.set_line_width(1.0);
                    ctx.stroke();
                }
                DrawCmd::Text {
                    x,
                    y,
                    text,
                    color,
                    size,
                    align,
                } => {
                    ctx.set_fill_style_str(&rgba(*color, 1.0));
                    ctx.set_font(&format!("{size}px Inter"));
                    ctx.set_text_align(match align {
                        TextAlign::Center => "center",
                        TextAlign::Left => "left",
                    });
                    let _ = ctx.fill_text(text, *x as f64, *y as f64);
                }
            }
        }
    }

    fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
        ctx.begin_path();
        ctx.move_to(x + r, y);
        let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = ctx.arc_to(x, y + h, x, y, r);
        let _ = ctx.arc_to(x, y, x + w, y, r);
        ctx.close_path();
    }

    fn rgba(color: u32, alpha: f32) -> String {
        let r = (color >> 16) & 0xFF;
        let g = (color >> 8) & 0xFF;
        let b = color & 0xFF;
        format!("rgba({r}, {g}, {b}, {alpha})")
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Expense Drop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = Tuning::validated().expect("default tuning must validate");
        let board = tuning.board();
        canvas.set_width(board.width as u32);
        canvas.set_height(board.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, ctx)));

        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Expense Drop running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.move_left = true,
                    "ArrowRight" => g.input.move_right = true,
                    "ArrowDown" | " " => g.soft_drop_held = true,
                    "Enter" => {
                        g.audio.resume();
                        g.input.start = true;
                    }
                    "Escape" | "p" | "P" => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if matches!(event.key().as_str(), "ArrowDown" | " ") {
                    game.borrow_mut().soft_drop_held = false;
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire up the optional dashboard buttons (present on the game page,
    /// absent in embeds)
    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        let on_click = |id: &str, game: Rc<RefCell<Game>>, f: fn(&mut Game)| {
            if let Some(btn) = document.get_element_by_id(id) {
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    f(&mut game.borrow_mut());
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        };

        on_click("startBtn", game.clone(), |g| {
            g.audio.resume();
            g.input.start = true;
        });
        on_click("pauseBtn", game.clone(), |g| g.input.pause = true);
        on_click("resetBtn", game.clone(), Game::full_reset);
        on_click("leftBtn", game.clone(), |g| g.input.move_left = true);
        on_click("rightBtn", game.clone(), |g| g.input.move_right = true);
        // Touch button has no release event pairing, so it is a one-frame pulse
        on_click("downBtn", game.clone(), |g| g.input.soft_drop = true);
    }

    /// Pause when the tab goes hidden so stalls never eat lives
    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        use expense_drop::sim::GamePhase;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.hidden() {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Running {
                    g.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
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
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
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
fn main() {
    use expense_drop::highscores::HighScore;
    use expense_drop::platform::MemoryStore;
    use expense_drop::sim::{GamePhase, GameState, TickInput, advance};
    use expense_drop::tuning::Tuning;

    env_logger::init();
    log::info!("Expense Drop (native) starting headless demo...");

    let tuning = Tuning::validated().expect("default tuning must validate");
    let mut high_score = HighScore::load(MemoryStore::new());

    let seed = std::time::UNIX_EPOCH
        .elapsed()
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = GameState::new(seed, &tuning);
    state.high_score = high_score.best();

    let start = TickInput {
        start: true,
        ..Default::default()
    };
    let dt = 1.0 / 60.0;
    advance(&mut state, &start, &tuning, dt);

    // Scripted player: steer the controllable block toward its target,
    // capped at two minutes of simulated play.
    let mut frames = 0u32;
    while state.phase != GamePhase::GameOver && frames < 120 * 60 {
        let mut input = TickInput::default();
        if let Some(block) = state.player_block_mut() {
            if block.current_column < block.target_column {
                input.move_right = true;
            } else if block.current_column > block.target_column {
                input.move_left = true;
            } else {
                input.soft_drop = true;
            }
        }
        advance(&mut state, &input, &tuning, dt);
        for event in state.events.drain(..) {
            log::debug!("event: {event:?}");
        }
        frames += 1;
    }

    high_score.record(state.score);
    log::info!(
        "Demo finished after {:.1}s: score {}, level {}, lives {}, best {}",
        frames as f32 * dt,
        state.score,
        state.level,
        state.lives,
        high_score.best()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
