//! Game handle
//!
//! Owns one round's `RendererState` and everything that acts on it: input
//! entry points, the per-frame update-then-draw cycle and the observer
//! callbacks. The host (browser glue or a test) feeds it pointer events and
//! frame timestamps.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{ConfigResult, GameOptions};
use crate::platform::{FeedbackSink, FixedScaler, NoFeedback, SurfaceScaler, clock_seed};
use crate::renderer::{Renderer, Surface};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, PointerId, RendererState, RoundRules, tick, update_confetti};

type PhaseHandler = Box<dyn FnMut(GamePhase)>;
type TickHandler = Box<dyn FnMut(u32)>;
/// (winner_index, player_count)
type WinnerHandler = Box<dyn FnMut(usize, usize)>;
/// (touch_count, required)
type NotEnoughPlayersHandler = Box<dyn FnMut(usize, usize)>;

/// Observer slots, invoked synchronously in event order. All default to no-ops.
///
/// Handlers run while the game is mutably borrowed and must not call back into it.
pub struct GameCallbacks {
    pub on_phase_change: PhaseHandler,
    pub on_countdown_tick: TickHandler,
    pub on_winner: WinnerHandler,
    pub on_not_enough_players: NotEnoughPlayersHandler,
}

impl Default for GameCallbacks {
    fn default() -> Self {
        Self {
            on_phase_change: Box::new(|_| {}),
            on_countdown_tick: Box::new(|_| {}),
            on_winner: Box::new(|_, _| {}),
            on_not_enough_players: Box::new(|_, _| {}),
        }
    }
}

impl GameCallbacks {
    pub fn on_phase_change(mut self, f: impl FnMut(GamePhase) + 'static) -> Self {
        self.on_phase_change = Box::new(f);
        self
    }

    pub fn on_countdown_tick(mut self, f: impl FnMut(u32) + 'static) -> Self {
        self.on_countdown_tick = Box::new(f);
        self
    }

    pub fn on_winner(mut self, f: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_winner = Box::new(f);
        self
    }

    pub fn on_not_enough_players(mut self, f: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_not_enough_players = Box::new(f);
        self
    }
}

/// One game instance bound to a drawing surface
pub struct Game<S: Surface> {
    state: RendererState,
    rules: RoundRules,
    rng: Pcg32,
    seed: u64,
    surface: S,
    renderer: Renderer,
    feedback: Box<dyn FeedbackSink>,
    scaler: Box<dyn SurfaceScaler>,
    settings: Settings,
    callbacks: GameCallbacks,
    running: bool,
    /// Reused between frames
    events: Vec<GameEvent>,
}

impl<S: Surface> Game<S> {
    /// Validate options and build a stopped game
    pub fn create(surface: S, options: GameOptions, callbacks: GameCallbacks) -> ConfigResult<Self> {
        let options = options.validate()?;
        let seed = options.seed.unwrap_or_else(clock_seed);
        log::info!(
            "Game created: countdown {}ms, min {} players, seed {}",
            options.countdown_ms,
            options.min_players,
            seed
        );

        Ok(Self {
            state: RendererState::new(),
            rules: options.rules(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            surface,
            renderer: Renderer::new(options.countdown_ms),
            feedback: Box::new(NoFeedback),
            scaler: Box::new(FixedScaler::default()),
            settings: Settings::default(),
            callbacks,
            running: false,
            events: Vec::new(),
        })
    }

    pub fn with_feedback(mut self, feedback: impl FeedbackSink + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn with_scaler(mut self, scaler: impl SurfaceScaler + 'static) -> Self {
        self.scaler = Box::new(scaler);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Begin accepting input and frames. Refused when the surface cannot be drawn to.
    pub fn start(&mut self) -> bool {
        if self.running {
            return true;
        }
        if !self.surface.is_usable() {
            log::warn!("Not starting: no usable drawing context");
            return false;
        }

        self.running = true;
        if self.state.phase.accepts_new_touches() {
            // Lifts that happened while stopped were never seen
            self.state.touches.clear();
            self.state.phase = GamePhase::WaitingForPlayers;
            self.state.countdown_started_at = None;
            self.state.last_tick_second = None;
        }
        log::info!("Game started in {}", self.state.phase);
        self.dispatch(GameEvent::CountdownTick(self.rules.full_countdown_seconds()));
        self.dispatch(GameEvent::PhaseChanged(self.state.phase));
        true
    }

    /// Stop accepting input and frames. State stays readable.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("Game stopped in {}", self.state.phase);
        }
    }

    /// Back to waiting with no touches. Works whether or not the game is running.
    pub fn reset(&mut self) {
        self.state.reset_round();
        log::info!("Round reset");
        self.dispatch(GameEvent::PhaseChanged(GamePhase::WaitingForPlayers));
        if self.running {
            self.dispatch(GameEvent::CountdownTick(self.rules.full_countdown_seconds()));
        }
    }

    pub fn pointer_down(&mut self, id: PointerId, pos: Vec2) {
        if self.running {
            self.state.touches.add(self.state.phase, id, pos);
        }
    }

    pub fn pointer_move(&mut self, id: PointerId, pos: Vec2) {
        if self.running {
            self.state.touches.update(id, pos);
        }
    }

    pub fn pointer_up(&mut self, id: PointerId) {
        if self.running {
            self.state.touches.release(self.state.phase, id);
        }
    }

    pub fn pointer_cancel(&mut self, id: PointerId) {
        self.pointer_up(id);
    }

    /// One update-then-draw cycle at `now` (ms)
    pub fn frame(&mut self, now: f64) {
        if !self.running {
            return;
        }

        let mut events = std::mem::take(&mut self.events);
        events.clear();
        tick(&mut self.state, &self.rules, now, &mut self.rng, &mut events);
        if !self.state.particles.is_empty() {
            update_confetti(&mut self.state, now);
        }
        for event in events.iter().copied() {
            self.dispatch(event);
        }
        self.events = events;

        if !self.surface.is_usable() {
            log::debug!("Skipping draw: no drawing context");
            return;
        }
        self.renderer.reduced_motion = self.settings.reduced_motion;
        let size = self.renderer.render(
            &mut self.surface,
            &self.state,
            now,
            self.scaler.device_pixel_ratio(),
        );
        self.state.canvas_width = size.x;
        self.state.canvas_height = size.y;
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::PhaseChanged(phase) => (self.callbacks.on_phase_change)(phase),
            GameEvent::CountdownTick(secs) => (self.callbacks.on_countdown_tick)(secs),
            GameEvent::Hop { .. } => {
                if self.settings.haptics_enabled {
                    self.feedback.hop();
                }
            }
            GameEvent::Winner {
                winner_index,
                player_count,
            } => (self.callbacks.on_winner)(winner_index, player_count),
            GameEvent::NotEnoughPlayers {
                touch_count,
                required,
            } => (self.callbacks.on_not_enough_players)(touch_count, required),
        }
    }

    pub fn state(&self) -> &RendererState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Apply and persist new preferences
    pub fn set_settings(&mut self, settings: Settings) {
        if settings != self.settings {
            self.settings = settings;
            self.settings.save();
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
