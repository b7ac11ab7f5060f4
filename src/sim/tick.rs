//! Per-frame phase state machine
//!
//! Advances a round based on wall-clock time and the number of fingers down.
//! All timeouts are elapsed-time comparisons against the phase start, so the
//! outcome does not depend on frame rate.

use rand::Rng;

use super::confetti::{advance_confetti, spawn_confetti};
use super::schedule::{build_suspense_schedule, schedule_end_ms};
use super::state::{GameEvent, GamePhase, RendererState, seconds_left};
use super::winner::pick_winner_index;
use crate::consts::{
    DEFAULT_COUNTDOWN_MS, DEFAULT_HOP_COUNT, DEFAULT_MIN_PLAYERS, SUSPENSE_END_BUFFER_MS,
};
use crate::{full_countdown_seconds, touch_circle_radius};

/// Timing and player-count rules for a round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRules {
    pub countdown_ms: f64,
    pub min_players: usize,
    pub hop_count: usize,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            countdown_ms: DEFAULT_COUNTDOWN_MS,
            min_players: DEFAULT_MIN_PLAYERS,
            hop_count: DEFAULT_HOP_COUNT,
        }
    }
}

impl RoundRules {
    pub fn full_countdown_seconds(&self) -> u32 {
        full_countdown_seconds(self.countdown_ms)
    }
}

/// Advance the phase machine to `now`, appending notifications to `events`
pub fn tick<R: Rng>(
    state: &mut RendererState,
    rules: &RoundRules,
    now: f64,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    match state.phase {
        GamePhase::WaitingForPlayers | GamePhase::Countdown => {
            if update_countdown(state, rules, now, events) {
                enter_suspense(state, rules, now, rng, events);
            }
        }
        GamePhase::Suspense => {
            if update_suspense(state, now, events) {
                enter_result(state, now, rng, events);
            }
        }
        GamePhase::Result => {}
    }
}

/// Step the confetti simulation; idle when there is nothing to animate
pub fn update_confetti(state: &mut RendererState, now: f64) {
    if state.particles.is_empty() {
        state.particles_updated_at_ms = None;
        return;
    }
    let step = advance_confetti(now, &state.particles, state.particles_updated_at_ms);
    state.particles = step.particles;
    state.particles_updated_at_ms = step.last_updated_at_ms;
}

/// Returns true when the countdown has run out with enough players
fn update_countdown(
    state: &mut RendererState,
    rules: &RoundRules,
    now: f64,
    events: &mut Vec<GameEvent>,
) -> bool {
    let touch_count = state.touches.len();

    if touch_count < rules.min_players {
        if state.phase == GamePhase::Countdown {
            log::info!(
                "Countdown aborted: {} of {} players",
                touch_count,
                rules.min_players
            );
            state.phase = GamePhase::WaitingForPlayers;
            state.countdown_started_at = None;
            state.last_tick_second = None;
            events.push(GameEvent::PhaseChanged(GamePhase::WaitingForPlayers));
            events.push(GameEvent::CountdownTick(rules.full_countdown_seconds()));
            events.push(GameEvent::NotEnoughPlayers {
                touch_count,
                required: rules.min_players,
            });
        }
        return false;
    }

    if state.phase == GamePhase::WaitingForPlayers {
        log::info!("Countdown started with {} players", touch_count);
        state.phase = GamePhase::Countdown;
        state.countdown_started_at = Some(now);
        state.last_tick_second = None;
        events.push(GameEvent::PhaseChanged(GamePhase::Countdown));
    }

    let started_at = *state.countdown_started_at.get_or_insert(now);
    let elapsed = now - started_at;
    let secs = seconds_left(rules.countdown_ms, elapsed);
    if state.last_tick_second != Some(secs) {
        state.last_tick_second = Some(secs);
        events.push(GameEvent::CountdownTick(secs));
    }

    elapsed >= rules.countdown_ms
}

fn enter_suspense<R: Rng>(
    state: &mut RendererState,
    rules: &RoundRules,
    now: f64,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    state.player_count = state.touches.len();
    state.winner_index = pick_winner_index(rng, state.player_count);
    state.snapshot_order = state.touches.ids();
    state.suspense_schedule =
        build_suspense_schedule(state.player_count, state.winner_index, rules.hop_count);
    state.suspense_started_at = now;
    state.suspense_step_index = 0;
    state.current_highlight_index = state
        .suspense_schedule
        .first()
        .map_or(state.winner_index, |step| step.index);

    log::info!(
        "Suspense: {} players, {} hops",
        state.player_count,
        state.suspense_schedule.len()
    );
    state.phase = GamePhase::Suspense;
    events.push(GameEvent::PhaseChanged(GamePhase::Suspense));
}

/// Returns true once the schedule and the closing dwell have played out
fn update_suspense(state: &mut RendererState, now: f64, events: &mut Vec<GameEvent>) -> bool {
    let elapsed = now - state.suspense_started_at;

    // A late frame may cover several hops
    while let Some(next) = state
        .suspense_schedule
        .get(state.suspense_step_index + 1)
        .copied()
    {
        if next.at_ms > elapsed {
            break;
        }
        state.suspense_step_index += 1;
        state.current_highlight_index = next.index;
        log::debug!("Hop {} -> player {}", state.suspense_step_index, next.index);
        events.push(GameEvent::Hop { index: next.index });
    }

    elapsed >= schedule_end_ms(&state.suspense_schedule, SUSPENSE_END_BUFFER_MS)
}

fn enter_result<R: Rng>(
    state: &mut RendererState,
    now: f64,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    state.phase = GamePhase::Result;
    log::info!(
        "Result: player {} of {} pays",
        state.winner_index + 1,
        state.player_count
    );
    events.push(GameEvent::PhaseChanged(GamePhase::Result));
    events.push(GameEvent::Winner {
        winner_index: state.winner_index,
        player_count: state.player_count,
    });

    let origin = state.winner_origin();
    let radius = touch_circle_radius(state.canvas_width, state.canvas_height);
    state.particles = spawn_confetti(rng, now, origin, radius);
    state.particles_updated_at_ms = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FRAME_MS: f64 = 16.0;

    fn run_until(
        state: &mut RendererState,
        rules: &RoundRules,
        rng: &mut Pcg32,
        from: f64,
        until: f64,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut now = from;
        while now <= until {
            tick(state, rules, now, rng, &mut events);
            update_confetti(state, now);
            now += FRAME_MS;
        }
        events
    }

    fn add_players(state: &mut RendererState, count: i32) {
        for id in 0..count {
            let phase = state.phase;
            state
                .touches
                .add(phase, id, Vec2::new(50.0 + id as f32 * 80.0, 200.0));
        }
    }

    fn phase_changes(events: &[GameEvent]) -> Vec<GamePhase> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_touch_never_starts_countdown() {
        let mut state = RendererState::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let rules = RoundRules::default();
        add_players(&mut state, 1);

        let events = run_until(&mut state, &rules, &mut rng, 0.0, 5010.0);
        assert_eq!(state.phase, GamePhase::WaitingForPlayers);
        assert!(events.is_empty());
    }

    #[test]
    fn test_countdown_ticks_are_edge_triggered() {
        let mut state = RendererState::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let rules = RoundRules::default();
        add_players(&mut state, 2);

        let events = run_until(&mut state, &rules, &mut rng, 100.0, 4000.0);
        let ticks: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CountdownTick(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![5, 4, 3, 2]);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.countdown_started_at, Some(100.0));
    }

    #[test]
    fn test_full_round_with_three_players() {
        let mut state = RendererState::new();
        state.canvas_width = 400.0;
        state.canvas_height = 800.0;
        let mut rng = Pcg32::seed_from_u64(42);
        let rules = RoundRules::default();
        add_players(&mut state, 3);

        let events = run_until(&mut state, &rules, &mut rng, 0.0, 5010.0);
        assert_eq!(state.phase, GamePhase::Suspense);
        assert_eq!(state.player_count, 3);
        assert_eq!(state.snapshot_order, vec![0, 1, 2]);
        assert!(events.contains(&GameEvent::CountdownTick(0)));

        let suspense_end = state.suspense_started_at
            + schedule_end_ms(&state.suspense_schedule, SUSPENSE_END_BUFFER_MS);
        let late = run_until(&mut state, &rules, &mut rng, 5024.0, suspense_end + 20.0);

        assert_eq!(state.phase, GamePhase::Result);
        let all: Vec<GameEvent> = events.iter().chain(late.iter()).copied().collect();
        assert_eq!(
            phase_changes(&all),
            vec![GamePhase::Countdown, GamePhase::Suspense, GamePhase::Result]
        );
        let winners: Vec<_> = all
            .iter()
            .filter(|e| matches!(e, GameEvent::Winner { .. }))
            .collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(
            *winners[0],
            GameEvent::Winner {
                winner_index: state.winner_index,
                player_count: 3
            }
        );
        assert!(state.winner_index < 3);
        assert_eq!(state.current_highlight_index, state.winner_index);
        assert_eq!(state.suspense_step_index, state.suspense_schedule.len() - 1);
    }

    #[test]
    fn test_particles_spawn_at_result() {
        let mut state = RendererState::new();
        state.canvas_width = 400.0;
        state.canvas_height = 800.0;
        let mut rng = Pcg32::seed_from_u64(5);
        let rules = RoundRules::default();
        add_players(&mut state, 3);
        run_until(&mut state, &rules, &mut rng, 0.0, 5010.0);

        // Jump straight past the end of the schedule
        let end = state.suspense_started_at
            + schedule_end_ms(&state.suspense_schedule, SUSPENSE_END_BUFFER_MS);
        let mut events = Vec::new();
        tick(&mut state, &rules, end, &mut rng, &mut events);

        assert_eq!(state.phase, GamePhase::Result);
        assert!((20..=40).contains(&state.particles.len()));
        assert_eq!(state.particles_updated_at_ms, Some(end));
        // Every walking hop was delivered in that one late frame
        let hops = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Hop { .. }))
            .count();
        assert_eq!(hops, state.suspense_schedule.len() - 1);
    }

    #[test]
    fn test_drop_below_minimum_resets_countdown() {
        let mut state = RendererState::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let rules = RoundRules::default();
        add_players(&mut state, 2);
        run_until(&mut state, &rules, &mut rng, 0.0, 2500.0);
        assert_eq!(state.phase, GamePhase::Countdown);

        state.touches.release(state.phase, 1);
        let mut events = Vec::new();
        tick(&mut state, &rules, 2516.0, &mut rng, &mut events);

        assert_eq!(
            events,
            vec![
                GameEvent::PhaseChanged(GamePhase::WaitingForPlayers),
                GameEvent::CountdownTick(5),
                GameEvent::NotEnoughPlayers {
                    touch_count: 1,
                    required: 2
                },
            ]
        );
        assert_eq!(state.phase, GamePhase::WaitingForPlayers);
        assert_eq!(state.countdown_started_at, None);

        // The countdown restarts from scratch when a second finger returns
        state.touches.add(state.phase, 9, Vec2::ZERO);
        let events = run_until(&mut state, &rules, &mut rng, 3000.0, 7900.0);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert!(!phase_changes(&events).contains(&GamePhase::Suspense));
    }

    #[test]
    fn test_new_touches_during_suspense_do_not_join() {
        let mut state = RendererState::new();
        let mut rng = Pcg32::seed_from_u64(8);
        let rules = RoundRules::default();
        add_players(&mut state, 2);
        run_until(&mut state, &rules, &mut rng, 0.0, 5010.0);
        assert_eq!(state.phase, GamePhase::Suspense);

        assert!(!state.touches.add(state.phase, 77, Vec2::ZERO));
        assert_eq!(state.player_count, 2);
        assert_eq!(state.snapshot_order.len(), 2);
    }

    #[test]
    fn test_lifted_finger_during_suspense_still_wins() {
        let mut state = RendererState::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let rules = RoundRules::default();
        add_players(&mut state, 2);
        run_until(&mut state, &rules, &mut rng, 0.0, 5010.0);

        let winner_id = state.snapshot_order[state.winner_index];
        let winner_pos = state.touches.get(winner_id).unwrap().pos;
        state.touches.release(state.phase, winner_id);
        let end = state.suspense_started_at
            + schedule_end_ms(&state.suspense_schedule, SUSPENSE_END_BUFFER_MS);
        let mut events = Vec::new();
        tick(&mut state, &rules, end, &mut rng, &mut events);

        assert_eq!(state.phase, GamePhase::Result);
        assert_eq!(state.winner_origin(), winner_pos);
    }

    #[test]
    fn test_result_is_terminal() {
        let mut state = RendererState::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let rules = RoundRules::default();
        add_players(&mut state, 2);
        run_until(&mut state, &rules, &mut rng, 0.0, 5010.0);
        let end = state.suspense_started_at
            + schedule_end_ms(&state.suspense_schedule, SUSPENSE_END_BUFFER_MS);
        run_until(&mut state, &rules, &mut rng, end, end);
        assert_eq!(state.phase, GamePhase::Result);

        let events = run_until(&mut state, &rules, &mut rng, end + 16.0, end + 10_000.0);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Result);
        // Confetti has burned out by now
        assert!(state.particles.is_empty());
        assert_eq!(state.particles_updated_at_ms, None);
    }
}
