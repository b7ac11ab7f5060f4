//! Full rounds driven through the public game handle

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use who_pays::platform::CountingFeedback;
use who_pays::renderer::{DrawCommand, RecordingSurface};
use who_pays::sim::{GameEvent, GamePhase};
use who_pays::{Game, GameCallbacks, GameOptions};

const FRAME_MS: f64 = 16.0;

/// Everything the callbacks reported, as events
fn recording_game(options: GameOptions) -> (Game<RecordingSurface>, Rc<RefCell<Vec<GameEvent>>>) {
    let events: Rc<RefCell<Vec<GameEvent>>> = Rc::default();
    let (a, b, c, d) = (events.clone(), events.clone(), events.clone(), events.clone());
    let callbacks = GameCallbacks::default()
        .on_phase_change(move |phase| a.borrow_mut().push(GameEvent::PhaseChanged(phase)))
        .on_countdown_tick(move |secs| b.borrow_mut().push(GameEvent::CountdownTick(secs)))
        .on_winner(move |winner_index, player_count| {
            c.borrow_mut().push(GameEvent::Winner {
                winner_index,
                player_count,
            })
        })
        .on_not_enough_players(move |touch_count, required| {
            d.borrow_mut().push(GameEvent::NotEnoughPlayers {
                touch_count,
                required,
            })
        });
    let game = Game::create(RecordingSurface::new(360.0, 640.0), options, callbacks).unwrap();
    (game, events)
}

fn run(game: &mut Game<RecordingSurface>, from: f64, until: f64) -> f64 {
    let mut now = from;
    while now <= until {
        game.frame(now);
        now += FRAME_MS;
    }
    now
}

fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
    events.iter().filter(|e| **e == wanted).count()
}

#[test]
fn lone_finger_never_starts_countdown() {
    let (mut game, events) = recording_game(GameOptions::default().with_seed(1));
    game.start();
    game.pointer_down(1, Vec2::new(180.0, 320.0));
    run(&mut game, 0.0, 5000.0);

    assert_eq!(game.phase(), GamePhase::WaitingForPlayers);
    let events = events.borrow();
    assert_eq!(count(&events, GameEvent::PhaseChanged(GamePhase::Countdown)), 0);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::Winner { .. })));
}

#[test]
fn three_players_get_one_winner() {
    let (game, events) = recording_game(GameOptions::default().with_seed(99));
    let feedback = CountingFeedback::default();
    let mut game = game.with_feedback(feedback.clone());
    let game = &mut game;
    game.start();
    for (id, x) in [(10, 60.0), (11, 180.0), (12, 300.0)] {
        game.pointer_down(id, Vec2::new(x, 320.0));
    }

    // Through countdown and suspense until the reveal
    let mut now = 0.0;
    while game.phase() != GamePhase::Result {
        assert!(now < 20_000.0, "round never finished");
        game.frame(now);
        now += FRAME_MS;
    }

    let state = game.state();
    assert_eq!(state.player_count, 3);
    assert_eq!(state.snapshot_order, vec![10, 11, 12]);
    assert!((20..=40).contains(&state.particles.len()));

    {
        let events = events.borrow();
        assert_eq!(count(&events, GameEvent::PhaseChanged(GamePhase::Suspense)), 1);
        let winners: Vec<&GameEvent> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Winner { .. }))
            .collect();
        assert_eq!(winners.len(), 1);
        match winners[0] {
            GameEvent::Winner {
                winner_index,
                player_count,
            } => {
                assert!(*winner_index < 3);
                assert_eq!(*player_count, 3);
            }
            _ => unreachable!(),
        }
        // Countdown reported 5..=1, then 0 at the hand-over
        let ticks: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CountdownTick(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![5, 5, 4, 3, 2, 1, 0]);
    }
    assert!(feedback.count() > 0);

    // Result is terminal and the confetti burns out
    run(game, now, now + 3000.0);
    assert_eq!(game.phase(), GamePhase::Result);
    assert!(game.state().particles.is_empty());
    assert_eq!(game.surface().glyph_count(), 0);
}

#[test]
fn lifting_below_minimum_aborts_countdown() {
    let (mut game, events) = recording_game(GameOptions::default().with_seed(5));
    game.start();
    game.pointer_down(1, Vec2::new(100.0, 100.0));
    game.pointer_down(2, Vec2::new(200.0, 200.0));
    let now = run(&mut game, 0.0, 2000.0);
    assert_eq!(game.phase(), GamePhase::Countdown);

    events.borrow_mut().clear();
    game.pointer_up(1);
    run(&mut game, now, now + 6000.0);

    assert_eq!(game.phase(), GamePhase::WaitingForPlayers);
    assert_eq!(
        *events.borrow(),
        vec![
            GameEvent::PhaseChanged(GamePhase::WaitingForPlayers),
            GameEvent::CountdownTick(5),
            GameEvent::NotEnoughPlayers {
                touch_count: 1,
                required: 2,
            },
        ]
    );
}

#[test]
fn late_fingers_do_not_join_the_draw() {
    let (mut game, _) = recording_game(GameOptions::default().with_seed(3));
    game.start();
    game.pointer_down(1, Vec2::new(100.0, 100.0));
    game.pointer_down(2, Vec2::new(200.0, 200.0));
    let now = run(&mut game, 0.0, 5010.0);
    assert_eq!(game.phase(), GamePhase::Suspense);

    game.pointer_down(3, Vec2::new(300.0, 300.0));
    game.pointer_up(1);
    game.frame(now);

    let state = game.state();
    assert_eq!(state.touches.len(), 2);
    assert!(state.touches.get(1).is_some_and(|t| t.frozen));
    assert_eq!(state.player_count, 2);
}

#[test]
fn shorter_countdown_and_three_player_minimum() {
    let options = GameOptions::from_json(r#"{"countdownMs": 2000, "minPlayers": 3, "seed": 8}"#).unwrap();
    let (mut game, events) = recording_game(options);
    game.start();
    game.pointer_down(1, Vec2::ZERO);
    game.pointer_down(2, Vec2::ONE);
    let now = run(&mut game, 0.0, 3000.0);
    assert_eq!(game.phase(), GamePhase::WaitingForPlayers);

    game.pointer_down(3, Vec2::splat(2.0));
    run(&mut game, now, now + 2100.0);
    assert_eq!(game.phase(), GamePhase::Suspense);
    assert_eq!(events.borrow()[0], GameEvent::CountdownTick(2));
}

#[test]
fn play_again_after_result() {
    let (mut game, events) = recording_game(GameOptions::default().with_seed(11));
    game.start();
    game.pointer_down(1, Vec2::new(50.0, 50.0));
    game.pointer_down(2, Vec2::new(250.0, 450.0));
    let now = run(&mut game, 0.0, 12_000.0);
    assert_eq!(game.phase(), GamePhase::Result);

    game.reset();
    assert_eq!(game.phase(), GamePhase::WaitingForPlayers);
    assert!(game.state().touches.is_empty());
    assert_eq!(
        events.borrow()[events.borrow().len() - 2..],
        [
            GameEvent::PhaseChanged(GamePhase::WaitingForPlayers),
            GameEvent::CountdownTick(5)
        ]
    );

    game.frame(now);
    assert!(matches!(
        game.surface().commands.first(),
        Some(DrawCommand::Clear { .. })
    ));
    assert_eq!(game.surface().texts()[1], "0 players");
}
