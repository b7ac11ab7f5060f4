//! Suspense schedule
//!
//! The highlight walks around the players one seat at a time, slowing down
//! with every hop, and is arranged so the walk ends on the winner. A final
//! settle step dwells on the winner.

use serde::{Deserialize, Serialize};

/// Base interval between the first two hops
const BASE_HOP_INTERVAL_MS: f64 = 70.0;
/// Each hop waits this much longer than the previous one
const HOP_INTERVAL_GROWTH_MS: f64 = 18.0;
/// Gap between the last walking hop and the settle step
const SETTLE_DELAY_MS: f64 = 360.0;
/// Every player gets passed over at least this many times
const MIN_LAPS: usize = 3;

/// A scheduled change of the highlighted player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpStep {
    /// Player index (into the snapshot order) highlighted from `at_ms` on
    pub index: usize,
    /// Offset from the start of suspense
    pub at_ms: f64,
}

/// Build the hop sequence for one round.
///
/// Deterministic in its inputs. The last step always targets `winner_index`
/// and `at_ms` is strictly increasing. Returns an empty schedule for zero
/// players.
pub fn build_suspense_schedule(
    player_count: usize,
    winner_index: usize,
    hop_count: usize,
) -> Vec<JumpStep> {
    if player_count == 0 {
        return Vec::new();
    }
    debug_assert!(winner_index < player_count);

    let total = hop_count.max(player_count * MIN_LAPS);
    // Walking forward total-1 seats from here lands on the winner
    let start_index =
        (winner_index + player_count - (total - 1) % player_count) % player_count;

    let mut steps = Vec::with_capacity(total + 1);
    let mut at_ms = 0.0;
    for i in 0..total {
        at_ms += BASE_HOP_INTERVAL_MS + i as f64 * HOP_INTERVAL_GROWTH_MS;
        steps.push(JumpStep {
            index: (start_index + i) % player_count,
            at_ms,
        });
    }
    steps.push(JumpStep {
        index: winner_index,
        at_ms: at_ms + SETTLE_DELAY_MS,
    });

    steps
}

/// Time at which a schedule has fully played out, including the final dwell
pub fn schedule_end_ms(schedule: &[JumpStep], end_buffer_ms: f64) -> f64 {
    schedule.last().map_or(0.0, |step| step.at_ms) + end_buffer_ms
}
