//! Winner selection

use rand::Rng;

/// Pick the index of the player who pays, uniformly from `0..player_count`.
///
/// Callers must only ask once `player_count >= 1`.
pub fn pick_winner_index<R: Rng>(rng: &mut R, player_count: usize) -> usize {
    debug_assert!(player_count > 0, "winner selection needs at least one player");
    rng.random_range(0..player_count)
}
