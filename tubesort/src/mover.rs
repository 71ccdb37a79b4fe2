//! Candidate move generation.
//!
//! The `Mover` enumerates the pours worth trying from a game state. It does not
//! return every legal pour: pours that only mirror or repeat another candidate
//! are dropped so the solver's branching factor stays small.

use crate::engine::{Game, Tube};
use crate::error::{Result, TubeSortError};
use std::fmt;

/// A single pour, identified by the indices of the source and target tubes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Step {
    from: usize,
    to: usize,
}

impl Step {
    /// Creates a step from tube `from` into tube `to`.
    ///
    /// # Errors
    /// Returns `TubeSortError::InvalidArgument` if both indices are equal.
    pub fn new(from: usize, to: usize) -> Result<Self> {
        if from == to {
            return Err(TubeSortError::InvalidArgument(format!(
                "a step needs two different tubes, got {} twice",
                from
            )));
        }
        Ok(Step { from, to })
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    /// Checks whether `index` is the source or the target of this step.
    pub fn contains(&self, index: usize) -> bool {
        self.from == index || self.to == index
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Computes the candidate moves of one game state.
///
/// A pair `(source, target)` becomes a candidate when all of these hold:
/// - the source is filled and not complete;
/// - `source.can_pour_into(target)`;
/// - it is the first empty target accepted for this source;
/// - a pour that empties the source and exactly fills the target only goes from
///   the lower index to the higher one;
/// - no earlier target of this source already holds a single color only;
/// - when a previous step is known, the source or the target was touched by it.
///
/// # Examples
/// ```
/// use tubesort::engine::{Color, Game, Tile};
/// use tubesort::mover::{Mover, Step};
///
/// let red = Tile::new(1, Color::Red).unwrap();
/// let blue = Tile::new(1, Color::DarkBlue).unwrap();
/// let game = Game::new(2, &[vec![red, blue], vec![blue, red], vec![], vec![]]).unwrap();
///
/// let moves = Mover::new(&game).possible_moves();
/// assert_eq!(moves, vec![Step::new(0, 2).unwrap(), Step::new(1, 2).unwrap()]);
/// ```
#[derive(Debug)]
pub struct Mover<'a> {
    game: &'a Game,
}

impl<'a> Mover<'a> {
    pub fn new(game: &'a Game) -> Self {
        Mover { game }
    }

    /// Evaluates every source/target combination.
    pub fn possible_moves(&self) -> Vec<Step> {
        self.possible_moves_after(None)
    }

    /// Computes the candidates reachable after `last` was played.
    ///
    /// Only combinations touching one of the tubes changed by `last` are
    /// evaluated; all other combinations kept the verdict they had one step
    /// earlier. With `None` every combination is evaluated.
    ///
    /// The result is ordered by source index, then target index.
    pub fn possible_moves_after(&self, last: Option<Step>) -> Vec<Step> {
        let tubes = self.game.tubes();
        let mut moves = Vec::new();

        for (from, source) in tubes.iter().enumerate() {
            if !source.is_filled() || source.is_complete() {
                continue;
            }
            self.collect_targets(from, source, last, &mut moves);
        }

        moves
    }

    fn collect_targets(&self, from: usize, source: &Tube, last: Option<Step>, moves: &mut Vec<Step>) {
        let tubes = self.game.tubes();
        let mut had_empty_target = false;
        let mut preferred_target_found = false;

        for (to, target) in tubes.iter().enumerate() {
            if from == to {
                continue;
            }
            if let Some(last) = last {
                if !last.contains(from) && !last.contains(to) {
                    continue;
                }
            }
            if !source.can_pour_into(target) {
                continue;
            }

            // pouring into one empty tube is as good as pouring into any other
            if !target.is_filled() {
                if had_empty_target {
                    continue;
                }
                had_empty_target = true;
            }

            if Self::is_mirrored_swap(from, source, to, target) {
                continue;
            }

            // the first single-colored target ends the scan for this source
            if preferred_target_found {
                continue;
            }
            if target.top().is_some_and(|top| top.size() == target.size()) {
                preferred_target_found = true;
            }

            moves.push(Step { from, to });
        }
    }

    /// A pour that empties the source and fills the target to capacity has a mirror
    /// image with source and target swapped; only the one with `from < to` is kept.
    fn is_mirrored_swap(from: usize, source: &Tube, to: usize, target: &Tube) -> bool {
        let Some(piece) = source.top() else {
            return false;
        };
        let empties_source = piece.size() == source.size();
        let fills_target = target.size() + piece.size() == target.capacity();
        empties_source && fills_target && from > to
    }
}
