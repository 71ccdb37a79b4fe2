//! Bounded depth first search over pour sequences.
//!
//! The search tree is expanded with the candidates of [`Mover`]. Every node owns
//! its game snapshot and its own copy of the steps that led to it, so branches
//! never observe each other. A stopper predicate, checked once per node before
//! it is expanded, cuts off whole subtrees.

use crate::engine::Game;
use crate::error::{Result, TubeSortError};
use crate::levels::Level;
use crate::mover::{Mover, Step};
use rayon::prelude::*;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

/// Step bound used when the caller does not choose one.
pub const DEFAULT_MAX_STEPS: usize = 15;

/// Configuration for [`Solver::solve`].
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Nodes holding this many steps are not expanded any further.
    pub max_steps: usize,
    /// Fan out over the rayon thread pool instead of searching on the calling thread.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            parallel: true,
        }
    }
}

/// Counters collected by the sequential search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes for which candidate moves were computed.
    pub expanded: usize,
    /// Nodes cut off by the stopper.
    pub aborted: usize,
    /// Expanded nodes without any candidate move.
    pub dead_ends: usize,
    pub solutions: usize,
}

/// Returns the stopper that cuts every branch once it holds `max_steps` steps.
pub fn stop_at(max_steps: usize) -> impl Fn(&[Step]) -> bool + Copy + Send + Sync {
    move |steps: &[Step]| steps.len() >= max_steps
}

/// Solves one game by trying every candidate sequence of pours.
///
/// # Examples
/// ```
/// use tubesort::engine::{Color, Game, Tile};
/// use tubesort::solver::Solver;
///
/// let red = Tile::new(1, Color::Red).unwrap();
/// let blue = Tile::new(1, Color::DarkBlue).unwrap();
/// let game = Game::new(2, &[vec![red, blue], vec![blue, red], vec![], vec![]]).unwrap();
///
/// let solutions: Vec<_> = Solver::new(game).solutions(15).collect();
/// assert_eq!(solutions.len(), 2);
/// assert!(solutions.iter().all(|steps| steps.len() == 3));
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    game: Game,
    config: SolverConfig,
}

impl Solver {
    pub fn new(game: Game) -> Self {
        Self::with_config(game, SolverConfig::default())
    }

    pub fn with_config(game: Game, config: SolverConfig) -> Self {
        Solver { game, config }
    }

    /// Creates a solver for the starting game of `level`.
    pub fn from_level(level: &dyn Level) -> Result<Self> {
        Ok(Self::new(level.create_game()?))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Collects every solution within the configured step bound.
    ///
    /// The order of the returned solutions is not meaningful.
    pub fn solve(&self) -> Vec<Vec<Step>> {
        if self.config.parallel {
            self.par_solve_within(self.config.max_steps)
        } else {
            self.solutions(self.config.max_steps).collect()
        }
    }

    /// Lazily searches for solutions of at most `max_steps` steps.
    pub fn solutions(&self, max_steps: usize) -> Solutions<impl Fn(&[Step]) -> bool> {
        self.solutions_until(stop_at(max_steps))
    }

    /// Lazily searches for solutions, cutting off every branch for which `stopper` returns true.
    ///
    /// Solutions are produced while the search runs, so a stopper may read state
    /// that the consumer updates between two solutions.
    pub fn solutions_until<F>(&self, stopper: F) -> Solutions<F>
    where
        F: Fn(&[Step]) -> bool,
    {
        Solutions::new(self.game.clone(), stopper)
    }

    /// Searches on the rayon thread pool and collects every solution of at most `max_steps` steps.
    pub fn par_solve_within(&self, max_steps: usize) -> Vec<Vec<Step>> {
        let found = Mutex::new(Vec::new());
        self.par_solve_until(stop_at(max_steps), |steps| {
            found
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(steps)
        });
        found.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Searches on the rayon thread pool, handing each solution to `sink` as soon as it is found.
    ///
    /// Each node spawns one task per candidate move. Siblings run in any order,
    /// so `sink` is called concurrently and in no particular order.
    pub fn par_solve_until<F, S>(&self, stopper: F, sink: S)
    where
        F: Fn(&[Step]) -> bool + Sync,
        S: Fn(Vec<Step>) + Sync,
    {
        expand_parallel(&self.game, &[], &stopper, &sink);
        debug!("parallel search finished");
    }
}

fn expand_parallel<F, S>(game: &Game, steps: &[Step], stopper: &F, sink: &S)
where
    F: Fn(&[Step]) -> bool + Sync,
    S: Fn(Vec<Step>) + Sync,
{
    if stopper(steps) {
        trace!(depth = steps.len(), "branch aborted");
        return;
    }

    let moves = Mover::new(game).possible_moves_after(steps.last().copied());
    if moves.is_empty() {
        trace!(depth = steps.len(), "dead end");
        return;
    }

    moves.into_par_iter().for_each(|step| {
        let (next_game, next_steps) = child(game, steps, step);
        if next_game.is_solved() {
            debug!(steps = next_steps.len(), "solution found");
            sink(next_steps);
        } else {
            expand_parallel(&next_game, &next_steps, stopper, sink);
        }
    });
}

/// Plays `step` on `game` and extends a copy of `steps` with it.
///
/// # Panics
/// Panics if the step cannot be applied. Steps come from the `Mover`, so this
/// only happens when the move generator and the pour rules disagree.
fn child(game: &Game, steps: &[Step], step: Step) -> (Game, Vec<Step>) {
    let next_game = game.pour(step.from(), step.to()).unwrap_or_else(|err| {
        panic!(
            "{}",
            TubeSortError::InvariantViolation(format!(
                "candidate step {} could not be played: {}",
                step, err
            ))
        )
    });

    let mut next_steps = Vec::with_capacity(steps.len() + 1);
    next_steps.extend_from_slice(steps);
    next_steps.push(step);
    (next_game, next_steps)
}

/// A node whose candidate moves are still being tried.
struct Frame {
    game: Game,
    steps: Vec<Step>,
    pending: std::vec::IntoIter<Step>,
}

/// Lazy, single-threaded search, see [`Solver::solutions_until`].
///
/// Solutions come out in depth first order of the candidate moves.
pub struct Solutions<F> {
    stopper: F,
    stack: Vec<Frame>,
    stats: SearchStats,
    reported: bool,
}

impl<F> Solutions<F>
where
    F: Fn(&[Step]) -> bool,
{
    fn new(game: Game, stopper: F) -> Self {
        let mut solutions = Solutions {
            stopper,
            stack: Vec::new(),
            stats: SearchStats::default(),
            reported: false,
        };
        solutions.enter(game, Vec::new());
        solutions
    }

    /// Pushes a node onto the stack unless it is aborted or has nothing to try.
    fn enter(&mut self, game: Game, steps: Vec<Step>) {
        if (self.stopper)(&steps) {
            self.stats.aborted += 1;
            trace!(depth = steps.len(), "branch aborted");
            return;
        }

        let moves = Mover::new(&game).possible_moves_after(steps.last().copied());
        self.stats.expanded += 1;
        if moves.is_empty() {
            self.stats.dead_ends += 1;
            trace!(depth = steps.len(), "dead end");
            return;
        }

        self.stack.push(Frame {
            game,
            steps,
            pending: moves.into_iter(),
        });
    }

    /// Returns the counters collected so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl<F> Iterator for Solutions<F>
where
    F: Fn(&[Step]) -> bool,
{
    type Item = Vec<Step>;

    fn next(&mut self) -> Option<Vec<Step>> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                if !self.reported {
                    self.reported = true;
                    debug!(
                        expanded = self.stats.expanded,
                        aborted = self.stats.aborted,
                        dead_ends = self.stats.dead_ends,
                        solutions = self.stats.solutions,
                        "search finished"
                    );
                }
                return None;
            };

            let Some(step) = frame.pending.next() else {
                self.stack.pop();
                continue;
            };

            let (next_game, next_steps) = child(&frame.game, &frame.steps, step);
            if next_game.is_solved() {
                self.stats.solutions += 1;
                debug!(steps = next_steps.len(), "solution found");
                return Some(next_steps);
            }
            self.enter(next_game, next_steps);
        }
    }
}
