//! # Tube Sort Solver Library
//!
//! This library models the tube sort puzzle, where colored tiles spread over
//! capacity-limited tubes have to be poured around until every tube is either
//! empty or completely filled with one color, and searches for sequences of
//! pours that solve it.
//!
//! It is used by the `tube_sort` binary, which takes level names (optionally
//! with a step limit) and prints the shortest solutions found.
//!
//! ## Modules
//! - `engine`: The game model: colors (`Color`), tiles (`Tile`), tubes (`Tube`),
//!   tube pairs (`TubePair`) and immutable game snapshots (`Game`).
//! - `mover`: Steps (`Step`) and the pruned generation of candidate moves (`Mover`).
//! - `solver`: The bounded depth first search (`Solver`), lazy or on the rayon pool.
//! - `collector`: Reduction of the solver output to the shortest solutions.
//! - `levels`: Fixed, random and file based starting positions.
//! - `utils`: Parsing of games from their text form.
//! - `error`: The crate wide error type.

pub mod collector;
pub mod engine;
pub mod error;
pub mod levels;
pub mod mover;
pub mod solver;
pub mod utils;

pub use collector::ShortestCollector;
pub use engine::{Color, Game, Tile, Tube, TubePair};
pub use error::{Result, TubeSortError};
pub use levels::{parse_level_arg, BoardFileLevel, EasyLevel, HardLevel, Level, LevelArg, RandomLevel};
pub use mover::{Mover, Step};
pub use solver::{SearchStats, Solutions, Solver, SolverConfig, DEFAULT_MAX_STEPS};
