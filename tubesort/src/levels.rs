//! Starting positions for the solver.
//!
//! A `Level` produces one starting `Game`. Two fixed layouts, a random layout
//! and layouts loaded from text files are provided, together with the parser
//! for the `<level>[:<steps>]` arguments of the command line.

use crate::engine::{Color, Game, Tile};
use crate::error::{Result, TubeSortError};
use crate::utils::game_from_str_array;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source of starting games.
pub trait Level: fmt::Debug + Send + Sync {
    /// A short human readable name.
    fn name(&self) -> &str;

    /// Creates the starting game.
    fn create_game(&self) -> Result<Game>;
}

/// Builds a game from `(size, color)` pairs, one slice per tube.
fn game_from_layout(capacity: u32, layout: &[&[(u32, Color)]]) -> Result<Game> {
    let tiles = layout
        .iter()
        .map(|tube| {
            tube.iter()
                .map(|&(size, color)| Tile::new(size, color))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Game::new(capacity, &tiles)
}

/// A small level which is solved quickly.
#[derive(Debug, Clone, Copy, Default)]
pub struct EasyLevel;

impl Level for EasyLevel {
    fn name(&self) -> &str {
        "easy"
    }

    fn create_game(&self) -> Result<Game> {
        use Color::*;
        game_from_layout(
            4,
            &[
                &[(2, Orange), (1, Red), (1, DarkBlue)],
                &[(1, Orange), (1, DarkBlue), (1, Red), (1, DarkBlue)],
                &[(1, Orange), (1, Red), (1, DarkBlue), (1, Red)],
                &[],
                &[],
            ],
        )
    }
}

/// A level with ten colors which needs a fair number of steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardLevel;

impl Level for HardLevel {
    fn name(&self) -> &str {
        "hard"
    }

    fn create_game(&self) -> Result<Game> {
        use Color::*;
        game_from_layout(
            4,
            &[
                &[(1, LightBlue), (1, Violet), (1, LightBlue), (1, Grey)],
                &[(1, Yellow), (1, DarkBlue), (1, Red), (1, Grey)],
                &[(2, Pink), (1, LightGreen), (1, LightBlue)],
                &[(1, Grey), (1, Orange), (1, DarkBlue), (1, Red)],
                &[(1, Orange), (1, DarkGreen), (1, LightBlue), (1, Yellow)],
                &[(1, DarkBlue), (1, Red), (1, Violet), (1, LightGreen)],
                &[(1, Violet), (1, Grey), (1, LightGreen), (1, Red)],
                &[(1, LightGreen), (1, Violet), (2, DarkGreen)],
                &[(2, Orange), (1, Pink), (1, Yellow)],
                &[(1, DarkBlue), (1, DarkGreen), (1, Pink), (1, Yellow)],
                &[],
                &[],
            ],
        )
    }
}

/// A shuffled level which may not be solvable at all.
///
/// The tube size `n` is drawn from `2..Color::ALL.len()`. The first `n` colors
/// contribute `n` unit tiles each; they are shuffled into `n` full tubes and two
/// empty tubes are added.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomLevel {
    seed: Option<u64>,
}

impl RandomLevel {
    /// Creates a random level drawing from OS entropy.
    pub fn new() -> Self {
        RandomLevel { seed: None }
    }

    /// Creates a random level that always produces the same game for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        RandomLevel { seed: Some(seed) }
    }
}

impl Level for RandomLevel {
    fn name(&self) -> &str {
        "random"
    }

    fn create_game(&self) -> Result<Game> {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let tube_size = rng.gen_range(2..Color::ALL.len());
        let mut tiles = (0..tube_size * tube_size)
            .map(|i| Tile::new(1, Color::ALL[i % tube_size]))
            .collect::<Result<Vec<_>>>()?;
        tiles.shuffle(&mut rng);

        let mut layout: Vec<Vec<Tile>> = tiles.chunks(tube_size).map(<[Tile]>::to_vec).collect();
        layout.push(Vec::new());
        layout.push(Vec::new());

        let game = Game::new(tube_size as u32, &layout)?;
        debug!(tube_size, seed = ?self.seed, "created random level");
        Ok(game)
    }
}

/// A level read from a text file in the format of [`game_from_str_array`].
///
/// Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone)]
pub struct BoardFileLevel {
    path: PathBuf,
    name: String,
}

impl BoardFileLevel {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        BoardFileLevel { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Level for BoardFileLevel {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_game(&self) -> Result<Game> {
        let content = fs::read_to_string(&self.path)?;
        let rows: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        game_from_str_array(&rows)
    }
}

/// A level together with the step bound it should be solved within.
#[derive(Debug)]
pub struct LevelArg {
    pub level: Box<dyn Level>,
    pub max_steps: usize,
}

/// Parses a `<level>[:<steps>]` argument.
///
/// `level` is `easy`, `hard` or `random` (in any case) or the path of an existing
/// board file. Without `:<steps>`, `default_steps` is used. Random levels use `seed`
/// when one is given.
///
/// # Examples
/// ```
/// use tubesort::levels::parse_level_arg;
///
/// let arg = parse_level_arg("Hard:12", 10, None).unwrap();
/// assert_eq!(arg.level.name(), "hard");
/// assert_eq!(arg.max_steps, 12);
///
/// assert!(parse_level_arg("easy:many", 10, None).is_err());
/// ```
pub fn parse_level_arg(arg: &str, default_steps: usize, seed: Option<u64>) -> Result<LevelArg> {
    let arg = arg.trim();
    let (name, steps) = match arg.split_once(':') {
        Some((name, steps)) => (name, Some(steps)),
        None => (arg, None),
    };

    let level: Box<dyn Level> = match name.to_lowercase().as_str() {
        "easy" => Box::new(EasyLevel),
        "hard" => Box::new(HardLevel),
        "random" => Box::new(match seed {
            Some(seed) => RandomLevel::with_seed(seed),
            None => RandomLevel::new(),
        }),
        _ if Path::new(name).is_file() => Box::new(BoardFileLevel::new(name)),
        _ => {
            return Err(TubeSortError::Parse(format!(
                "{} is not a valid level name",
                arg
            )))
        }
    };

    let max_steps = match steps {
        Some(steps) => steps.trim().parse::<usize>().map_err(|err| {
            TubeSortError::Parse(format!("invalid step count in {}: {}", arg, err))
        })?,
        None => default_steps,
    };

    Ok(LevelArg { level, max_steps })
}
