//! Core game model for the tube sort puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Color`: The closed palette of tile colors.
//! - `Tile`: A colored quantity of a given size, mergeable with another tile of the same color.
//! - `Tube`: A capacity-bounded stack of tiles that owns collapsing and pour legality.
//! - `TubePair`: Two distinct tubes, used as the endpoints of a pour and as its result.
//! - `Game`: An immutable snapshot of all tubes. Snapshots derived by a pour share
//!   every untouched tube with their parent.
use crate::error::{Result, TubeSortError};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Represents the color of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    LightGreen,
    DarkGreen,
    LightBlue,
    DarkBlue,
    Pink,
    Violet,
    Grey,
}

impl Color {
    /// Every color of the palette, in declaration order.
    pub const ALL: [Color; 10] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::LightGreen,
        Color::DarkGreen,
        Color::LightBlue,
        Color::DarkBlue,
        Color::Pink,
        Color::Violet,
        Color::Grey,
    ];

    /// Converts the color to its character representation.
    ///
    /// This is used for text-based display and for parsing boards from text.
    ///
    /// # Examples
    ///
    /// ```
    /// use tubesort::engine::Color;
    /// assert_eq!(Color::Red.to_char(), 'R');
    /// assert_eq!(Color::from_char('r'), Some(Color::Red));
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
            Color::LightGreen => 'L',
            Color::DarkGreen => 'G',
            Color::LightBlue => 'C',
            Color::DarkBlue => 'B',
            Color::Pink => 'P',
            Color::Violet => 'V',
            Color::Grey => 'A',
        }
    }

    /// Parses the character produced by [`Color::to_char`], ignoring case.
    pub fn from_char(c: char) -> Option<Color> {
        let upper = c.to_ascii_uppercase();
        Color::ALL.into_iter().find(|color| color.to_char() == upper)
    }

    /// Returns the ANSI background color sequence (256 color mode) for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            Color::Red => "48;5;196",
            Color::Orange => "48;5;208",
            Color::Yellow => "48;5;226",
            Color::LightGreen => "48;5;120",
            Color::DarkGreen => "48;5;28",
            Color::LightBlue => "48;5;117",
            Color::DarkBlue => "48;5;19",
            Color::Pink => "48;5;213",
            Color::Violet => "48;5;93",
            Color::Grey => "48;5;244",
        }
    }
}

/// A colored quantity of a given size.
///
/// Tiles are plain values. Two tiles can only be combined when they have the
/// same color and are not the very same tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    size: u32,
    color: Color,
}

impl Tile {
    /// Creates a tile.
    ///
    /// # Errors
    /// Returns `TubeSortError::InvalidArgument` if `size` is zero.
    pub fn new(size: u32, color: Color) -> Result<Self> {
        if size == 0 {
            return Err(TubeSortError::InvalidArgument(
                "tile size must be positive".to_string(),
            ));
        }
        Ok(Tile { size, color })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Checks whether `other` is a different tile of the same color.
    ///
    /// # Examples
    /// ```
    /// use tubesort::engine::{Color, Tile};
    /// let one = Tile::new(1, Color::Red).unwrap();
    /// let two = Tile::new(2, Color::Red).unwrap();
    /// assert!(one.can_combine(&two));
    /// assert!(!one.can_combine(&one));
    /// ```
    pub fn can_combine(&self, other: &Tile) -> bool {
        !std::ptr::eq(self, other) && self.color == other.color
    }

    /// Combines two tiles into one tile of the same color and the summed size.
    ///
    /// # Errors
    /// Returns `TubeSortError::InvalidOperation` if the tiles cannot be combined.
    pub fn combine(&self, other: &Tile) -> Result<Tile> {
        if !self.can_combine(other) {
            return Err(TubeSortError::InvalidOperation(format!(
                "{} cannot be combined with {}",
                self, other
            )));
        }
        let size = self.size.checked_add(other.size).ok_or_else(|| {
            TubeSortError::InvalidOperation(format!("{} and {} are too large to combine", self, other))
        })?;
        Ok(Tile {
            size,
            color: self.color,
        })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.size, self.color.to_char())
    }
}

/// A capacity-bounded stack of tiles, stored bottom to top.
///
/// The stored tiles are always fully collapsed: no two adjacent tiles share a
/// color. Because of that, a tube built from `[1 red, 1 red]` is equal to a tube
/// built from `[2 red]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tube {
    capacity: u32,
    size: u32,
    tiles: Vec<Tile>,
}

impl Tube {
    /// Creates an empty tube.
    pub fn empty(capacity: u32) -> Result<Self> {
        Self::new(capacity, &[])
    }

    /// Creates a tube holding `tiles` (bottom to top), merging adjacent tiles of the same color.
    ///
    /// # Arguments
    /// * `capacity`: The maximum cumulative size of all tiles.
    /// * `tiles`: The tiles to hold, bottom first.
    ///
    /// # Errors
    /// * `TubeSortError::InvalidArgument` if `capacity` is zero.
    /// * `TubeSortError::CapacityExceeded` if the tiles do not fit.
    ///
    /// # Examples
    /// ```
    /// use tubesort::engine::{Color, Tile, Tube};
    /// let red = Tile::new(1, Color::Red).unwrap();
    /// let tube = Tube::new(3, &[red, red, red]).unwrap();
    /// assert_eq!(tube.tiles().len(), 1);
    /// assert!(tube.is_complete());
    /// ```
    pub fn new(capacity: u32, tiles: &[Tile]) -> Result<Self> {
        if capacity == 0 {
            return Err(TubeSortError::InvalidArgument(
                "tube capacity must be positive".to_string(),
            ));
        }

        let mut size: u32 = 0;
        let mut stored: Vec<Tile> = Vec::with_capacity(tiles.len());
        for tile in tiles {
            size = match size.checked_add(tile.size()) {
                Some(size) if size <= capacity => size,
                _ => {
                    return Err(TubeSortError::CapacityExceeded {
                        size: size.saturating_add(tile.size()),
                        capacity,
                    })
                }
            };

            match stored.last_mut() {
                Some(top) if top.can_combine(tile) => *top = top.combine(tile)?,
                _ => stored.push(*tile),
            }
        }

        Ok(Tube {
            capacity,
            size,
            tiles: stored,
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the cumulative size of all tiles.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the collapsed tiles, bottom first.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns the top tile, or `None` if the tube is empty.
    pub fn top(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    /// Checks whether the tube holds anything at all.
    pub fn is_filled(&self) -> bool {
        self.size > 0
    }

    /// Checks whether the tube holds exactly one tile that fills it to capacity.
    pub fn is_complete(&self) -> bool {
        self.tiles.len() == 1 && self.tiles[0].size() == self.capacity
    }

    /// Checks whether the top tile of this tube may be poured into `target`.
    ///
    /// All of the following must hold:
    /// 1. `target` is not this tube.
    /// 2. This tube is not empty.
    /// 3. This tube is not complete.
    /// 4. The pour would not move this whole tube into an empty target, which only swaps tubes.
    /// 5. `target` has room for the top tile.
    /// 6. `target` is empty or its top tile has the same color.
    pub fn can_pour_into(&self, target: &Tube) -> bool {
        if std::ptr::eq(self, target) {
            return false;
        }

        let Some(from) = self.top() else {
            return false;
        };

        if from.size() == self.capacity {
            return false;
        }

        let to = target.top();
        if to.is_none() && from.size() == self.size {
            return false;
        }

        if from.size() > target.capacity - target.size {
            return false;
        }

        to.map_or(true, |to| from.can_combine(to))
    }

    /// Pours the top tile of this tube into `target`.
    ///
    /// # Returns
    /// A `TubePair` holding the new state of this tube first and the new state of `target` second.
    ///
    /// # Errors
    /// Returns `TubeSortError::IllegalMove` if [`Tube::can_pour_into`] rejects the pour.
    pub fn pour_into(&self, target: &Tube) -> Result<TubePair> {
        if !self.can_pour_into(target) {
            return Err(TubeSortError::IllegalMove {
                from: self.to_string(),
                to: target.to_string(),
            });
        }

        let mut source_tiles = self.tiles.clone();
        let piece = source_tiles.pop().ok_or_else(|| {
            TubeSortError::InvariantViolation("legal pour from an empty tube".to_string())
        })?;

        let mut target_tiles = target.tiles.clone();
        match target_tiles.last_mut() {
            Some(top) if top.can_combine(&piece) => *top = top.combine(&piece)?,
            _ => target_tiles.push(piece),
        }

        let source = Tube {
            capacity: self.capacity,
            size: self.size - piece.size(),
            tiles: source_tiles,
        };
        let target = Tube {
            capacity: target.capacity,
            size: target.size + piece.size(),
            tiles: target_tiles,
        };

        TubePair::new(Arc::new(source), Arc::new(target))
    }

    /// Renders the tube with ANSI background colors, one cell per unit of size.
    pub fn to_colored_string(&self) -> String {
        let mut output = String::new();
        for tile in &self.tiles {
            let code = tile.color().to_ansi_color_code();
            for _ in 0..tile.size() {
                output.push_str(&format!("\x1b[{}m {} \x1b[0m", code, tile.color().to_char()));
            }
        }
        for _ in self.size..self.capacity {
            output.push_str(" . ");
        }
        output
    }
}

impl fmt::Display for Tube {
    /// Formats the tube as one character per unit of size, `.` for free space, e.g. `[RRB.]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for tile in &self.tiles {
            for _ in 0..tile.size() {
                write!(f, "{}", tile.color().to_char())?;
            }
        }
        for _ in self.size..self.capacity {
            write!(f, ".")?;
        }
        write!(f, "]")
    }
}

/// Two distinct tubes: the endpoints of a pour, or the result of one.
///
/// Distinctness is by identity, not by value; two equal but separately
/// allocated tubes form a valid pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TubePair {
    first: Arc<Tube>,
    second: Arc<Tube>,
}

impl TubePair {
    /// # Errors
    /// Returns `TubeSortError::InvalidArgument` if both references point at the same tube.
    pub fn new(first: Arc<Tube>, second: Arc<Tube>) -> Result<Self> {
        if Arc::ptr_eq(&first, &second) {
            return Err(TubeSortError::InvalidArgument(
                "a tube pair needs two different tubes".to_string(),
            ));
        }
        Ok(TubePair { first, second })
    }

    pub fn first(&self) -> &Arc<Tube> {
        &self.first
    }

    pub fn second(&self) -> &Arc<Tube> {
        &self.second
    }
}

/// An immutable snapshot of all tubes.
///
/// Tubes are held behind `Arc`, so a game derived by [`Game::pour`] copies the
/// list of references and replaces only the two tubes that changed.
///
/// # Examples
/// ```
/// use tubesort::engine::{Color, Game, Tile};
/// let red = Tile::new(1, Color::Red).unwrap();
/// let game = Game::new(2, &[vec![red], vec![red]]).unwrap();
/// assert!(!game.is_solved());
///
/// let next = game.pour(0, 1).unwrap();
/// assert!(next.is_solved());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Game {
    tubes: Vec<Arc<Tube>>,
}

impl Game {
    /// Creates a starting game from a raw layout, one tile list per tube.
    ///
    /// Empty lists add empty tubes. Every color must occur with a total size equal
    /// to `capacity`, otherwise no tube could ever be completed in that color.
    ///
    /// # Errors
    /// * `TubeSortError::ColorImbalance` if a color's total size differs from `capacity`.
    /// * Any error of [`Tube::new`].
    pub fn new<T: AsRef<[Tile]>>(capacity: u32, layout: &[T]) -> Result<Self> {
        let mut totals: BTreeMap<Color, u32> = BTreeMap::new();
        for tile in layout.iter().flat_map(|tiles| tiles.as_ref()) {
            let total = totals.entry(tile.color()).or_insert(0);
            *total = total.checked_add(tile.size()).ok_or(TubeSortError::ColorImbalance {
                color: tile.color(),
                total: u32::MAX,
                capacity,
            })?;
        }
        if let Some((&color, &total)) = totals.iter().find(|(_, total)| **total != capacity) {
            return Err(TubeSortError::ColorImbalance {
                color,
                total,
                capacity,
            });
        }

        let tubes = layout
            .iter()
            .map(|tiles| Tube::new(capacity, tiles.as_ref()).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Game { tubes })
    }

    /// Creates a game in a specific state. No color balance is checked.
    pub fn from_tubes<I: IntoIterator<Item = Tube>>(tubes: I) -> Self {
        Game {
            tubes: tubes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn tubes(&self) -> &[Arc<Tube>] {
        &self.tubes
    }

    /// Returns the tube at `index`.
    ///
    /// # Errors
    /// Returns `TubeSortError::IndexOutOfRange` if there is no such tube.
    pub fn tube(&self, index: usize) -> Result<&Arc<Tube>> {
        self.tubes
            .get(index)
            .ok_or(TubeSortError::IndexOutOfRange {
                index,
                len: self.tubes.len(),
            })
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    /// Returns true if no filled, incomplete tube is left over.
    pub fn is_solved(&self) -> bool {
        self.tubes
            .iter()
            .all(|tube| !tube.is_filled() || tube.is_complete())
    }

    /// Creates the game state reached by pouring tube `from` into tube `to`.
    ///
    /// # Errors
    /// * `TubeSortError::IndexOutOfRange` if either index is outside `0..tube_count()`.
    /// * `TubeSortError::InvalidArgument` if both indices are the same.
    /// * `TubeSortError::IllegalMove` if the pour is not allowed.
    pub fn pour(&self, from: usize, to: usize) -> Result<Game> {
        let source = self.tube(from)?;
        let target = self.tube(to)?;
        self.pour_pair(&TubePair::new(Arc::clone(source), Arc::clone(target))?)
    }

    /// Creates the game state reached by pouring the first tube of `pair` into the second.
    ///
    /// Both tubes must be part of this game, identified by reference.
    pub fn pour_pair(&self, pair: &TubePair) -> Result<Game> {
        for tube in [pair.first(), pair.second()] {
            if !self.tubes.iter().any(|t| Arc::ptr_eq(t, tube)) {
                return Err(TubeSortError::InvalidArgument(format!(
                    "{} is not part of this game",
                    tube
                )));
            }
        }

        let poured = pair.first().pour_into(pair.second())?;
        let tubes = self
            .tubes
            .iter()
            .map(|tube| {
                if Arc::ptr_eq(tube, pair.first()) {
                    Arc::clone(poured.first())
                } else if Arc::ptr_eq(tube, pair.second()) {
                    Arc::clone(poured.second())
                } else {
                    Arc::clone(tube)
                }
            })
            .collect();
        Ok(Game { tubes })
    }

    /// Generates a terminal representation of the game, one tube per line with its index.
    pub fn to_colored_string(&self) -> String {
        self.tubes
            .iter()
            .enumerate()
            .map(|(index, tube)| format!("{:<3}{}", index, tube.to_colored_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, tube) in self.tubes.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<3}{}", index, tube)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(size: u32, color: Color) -> Tile {
        Tile::new(size, color).unwrap()
    }

    fn tube(capacity: u32, tiles: &[Tile]) -> Tube {
        Tube::new(capacity, tiles).unwrap()
    }

    fn color_totals(game: &Game) -> BTreeMap<Color, u32> {
        let mut totals = BTreeMap::new();
        for t in game.tubes() {
            for tile in t.tiles() {
                *totals.entry(tile.color()).or_insert(0) += tile.size();
            }
        }
        totals
    }

    #[test]
    fn test_tile_rejects_zero_size() {
        assert!(matches!(
            Tile::new(0, Color::Red),
            Err(TubeSortError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_tile_can_combine() {
        let one = tile(1, Color::Red);
        let two = tile(2, Color::Red);
        let blue = tile(3, Color::DarkBlue);

        assert!(one.can_combine(&two));
        assert!(!one.can_combine(&one));
        assert!(!one.can_combine(&blue));
    }

    #[test]
    fn test_tile_combine() {
        let one = tile(1, Color::Red);
        let two = tile(2, Color::Red);
        let blue = tile(3, Color::DarkBlue);

        assert_eq!(one.combine(&two).unwrap(), tile(3, Color::Red));
        assert!(matches!(
            two.combine(&blue),
            Err(TubeSortError::InvalidOperation(_))
        ));
        assert!(matches!(
            one.combine(&one),
            Err(TubeSortError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_tube_construct_errors() {
        assert!(matches!(
            Tube::empty(0),
            Err(TubeSortError::InvalidArgument(_))
        ));
        assert!(matches!(
            Tube::new(1, &[tile(2, Color::Red)]),
            Err(TubeSortError::CapacityExceeded {
                size: 2,
                capacity: 1
            })
        ));
    }

    #[test]
    fn test_sizes_near_u32_max() {
        let huge = tile(u32::MAX, Color::Red);
        assert!(matches!(
            Tube::new(u32::MAX, &[huge, tile(1, Color::DarkBlue)]),
            Err(TubeSortError::CapacityExceeded {
                size: u32::MAX,
                capacity: u32::MAX
            })
        ));
        assert!(matches!(
            huge.combine(&tile(1, Color::Red)),
            Err(TubeSortError::InvalidOperation(_))
        ));
        assert!(matches!(
            Game::new(u32::MAX, &[vec![huge], vec![huge]]),
            Err(TubeSortError::ColorImbalance {
                color: Color::Red,
                capacity: u32::MAX,
                ..
            })
        ));

        let source = tube(u32::MAX, &[tile(u32::MAX - 2, Color::DarkBlue), tile(2, Color::Red)]);
        let target = tube(u32::MAX, &[tile(u32::MAX - 1, Color::Red)]);
        assert!(!source.can_pour_into(&target));
        assert!(matches!(
            source.pour_into(&target),
            Err(TubeSortError::IllegalMove { .. })
        ));
    }

    #[test]
    fn test_tube_collapsing() {
        let collapsed = tube(2, &[tile(2, Color::Red)]);
        let expanded = tube(2, &[tile(1, Color::Red), tile(1, Color::Red)]);
        assert_eq!(collapsed, expanded);

        let red = tile(1, Color::Red);
        let three = tube(4, &[tile(1, Color::DarkBlue), red, red, red]);
        assert_eq!(three.tiles(), &[tile(1, Color::DarkBlue), tile(3, Color::Red)]);
        assert_eq!(three.size(), 4);
    }

    #[test]
    fn test_tube_equality() {
        let empty = Tube::empty(1).unwrap();
        let filled = tube(2, &[tile(1, Color::Red)]);

        assert_eq!(empty, Tube::empty(1).unwrap());
        assert_eq!(filled, tube(2, &[tile(1, Color::Red)]));
        assert_ne!(empty, Tube::empty(2).unwrap());
        assert_ne!(filled, tube(2, &[tile(1, Color::DarkBlue)]));
    }

    #[test]
    fn test_tube_size_and_top() {
        assert_eq!(Tube::empty(2).unwrap().size(), 0);
        assert_eq!(tube(2, &[tile(1, Color::Red)]).size(), 1);
        assert_eq!(
            tube(2, &[tile(1, Color::Red), tile(1, Color::DarkBlue)]).size(),
            2
        );

        assert!(Tube::empty(1).unwrap().top().is_none());
        let top = tube(3, &[tile(1, Color::DarkBlue), tile(1, Color::Red)]);
        assert_eq!(top.top(), Some(&tile(1, Color::Red)));
    }

    #[test]
    fn test_tube_filled_and_complete() {
        assert!(tube(2, &[tile(1, Color::Red)]).is_filled());
        assert!(!Tube::empty(2).unwrap().is_filled());

        assert!(tube(1, &[tile(1, Color::Red)]).is_complete());
        assert!(!Tube::empty(1).unwrap().is_complete());
        assert!(!tube(2, &[tile(1, Color::Red), tile(1, Color::DarkBlue)]).is_complete());
    }

    #[test]
    fn test_tube_can_pour_into() {
        let empty = Tube::empty(2).unwrap();
        let full = tube(3, &[tile(1, Color::Red), tile(2, Color::DarkBlue)]);
        let filled = tube(2, &[tile(1, Color::Red)]);
        let complete = tube(2, &[tile(2, Color::Red)]);
        let pre_complete = tube(2, &[tile(1, Color::Red)]);

        assert!(full.can_pour_into(&empty));
        assert!(filled.can_pour_into(&pre_complete));

        assert!(!filled.can_pour_into(&filled), "self pour");
        assert!(!complete.can_pour_into(&empty), "source is complete");
        assert!(!filled.can_pour_into(&empty), "whole source into empty tube");
        assert!(!filled.can_pour_into(&complete), "target is complete");
        assert!(
            !full.can_pour_into(&tube(2, &[tile(1, Color::DarkBlue)])),
            "out of space"
        );
        assert!(
            !full.can_pour_into(&tube(3, &[tile(1, Color::Red)])),
            "color mismatch"
        );
        assert!(!empty.can_pour_into(&filled), "empty source");
    }

    #[test]
    fn test_tube_pour_into() {
        let empty = Tube::empty(2).unwrap();
        let full = tube(3, &[tile(1, Color::Red), tile(2, Color::DarkBlue)]);
        let filled = tube(2, &[tile(1, Color::Red)]);
        let complete = tube(2, &[tile(2, Color::Red)]);
        let pre_complete = tube(2, &[tile(1, Color::Red)]);

        for (source, target) in [
            (&filled, &filled),
            (&complete, &empty),
            (&filled, &empty),
            (&filled, &complete),
            (&full, &tube(2, &[tile(1, Color::DarkBlue)])),
            (&full, &tube(3, &[tile(1, Color::Red)])),
        ] {
            assert!(matches!(
                source.pour_into(target),
                Err(TubeSortError::IllegalMove { .. })
            ));
        }

        let poured = full.pour_into(&empty).unwrap();
        assert_eq!(**poured.first(), tube(3, &[tile(1, Color::Red)]));
        assert_eq!(**poured.second(), tube(2, &[tile(2, Color::DarkBlue)]));

        let merged = filled.pour_into(&pre_complete).unwrap();
        assert_eq!(**merged.first(), Tube::empty(2).unwrap());
        assert_eq!(**merged.second(), tube(2, &[tile(2, Color::Red)]));
        assert!(merged.second().is_complete());
    }

    #[test]
    fn test_tube_display() {
        let t = tube(4, &[tile(2, Color::Red), tile(1, Color::DarkBlue)]);
        assert_eq!(t.to_string(), "[RRB.]");
    }

    #[test]
    fn test_tube_pair_requires_distinct_tubes() {
        let t = Arc::new(Tube::empty(2).unwrap());
        assert!(matches!(
            TubePair::new(Arc::clone(&t), Arc::clone(&t)),
            Err(TubeSortError::InvalidArgument(_))
        ));
        // Equal values in different allocations are fine.
        assert!(TubePair::new(t, Arc::new(Tube::empty(2).unwrap())).is_ok());
    }

    #[test]
    fn test_game_rejects_color_imbalance() {
        // one blue tile is missing
        let result = Game::new(
            3,
            &[
                vec![tile(1, Color::Red), tile(2, Color::DarkBlue)],
                vec![tile(2, Color::Red)],
                vec![],
            ],
        );
        assert!(matches!(
            result,
            Err(TubeSortError::ColorImbalance {
                color: Color::DarkBlue,
                total: 2,
                capacity: 3
            })
        ));

        let too_large = Game::new(
            2,
            &[
                vec![tile(3, Color::Red)],
                vec![tile(1, Color::DarkBlue)],
                vec![tile(1, Color::DarkBlue)],
            ],
        );
        assert!(too_large.is_err());
    }

    #[test]
    fn test_game_rejects_overfull_tube() {
        let result = Game::new(
            2,
            &[
                vec![tile(1, Color::Red), tile(1, Color::DarkBlue), tile(1, Color::Red)],
                vec![tile(1, Color::DarkBlue)],
            ],
        );
        assert!(matches!(
            result,
            Err(TubeSortError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_game_new_collapses_layout() {
        let expected = Game::from_tubes([
            tube(3, &[tile(1, Color::Red), tile(1, Color::DarkBlue)]),
            tube(3, &[tile(2, Color::DarkBlue)]),
            tube(3, &[tile(2, Color::Red)]),
        ]);
        let actual = Game::new(
            3,
            &[
                vec![tile(1, Color::Red), tile(1, Color::DarkBlue)],
                vec![tile(1, Color::DarkBlue), tile(1, Color::DarkBlue)],
                vec![tile(2, Color::Red)],
            ],
        )
        .unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_game_pour() {
        let game = Game::from_tubes([
            tube(2, &[tile(1, Color::Red)]),
            tube(2, &[tile(1, Color::Red)]),
        ]);

        assert!(matches!(
            game.pour(0, 2),
            Err(TubeSortError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            game.pour(0, 0),
            Err(TubeSortError::InvalidArgument(_))
        ));

        let expected = Game::from_tubes([Tube::empty(2).unwrap(), tube(2, &[tile(2, Color::Red)])]);
        assert_eq!(game.pour(0, 1).unwrap(), expected);

        let flipped = Game::from_tubes([tube(2, &[tile(2, Color::Red)]), Tube::empty(2).unwrap()]);
        assert_eq!(game.pour(1, 0).unwrap(), flipped);

        let pair = TubePair::new(
            Arc::clone(&game.tubes()[1]),
            Arc::clone(&game.tubes()[0]),
        )
        .unwrap();
        assert_eq!(game.pour_pair(&pair).unwrap(), flipped);
    }

    #[test]
    fn test_game_pour_pair_rejects_foreign_tubes() {
        let game = Game::from_tubes([
            tube(2, &[tile(1, Color::Red)]),
            tube(2, &[tile(1, Color::Red)]),
        ]);
        let pair = TubePair::new(
            Arc::new(tube(2, &[tile(1, Color::Red)])),
            Arc::clone(&game.tubes()[1]),
        )
        .unwrap();
        assert!(matches!(
            game.pour_pair(&pair),
            Err(TubeSortError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_game_pour_shares_untouched_tubes() {
        let game = Game::from_tubes([
            tube(2, &[tile(1, Color::Red)]),
            tube(2, &[tile(1, Color::Red)]),
            tube(2, &[tile(2, Color::DarkBlue)]),
        ]);
        let next = game.pour(0, 1).unwrap();

        assert!(Arc::ptr_eq(&game.tubes()[2], &next.tubes()[2]));
        assert!(!Arc::ptr_eq(&game.tubes()[0], &next.tubes()[0]));
        // the parent is untouched
        assert_eq!(*game.tubes()[0], tube(2, &[tile(1, Color::Red)]));
    }

    #[test]
    fn test_game_pour_conserves_colors() {
        let game = Game::new(
            3,
            &[
                vec![tile(1, Color::Red), tile(2, Color::DarkBlue)],
                vec![tile(1, Color::DarkBlue), tile(2, Color::Red)],
                vec![],
            ],
        )
        .unwrap();
        let before = color_totals(&game);

        for (from, to) in [(0, 2), (1, 2), (0, 1)] {
            if game.tubes()[from].can_pour_into(&game.tubes()[to]) {
                let next = game.pour(from, to).unwrap();
                assert_eq!(color_totals(&next), before);
            } else {
                assert!(game.pour(from, to).is_err());
            }
        }
    }

    #[test]
    fn test_game_is_solved() {
        assert!(!Game::from_tubes([
            tube(2, &[tile(1, Color::Red)]),
            tube(2, &[tile(1, Color::Red)]),
        ])
        .is_solved());

        assert!(Game::from_tubes([tube(2, &[tile(2, Color::Red)]), Tube::empty(2).unwrap()]).is_solved());
    }

    #[test]
    fn test_game_display() {
        let game = Game::from_tubes([tube(2, &[tile(2, Color::Red)]), Tube::empty(2).unwrap()]);
        assert_eq!(game.to_string(), "0  [RR]\n1  [..]");
    }
}
