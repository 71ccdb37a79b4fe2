use crate::engine::{Color, Game, Tile};
use crate::error::{Result, TubeSortError};

/// Parses an array of string slices into a starting `Game`.
///
/// Each string slice describes one tube, bottom first, with one character per
/// unit of color. A row consisting of `-` describes an empty tube. Whitespace
/// around a row is ignored.
///
/// Valid characters for colors are the ones produced by [`Color::to_char`],
/// in either case:
/// `R` red, `O` orange, `Y` yellow, `L` light green, `G` dark green,
/// `C` light blue, `B` dark blue, `P` pink, `V` violet, `A` grey.
///
/// The tube capacity is the total size of the first color that occurs. All
/// other colors must then occur equally often, see [`Game::new`].
///
/// # Returns
/// * `Ok(Game)` if parsing and validation succeed.
/// * `Err(TubeSortError::Parse)` if a row is blank, a character is not a color,
///   or no tile occurs at all.
/// * Any error of [`Game::new`] if the layout is invalid.
///
/// # Examples
/// ```
/// use tubesort::utils::game_from_str_array;
///
/// let game = game_from_str_array(&["RB", "BR", "-", "-"]).unwrap();
/// assert_eq!(game.tube_count(), 4);
/// assert_eq!(game.tubes()[0].capacity(), 2);
///
/// assert!(game_from_str_array(&["RX"]).is_err());
/// assert!(game_from_str_array(&["RRB", "B"]).is_err()); // the first tube overflows
/// ```
pub fn game_from_str_array(rows: &[&str]) -> Result<Game> {
    let mut layout: Vec<Vec<Tile>> = Vec::with_capacity(rows.len());

    for (r, row) in rows.iter().enumerate() {
        let row = row.trim();
        if row.is_empty() {
            return Err(TubeSortError::Parse(format!("row {} is blank", r)));
        }
        if row == "-" {
            layout.push(Vec::new());
            continue;
        }

        let tiles = row
            .chars()
            .enumerate()
            .map(|(c, ch)| {
                let color = Color::from_char(ch).ok_or_else(|| {
                    TubeSortError::Parse(format!(
                        "Unrecognized character '{}' in row {} col {}",
                        ch, r, c
                    ))
                })?;
                Tile::new(1, color)
            })
            .collect::<Result<Vec<_>>>()?;
        layout.push(tiles);
    }

    let first_color = layout
        .iter()
        .flatten()
        .next()
        .map(Tile::color)
        .ok_or_else(|| TubeSortError::Parse("the board holds no tiles".to_string()))?;
    let capacity = layout
        .iter()
        .flatten()
        .filter(|tile| tile.color() == first_color)
        .map(Tile::size)
        .sum();

    Game::new(capacity, &layout)
}
