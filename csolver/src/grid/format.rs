//! Textual maze format.
//!
//! ```text
//! 3 2
//! o.#
//! ..*
//! ```
//!
//! The header holds the inner width and height, the border is not part of the file and is
//! added back when parsing.

use std::{fmt, str::FromStr};

use thiserror::Error;

use super::{Block, Grid, GridError};
use crate::dims::Dims;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("maze file is empty, missing the size header")]
    MissingHeader,
    #[error("line 1: expected \"<width> <height>\", got {0:?}")]
    BadHeader(String),
    #[error("line {line}: missing row, expected {expected} rows")]
    MissingRow { line: usize, expected: usize },
    #[error("line {line}: row has {found} cells, expected {expected}")]
    ShortRow {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

fn parse_header(line: &str) -> Result<(usize, usize), FormatError> {
    let bad = || FormatError::BadHeader(line.to_string());

    let mut parts = line.split_whitespace();
    let width = parts.next().and_then(|w| w.parse().ok()).ok_or_else(bad)?;
    let height = parts.next().and_then(|h| h.parse().ok()).ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }

    Ok((width, height))
}

impl FromStr for Grid {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let header = lines.next().ok_or(FormatError::MissingHeader)?;
        let (width, height) = parse_header(header)?;

        let padded = width.checked_add(2).zip(height.checked_add(2));
        let (outer_w, outer_h) = padded.ok_or_else(|| FormatError::BadHeader(header.to_string()))?;
        let mut grid = Grid::new(outer_w, outer_h)?;

        for y in 0..height {
            let line = y + 2;
            let row = lines.next().ok_or(FormatError::MissingRow {
                line,
                expected: height,
            })?;
            let row = row.strip_suffix('\r').unwrap_or(row);

            let mut found = 0;
            for (x, c) in row.chars().take(width).enumerate() {
                grid.set(Dims(x as i32 + 1, y as i32 + 1), Block::from_char(c))?;
                found += 1;
            }

            if found < width {
                return Err(FormatError::ShortRow {
                    line,
                    found,
                    expected: width,
                });
            }
        }

        Ok(grid)
    }
}

impl fmt::Display for Grid {
    /// Writes only the inside of the border, so the output parses back into the same grid.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner_w = self.width().saturating_sub(2);
        let inner_h = self.height().saturating_sub(2);
        writeln!(f, "{} {}", inner_w, inner_h)?;

        for row in self.rows().skip(1).take(inner_h) {
            let line: String = row
                .iter()
                .skip(1)
                .take(inner_w)
                .map(|b| b.to_char())
                .collect();
            writeln!(f, "{}", line)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "3 2\no.#\n..*\n";

    #[test]
    fn parse_pads_border() {
        let grid: Grid = SMALL.parse().unwrap();
        assert_eq!(grid.size(), Dims(5, 4));
        assert_eq!(grid.block(Dims(1, 1)), Block::Start);
        assert_eq!(grid.block(Dims(3, 1)), Block::Wall);
        assert_eq!(grid.block(Dims(3, 2)), Block::Finish);
        assert_eq!(grid.block(Dims(0, 0)), Block::Wall);
        assert_eq!(grid.block(Dims(4, 3)), Block::Wall);
    }

    #[test]
    fn display_parses_back() {
        let grid: Grid = SMALL.parse().unwrap();
        assert_eq!(grid.to_string(), SMALL);
        let again: Grid = grid.to_string().parse().unwrap();
        assert_eq!(again, grid);
    }

    #[test]
    fn crlf_and_long_rows() {
        let grid: Grid = "2 1\r\n.*##\r\n".parse().unwrap();
        assert_eq!(grid.block(Dims(1, 1)), Block::Empty);
        assert_eq!(grid.block(Dims(2, 1)), Block::Finish);
        assert_eq!(grid.block(Dims(3, 1)), Block::Wall);
    }

    #[test]
    fn malformed() {
        assert_eq!("".parse::<Grid>(), Err(FormatError::MissingHeader));
        assert!(matches!(
            "3\n...".parse::<Grid>(),
            Err(FormatError::BadHeader(_))
        ));
        assert!(matches!(
            "a b\n".parse::<Grid>(),
            Err(FormatError::BadHeader(_))
        ));
        assert_eq!(
            "2 2\n..\n".parse::<Grid>(),
            Err(FormatError::MissingRow {
                line: 3,
                expected: 2
            })
        );
        assert_eq!(
            "3 1\n.o\n".parse::<Grid>(),
            Err(FormatError::ShortRow {
                line: 2,
                found: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn oversized() {
        assert!(matches!(
            "1001 1\n".parse::<Grid>(),
            Err(FormatError::Grid(GridError::Oversized { .. }))
        ));
    }

    #[test]
    fn header_at_usize_max() {
        let header = "18446744073709551615 1";
        assert_eq!(
            format!("{}\n.\n", header).parse::<Grid>(),
            Err(FormatError::BadHeader(header.to_string()))
        );
        assert!(matches!(
            "1 18446744073709551615\n.\n".parse::<Grid>(),
            Err(FormatError::BadHeader(_))
        ));
    }
}
