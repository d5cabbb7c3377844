use super::cursor::CursorMap;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

pub const SIZE_RANGE: RangeInclusive<usize> = 5..=17;

/// Separates the label column from the cells in a rendered row
pub const LABEL_GAP: &str = "      ";
/// Zero-width space between cells keeps Discord from merging neighbouring emojis
pub const CELL_SEPARATOR: char = '\u{200b}';

/// A cell position, `(row, col)`
pub type Cell = (usize, usize);

/// Grid of emoji cells.  Dimensions are fixed once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    background: String,
    // Row-major
    cells: Vec<String>,
}

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl Rect {
    pub fn single(cell: Cell) -> Self {
        Self::spanning(cell, cell)
    }

    /// Smallest rectangle with `a` and `b` as corners
    pub fn spanning(a: Cell, b: Cell) -> Self {
        Self {
            min_row: a.0.min(b.0),
            max_row: a.0.max(b.0),
            min_col: a.1.min(b.1),
            max_col: a.1.max(b.1),
        }
    }

    pub fn contains(&self, (row, col): Cell) -> bool {
        (self.min_row..=self.max_row).contains(&row) && (self.min_col..=self.max_col).contains(&col)
    }

    pub fn contains_row(&self, row: usize) -> bool {
        (self.min_row..=self.max_row).contains(&row)
    }

    pub fn contains_col(&self, col: usize) -> bool {
        (self.min_col..=self.max_col).contains(&col)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.min_row..=self.max_row)
            .flat_map(move |row| (self.min_col..=self.max_col).map(move |col| (row, col)))
    }
}

fn check_size(what: &str, size: usize) -> Result<()> {
    if SIZE_RANGE.contains(&size) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{} must be atleast {} and atmost {}",
            what,
            SIZE_RANGE.start(),
            SIZE_RANGE.end()
        )))
    }
}

impl Board {
    pub fn new(background: &str, height: usize, width: usize) -> Result<Self> {
        check_size("Height", height)?;
        check_size("Width", width)?;

        Ok(Self {
            height,
            width,
            background: background.to_owned(),
            cells: vec![background.to_owned(); height * width],
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    /// Default cursor position
    pub fn center(&self) -> Cell {
        (self.height / 2, self.width / 2)
    }

    pub fn get(&self, (row, col): Cell) -> &str {
        &self.cells[row * self.width + col]
    }

    pub fn set(&mut self, (row, col): Cell, value: &str) {
        let cell = &mut self.cells[row * self.width + col];
        if cell != value {
            *cell = value.to_owned();
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.width)
    }

    pub fn clear(&mut self) {
        let background = self.background.clone();
        self.cells.fill(background);
    }

    /// Clamp a signed position onto the board
    pub fn clamp(&self, row: isize, col: isize) -> Cell {
        (
            row.clamp(0, self.height as isize - 1) as usize,
            col.clamp(0, self.width as isize - 1) as usize,
        )
    }

    /// Rebuild a board from the cell lines of a rendered drawing, stripping cursor highlights.
    /// Header and label columns are ignored.
    pub fn parse(rendered: &str, cursor: &CursorMap, background: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument("That does not look like a drawing board.".to_owned());

        // Header line, blank line, then one line per row
        let mut rows: Vec<Vec<String>> = Vec::new();
        for line in rendered.lines().skip(2) {
            let (_, cells) = line.split_once(LABEL_GAP).ok_or_else(invalid)?;
            rows.push(
                cells
                    .split(CELL_SEPARATOR)
                    .map(|value| cursor.unhighlight(value).to_owned())
                    .collect(),
            );
        }

        let height = rows.len();
        let width = rows.first().map(Vec::len).ok_or_else(invalid)?;
        if rows.iter().any(|row| row.len() != width) {
            return Err(invalid());
        }

        let mut board = Board::new(background, height, width)?;
        board.cells = rows.into_iter().flatten().collect();
        Ok(board)
    }
}
