use super::{
    board::{Board, Cell, Rect},
    colour::Rgba,
    cursor::CursorMap,
    palette::{AddOutcome, Palette, PaletteEntry},
    render::render,
};
use crate::error::{Error, Result};
use serenity::all::UserId;

/// A button press (or menu choice) on a drawing board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawAction {
    Move { d_row: isize, d_col: isize },
    /// Paint the selection with the active value
    Paint,
    Erase,
    ToggleFill,
    ToggleAutoPaint,
    Clear,
    SetPaintValue(String),
    AddPaletteEntry(PaletteEntry),
    /// Jump to a cell named like `A1`, `A` or `10`
    Goto(String),
}

/// One user's drawing board and everything about how they are editing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSession {
    pub owner: UserId,
    board: Board,
    palette: Palette,
    cursor: Cell,
    /// Set while fill mode is on
    anchor: Option<Cell>,
    auto_paint: bool,
    paint_value: String,
}

impl DrawSession {
    pub fn new(owner: UserId, board: Board) -> Self {
        let palette = Palette::new(board.background());
        Self::with_palette(owner, board, palette)
    }

    pub fn with_palette(owner: UserId, board: Board, palette: Palette) -> Self {
        Self {
            owner,
            cursor: board.center(),
            paint_value: board.background().to_owned(),
            board,
            palette,
            anchor: None,
            auto_paint: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    pub fn paint_value(&self) -> &str {
        &self.paint_value
    }

    pub fn is_filling(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn is_auto_painting(&self) -> bool {
        self.auto_paint
    }

    /// Cells the next paint applies to
    pub fn selection(&self) -> Rect {
        match self.anchor {
            Some(anchor) => Rect::spanning(anchor, self.cursor),
            None => Rect::single(self.cursor),
        }
    }

    /// Apply `action`, keeping the result only if it still renders within `max_chars`.
    /// Returns whether anything visible changed.
    pub fn apply(&mut self, action: DrawAction, cursor: &CursorMap, max_chars: usize) -> Result<bool> {
        let backup = self.clone();

        let changed = match action {
            DrawAction::Move { d_row, d_col } => self.move_cursor(d_row, d_col),
            DrawAction::Paint => {
                let value = self.paint_value.clone();
                self.paint(&value)
            }
            DrawAction::Erase => self.erase(),
            DrawAction::ToggleFill => {
                self.toggle_fill();
                true
            }
            DrawAction::ToggleAutoPaint => {
                self.toggle_auto_paint();
                true
            }
            DrawAction::Clear => {
                self.clear();
                true
            }
            DrawAction::SetPaintValue(value) => self.set_paint_value(&value)?,
            DrawAction::AddPaletteEntry(entry) => {
                let value = entry.value.clone();
                match self.add_palette_entry(entry) {
                    AddOutcome::AlreadyExists => self.set_paint_value(&value)?,
                    _ => true,
                }
            }
            DrawAction::Goto(cell) => self.goto(&cell)?,
        };

        let len = render(self, cursor, true).chars().count();
        if len > max_chars {
            *self = backup;
            return Err(Error::SizeLimitExceeded { len, max: max_chars });
        }

        Ok(changed)
    }

    /// Move by a delta, stopping at the edges.  Grows the selection in fill mode and paints it
    /// with auto-paint on.
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) -> bool {
        let (row, col) = self.cursor;
        let target = self.board.clamp(
            (row as isize).saturating_add(d_row),
            (col as isize).saturating_add(d_col),
        );
        let moved = target != self.cursor;
        self.cursor = target;

        if self.auto_paint {
            let value = self.paint_value.clone();
            self.paint(&value);
        }

        moved || self.auto_paint
    }

    /// Paint the selection.  Returns false when nothing needed to change.
    pub fn paint(&mut self, value: &str) -> bool {
        let selection = self.selection();
        if !self.auto_paint && selection.cells().all(|cell| self.board.get(cell) == value) {
            return false;
        }

        for cell in selection.cells() {
            self.board.set(cell, value);
        }
        true
    }

    pub fn erase(&mut self) -> bool {
        let background = self.board.background().to_owned();
        self.paint(&background)
    }

    pub fn toggle_fill(&mut self) {
        self.anchor = match self.anchor {
            Some(_) => None,
            None => Some(self.cursor),
        };
    }

    pub fn toggle_auto_paint(&mut self) {
        self.auto_paint = !self.auto_paint;
    }

    /// Back to a blank board with the cursor centred and both modes off
    pub fn clear(&mut self) {
        self.board.clear();
        self.cursor = self.board.center();
        self.anchor = None;
        self.auto_paint = false;
    }

    pub fn set_paint_value(&mut self, value: &str) -> Result<bool> {
        if !self.palette.contains(value) || value == super::palette::ADD_EMOJI_VALUE {
            return Err(Error::InvalidArgument(format!(
                "{} is not in the palette",
                value
            )));
        }

        if self.paint_value == value {
            return Ok(false);
        }
        self.paint_value = value.to_owned();
        Ok(true)
    }

    /// Add an entry to the palette.  New entries become the active paint value.
    pub fn add_palette_entry(&mut self, entry: PaletteEntry) -> AddOutcome {
        let value = entry.value.clone();
        let outcome = self.palette.add(entry);
        if outcome != AddOutcome::AlreadyExists {
            self.paint_value = value;
        }
        outcome
    }

    /// Average colour of several palette values.  Every value needs a known colour.
    pub fn mix(&self, values: &[String]) -> Result<Rgba> {
        if values.len() < 2 {
            return Err(Error::InvalidArgument(
                "Pick at least two colours to mix.".to_owned(),
            ));
        }

        let colours = values
            .iter()
            .map(|value| {
                self.palette
                    .get(value)
                    .and_then(|entry| entry.colour)
                    .ok_or_else(|| Error::InvalidArgument(format!("{} cannot be mixed", value)))
            })
            .collect::<Result<Vec<Rgba>>>()?;

        Rgba::mix(&colours).ok_or_else(|| Error::InvalidArgument("Nothing to mix.".to_owned()))
    }

    /// Move to a named cell: `A1` (row letter, column number), `A` (row only) or `10` (column
    /// only).
    pub fn goto(&mut self, cell: &str) -> Result<bool> {
        let (row, col) = parse_cell(cell, self.board.height(), self.board.width())?;
        let row = row.unwrap_or(self.cursor.0);
        let col = col.unwrap_or(self.cursor.1);
        Ok(self.move_cursor(
            row as isize - self.cursor.0 as isize,
            col as isize - self.cursor.1 as isize,
        ))
    }
}

/// Parse a cell name into optional row and column indices within the board
pub fn parse_cell(cell: &str, height: usize, width: usize) -> Result<(Option<usize>, Option<usize>)> {
    let aborted = || Error::InvalidArgument("Aborted.".to_owned());

    let cell = cell.trim().to_ascii_uppercase();
    let (letter, digits) = match cell.chars().next() {
        Some(c) if c.is_ascii_uppercase() => (Some(c), &cell[1..]),
        Some(_) => (None, cell.as_str()),
        None => return Err(aborted()),
    };

    let row = match letter {
        Some(c) => {
            let row = (c as u8 - b'A') as usize;
            if row >= height {
                return Err(aborted());
            }
            Some(row)
        }
        None => None,
    };

    let col = if digits.is_empty() {
        None
    } else {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(aborted());
        }
        let col: usize = digits.parse().map_err(|_| aborted())?;
        if col >= width {
            return Err(aborted());
        }
        Some(col)
    };

    if row.is_none() && col.is_none() {
        return Err(aborted());
    }
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_LIMIT: usize = usize::MAX;

    fn session(height: usize, width: usize) -> DrawSession {
        DrawSession::new(UserId::new(1), Board::new("⬜", height, width).unwrap())
    }

    #[test]
    fn starts_centred_with_background_paint() {
        let s = session(9, 9);
        assert_eq!(s.cursor(), (4, 4));
        assert_eq!(s.paint_value(), "⬜");
        assert_eq!(s.selection(), Rect::single((4, 4)));
    }

    #[test]
    fn moves_clamp_to_the_edge() {
        let mut s = session(9, 9);
        s.move_cursor(-10, 0);
        assert_eq!(s.cursor(), (0, 4));
        assert!(!s.move_cursor(-1, 0));
        s.move_cursor(isize::MAX, isize::MIN);
        assert_eq!(s.cursor(), (8, 0));
    }

    #[test]
    fn cursor_never_leaves_the_board() {
        let mut s = session(5, 12);
        let moves = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1), (7, -30)];
        for i in 0..500 {
            let (d_row, d_col) = moves[(i * 7) % moves.len()];
            s.move_cursor(d_row, d_col);
            let (row, col) = s.cursor();
            assert!(row < 5 && col < 12);
        }
    }

    #[test]
    fn fill_selection_spans_anchor_and_cursor() {
        let mut s = session(9, 9);
        s.toggle_fill();
        assert!(s.is_filling());
        for (d_row, d_col) in [(1, 1), (1, 1), (-5, 0), (0, -9), (20, 20)] {
            s.move_cursor(d_row, d_col);
            let rect = s.selection();
            assert!(rect.min_row <= rect.max_row && rect.min_col <= rect.max_col);
            assert!(rect.contains((4, 4)));
            assert!(rect.contains(s.cursor()));
        }

        s.toggle_fill();
        assert_eq!(s.selection(), Rect::single(s.cursor()));
    }

    #[test]
    fn fill_paints_rectangle() {
        let mut s = session(9, 9);
        s.set_paint_value("🟥").unwrap();
        s.toggle_fill();
        s.move_cursor(2, 1);
        assert!(s.paint("🟥"));

        for row in 0..9 {
            for col in 0..9 {
                let expected = if (4..=6).contains(&row) && (4..=5).contains(&col) {
                    "🟥"
                } else {
                    "⬜"
                };
                assert_eq!(s.board().get((row, col)), expected);
            }
        }
    }

    #[test]
    fn paint_is_a_no_op_when_nothing_changes() {
        let mut s = session(9, 9);
        assert!(!s.paint("⬜"));
        assert!(s.paint("🟩"));
        assert!(!s.paint("🟩"));
        assert!(s.erase());
        assert_eq!(s.board().get((4, 4)), "⬜");
        assert!(!s.erase());
    }

    #[test]
    fn auto_paint_paints_along_the_path() {
        let mut s = session(9, 9);
        s.set_paint_value("🟦").unwrap();
        s.toggle_auto_paint();
        s.move_cursor(0, 1);
        s.move_cursor(0, 1);
        assert_eq!(s.board().get((4, 4)), "⬜");
        assert_eq!(s.board().get((4, 5)), "🟦");
        assert_eq!(s.board().get((4, 6)), "🟦");

        // Even against the edge the press still paints
        let mut s = session(5, 5);
        s.set_paint_value("🟦").unwrap();
        s.move_cursor(-9, 0);
        s.toggle_auto_paint();
        assert!(s.move_cursor(-1, 0));
        assert_eq!(s.board().get((0, 2)), "🟦");
    }

    #[test]
    fn clear_resets_board_cursor_and_modes() {
        let mut s = session(7, 9);
        s.set_paint_value("🟫").unwrap();
        s.toggle_fill();
        s.toggle_auto_paint();
        s.move_cursor(2, 2);
        s.clear();
        assert_eq!(s.cursor(), (3, 4));
        assert!(!s.is_filling() && !s.is_auto_painting());
        assert!(s.board().rows().flatten().all(|cell| cell == "⬜"));
        // Palette choice survives
        assert_eq!(s.paint_value(), "🟫");
    }

    #[test]
    fn paint_value_must_be_in_palette() {
        let mut s = session(9, 9);
        assert!(s.set_paint_value("🐢").is_err());
        assert!(s.set_paint_value("emoji").is_err());
        assert_eq!(s.set_paint_value("🟨"), Ok(true));
        assert_eq!(s.set_paint_value("🟨"), Ok(false));
    }

    #[test]
    fn added_entries_become_active() {
        let mut s = session(9, 9);
        let turtle = PaletteEntry {
            label: "turtle".to_owned(),
            value: "🐢".to_owned(),
            colour: None,
        };
        assert_eq!(s.add_palette_entry(turtle.clone()), AddOutcome::Added);
        assert_eq!(s.paint_value(), "🐢");
        s.set_paint_value("🟥").unwrap();
        assert_eq!(s.add_palette_entry(turtle), AddOutcome::AlreadyExists);
        assert_eq!(s.paint_value(), "🟥");
    }

    #[test]
    fn mixing_palette_colours() {
        let s = session(9, 9);
        let mixed = s.mix(&["🟥".to_owned(), "🟦".to_owned()]).unwrap();
        assert_eq!(mixed, Rgba::rgb(153, 109, 153));
        assert!(s.mix(&["🟥".to_owned()]).is_err());
        assert!(s.mix(&["🟥".to_owned(), "emoji".to_owned()]).is_err());
    }

    #[test]
    fn goto_cells() {
        let mut s = session(9, 12);
        s.goto("b10").unwrap();
        assert_eq!(s.cursor(), (1, 10));
        s.goto("D").unwrap();
        assert_eq!(s.cursor(), (3, 10));
        s.goto("0").unwrap();
        assert_eq!(s.cursor(), (3, 0));

        for bad in ["", "J1", "A12", "A-1", "?", "AB"] {
            assert!(s.goto(bad).is_err(), "{:?} should be rejected", bad);
        }
        assert_eq!(s.cursor(), (3, 0));
    }

    #[test]
    fn oversized_render_is_rolled_back() {
        let mut s = session(17, 17);
        let custom = PaletteEntry {
            label: "big".to_owned(),
            value: "<:a_very_long_custom_emoji_name:123456789012345678>".to_owned(),
            colour: None,
        };
        s.add_palette_entry(custom);
        let cursor = CursorMap::default();
        let limit = render(&s, &cursor, true).chars().count() + 10;

        s.toggle_fill();
        s.move_cursor(5, 5);
        let before = s.clone();
        assert!(matches!(
            s.apply(DrawAction::Paint, &cursor, limit),
            Err(Error::SizeLimitExceeded { .. })
        ));
        assert_eq!(s, before);

        // A single custom cell still fits
        s.toggle_fill();
        assert_eq!(s.apply(DrawAction::Paint, &cursor, limit + 60), Ok(true));
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut s = session(9, 9);
        let cursor = CursorMap::default();
        s.apply(DrawAction::SetPaintValue("🟧".to_owned()), &cursor, NO_LIMIT).unwrap();
        s.apply(DrawAction::Move { d_row: -1, d_col: 0 }, &cursor, NO_LIMIT).unwrap();
        assert_eq!(s.apply(DrawAction::Paint, &cursor, NO_LIMIT), Ok(true));
        assert_eq!(s.board().get((3, 4)), "🟧");
        s.apply(DrawAction::Erase, &cursor, NO_LIMIT).unwrap();
        assert_eq!(s.board().get((3, 4)), "⬜");
        s.apply(DrawAction::Goto("A0".to_owned()), &cursor, NO_LIMIT).unwrap();
        assert_eq!(s.cursor(), (0, 0));
        assert!(s.apply(DrawAction::Goto("Z9".to_owned()), &cursor, NO_LIMIT).is_err());
    }
}
