use super::{
    board::{CELL_SEPARATOR, LABEL_GAP},
    cursor::CursorMap,
    session::DrawSession,
};

/// Marks the selected rows in the label column
pub const ROW_MARKER: &str = "▶️";
/// Marks the selected columns in the header
pub const COL_MARKER: &str = "🔽";

const COL_LABELS: [&str; 17] = [
    "0️⃣", "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟", "⓫", "⓬", "⓭", "⓮", "⓯",
    "⓰",
];

/// Regional indicator letter for a row
pub fn row_label(row: usize) -> String {
    char::from_u32(0x1F1E6 + row as u32)
        .map(String::from)
        .unwrap_or_default()
}

pub fn col_label(col: usize) -> &'static str {
    COL_LABELS.get(col).copied().unwrap_or_default()
}

/// Text of a drawing board: the active paint and column labels, a blank line, then each row
/// behind its label.  With `show_cursor` the selection is drawn highlighted.
pub fn render(session: &DrawSession, cursor: &CursorMap, show_cursor: bool) -> String {
    let board = session.board();
    let selection = session.selection();
    let separator = CELL_SEPARATOR.to_string();

    let header: Vec<&str> = (0..board.width())
        .map(|col| {
            if show_cursor && selection.contains_col(col) {
                COL_MARKER
            } else {
                col_label(col)
            }
        })
        .collect();

    let mut out = format!(
        "{}{}{}\n",
        session.paint_value(),
        LABEL_GAP,
        header.join(&separator)
    );

    for (row, values) in board.rows().enumerate() {
        let label = if show_cursor && selection.contains_row(row) {
            ROW_MARKER.to_owned()
        } else {
            row_label(row)
        };

        let cells: Vec<&str> = values
            .iter()
            .enumerate()
            .map(|(col, value)| {
                if show_cursor && selection.contains((row, col)) {
                    cursor.highlight(value)
                } else {
                    value.as_str()
                }
            })
            .collect();

        out.push('\n');
        out.push_str(&label);
        out.push_str(LABEL_GAP);
        out.push_str(&cells.join(&separator));
    }

    out
}

/// Active paint shown in the header of a rendered board
pub fn rendered_paint(rendered: &str) -> Option<&str> {
    let (paint, _) = rendered.lines().next()?.split_once(LABEL_GAP)?;
    (!paint.is_empty()).then_some(paint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::board::Board;
    use serenity::all::UserId;

    fn session() -> DrawSession {
        DrawSession::new(UserId::new(7), Board::new("⬜", 5, 6).unwrap())
    }

    #[test]
    fn labels() {
        assert_eq!(row_label(0), "🇦");
        assert_eq!(row_label(16), "🇶");
        assert_eq!(col_label(0), "0️⃣");
        assert_eq!(col_label(10), "🔟");
        assert_eq!(col_label(16), "⓰");
    }

    #[test]
    fn layout() {
        let rendered = render(&session(), &CursorMap::default(), true);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[0],
            "⬜      0️⃣\u{200b}1️⃣\u{200b}2️⃣\u{200b}🔽\u{200b}4️⃣\u{200b}5️⃣"
        );
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "🇦      ⬜\u{200b}⬜\u{200b}⬜\u{200b}⬜\u{200b}⬜\u{200b}⬜");
        assert_eq!(lines[4], "▶️      ⬜\u{200b}⬜\u{200b}⬜\u{200b}⚪\u{200b}⬜\u{200b}⬜");
    }

    #[test]
    fn hidden_cursor_draws_plain_cells() {
        let rendered = render(&session(), &CursorMap::default(), false);
        assert!(!rendered.contains("⚪"));
        assert!(!rendered.contains(ROW_MARKER));
        assert!(!rendered.contains(COL_MARKER));
    }

    #[test]
    fn parse_reverses_render() {
        let cursor = CursorMap::default();
        let mut s = session();
        s.set_paint_value("🟥").unwrap();
        s.toggle_fill();
        s.move_cursor(1, 2);
        s.paint("🟥");
        s.add_palette_entry(crate::draw::palette::PaletteEntry {
            label: "turtle".to_owned(),
            value: "<:turtle:42>".to_owned(),
            colour: None,
        });
        s.toggle_fill();
        s.move_cursor(-3, -5);
        s.paint("<:turtle:42>");

        let rendered = render(&s, &cursor, true);
        let parsed = Board::parse(&rendered, &cursor, "⬜").unwrap();
        assert_eq!(&parsed, s.board());
        assert_eq!(rendered_paint(&rendered), Some("<:turtle:42>"));
    }

    #[test]
    fn paint_is_read_from_the_header() {
        let mut s = session();
        s.set_paint_value("🟩").unwrap();
        assert_eq!(rendered_paint(&render(&s, &CursorMap::default(), false)), Some("🟩"));
        assert_eq!(rendered_paint("no header here"), None);
        assert_eq!(rendered_paint(""), None);
    }
}
