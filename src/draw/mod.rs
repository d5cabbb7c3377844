//! The pixel drawing board: a grid of emoji cells edited through buttons and select menus.

pub mod board;
pub mod colour;
pub mod cursor;
pub mod palette;
pub mod render;
pub mod session;

pub use board::Board;
pub use colour::Rgba;
pub use cursor::CursorMap;
pub use palette::{Palette, PaletteEntry};
pub use render::{render, rendered_paint};
pub use session::{DrawAction, DrawSession};
