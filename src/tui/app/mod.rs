mod board;
mod state;

pub use board::{Board, Cursor, PlayedCard};
pub use state::{AppState, KeyAction};
