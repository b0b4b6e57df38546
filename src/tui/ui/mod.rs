mod battle;
mod layout;

use crate::tui::app::AppState;
use ratatui::prelude::Frame;

pub fn draw(f: &mut Frame, app: &AppState) {
    battle::draw_battle(f, app);
}
