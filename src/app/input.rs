use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::calendar::view_state::ZOOM_STEP;
use crate::keys::KeybindingMap;

use super::actions::{handle_action, zoom_by, SCROLL_ROWS};
use super::state::{AppState, LoadRequest};

pub(super) fn handle_key(
    state: &mut AppState,
    key: &KeyEvent,
    keybindings: &KeybindingMap,
) -> Option<LoadRequest> {
    if state.show_help {
        // Any key closes help
        state.show_help = false;
        return None;
    }
    if state.view.picker().is_some() {
        handle_picker_key(state, key);
        return None;
    }
    state.status_message = None;
    let action = *keybindings.resolve(key)?;
    handle_action(state, &action)
}

// --- Picker menu key handling ---

pub(super) fn handle_picker_key(state: &mut AppState, key: &KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            state.view.picker_move(-1);
        }
        (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            state.view.picker_move(1);
        }
        (KeyModifiers::NONE, KeyCode::Enter) => {
            state.view.picker_confirm();
        }
        (KeyModifiers::NONE, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('g')) => {
            state.view.back();
        }
        _ => {}
    }
}

// --- Mouse handling ---

/// Routes a terminal mouse event to the calendar. Positions are translated
/// into the calendar's viewport; presses outside it are ignored, while drags
/// and releases are always forwarded so a gesture can end anywhere.
pub(super) fn handle_mouse(state: &mut AppState, mouse: &MouseEvent) {
    let area = state.calendar_area;
    let inside = area.contains(Position::new(mouse.column, mouse.row));
    let vx = mouse.column.saturating_sub(area.x) as f64;
    let vy = mouse.row.saturating_sub(area.y) as f64;
    let zoom_modifier = mouse.modifiers.contains(KeyModifiers::CONTROL);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => {
            state.status_message = None;
            state.view.press(vx, vy);
        }
        MouseEventKind::Drag(MouseButton::Left) => state.view.drag_to(vx, vy),
        MouseEventKind::Up(MouseButton::Left) => {
            state.view.release(vx, vy);
        }
        MouseEventKind::ScrollUp if inside && zoom_modifier => zoom_by(state, ZOOM_STEP),
        MouseEventKind::ScrollDown if inside && zoom_modifier => zoom_by(state, 1.0 / ZOOM_STEP),
        MouseEventKind::ScrollUp if inside => state.view.scroll_by(-SCROLL_ROWS),
        MouseEventKind::ScrollDown if inside => state.view.scroll_by(SCROLL_ROWS),
        _ => {}
    }
}
