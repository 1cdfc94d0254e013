use std::time::Duration;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::api::types::{BlockKind, ScheduleBlock};
use crate::calendar::block_store::BlockStore;
use crate::calendar::view_state::ViewState;

use super::{AppState, Settings};

pub fn test_settings() -> Settings {
    Settings {
        view_state: ViewState::default(),
        store: BlockStore::in_memory(),
        drag_create: true,
        schedule_ttl: Duration::from_secs(5),
        save_debounce: Duration::from_millis(10),
    }
}

/// A year-mode state with no clock marker, so day timelines open at a
/// predictable minute.
pub fn test_state() -> AppState {
    let mut state = AppState::new(vec![], test_settings());
    state.status_message = None;
    state.view.set_today(Local::now().date_naive(), None);
    state
}

pub fn day_state() -> AppState {
    day_state_with(vec![])
}

/// Today's timeline with `schedule` loaded before entering Day mode.
pub fn day_state_with(schedule: Vec<ScheduleBlock>) -> AppState {
    let mut state = test_state();
    state.view.set_schedule(schedule);
    state.view.jump_to_today();
    state
}

pub fn leaf(start: u32, text: &str) -> ScheduleBlock {
    ScheduleBlock {
        start_minute: Some(start),
        end_minute: Some(start + 15),
        text: text.into(),
        kind: BlockKind::Leaf,
        type_name: "task".into(),
        ..ScheduleBlock::default()
    }
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}
