use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    Back,
    Help,
    Refresh,
    Today,
    Prev,
    Next,
    ZoomIn,
    ZoomOut,
    ScrollUp,
    ScrollDown,
    LevelRoutine,
    LevelSubroutine,
    LevelMicroroutine,
    LevelLeaf,
    ToolCursor,
    ToolSelect,
    ToolPicker,
    ToolEraser,
}

impl Action {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quit" => Some(Self::Quit),
            "back" => Some(Self::Back),
            "help" => Some(Self::Help),
            "refresh" => Some(Self::Refresh),
            "today" => Some(Self::Today),
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            "zoom_in" => Some(Self::ZoomIn),
            "zoom_out" => Some(Self::ZoomOut),
            "scroll_up" => Some(Self::ScrollUp),
            "scroll_down" => Some(Self::ScrollDown),
            "level_routine" => Some(Self::LevelRoutine),
            "level_subroutine" => Some(Self::LevelSubroutine),
            "level_microroutine" => Some(Self::LevelMicroroutine),
            "level_leaf" => Some(Self::LevelLeaf),
            "tool_cursor" => Some(Self::ToolCursor),
            "tool_select" => Some(Self::ToolSelect),
            "tool_picker" => Some(Self::ToolPicker),
            "tool_eraser" => Some(Self::ToolEraser),
            _ => None,
        }
    }

    pub fn hint_text(&self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Back => "back",
            Self::Help => "help",
            Self::Refresh => "refresh",
            Self::Today => "today",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::ZoomIn => "zoom in",
            Self::ZoomOut => "zoom out",
            Self::ScrollUp => "scroll up",
            Self::ScrollDown => "scroll down",
            Self::LevelRoutine => "routines",
            Self::LevelSubroutine => "subroutines",
            Self::LevelMicroroutine => "microroutines",
            Self::LevelLeaf => "items",
            Self::ToolCursor => "cursor",
            Self::ToolSelect => "select",
            Self::ToolPicker => "picker",
            Self::ToolEraser => "eraser",
        }
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
}

fn alt(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::ALT)
}

/// Bindings every preset shares: Esc always goes back one level.
fn common(m: &mut HashMap<KeyEvent, Action>) {
    m.insert(key(KeyCode::Esc), Action::Back);
    m.insert(key(KeyCode::Up), Action::ScrollUp);
    m.insert(key(KeyCode::Down), Action::ScrollDown);
    m.insert(key(KeyCode::Left), Action::Prev);
    m.insert(key(KeyCode::Right), Action::Next);
    m.insert(key(KeyCode::PageUp), Action::Prev);
    m.insert(key(KeyCode::PageDown), Action::Next);
    m.insert(key(KeyCode::Char('+')), Action::ZoomIn);
    m.insert(key(KeyCode::Char('-')), Action::ZoomOut);
    m.insert(key(KeyCode::F(5)), Action::Refresh);
}

pub fn vim_preset() -> HashMap<KeyEvent, Action> {
    let mut m = HashMap::new();
    common(&mut m);
    m.insert(key(KeyCode::Char('q')), Action::Quit);
    m.insert(key(KeyCode::Char('?')), Action::Help);
    m.insert(key(KeyCode::Char('r')), Action::Refresh);
    m.insert(key(KeyCode::Char('t')), Action::Today);
    m.insert(key(KeyCode::Char('h')), Action::Prev);
    m.insert(key(KeyCode::Char('l')), Action::Next);
    m.insert(key(KeyCode::Char('k')), Action::ScrollUp);
    m.insert(key(KeyCode::Char('j')), Action::ScrollDown);
    m.insert(key(KeyCode::Char('=')), Action::ZoomIn);
    m.insert(key(KeyCode::Char('1')), Action::LevelRoutine);
    m.insert(key(KeyCode::Char('2')), Action::LevelSubroutine);
    m.insert(key(KeyCode::Char('3')), Action::LevelMicroroutine);
    m.insert(key(KeyCode::Char('4')), Action::LevelLeaf);
    m.insert(key(KeyCode::Char('c')), Action::ToolCursor);
    m.insert(key(KeyCode::Char('s')), Action::ToolSelect);
    m.insert(key(KeyCode::Char('p')), Action::ToolPicker);
    m.insert(key(KeyCode::Char('e')), Action::ToolEraser);
    m
}

pub fn emacs_preset() -> HashMap<KeyEvent, Action> {
    let mut m = HashMap::new();
    common(&mut m);
    m.insert(ctrl(KeyCode::Char('g')), Action::Back);
    m.insert(ctrl(KeyCode::Char('q')), Action::Quit);
    m.insert(ctrl(KeyCode::Char('h')), Action::Help);
    m.insert(ctrl(KeyCode::Char('r')), Action::Refresh);
    m.insert(ctrl(KeyCode::Char('t')), Action::Today);
    m.insert(ctrl(KeyCode::Char('b')), Action::Prev);
    m.insert(ctrl(KeyCode::Char('f')), Action::Next);
    m.insert(ctrl(KeyCode::Char('p')), Action::ScrollUp);
    m.insert(ctrl(KeyCode::Char('n')), Action::ScrollDown);
    m.insert(alt(KeyCode::Char('1')), Action::LevelRoutine);
    m.insert(alt(KeyCode::Char('2')), Action::LevelSubroutine);
    m.insert(alt(KeyCode::Char('3')), Action::LevelMicroroutine);
    m.insert(alt(KeyCode::Char('4')), Action::LevelLeaf);
    m.insert(alt(KeyCode::Char('c')), Action::ToolCursor);
    m.insert(alt(KeyCode::Char('s')), Action::ToolSelect);
    m.insert(alt(KeyCode::Char('p')), Action::ToolPicker);
    m.insert(alt(KeyCode::Char('e')), Action::ToolEraser);
    m
}

pub fn get_preset(name: &str) -> Option<HashMap<KeyEvent, Action>> {
    match name.to_lowercase().as_str() {
        "vim" => Some(vim_preset()),
        "emacs" => Some(emacs_preset()),
        _ => None,
    }
}
