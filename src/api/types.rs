use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Routine,
    Subroutine,
    Microroutine,
    Leaf,
}

impl BlockKind {
    /// Maps a raw schedule `type` onto a kind. Anything that is not one of the
    /// three container kinds is a leaf.
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name.trim().to_lowercase().as_str() {
            "routine" => Self::Routine,
            "subroutine" => Self::Subroutine,
            "microroutine" => Self::Microroutine,
            _ => Self::Leaf,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Leaf)
    }
}

/// One entry of today's schedule, as parsed from `/api/today`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub start_minute: Option<u32>,
    pub end_minute: Option<u32>,
    pub text: String,
    pub kind: BlockKind,
    pub type_name: String,
    pub depth: i64,
    pub is_parallel: bool,
    pub order: i64,
}

impl Default for ScheduleBlock {
    fn default() -> Self {
        Self {
            start_minute: None,
            end_minute: None,
            text: String::new(),
            kind: BlockKind::Leaf,
            type_name: String::new(),
            depth: 0,
            is_parallel: false,
            order: 0,
        }
    }
}

/// Formats a minute-of-day as `HH:MM`.
pub fn format_minute(minute: u32) -> String {
    format!("{:02}:{:02}", (minute / 60) % 24, minute % 60)
}
