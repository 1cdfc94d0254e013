use std::fmt;
use std::str::FromStr;

use crate::api::types::{format_minute, ScheduleBlock};
use crate::error::CalendarError;

use super::grouping::Group;
use super::hit::{hit_test, Area, HitRegion, HitTarget};
use super::timeline::{display_width, truncate_to_width};

/// How a click on the day timeline is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolMode {
    #[default]
    Cursor,
    Select,
    Picker,
    /// Reserved. Clicks are ignored.
    Eraser,
}

impl ToolMode {
    pub const ALL: [ToolMode; 4] = [Self::Cursor, Self::Select, Self::Picker, Self::Eraser];

    pub fn label(self) -> &'static str {
        match self {
            Self::Cursor => "cursor",
            Self::Select => "select",
            Self::Picker => "picker",
            Self::Eraser => "eraser",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ToolMode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalendarError::Config(format!("unknown tool: {}", s)))
    }
}

/// The current Day-mode selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub start_minute: u32,
    pub item: ScheduleBlock,
}

/// Payload of a `calendar:selected` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub text: String,
    pub type_name: String,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl From<&Selection> for SelectionEvent {
    fn from(selection: &Selection) -> Self {
        Self {
            text: selection.item.text.clone(),
            type_name: selection.item.type_name.clone(),
            start: selection.item.start_minute,
            end: selection.item.end_minute,
        }
    }
}

impl SelectionEvent {
    pub fn summary(&self) -> String {
        let time = match (self.start, self.end) {
            (Some(s), Some(e)) => format!("{}–{}", format_minute(s), format_minute(e)),
            (Some(s), None) => format_minute(s),
            _ => String::from("--:--"),
        };
        if self.type_name.is_empty() {
            format!("{} {}", time, self.text)
        } else {
            format!("{} {} ({})", time, self.text, self.type_name)
        }
    }
}

const MENU_MAX_WIDTH: usize = 40;

/// Disambiguation menu listing every item of a multi-item group. Coordinates
/// are surface units, anchored at the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerMenu {
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub start_minute: u32,
    pub items: Vec<ScheduleBlock>,
    pub highlighted: usize,
}

impl PickerMenu {
    pub fn new(group: &Group, x: f64, y: f64) -> Self {
        Self {
            anchor_x: x,
            anchor_y: y,
            start_minute: group.start_minute,
            items: group.items.clone(),
            highlighted: 0,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| truncate_to_width(&item.text, MENU_MAX_WIDTH, display_width))
            .collect()
    }

    /// Outer box, border included.
    pub fn area(&self) -> Area {
        let inner = self
            .labels()
            .iter()
            .map(|l| display_width(l))
            .max()
            .unwrap_or(0)
            .max(format_minute(self.start_minute).len());
        Area::new(
            self.anchor_x,
            self.anchor_y,
            inner as f64 + 4.0,
            self.items.len() as f64 + 2.0,
        )
    }

    /// Shifts the anchor left and up so the whole box lies inside `bounds`
    /// where it fits.
    pub fn fit_within(&mut self, bounds: Area) {
        let area = self.area();
        if area.right() > bounds.right() {
            self.anchor_x = (bounds.right() - area.w).max(bounds.x);
        }
        if area.bottom() > bounds.bottom() {
            self.anchor_y = (bounds.bottom() - area.h).max(bounds.y);
        }
    }

    /// One region per entry, inside the border.
    pub fn item_regions(&self) -> Vec<(Area, usize)> {
        let outer = self.area();
        (0..self.items.len())
            .map(|i| {
                (
                    Area::new(outer.x + 1.0, outer.y + 1.0 + i as f64, outer.w - 2.0, 1.0),
                    i,
                )
            })
            .collect()
    }

    pub fn item_at(&self, x: f64, y: f64) -> Option<usize> {
        self.item_regions()
            .into_iter()
            .rev()
            .find(|(area, _)| area.contains(x, y))
            .map(|(_, i)| i)
    }

    pub fn move_highlight(&mut self, delta: i32) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as i32;
        self.highlighted = (self.highlighted as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn choose(&self, index: usize) -> Option<Selection> {
        self.items.get(index).map(|item| Selection {
            start_minute: self.start_minute,
            item: item.clone(),
        })
    }

    pub fn choose_highlighted(&self) -> Option<Selection> {
        self.choose(self.highlighted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Select(Selection),
    Clear,
    OpenPicker(PickerMenu),
    Ignored,
}

fn single(group: &Group) -> Option<Selection> {
    match group.items.as_slice() {
        [item] => Some(Selection {
            start_minute: group.start_minute,
            item: item.clone(),
        }),
        _ => None,
    }
}

/// Interprets a click on the day timeline under `tool`. `hits` and `groups`
/// must come from the same render pass.
pub fn dispatch_click(
    tool: ToolMode,
    groups: &[Group],
    hits: &[HitRegion],
    x: f64,
    y: f64,
) -> ToolOutcome {
    let group = hit_test(hits, x, y).and_then(|region| match region.payload {
        HitTarget::Group(index) => groups.get(index),
        _ => None,
    });

    match (tool, group) {
        (ToolMode::Eraser, _) => ToolOutcome::Ignored,
        (ToolMode::Select, None) => ToolOutcome::Clear,
        (_, None) => ToolOutcome::Ignored,
        (ToolMode::Cursor | ToolMode::Select, Some(group)) => {
            single(group).map_or(ToolOutcome::Ignored, ToolOutcome::Select)
        }
        (ToolMode::Picker, Some(group)) => match single(group) {
            Some(selection) => ToolOutcome::Select(selection),
            None if group.items.len() > 1 => ToolOutcome::OpenPicker(PickerMenu::new(group, x, y)),
            None => ToolOutcome::Ignored,
        },
    }
}
