use std::cmp::Ordering;

use crate::api::types::{format_minute, BlockKind, ScheduleBlock};

use super::hit::{Area, HitRegion, HitTarget};

/// Which slice of the schedule the day timeline shows. Levels are a view
/// filter, not a tree collapse: containers and leaves are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HierarchyLevel {
    Routine,
    Subroutine,
    Microroutine,
    #[default]
    Leaf,
}

impl HierarchyLevel {
    pub const ALL: [HierarchyLevel; 4] = [
        Self::Routine,
        Self::Subroutine,
        Self::Microroutine,
        Self::Leaf,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Routine => 0,
            Self::Subroutine => 1,
            Self::Microroutine => 2,
            Self::Leaf => 3,
        }
    }

    pub fn matches(self, kind: BlockKind) -> bool {
        match self {
            Self::Routine => kind == BlockKind::Routine,
            Self::Subroutine => kind == BlockKind::Subroutine,
            Self::Microroutine => kind == BlockKind::Microroutine,
            Self::Leaf => !kind.is_container(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Routine => "routines",
            Self::Subroutine => "subroutines",
            Self::Microroutine => "microroutines",
            Self::Leaf => "items",
        }
    }
}

/// Blocks visible at `level`. Blocks without a start minute can't be placed
/// on the timeline and are dropped here.
pub fn filter_by_level(blocks: &[ScheduleBlock], level: HierarchyLevel) -> Vec<&ScheduleBlock> {
    blocks
        .iter()
        .filter(|b| b.start_minute.is_some() && level.matches(b.kind))
        .collect()
}

/// Schedule blocks sharing a start minute, drawn and selected as one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub start_minute: u32,
    pub items: Vec<ScheduleBlock>,
}

impl Group {
    /// `HH:MM  text1; text2; ...`
    pub fn label(&self) -> String {
        let texts: Vec<&str> = self.items.iter().map(|b| b.text.as_str()).collect();
        format!("{}  {}", format_minute(self.start_minute), texts.join("; "))
    }
}

fn schedule_order(a: &ScheduleBlock, b: &ScheduleBlock) -> Ordering {
    a.start_minute
        .cmp(&b.start_minute)
        .then(a.order.cmp(&b.order))
        .then_with(|| a.text.cmp(&b.text))
}

pub fn group_blocks(blocks: &[ScheduleBlock], level: HierarchyLevel) -> Vec<Group> {
    let mut visible = filter_by_level(blocks, level);
    visible.sort_by(|a, b| schedule_order(a, b));

    let mut groups: Vec<Group> = Vec::new();
    for block in visible {
        let Some(start) = block.start_minute else {
            continue;
        };
        match groups.last_mut() {
            Some(group) if group.start_minute == start => group.items.push(block.clone()),
            _ => groups.push(Group {
                start_minute: start,
                items: vec![block.clone()],
            }),
        }
    }
    groups
}

/// Where group rows land on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    pub zoom: f64,
    pub grid_top: f64,
    pub x: f64,
    pub w: f64,
    pub row_height: f64,
}

impl RowGeometry {
    /// Top of the row for `minute`, snapped to a whole cell so that painting and
    /// hit-testing agree.
    pub fn row_y(&self, minute: u32) -> f64 {
        (self.grid_top + minute as f64 * self.zoom).floor()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub groups: Vec<Group>,
    pub hit_regions: Vec<HitRegion>,
}

pub fn build_grouping(
    blocks: &[ScheduleBlock],
    level: HierarchyLevel,
    geometry: &RowGeometry,
) -> Grouping {
    let groups = group_blocks(blocks, level);
    let hit_regions = groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let area = Area::new(
                geometry.x,
                geometry.row_y(group.start_minute),
                geometry.w,
                geometry.row_height,
            );
            HitRegion::new(area, HitTarget::Group(index))
        })
        .collect();
    Grouping {
        groups,
        hit_regions,
    }
}
