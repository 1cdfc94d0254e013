use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::api::types::{format_minute, ScheduleBlock};

use super::block_store::DayBlock;
use super::grouping::{build_grouping, Group, HierarchyLevel, RowGeometry};
use super::hit::{Area, HitRegion};

pub const MINUTES_PER_DAY: u32 = 1440;
pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const ELLIPSIS: &str = "…";

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return DEFAULT_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Fixed measurements of the day timeline, in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineMetrics {
    pub header_height: f64,
    pub padding: f64,
    /// Width of the time-axis column on the left.
    pub gutter_width: f64,
    pub row_height: f64,
    pub pad_x: f64,
}

impl Default for TimelineMetrics {
    fn default() -> Self {
        Self {
            header_height: 2.0,
            padding: 1.0,
            gutter_width: 7.0,
            row_height: 1.0,
            pad_x: 1.0,
        }
    }
}

impl TimelineMetrics {
    pub fn grid_top(&self) -> f64 {
        self.header_height
    }

    /// Total drawable height. Depends on zoom, so it must be recomputed every
    /// time the zoom changes.
    pub fn surface_height(&self, zoom: f64) -> f64 {
        self.header_height + MINUTES_PER_DAY as f64 * zoom + self.padding
    }

    pub fn y_for_minute(&self, minute: f64, zoom: f64) -> f64 {
        self.grid_top() + minute * zoom
    }

    pub fn minute_at(&self, y: f64, zoom: f64) -> f64 {
        (y - self.grid_top()) / zoom
    }

    /// The timeline body: below the header and right of the gutter.
    pub fn body(&self, surface_width: f64, zoom: f64) -> Area {
        Area::new(
            self.gutter_width,
            self.grid_top(),
            (surface_width - self.gutter_width).max(0.0),
            MINUTES_PER_DAY as f64 * zoom,
        )
    }

    pub fn label_width(&self, surface_width: f64) -> f64 {
        (surface_width - self.gutter_width - 2.0 * self.pad_x).max(0.0)
    }
}

pub fn tick_interval(zoom: f64) -> u32 {
    if zoom >= 2.0 {
        30
    } else {
        60
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub minute: u32,
    pub y: f64,
    pub label: String,
}

pub fn ticks(metrics: &TimelineMetrics, zoom: f64) -> Vec<Tick> {
    let interval = tick_interval(zoom);
    (0..MINUTES_PER_DAY)
        .step_by(interval as usize)
        .map(|minute| Tick {
            minute,
            y: metrics.y_for_minute(minute as f64, zoom),
            label: format_minute(minute),
        })
        .collect()
}

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Shortens `text` until its measured width fits `max_width`, dropping
/// trailing characters and appending an ellipsis. Stops once three or fewer
/// characters remain, in which case the result may still overflow.
pub fn truncate_to_width(text: &str, max_width: usize, measure: impl Fn(&str) -> usize) -> String {
    if measure(text) <= max_width {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().collect();
    loop {
        kept.pop();
        while kept.last().is_some_and(|c| c.is_whitespace()) {
            kept.pop();
        }
        let stem: String = kept.iter().collect();
        let candidate = format!("{}{}", stem, ELLIPSIS);
        if measure(&candidate) <= max_width {
            return candidate;
        }
        if kept.len() <= 3 {
            return stem;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLine {
    pub group: usize,
    pub y: f64,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManualSpan {
    pub area: Area,
    pub text: String,
    /// An uncommitted drag.
    pub preview: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub title: String,
    pub extent: f64,
    pub width: f64,
    pub label_x: f64,
    pub ticks: Vec<Tick>,
    pub lines: Vec<TimelineLine>,
    pub groups: Vec<Group>,
    pub hit_regions: Vec<HitRegion>,
    pub highlight: Option<Area>,
    pub manual: Vec<ManualSpan>,
    pub now_y: Option<f64>,
}

/// Everything the day timeline is drawn from.
#[derive(Debug, Clone)]
pub struct DayInput<'a> {
    pub date: NaiveDate,
    pub blocks: &'a [ScheduleBlock],
    pub level: HierarchyLevel,
    pub zoom: f64,
    pub width: f64,
    pub selection_minute: Option<u32>,
    pub manual: &'a [DayBlock],
    pub preview: Option<(u32, u32)>,
    pub now_minute: Option<u32>,
}

pub fn layout_day(input: &DayInput<'_>, metrics: &TimelineMetrics) -> TimelineLayout {
    let zoom = clamp_zoom(input.zoom);
    let geometry = RowGeometry {
        zoom,
        grid_top: metrics.grid_top(),
        x: metrics.gutter_width,
        w: (input.width - metrics.gutter_width).max(0.0),
        row_height: metrics.row_height,
    };
    let grouping = build_grouping(input.blocks, input.level, &geometry);
    let max_label = metrics.label_width(input.width) as usize;

    let lines = grouping
        .groups
        .iter()
        .enumerate()
        .map(|(index, group)| TimelineLine {
            group: index,
            y: geometry.row_y(group.start_minute),
            text: truncate_to_width(&group.label(), max_label, display_width),
            selected: input.selection_minute == Some(group.start_minute),
        })
        .collect();

    // Only over a row that is drawn at this hierarchy level
    let highlight = input
        .selection_minute
        .filter(|minute| grouping.groups.iter().any(|g| g.start_minute == *minute))
        .map(|minute| Area::new(geometry.x, geometry.row_y(minute), geometry.w, geometry.row_height));

    let span_area = |start: u32, end: u32| {
        let top = geometry.row_y(start);
        let height = ((end.saturating_sub(start)) as f64 * zoom).ceil().max(1.0);
        Area::new(geometry.x, top, geometry.w, height)
    };
    let mut manual: Vec<ManualSpan> = input
        .manual
        .iter()
        .map(|b| ManualSpan {
            area: span_area(b.start_minute, b.end_minute),
            text: truncate_to_width(&b.label(), max_label, display_width),
            preview: false,
        })
        .collect();
    if let Some((start, end)) = input.preview {
        manual.push(ManualSpan {
            area: span_area(start, end),
            text: format!("{}–{}", format_minute(start), format_minute(end)),
            preview: true,
        });
    }

    TimelineLayout {
        title: format!(
            "{} · {}",
            input.date.format("%a %b %-d, %Y"),
            input.level.label()
        ),
        extent: metrics.surface_height(zoom),
        width: input.width,
        label_x: geometry.x + metrics.pad_x,
        ticks: ticks(metrics, zoom),
        lines,
        groups: grouping.groups,
        hit_regions: grouping.hit_regions,
        highlight,
        manual,
        now_y: input
            .now_minute
            .map(|m| metrics.y_for_minute(m as f64, zoom).floor()),
    }
}
