use chrono::{Datelike, Duration, NaiveDate};

use super::hit::{Area, HitRegion, HitTarget};

pub const TITLE_HEIGHT: f64 = 1.0;
pub const WEEKDAY_HEADER_HEIGHT: f64 = 1.0;
pub const WEEK_GUTTER_WIDTH: f64 = 4.0;
pub const MONTH_GRID_CELLS: usize = 42;

const YEAR_COLUMNS: usize = 4;
const YEAR_ROWS: usize = 3;
const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Where a month or day sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    Overdue,
    Current,
    Future,
}

pub fn classify_month(year: i32, month: u32, today: NaiveDate) -> Tense {
    match (year, month).cmp(&(today.year(), today.month())) {
        std::cmp::Ordering::Less => Tense::Overdue,
        std::cmp::Ordering::Equal => Tense::Current,
        std::cmp::Ordering::Greater => Tense::Future,
    }
}

pub fn classify_day(date: NaiveDate, today: NaiveDate) -> Tense {
    match date.cmp(&today) {
        std::cmp::Ordering::Less => Tense::Overdue,
        std::cmp::Ordering::Equal => Tense::Current,
        std::cmp::Ordering::Greater => Tense::Future,
    }
}

pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???")
}

/// The 42 consecutive days shown for a month, starting on the Monday on or
/// before the 1st. Empty for an invalid month.
pub fn month_grid_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let start = monday_on_or_before(first);
    (0..MONTH_GRID_CELLS as i64)
        .map(|i| start + Duration::days(i))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub area: Area,
    pub label: String,
    pub lines: Vec<String>,
    pub tense: Tense,
    /// Days outside the month being shown.
    pub dimmed: bool,
    pub target: HitTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub title: String,
    pub column_labels: Vec<(Area, String)>,
    pub cells: Vec<GridCell>,
    pub hit_regions: Vec<HitRegion>,
}

impl GridLayout {
    fn new(title: String) -> Self {
        Self {
            title,
            column_labels: Vec::new(),
            cells: Vec::new(),
            hit_regions: Vec::new(),
        }
    }

    fn push(&mut self, cell: GridCell) {
        self.hit_regions.push(HitRegion::new(cell.area, cell.target));
        self.cells.push(cell);
    }

    pub fn day_cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells
            .iter()
            .filter(|c| matches!(c.target, HitTarget::Day(_)))
    }
}

/// Splits `[start, start + len)` into `parts` slices with integer edges so
/// neighbouring cells never overlap or leave gaps.
fn split(start: f64, len: f64, parts: usize, index: usize) -> (f64, f64) {
    let edge = |i: usize| (len * i as f64 / parts as f64).floor();
    let a = edge(index);
    let b = edge(index + 1);
    (start + a, b - a)
}

pub fn year_layout(surface: Area, year: i32, today: NaiveDate) -> GridLayout {
    let mut layout = GridLayout::new(year.to_string());
    let body_y = surface.y + TITLE_HEIGHT;
    let body_h = (surface.h - TITLE_HEIGHT).max(0.0);

    for index in 0..12 {
        let (col, row) = (index % YEAR_COLUMNS, index / YEAR_COLUMNS);
        let (x, w) = split(surface.x, surface.w, YEAR_COLUMNS, col);
        let (y, h) = split(body_y, body_h, YEAR_ROWS, row);
        let month = index as u32 + 1;
        layout.push(GridCell {
            area: Area::new(x, y, w, h),
            label: month_name(month).to_string(),
            lines: Vec::new(),
            tense: classify_month(year, month, today),
            dimmed: false,
            target: HitTarget::Month { year, month },
        });
    }
    layout
}

pub fn month_layout(
    surface: Area,
    year: i32,
    month: u32,
    today: NaiveDate,
    day_lines: impl Fn(NaiveDate) -> Vec<String>,
) -> GridLayout {
    let mut layout = GridLayout::new(format!("{} {}", month_name(month), year));
    let days = month_grid_days(year, month);
    if days.is_empty() {
        return layout;
    }

    let grid_x = surface.x + WEEK_GUTTER_WIDTH;
    let grid_w = (surface.w - WEEK_GUTTER_WIDTH).max(0.0);
    let header_y = surface.y + TITLE_HEIGHT;
    let body_y = header_y + WEEKDAY_HEADER_HEIGHT;
    let body_h = (surface.h - TITLE_HEIGHT - WEEKDAY_HEADER_HEIGHT).max(0.0);

    for (col, name) in WEEKDAY_NAMES.iter().enumerate() {
        let (x, w) = split(grid_x, grid_w, 7, col);
        layout
            .column_labels
            .push((Area::new(x, header_y, w, WEEKDAY_HEADER_HEIGHT), name.to_string()));
    }

    let this_week = monday_on_or_before(today);
    for row in 0..6 {
        let (y, h) = split(body_y, body_h, 6, row);
        let week_start = days[row * 7];
        layout.push(GridCell {
            area: Area::new(surface.x, y, WEEK_GUTTER_WIDTH, h),
            label: format!("W{:02}", week_start.iso_week().week()),
            lines: Vec::new(),
            tense: classify_day(week_start, this_week),
            dimmed: false,
            target: HitTarget::Week(week_start),
        });

        for col in 0..7 {
            let date = days[row * 7 + col];
            let (x, w) = split(grid_x, grid_w, 7, col);
            layout.push(GridCell {
                area: Area::new(x, y, w, h),
                label: date.day().to_string(),
                lines: day_lines(date),
                tense: classify_day(date, today),
                dimmed: date.month() != month,
                target: HitTarget::Day(date),
            });
        }
    }
    layout
}

pub fn week_layout(
    surface: Area,
    week_start: NaiveDate,
    today: NaiveDate,
    day_lines: impl Fn(NaiveDate) -> Vec<String>,
) -> GridLayout {
    let week_start = monday_on_or_before(week_start);
    let week_end = week_start + Duration::days(6);
    let title = format!(
        "Week {:02} · {} {} – {} {}, {}",
        week_start.iso_week().week(),
        month_name(week_start.month()),
        week_start.day(),
        month_name(week_end.month()),
        week_end.day(),
        week_end.year()
    );
    let mut layout = GridLayout::new(title);

    let header_y = surface.y + TITLE_HEIGHT;
    let column_h = (surface.h - TITLE_HEIGHT).max(0.0);

    for (col, name) in WEEKDAY_NAMES.iter().enumerate() {
        let date = week_start + Duration::days(col as i64);
        let (x, w) = split(surface.x, surface.w, 7, col);
        layout.column_labels.push((
            Area::new(x, header_y, w, WEEKDAY_HEADER_HEIGHT),
            format!("{} {}", name, date.day()),
        ));
        // The whole column, header included, is clickable
        layout.push(GridCell {
            area: Area::new(x, header_y, w, column_h),
            label: String::new(),
            lines: day_lines(date),
            tense: classify_day(date, today),
            dimmed: false,
            target: HitTarget::Day(date),
        });
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn surface() -> Area {
        Area::new(0.0, 0.0, 80.0, 26.0)
    }

    fn no_lines(_: NaiveDate) -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn month_grid_always_has_42_days_starting_monday() {
        for year in [2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let days = month_grid_days(year, month);
                assert_eq!(days.len(), 42, "{year}-{month}");
                assert_eq!(days[0].weekday(), Weekday::Mon, "{year}-{month}");
                assert!(days[0] <= date(year, month, 1));
                assert!(days.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
            }
        }
    }

    #[test]
    fn month_grid_starts_on_the_first_when_it_is_a_monday() {
        // 2026-06-01 is a Monday
        assert_eq!(month_grid_days(2026, 6)[0], date(2026, 6, 1));
    }

    #[test]
    fn month_layout_emits_42_day_cells_and_6_week_cells() {
        let layout = month_layout(surface(), 2026, 2, date(2026, 10, 16), no_lines);
        assert_eq!(layout.day_cells().count(), 42);
        let weeks = layout
            .cells
            .iter()
            .filter(|c| matches!(c.target, HitTarget::Week(_)))
            .count();
        assert_eq!(weeks, 6);
        assert_eq!(layout.hit_regions.len(), 48);
        assert_eq!(layout.title, "Feb 2026");
    }

    #[test]
    fn month_layout_dims_days_outside_month() {
        let layout = month_layout(surface(), 2026, 10, date(2026, 10, 16), no_lines);
        let first = layout.day_cells().next().unwrap();
        // Oct 2026 starts on a Thursday, so the grid opens on Sep 28
        assert_eq!(first.target, HitTarget::Day(date(2026, 9, 28)));
        assert!(first.dimmed);
        let oct_first = layout
            .day_cells()
            .find(|c| c.target == HitTarget::Day(date(2026, 10, 1)))
            .unwrap();
        assert!(!oct_first.dimmed);
    }

    #[test]
    fn day_classification_is_relative_to_today() {
        let today = date(2026, 10, 16);
        assert_eq!(classify_day(date(2026, 10, 15), today), Tense::Overdue);
        assert_eq!(classify_day(today, today), Tense::Current);
        assert_eq!(classify_day(date(2026, 10, 17), today), Tense::Future);
    }

    #[test]
    fn month_classification_uses_year_and_month() {
        let today = date(2026, 10, 16);
        assert_eq!(classify_month(2025, 12, today), Tense::Overdue);
        assert_eq!(classify_month(2026, 9, today), Tense::Overdue);
        assert_eq!(classify_month(2026, 10, today), Tense::Current);
        assert_eq!(classify_month(2026, 11, today), Tense::Future);
        assert_eq!(classify_month(2027, 1, today), Tense::Future);
    }

    #[test]
    fn year_layout_has_twelve_non_overlapping_cells() {
        let layout = year_layout(surface(), 2026, date(2026, 10, 16));
        assert_eq!(layout.cells.len(), 12);
        assert_eq!(layout.hit_regions.len(), 12);
        for (i, a) in layout.cells.iter().enumerate() {
            for b in layout.cells.iter().skip(i + 1) {
                let overlap = a.area.x < b.area.right()
                    && b.area.x < a.area.right()
                    && a.area.y < b.area.bottom()
                    && b.area.y < a.area.bottom();
                assert!(!overlap, "{} overlaps {}", a.label, b.label);
            }
        }
        let current: Vec<_> = layout
            .cells
            .iter()
            .filter(|c| c.tense == Tense::Current)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(current, vec!["Oct"]);
    }

    #[test]
    fn year_layout_places_months_four_per_row() {
        let layout = year_layout(surface(), 2026, date(2026, 1, 1));
        assert_eq!(layout.cells[0].area.y, layout.cells[3].area.y);
        assert!(layout.cells[4].area.y > layout.cells[3].area.y);
        assert_eq!(layout.cells[4].area.x, layout.cells[0].area.x);
    }

    #[test]
    fn week_layout_has_seven_columns_from_monday() {
        // Thursday input snaps back to Monday
        let layout = week_layout(surface(), date(2026, 10, 15), date(2026, 10, 16), no_lines);
        let days: Vec<_> = layout
            .cells
            .iter()
            .map(|c| match c.target {
                HitTarget::Day(d) => d,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2026, 10, 12));
        assert_eq!(days[6], date(2026, 10, 18));
        assert_eq!(layout.cells[4].tense, Tense::Current);
        assert!(layout.title.starts_with("Week 42"));
    }

    #[test]
    fn day_lines_are_attached_to_cells() {
        let target = date(2026, 10, 14);
        let layout = week_layout(surface(), target, target, |d| {
            if d == target {
                vec!["09:00 Focus".into()]
            } else {
                Vec::new()
            }
        });
        let cell = layout
            .cells
            .iter()
            .find(|c| c.target == HitTarget::Day(target))
            .unwrap();
        assert_eq!(cell.lines, vec!["09:00 Focus".to_string()]);
    }
}
