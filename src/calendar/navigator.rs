use chrono::{Datelike, Duration, NaiveDate};

use super::grid::monday_on_or_before;
use super::hit::HitTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Year,
    Month,
    Week,
    Day,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Year => "year",
            Mode::Month => "month",
            Mode::Week => "week",
            Mode::Day => "day",
        }
    }
}

/// Drill-down position. Exactly one mode is active; the selected fields below
/// it are cleared again on ascent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorState {
    pub mode: Mode,
    pub selected_year: i32,
    pub selected_month: Option<u32>,
    pub selected_week_start: Option<NaiveDate>,
    pub selected_date: Option<NaiveDate>,
}

impl NavigatorState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: Mode::Year,
            selected_year: today.year(),
            selected_month: None,
            selected_week_start: None,
            selected_date: None,
        }
    }

    /// Applies a resolved hit. Returns true when the mode changed; targets that
    /// don't belong to the current mode are ignored.
    pub fn descend(&mut self, target: HitTarget) -> bool {
        match (self.mode, target) {
            (Mode::Year, HitTarget::Month { year, month }) => {
                self.selected_year = year;
                self.selected_month = Some(month);
                self.mode = Mode::Month;
            }
            (Mode::Month, HitTarget::Week(start)) => {
                self.selected_week_start = Some(monday_on_or_before(start));
                self.mode = Mode::Week;
            }
            (Mode::Month, HitTarget::Day(date)) | (Mode::Week, HitTarget::Day(date)) => {
                self.selected_date = Some(date);
                self.mode = Mode::Day;
            }
            _ => return false,
        }
        true
    }

    /// One level of back-navigation. Returns false at the root.
    pub fn ascend(&mut self) -> bool {
        match self.mode {
            Mode::Year => return false,
            Mode::Month => {
                self.selected_month = None;
                self.selected_week_start = None;
                self.mode = Mode::Year;
            }
            Mode::Week => {
                if self.selected_month.is_none() {
                    if let Some(start) = self.selected_week_start {
                        self.selected_year = start.year();
                        self.selected_month = Some(start.month());
                    }
                }
                self.selected_week_start = None;
                self.mode = Mode::Month;
            }
            Mode::Day => {
                if self.selected_week_start.is_none() {
                    self.selected_week_start = self.selected_date.map(monday_on_or_before);
                }
                self.mode = Mode::Week;
            }
        }
        true
    }

    /// Moves the current period by `delta` units of the active mode.
    pub fn step(&mut self, delta: i32) {
        match self.mode {
            Mode::Year => self.selected_year += delta,
            Mode::Month => {
                let month = self.selected_month.unwrap_or(1);
                let index = self.selected_year * 12 + (month as i32 - 1) + delta;
                self.selected_year = index.div_euclid(12);
                self.selected_month = Some(index.rem_euclid(12) as u32 + 1);
            }
            Mode::Week => {
                if let Some(start) = self.selected_week_start {
                    let next = start + Duration::days(7 * delta as i64);
                    self.selected_week_start = Some(next);
                    self.selected_year = next.year();
                    self.selected_month = Some(next.month());
                }
            }
            Mode::Day => {
                if let Some(date) = self.selected_date {
                    let next = date + Duration::days(delta as i64);
                    self.selected_date = Some(next);
                    self.selected_week_start = Some(monday_on_or_before(next));
                    self.selected_year = next.year();
                    self.selected_month = Some(next.month());
                }
            }
        }
    }

    pub fn jump_to_today(&mut self, today: NaiveDate) {
        self.mode = Mode::Day;
        self.selected_year = today.year();
        self.selected_month = Some(today.month());
        self.selected_week_start = Some(monday_on_or_before(today));
        self.selected_date = Some(today);
    }

    /// Breadcrumb for the header, e.g. `2026 › Oct › W42 › Fri 16`.
    pub fn breadcrumb(&self) -> Vec<String> {
        let mut crumbs = vec![self.selected_year.to_string()];
        if self.mode == Mode::Year {
            return crumbs;
        }
        if let Some(month) = self.selected_month {
            crumbs.push(super::grid::month_name(month).to_string());
        }
        if let Some(start) = self.selected_week_start {
            if self.mode != Mode::Month {
                crumbs.push(format!("W{:02}", start.iso_week().week()));
            }
        }
        if self.mode == Mode::Day {
            if let Some(date) = self.selected_date {
                crumbs.push(date.format("%a %-d").to_string());
            }
        }
        crumbs
    }
}
