use chrono::NaiveDate;

/// An axis-aligned rectangle in surface units (one unit per terminal cell).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Area {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Area {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// What a click on a region resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Month { year: i32, month: u32 },
    Week(NaiveDate),
    Day(NaiveDate),
    /// Index into the groups produced by the same render pass.
    Group(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub payload: HitTarget,
}

impl HitRegion {
    pub fn new(area: Area, payload: HitTarget) -> Self {
        Self {
            x: area.x,
            y: area.y,
            w: area.w,
            h: area.h,
            payload,
        }
    }

    pub fn area(&self) -> Area {
        Area::new(self.x, self.y, self.w, self.h)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.area().contains(x, y)
    }
}

/// Resolves a point against a freshly rendered region list. Later regions were
/// drawn on top, so the last match wins.
pub fn hit_test(regions: &[HitRegion], x: f64, y: f64) -> Option<&HitRegion> {
    regions.iter().rev().find(|r| r.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn contains_is_half_open() {
        let area = Area::new(2.0, 3.0, 4.0, 2.0);
        assert!(area.contains(2.0, 3.0));
        assert!(area.contains(5.9, 4.9));
        assert!(!area.contains(6.0, 3.0));
        assert!(!area.contains(2.0, 5.0));
        assert!(!area.contains(1.9, 3.0));
    }

    #[test]
    fn hit_test_prefers_topmost_region() {
        let regions = vec![
            HitRegion::new(Area::new(0.0, 0.0, 10.0, 10.0), HitTarget::Day(date(2026, 1, 1))),
            HitRegion::new(Area::new(2.0, 2.0, 2.0, 2.0), HitTarget::Group(0)),
        ];
        assert_eq!(hit_test(&regions, 3.0, 3.0).unwrap().payload, HitTarget::Group(0));
        assert_eq!(
            hit_test(&regions, 8.0, 8.0).unwrap().payload,
            HitTarget::Day(date(2026, 1, 1))
        );
    }

    #[test]
    fn hit_test_miss_returns_none() {
        let regions = vec![HitRegion::new(
            Area::new(0.0, 0.0, 1.0, 1.0),
            HitTarget::Group(0),
        )];
        assert!(hit_test(&regions, 5.0, 5.0).is_none());
        assert!(hit_test(&[], 0.0, 0.0).is_none());
    }
}
