use super::block_store::{DayBlock, MIN_BLOCK_MINUTES};
use super::timeline::{TimelineMetrics, MINUTES_PER_DAY};

/// Converts a vertical drag between two surface rows into a minute span of at
/// least [`MIN_BLOCK_MINUTES`], kept inside the day.
pub fn span_to_minutes(y0: f64, y1: f64, metrics: &TimelineMetrics, zoom: f64) -> (u32, u32) {
    let to_minute = |y: f64| {
        metrics
            .minute_at(y, zoom)
            .floor()
            .clamp(0.0, MINUTES_PER_DAY as f64) as u32
    };
    let (a, b) = (to_minute(y0), to_minute(y1));
    let (mut start, mut end) = (a.min(b), a.max(b));
    if end - start < MIN_BLOCK_MINUTES {
        end = start + MIN_BLOCK_MINUTES;
    }
    if end > MINUTES_PER_DAY {
        end = MINUTES_PER_DAY;
        start = start.min(MINUTES_PER_DAY - MIN_BLOCK_MINUTES);
    }
    (start, end)
}

/// A press on the timeline body, tracked until release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub origin_x: f64,
    pub origin_y: f64,
    pub current_y: f64,
    moved: bool,
}

impl DragGesture {
    pub fn press(x: f64, y: f64) -> Self {
        Self {
            origin_x: x,
            origin_y: y,
            current_y: y,
            moved: false,
        }
    }

    pub fn move_to(&mut self, y: f64) {
        if y != self.origin_y {
            self.moved = true;
        }
        self.current_y = y;
    }

    /// A release without movement is a click.
    pub fn moved(&self) -> bool {
        self.moved
    }

    pub fn preview(&self, metrics: &TimelineMetrics, zoom: f64) -> (u32, u32) {
        span_to_minutes(self.origin_y, self.current_y, metrics, zoom)
    }

    /// Ends the drag at `y`. Returns the block to create, or `None` when the
    /// pointer never moved.
    pub fn release(mut self, y: f64, metrics: &TimelineMetrics, zoom: f64) -> Option<DayBlock> {
        self.move_to(y);
        if !self.moved {
            return None;
        }
        let (start_minute, end_minute) = self.preview(metrics, zoom);
        Some(DayBlock {
            start_minute,
            end_minute,
            text: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> TimelineMetrics {
        TimelineMetrics::default()
    }

    fn row(minute: f64, zoom: f64) -> f64 {
        metrics().y_for_minute(minute, zoom)
    }

    #[test]
    fn short_drag_is_extended_to_fifteen_minutes() {
        let mut drag = DragGesture::press(10.0, row(100.0, 1.0));
        drag.move_to(row(103.0, 1.0));
        let block = drag.release(row(105.0, 1.0), &metrics(), 1.0).unwrap();
        assert_eq!((block.start_minute, block.end_minute), (100, 115));
    }

    #[test]
    fn upward_drag_is_normalised() {
        let drag = DragGesture::press(10.0, row(600.0, 2.0));
        let block = drag.release(row(540.0, 2.0), &metrics(), 2.0).unwrap();
        assert_eq!((block.start_minute, block.end_minute), (540, 600));
    }

    #[test]
    fn span_stays_inside_the_day() {
        assert_eq!(
            span_to_minutes(row(1435.0, 1.0), row(1436.0, 1.0), &metrics(), 1.0),
            (1425, 1440)
        );
        assert_eq!(
            span_to_minutes(row(1500.0, 1.0), row(1600.0, 1.0), &metrics(), 1.0),
            (1425, 1440)
        );
        assert_eq!(span_to_minutes(0.0, 1.0, &metrics(), 1.0), (0, 15));
    }

    #[test]
    fn zoom_scales_rows_to_minutes() {
        assert_eq!(
            span_to_minutes(row(60.0, 0.5), row(120.0, 0.5), &metrics(), 0.5),
            (60, 120)
        );
    }

    #[test]
    fn release_without_movement_is_a_click() {
        let drag = DragGesture::press(10.0, 50.0);
        assert!(drag.release(50.0, &metrics(), 1.0).is_none());
    }

    #[test]
    fn every_created_span_is_at_least_fifteen_minutes() {
        for zoom in [0.25, 0.5, 1.0, 2.0, 4.0] {
            for (a, b) in [(0.0, 3.0), (700.0, 701.0), (1439.0, 1439.5), (200.0, 10.0)] {
                let (start, end) = span_to_minutes(row(a, zoom), row(b, zoom), &metrics(), zoom);
                assert!(end - start >= MIN_BLOCK_MINUTES, "zoom {zoom} {a}->{b}");
                assert!(end <= MINUTES_PER_DAY);
            }
        }
    }
}
