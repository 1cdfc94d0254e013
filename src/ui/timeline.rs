use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Widget;

use crate::calendar::timeline::{display_width, truncate_to_width, TimelineLayout};

use super::surface_rect;

const RULE: &str = "┈";
const NOW_MARKER: &str = "▶";

/// The Day view: a scrolled window onto the timeline surface.
pub struct TimelineView<'a> {
    pub layout: &'a TimelineLayout,
    /// Surface row drawn at the top of `area`.
    pub scroll: f64,
}

impl<'a> TimelineView<'a> {
    fn screen_row(&self, area: Rect, y: f64) -> Option<u16> {
        let row = (y - self.scroll).floor();
        if row < 0.0 || row >= area.height as f64 {
            return None;
        }
        Some(area.y + row as u16)
    }
}

impl<'a> Widget for TimelineView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout;
        let label_x = (layout.label_x as u16).min(area.width);
        let text_width = area.width - label_x;

        if let Some(row) = self.screen_row(area, 0.0) {
            Line::styled(
                layout.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
            .render(Rect::new(area.x, row, area.width, 1), buf);
        }

        let rule_style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
        for tick in &layout.ticks {
            let Some(row) = self.screen_row(area, tick.y) else {
                continue;
            };
            Line::styled(tick.label.clone(), Style::default().fg(Color::DarkGray))
                .render(Rect::new(area.x, row, label_x, 1), buf);
            Line::styled(RULE.repeat(text_width as usize), rule_style)
                .render(Rect::new(area.x + label_x, row, text_width, 1), buf);
        }

        for span in &layout.manual {
            let Some(rect) = surface_rect(&span.area, area, self.scroll) else {
                continue;
            };
            let bg = if span.preview {
                Color::Magenta
            } else {
                Color::Blue
            };
            buf.set_style(rect, Style::default().bg(bg).fg(Color::White));
            let text = truncate_to_width(&span.text, rect.width as usize, display_width);
            buf.set_string(rect.x, rect.y, text, Style::default().bg(bg).fg(Color::White));
        }

        if let Some(highlight) = &layout.highlight {
            if let Some(rect) = surface_rect(highlight, area, self.scroll) {
                buf.set_style(rect, Style::default().bg(Color::DarkGray));
            }
        }

        for line in &layout.lines {
            let Some(row) = self.screen_row(area, line.y) else {
                continue;
            };
            let style = if line.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let rect = Rect::new(area.x + label_x, row, text_width, 1);
            // Clear the rule under the label
            buf.set_string(rect.x, rect.y, " ".repeat(text_width as usize), Style::default());
            if line.selected {
                buf.set_style(rect, style);
            }
            Line::styled(line.text.clone(), style).render(rect, buf);
        }

        if let Some(now_y) = layout.now_y {
            if let Some(row) = self.screen_row(area, now_y) {
                let x = area.x + label_x.saturating_sub(1);
                buf.set_string(x, row, NOW_MARKER, Style::default().fg(Color::Red));
            }
        }
    }
}
