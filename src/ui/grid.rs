use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as WidgetBlock, BorderType, Borders, Widget};

use crate::calendar::grid::{GridCell, GridLayout, Tense};
use crate::calendar::hit::HitTarget;
use crate::calendar::timeline::{display_width, truncate_to_width};

use super::surface_rect;

/// Year, Month and Week views.
pub struct GridView<'a> {
    pub layout: &'a GridLayout,
}

fn tense_style(tense: Tense, dimmed: bool) -> Style {
    if dimmed {
        return Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM);
    }
    match tense {
        Tense::Overdue => Style::default().fg(Color::DarkGray),
        Tense::Current => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Tense::Future => Style::default().fg(Color::White),
    }
}

fn render_lines(lines: &[String], area: Rect, style: Style, buf: &mut Buffer) {
    let width = area.width as usize;
    for (i, text) in lines.iter().enumerate() {
        if i as u16 >= area.height {
            break;
        }
        let remaining = lines.len() - i;
        let text = if i as u16 == area.height - 1 && remaining > 1 {
            format!("+{} more", remaining)
        } else {
            truncate_to_width(text, width, display_width)
        };
        Line::styled(text, style).render(Rect::new(area.x, area.y + i as u16, area.width, 1), buf);
    }
}

fn render_cell(cell: &GridCell, rect: Rect, buf: &mut Buffer) {
    let style = tense_style(cell.tense, cell.dimmed);
    let line_style = Style::default().fg(Color::Gray);

    if let HitTarget::Week(_) = cell.target {
        Line::styled(cell.label.clone(), Style::default().fg(Color::Cyan)).render(rect, buf);
        return;
    }

    if cell.label.is_empty() {
        // Week columns: the weekday header sits on the first row
        let body = Rect::new(rect.x, rect.y + 1, rect.width, rect.height.saturating_sub(1));
        render_lines(&cell.lines, body, line_style, buf);
        return;
    }

    if rect.height >= 3 && rect.width >= 5 {
        let border = if cell.tense == Tense::Current && !cell.dimmed {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let block = WidgetBlock::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(Span::styled(cell.label.clone(), style));
        let inner = block.inner(rect);
        block.render(rect, buf);
        render_lines(&cell.lines, inner, line_style, buf);
    } else {
        Line::styled(cell.label.clone(), style).render(Rect::new(rect.x, rect.y, rect.width, 1), buf);
        let body = Rect::new(rect.x, rect.y + 1, rect.width, rect.height.saturating_sub(1));
        render_lines(&cell.lines, body, line_style, buf);
    }
}

impl<'a> Widget for GridView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        Line::styled(
            self.layout.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
        .centered()
        .render(Rect::new(area.x, area.y, area.width, 1), buf);

        for cell in &self.layout.cells {
            if let Some(rect) = surface_rect(&cell.area, area, 0.0) {
                render_cell(cell, rect, buf);
            }
        }

        for (label_area, label) in &self.layout.column_labels {
            if let Some(rect) = surface_rect(label_area, area, 0.0) {
                let rect = Rect::new(rect.x, rect.y, rect.width, 1);
                Line::styled(
                    truncate_to_width(label, rect.width as usize, display_width),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                )
                .centered()
                .render(rect, buf);
            }
        }
    }
}
