use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

pub struct Header<'a> {
    pub breadcrumb: &'a str,
    pub zoom: f64,
    pub level: &'a str,
    pub tool: &'a str,
}

impl<'a> Widget for Header<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = Style::default().bg(Color::DarkGray);
        let title = Span::styled(
            " cockpit ",
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let crumbs = Span::styled(
            format!(" {} ", self.breadcrumb),
            Style::default().fg(Color::Cyan).bg(Color::DarkGray),
        );

        let strip = format!(
            "{:.2}x  {}  [{}] ",
            self.zoom, self.level, self.tool
        );
        let strip_width = strip.chars().count() as u16;
        let spacer_len = area
            .width
            .saturating_sub(title.width() as u16 + crumbs.width() as u16 + strip_width);
        let spacer = Span::styled(" ".repeat(spacer_len as usize), bg);
        let strip = Span::styled(strip, Style::default().fg(Color::Gray).bg(Color::DarkGray));

        let line = Line::from(vec![title, crumbs, spacer, strip]);
        line.render(area, buf);
    }
}
