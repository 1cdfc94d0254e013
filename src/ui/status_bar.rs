use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

pub struct StatusBar<'a> {
    pub hints: &'a [(String, &'static str)],
    pub message: Option<&'a str>,
    /// Summary of the current Day-mode selection.
    pub selection: Option<&'a str>,
    pub fetching: bool,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        if self.fetching {
            spans.push(Span::styled(" ⟳", Style::default().fg(Color::Magenta)));
        }

        if let Some(msg) = self.message {
            spans.push(Span::styled(
                format!(" {} ", msg),
                Style::default().fg(Color::Yellow),
            ));
            Line::from(spans).render(area, buf);
            return;
        }

        if let Some(selection) = self.selection {
            spans.push(Span::styled(
                format!(" ● {} ", selection),
                Style::default().fg(Color::Green),
            ));
            Line::from(spans).render(area, buf);
            return;
        }

        spans.push(Span::raw(" "));
        for (i, (key, action)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::styled(
                action.to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ));
        }

        let line = Line::from(spans);
        line.render(area, buf);
    }
}
