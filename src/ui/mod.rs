pub mod grid;
pub mod header;
pub mod status_bar;
pub mod timeline;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as WidgetBlock, BorderType, Borders, Clear};
use ratatui::Frame;

use crate::api::types::format_minute;
use crate::app::AppState;
use crate::calendar::hit::Area;
use crate::calendar::tools::PickerMenu;
use crate::calendar::Scene;

use grid::GridView;
use header::Header;
use status_bar::StatusBar;
use timeline::TimelineView;

/// Projects a surface area onto `viewport`, shifted up by `scroll` and
/// clipped. Edges are floored so neighbouring areas tile exactly.
pub(crate) fn surface_rect(area: &Area, viewport: Rect, scroll: f64) -> Option<Rect> {
    let top = area.y - scroll;
    let x0 = area.x.max(0.0).floor();
    let y0 = top.max(0.0).floor();
    let x1 = area.right().min(viewport.width as f64).floor();
    let y1 = (top + area.h).min(viewport.height as f64).floor();
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(
        viewport.x + x0 as u16,
        viewport.y + y0 as u16,
        (x1 - x0) as u16,
        (y1 - y0) as u16,
    ))
}

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let breadcrumb = state.breadcrumb();
    let (zoom, level, tool) = {
        let vs = state.view_state.borrow();
        (vs.zoom(), vs.hierarchy_level().label(), vs.active_tool().label())
    };
    let header = Header {
        breadcrumb: &breadcrumb,
        zoom,
        level,
        tool,
    };
    frame.render_widget(header, chunks[0]);

    let area = chunks[1];
    state.calendar_area = area;
    state.view.render(area.width as f64, area.height as f64);
    let scroll = state.view.scroll();
    match state.view.scene() {
        Some(Scene::Grid(layout)) => frame.render_widget(GridView { layout }, area),
        Some(Scene::Timeline(layout)) => frame.render_widget(TimelineView { layout, scroll }, area),
        None => {}
    }

    if let Some(menu) = state.view.picker() {
        render_picker_popup(frame, menu, area, scroll);
    }

    if state.show_help {
        render_help_popup(frame, &state.hints, area);
    }

    let selection = state.selection.as_ref().map(|s| s.summary());
    let status = StatusBar {
        hints: &state.hints,
        message: state.status_message.as_deref(),
        selection: selection.as_deref(),
        fetching: state.schedule.is_in_flight(),
    };
    frame.render_widget(status, chunks[2]);
}

/// Draws the picker exactly over its hit regions so clicks land on the
/// entry under the pointer.
fn render_picker_popup(frame: &mut Frame, menu: &PickerMenu, area: Rect, scroll: f64) {
    let Some(popup_area) = surface_rect(&menu.area(), area, scroll) else {
        return;
    };
    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", format_minute(menu.start_minute));
    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    frame.render_widget(block, popup_area);

    let labels = menu.labels();
    for (item_area, index) in menu.item_regions() {
        let Some(line_area) = surface_rect(&item_area, area, scroll) else {
            continue;
        };
        let style = if index == menu.highlighted {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Gray)
        };
        let text = labels.get(index).cloned().unwrap_or_default();
        let padding = (line_area.width as usize).saturating_sub(text.chars().count() + 1);
        let padded = format!(" {}{}", text, " ".repeat(padding));
        frame.render_widget(Line::from(Span::styled(padded, style)), line_area);
    }
}

fn render_help_popup(frame: &mut Frame, hints: &[(String, &str)], area: Rect) {
    let line_count = hints.len();
    let popup_height = (line_count + 3).min(area.height as usize) as u16; // +2 borders +1 footer
    let popup_width = (area.width * 60 / 100).max(30).min(area.width);
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width, popup_height);
    frame.render_widget(Clear, popup_area);

    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Help ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    for (i, (key_str, action_name)) in hints.iter().enumerate() {
        if i as u16 >= inner.height.saturating_sub(1) {
            break;
        }
        let key_span = Span::styled(
            format!("{:>12}", key_str),
            Style::default().fg(Color::Yellow),
        );
        let sep = Span::styled("  ", Style::default());
        let action_span = Span::styled(*action_name, Style::default().fg(Color::White));
        let line = Line::from(vec![key_span, sep, action_span]);
        let line_area = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        frame.render_widget(line, line_area);
    }

    // Footer
    if inner.height > 0 {
        let footer_y = inner.y + inner.height - 1;
        let footer = Line::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        );
        let footer_area = Rect::new(inner.x, footer_y, inner.width, 1);
        frame.render_widget(footer, footer_area);
    }
}
