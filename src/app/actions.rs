use log::debug;

use crate::calendar::grouping::HierarchyLevel;
use crate::calendar::tools::ToolMode;
use crate::calendar::view_state::ZOOM_STEP;
use crate::keys::preset::Action;

use super::state::{AppState, LoadRequest};

/// Rows moved per scroll key press or wheel notch.
pub(super) const SCROLL_ROWS: f64 = 3.0;

pub(super) fn handle_action(state: &mut AppState, action: &Action) -> Option<LoadRequest> {
    match action {
        Action::Quit => state.should_quit = true,
        Action::Back => {
            if !state.view.back() {
                state.status_message = Some("Already at the year view".into());
            }
        }
        Action::Help => state.show_help = !state.show_help,
        Action::Refresh => {
            state.status_message = Some("Refreshing schedule...".into());
            return Some(LoadRequest::Schedule { force: true });
        }
        Action::Today => {
            state.view.jump_to_today();
            return Some(LoadRequest::Schedule { force: false });
        }
        Action::Prev => state.view.step(-1),
        Action::Next => state.view.step(1),
        Action::ZoomIn => zoom_by(state, ZOOM_STEP),
        Action::ZoomOut => zoom_by(state, 1.0 / ZOOM_STEP),
        Action::ScrollUp => state.view.scroll_by(-SCROLL_ROWS),
        Action::ScrollDown => state.view.scroll_by(SCROLL_ROWS),
        Action::LevelRoutine => set_level(state, HierarchyLevel::Routine),
        Action::LevelSubroutine => set_level(state, HierarchyLevel::Subroutine),
        Action::LevelMicroroutine => set_level(state, HierarchyLevel::Microroutine),
        Action::LevelLeaf => set_level(state, HierarchyLevel::Leaf),
        Action::ToolCursor => set_tool(state, ToolMode::Cursor),
        Action::ToolSelect => set_tool(state, ToolMode::Select),
        Action::ToolPicker => set_tool(state, ToolMode::Picker),
        Action::ToolEraser => set_tool(state, ToolMode::Eraser),
    }
    None
}

pub(super) fn zoom_by(state: &mut AppState, factor: f64) {
    let zoom = state.view_state.borrow_mut().zoom_by(factor);
    debug!("event=zoom module=host zoom={:.2}", zoom);
    state.status_message = Some(format!("Zoom {:.2}x", zoom));
}

fn set_level(state: &mut AppState, level: HierarchyLevel) {
    state.view_state.borrow_mut().set_hierarchy_level(level);
    state.status_message = Some(format!("Showing {}", level.label()));
}

fn set_tool(state: &mut AppState, tool: ToolMode) {
    state.view_state.borrow_mut().set_tool(tool);
    state.status_message = Some(format!("Tool: {}", tool.label()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_helpers::{day_state, test_state};
    use crate::calendar::navigator::Mode;

    #[test]
    fn quit_sets_flag() {
        let mut state = test_state();
        handle_action(&mut state, &Action::Quit);
        assert!(state.should_quit);
    }

    #[test]
    fn help_toggles() {
        let mut state = test_state();
        handle_action(&mut state, &Action::Help);
        assert!(state.show_help);
        handle_action(&mut state, &Action::Help);
        assert!(!state.show_help);
    }

    #[test]
    fn refresh_forces_schedule_fetch() {
        let mut state = test_state();
        assert_eq!(
            handle_action(&mut state, &Action::Refresh),
            Some(LoadRequest::Schedule { force: true })
        );
    }

    #[test]
    fn back_at_year_reports_status() {
        let mut state = test_state();
        handle_action(&mut state, &Action::Back);
        assert_eq!(state.view.mode(), Mode::Year);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn back_from_day_goes_to_week() {
        let mut state = day_state();
        handle_action(&mut state, &Action::Back);
        assert_eq!(state.view.mode(), Mode::Week);
    }

    #[test]
    fn prev_and_next_step_the_year() {
        let mut state = test_state();
        let year = state.view.navigator().selected_year;
        handle_action(&mut state, &Action::Next);
        assert_eq!(state.view.navigator().selected_year, year + 1);
        handle_action(&mut state, &Action::Prev);
        handle_action(&mut state, &Action::Prev);
        assert_eq!(state.view.navigator().selected_year, year - 1);
    }

    #[test]
    fn zoom_goes_through_shared_view_state() {
        let mut state = test_state();
        handle_action(&mut state, &Action::ZoomIn);
        assert_eq!(state.view_state.borrow().zoom(), ZOOM_STEP);
        handle_action(&mut state, &Action::ZoomOut);
        assert!((state.view_state.borrow().zoom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut state = test_state();
        for _ in 0..20 {
            handle_action(&mut state, &Action::ZoomIn);
        }
        assert_eq!(state.view_state.borrow().zoom(), 4.0);
    }

    #[test]
    fn level_and_tool_keys_update_view_state() {
        let mut state = test_state();
        handle_action(&mut state, &Action::LevelRoutine);
        handle_action(&mut state, &Action::ToolPicker);
        let vs = state.view_state.borrow();
        assert_eq!(vs.hierarchy_level(), HierarchyLevel::Routine);
        assert_eq!(vs.active_tool(), ToolMode::Picker);
        drop(vs);
        assert_eq!(state.status_message.as_deref(), Some("Tool: picker"));
    }

    #[test]
    fn today_jumps_to_day_mode() {
        let mut state = test_state();
        let request = handle_action(&mut state, &Action::Today);
        assert_eq!(state.view.mode(), Mode::Day);
        assert_eq!(request, Some(LoadRequest::Schedule { force: false }));
    }
}
