use std::cell::RefCell;
use std::rc::Rc;

use super::observe::Observers;
use super::tools::SelectionEvent;

pub const SELECTED_EVENT: &str = "calendar:selected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    /// `None` means the selection was cleared.
    Selected(Option<SelectionEvent>),
}

impl CalendarEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CalendarEvent::Selected(_) => SELECTED_EVENT,
        }
    }
}

pub type EventBus = Observers<CalendarEvent>;
pub type SharedEventBus = Rc<RefCell<EventBus>>;

pub fn shared_bus() -> SharedEventBus {
    Rc::new(RefCell::new(EventBus::new()))
}
