use std::time::Duration;

use chrono::{Local, NaiveTime, Timelike};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

use crate::api::fetcher::ScheduleCache;
use crate::api::types::ScheduleBlock;
use crate::calendar::block_store::{BlockStore, SharedBlockStore};
use crate::calendar::events::{shared_bus, SharedEventBus};
use crate::calendar::timeline::TimelineMetrics;
use crate::calendar::tools::SelectionEvent;
use crate::calendar::view_state::{SharedViewState, ViewState};
use crate::calendar::{CalendarView, MountContext};

#[derive(Debug)]
pub enum AppMessage {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    ScheduleLoaded(Vec<ScheduleBlock>),
    Selected(Option<SelectionEvent>),
    BlocksChanged,
    /// Carries the save generation it was scheduled for.
    FlushBlocks(u64),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    Schedule { force: bool },
}

/// Calendar settings the host hands to [`AppState::new`].
pub struct Settings {
    pub view_state: ViewState,
    pub store: BlockStore,
    pub drag_create: bool,
    pub schedule_ttl: Duration,
    pub save_debounce: Duration,
}

pub struct AppState {
    pub view: CalendarView,
    pub view_state: SharedViewState,
    pub store: SharedBlockStore,
    pub bus: SharedEventBus,
    pub schedule: ScheduleCache,
    pub selection: Option<SelectionEvent>,
    pub status_message: Option<String>,
    pub hints: Vec<(String, &'static str)>,
    pub show_help: bool,
    pub should_quit: bool,
    pub refresh_counter: u32,
    pub save_generation: u64,
    pub save_debounce: Duration,
    /// Where the calendar was last drawn, for translating mouse positions.
    pub calendar_area: Rect,
}

impl AppState {
    pub fn new(hints: Vec<(String, &'static str)>, settings: Settings) -> Self {
        let now = Local::now();
        let view_state = settings.view_state.into_shared();
        let store = settings.store.into_shared();
        let bus = shared_bus();
        let mut view = CalendarView::mount(MountContext {
            view_state: view_state.clone(),
            store: store.clone(),
            event_bus: bus.clone(),
            metrics: TimelineMetrics::default(),
            drag_create: settings.drag_create,
            today: now.date_naive(),
        });
        view.set_today(now.date_naive(), Some(minute_of_day(now.time())));

        Self {
            view,
            view_state,
            store,
            bus,
            schedule: ScheduleCache::new(settings.schedule_ttl),
            selection: None,
            status_message: Some("Loading schedule...".into()),
            hints,
            show_help: false,
            should_quit: false,
            refresh_counter: 0,
            save_generation: 0,
            save_debounce: settings.save_debounce,
            calendar_area: Rect::default(),
        }
    }

    pub fn breadcrumb(&self) -> String {
        self.view.navigator().breadcrumb().join(" › ")
    }
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
