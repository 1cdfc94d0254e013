use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use log::{debug, info};

use crate::api::types::ScheduleBlock;

use super::block_store::SharedBlockStore;
use super::drag::DragGesture;
use super::events::{CalendarEvent, SharedEventBus};
use super::grid::{month_layout, monday_on_or_before, week_layout, year_layout, GridLayout};
use super::grouping::group_blocks;
use super::hit::{hit_test, Area, HitRegion};
use super::navigator::{Mode, NavigatorState};
use super::observe::Subscription;
use super::timeline::{layout_day, DayInput, TimelineLayout, TimelineMetrics};
use super::tools::{dispatch_click, PickerMenu, Selection, SelectionEvent, ToolMode, ToolOutcome};
use super::view_state::{SharedViewState, ViewChange};

/// Minute shown at the top of the day timeline when nothing better is known.
const DEFAULT_TOP_MINUTE: f64 = 8.0 * 60.0;
/// How far above "now" or the first entry the day timeline opens.
const LEAD_MINUTES: f64 = 15.0;

/// Everything a calendar needs from its host.
pub struct MountContext {
    pub view_state: SharedViewState,
    pub store: SharedBlockStore,
    pub event_bus: SharedEventBus,
    pub metrics: TimelineMetrics,
    pub drag_create: bool,
    pub today: NaiveDate,
}

/// The output of one render pass. Hit regions are only valid until the next
/// render.
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Grid(GridLayout),
    Timeline(TimelineLayout),
}

impl Scene {
    pub fn hit_regions(&self) -> &[HitRegion] {
        match self {
            Scene::Grid(layout) => &layout.hit_regions,
            Scene::Timeline(layout) => &layout.hit_regions,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Scene::Grid(layout) => &layout.title,
            Scene::Timeline(layout) => &layout.title,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pointer {
    gesture: DragGesture,
    creates_block: bool,
}

/// A mounted calendar: navigator, current scene, Day-mode selection and the
/// subscriptions that keep it in sync with the shared view state and store.
pub struct CalendarView {
    nav: NavigatorState,
    view_state: SharedViewState,
    store: SharedBlockStore,
    bus: SharedEventBus,
    metrics: TimelineMetrics,
    drag_create: bool,
    today: NaiveDate,
    now_minute: Option<u32>,
    schedule: Vec<ScheduleBlock>,
    selection: Option<Selection>,
    picker: Option<PickerMenu>,
    pointer: Option<Pointer>,
    scene: Option<Scene>,
    viewport: (f64, f64),
    top_minute: f64,
    scroll: f64,
    extent: f64,
    zoom: f64,
    dirty: Rc<Cell<bool>>,
    extent_dirty: Rc<Cell<bool>>,
    view_sub: Option<Subscription>,
    store_sub: Option<Subscription>,
}

impl CalendarView {
    pub fn mount(ctx: MountContext) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let extent_dirty = Rc::new(Cell::new(true));

        let view_sub = {
            let dirty = Rc::clone(&dirty);
            let extent_dirty = Rc::clone(&extent_dirty);
            ctx.view_state.borrow_mut().subscribe(move |change| {
                if let ViewChange::Zoom(_) = change {
                    extent_dirty.set(true);
                }
                dirty.set(true);
            })
        };
        let store_sub = {
            let dirty = Rc::clone(&dirty);
            ctx.store.borrow_mut().subscribe(move |_| dirty.set(true))
        };
        let zoom = ctx.view_state.borrow().zoom();

        info!("event=view_mount module=calendar status=ok today={}", ctx.today);
        Self {
            nav: NavigatorState::new(ctx.today),
            view_state: ctx.view_state,
            store: ctx.store,
            bus: ctx.event_bus,
            metrics: ctx.metrics,
            drag_create: ctx.drag_create,
            today: ctx.today,
            now_minute: None,
            schedule: Vec::new(),
            selection: None,
            picker: None,
            pointer: None,
            scene: None,
            viewport: (0.0, 0.0),
            top_minute: DEFAULT_TOP_MINUTE,
            scroll: 0.0,
            extent: ctx.metrics.surface_height(zoom),
            zoom,
            dirty,
            extent_dirty,
            view_sub: Some(view_sub),
            store_sub: Some(store_sub),
        }
    }

    /// Releases the view's subscriptions. Safe to call twice.
    pub fn dispose(&mut self) {
        if let Some(sub) = self.view_sub.take() {
            self.view_state.borrow_mut().unsubscribe(sub);
        }
        if let Some(sub) = self.store_sub.take() {
            self.store.borrow_mut().unsubscribe(sub);
        }
        self.scene = None;
        debug!("event=view_dispose module=calendar status=ok");
    }

    pub fn navigator(&self) -> &NavigatorState {
        &self.nav
    }

    pub fn mode(&self) -> Mode {
        self.nav.mode
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn picker(&self) -> Option<&PickerMenu> {
        self.picker.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn schedule(&self) -> &[ScheduleBlock] {
        &self.schedule
    }

    /// Surface row shown at the top of the viewport. Always 0 outside Day mode.
    pub fn scroll(&self) -> f64 {
        if self.nav.mode == Mode::Day {
            self.scroll
        } else {
            0.0
        }
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get() || self.extent_dirty.get()
    }

    pub fn redraw(&mut self) {
        self.dirty.set(true);
    }

    pub fn set_schedule(&mut self, blocks: Vec<ScheduleBlock>) {
        self.schedule = blocks;
        self.redraw();
    }

    pub fn set_today(&mut self, today: NaiveDate, now_minute: Option<u32>) {
        if today != self.today || now_minute != self.now_minute {
            self.today = today;
            self.now_minute = now_minute;
            self.redraw();
        }
    }

    /// Rebuilds the scene for a `width` x `height` viewport. View state is
    /// re-read on every call.
    pub fn render(&mut self, width: f64, height: f64) -> &Scene {
        let (zoom, level) = {
            let state = self.view_state.borrow();
            (state.zoom(), state.hierarchy_level())
        };
        if self.extent_dirty.get() || zoom != self.zoom {
            self.extent = self.metrics.surface_height(zoom);
            self.zoom = zoom;
            self.extent_dirty.set(false);
        }
        self.viewport = (width, height);
        let surface = Area::new(0.0, 0.0, width, height);

        let scene = match self.nav.mode {
            Mode::Year => Scene::Grid(year_layout(surface, self.nav.selected_year, self.today)),
            Mode::Month => {
                let store = self.store.borrow();
                let month = self.nav.selected_month.unwrap_or(1);
                Scene::Grid(month_layout(surface, self.nav.selected_year, month, self.today, |d| {
                    store.blocks_for(d).iter().map(|b| b.label()).collect()
                }))
            }
            Mode::Week => {
                let store = self.store.borrow();
                let start = self
                    .nav
                    .selected_week_start
                    .unwrap_or_else(|| monday_on_or_before(self.today));
                Scene::Grid(week_layout(surface, start, self.today, |d| {
                    store.blocks_for(d).iter().map(|b| b.label()).collect()
                }))
            }
            Mode::Day => {
                self.clamp_scroll();
                let date = self.nav.selected_date.unwrap_or(self.today);
                let preview = self
                    .pointer
                    .filter(|p| p.creates_block && p.gesture.moved())
                    .map(|p| p.gesture.preview(&self.metrics, zoom));
                let store = self.store.borrow();
                let input = DayInput {
                    date,
                    blocks: &self.schedule,
                    level,
                    zoom,
                    width,
                    selection_minute: self.selection.as_ref().map(|s| s.start_minute),
                    manual: store.blocks_for(date),
                    preview,
                    now_minute: self.now_minute.filter(|_| date == self.today),
                };
                Scene::Timeline(layout_day(&input, &self.metrics))
            }
        };
        self.dirty.set(false);
        self.scene.insert(scene)
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = (self.extent - self.viewport.1).max(0.0);
        self.scroll = (self.top_minute * self.zoom).clamp(0.0, max_scroll);
        self.top_minute = self.scroll / self.zoom;
    }

    fn to_surface(&self, vx: f64, vy: f64) -> (f64, f64) {
        (vx, vy + self.scroll())
    }

    /// A click at viewport coordinates. Returns true when anything changed.
    pub fn click(&mut self, vx: f64, vy: f64) -> bool {
        let (x, y) = self.to_surface(vx, vy);
        self.click_surface(x, y)
    }

    fn click_surface(&mut self, x: f64, y: f64) -> bool {
        if let Some(menu) = self.picker.take() {
            if let Some(selection) = menu.item_at(x, y).and_then(|i| menu.choose(i)) {
                self.select(Some(selection));
            }
            self.redraw();
            return true;
        }

        let Some(scene) = &self.scene else {
            return false;
        };
        match scene {
            Scene::Grid(layout) => {
                let Some(target) = hit_test(&layout.hit_regions, x, y).map(|r| r.payload) else {
                    return false;
                };
                if self.nav.descend(target) {
                    debug!(
                        "event=navigate module=calendar direction=down mode={}",
                        self.nav.mode.label()
                    );
                    self.on_mode_changed();
                    return true;
                }
                false
            }
            Scene::Timeline(layout) => {
                let tool = self.view_state.borrow().active_tool();
                let outcome = dispatch_click(tool, &layout.groups, &layout.hit_regions, x, y);
                self.apply_outcome(tool, outcome)
            }
        }
    }

    fn apply_outcome(&mut self, tool: ToolMode, outcome: ToolOutcome) -> bool {
        match outcome {
            ToolOutcome::Select(selection) => self.select(Some(selection)),
            ToolOutcome::Clear => self.select(None),
            ToolOutcome::OpenPicker(mut menu) => {
                menu.fit_within(Area::new(0.0, self.scroll(), self.viewport.0, self.viewport.1));
                self.picker = Some(menu);
            }
            ToolOutcome::Ignored => {
                if tool == ToolMode::Eraser {
                    debug!("event=tool_click module=calendar tool=eraser status=ignored");
                }
                return false;
            }
        }
        self.redraw();
        true
    }

    fn select(&mut self, selection: Option<Selection>) {
        let event = selection.as_ref().map(SelectionEvent::from);
        self.selection = selection;
        debug!(
            "event=selection module=calendar status={}",
            if event.is_some() { "set" } else { "cleared" }
        );
        self.bus.borrow_mut().notify(&CalendarEvent::Selected(event));
    }

    /// Starts a pointer gesture. In Day mode, a press inside the timeline
    /// body may become a drag that creates a block.
    pub fn press(&mut self, vx: f64, vy: f64) {
        let (x, y) = self.to_surface(vx, vy);
        let creates_block = self.drag_create
            && self.nav.mode == Mode::Day
            && self.picker.is_none()
            && self
                .metrics
                .body(self.viewport.0, self.zoom)
                .contains(x, y);
        self.pointer = Some(Pointer {
            gesture: DragGesture::press(x, y),
            creates_block,
        });
    }

    pub fn drag_to(&mut self, _vx: f64, vy: f64) {
        let (_, y) = self.to_surface(0.0, vy);
        if let Some(pointer) = self.pointer.as_mut() {
            pointer.gesture.move_to(y);
            if pointer.creates_block {
                self.dirty.set(true);
            }
        }
    }

    /// Ends the gesture: a moved drag creates a block, anything else is a
    /// click at the press position.
    pub fn release(&mut self, _vx: f64, vy: f64) -> bool {
        let (_, y) = self.to_surface(0.0, vy);
        let Some(pointer) = self.pointer.take() else {
            return false;
        };
        let gesture = pointer.gesture;
        if pointer.creates_block {
            if let Some(block) = gesture.release(y, &self.metrics, self.zoom) {
                let date = self.nav.selected_date.unwrap_or(self.today);
                info!(
                    "event=block_create module=calendar date={} start={} end={}",
                    date, block.start_minute, block.end_minute
                );
                self.store.borrow_mut().add(date, block);
                self.redraw();
                return true;
            }
        }
        self.click_surface(gesture.origin_x, gesture.origin_y)
    }

    /// One level of back-navigation, after dismissing any open menu or drag.
    pub fn back(&mut self) -> bool {
        if self.picker.take().is_some() {
            self.redraw();
            return true;
        }
        if self.pointer.take().is_some() {
            self.redraw();
            return true;
        }
        if self.nav.ascend() {
            debug!(
                "event=navigate module=calendar direction=up mode={}",
                self.nav.mode.label()
            );
            self.on_mode_changed();
            return true;
        }
        false
    }

    pub fn step(&mut self, delta: i32) {
        self.nav.step(delta);
        self.on_mode_changed();
    }

    pub fn jump_to_today(&mut self) {
        self.nav.jump_to_today(self.today);
        self.on_mode_changed();
    }

    /// Scrolls the day timeline by `rows` surface rows.
    pub fn scroll_by(&mut self, rows: f64) {
        if self.nav.mode != Mode::Day {
            return;
        }
        self.top_minute = (self.top_minute + rows / self.zoom).max(0.0);
        self.clamp_scroll();
        self.redraw();
    }

    pub fn picker_move(&mut self, delta: i32) {
        if let Some(menu) = self.picker.as_mut() {
            menu.move_highlight(delta);
            self.dirty.set(true);
        }
    }

    pub fn picker_confirm(&mut self) -> bool {
        let Some(menu) = self.picker.take() else {
            return false;
        };
        if let Some(selection) = menu.choose_highlighted() {
            self.select(Some(selection));
        }
        self.redraw();
        true
    }

    fn on_mode_changed(&mut self) {
        self.picker = None;
        self.pointer = None;
        if self.selection.is_some() {
            self.select(None);
        }
        if self.nav.mode == Mode::Day {
            self.top_minute = self.initial_top_minute();
        }
        self.extent_dirty.set(true);
        self.dirty.set(true);
    }

    fn initial_top_minute(&self) -> f64 {
        let date = self.nav.selected_date.unwrap_or(self.today);
        if date == self.today {
            if let Some(now) = self.now_minute {
                return (now as f64 - LEAD_MINUTES).max(0.0);
            }
        }
        let level = self.view_state.borrow().hierarchy_level();
        group_blocks(&self.schedule, level)
            .first()
            .map(|g| (g.start_minute as f64 - LEAD_MINUTES).max(0.0))
            .unwrap_or(DEFAULT_TOP_MINUTE)
    }
}
