use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use super::grouping::HierarchyLevel;
use super::observe::{Observers, Subscription};
use super::timeline::{clamp_zoom, DEFAULT_ZOOM};
use super::tools::ToolMode;

/// Multiplier applied by one zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewChange {
    Zoom(f64),
    HierarchyLevel(HierarchyLevel),
    Tool(ToolMode),
}

/// Zoom, hierarchy level and active tool, shared between the calendar and
/// whatever controls drive it. Listeners run while the state is borrowed and
/// must not borrow it again.
#[derive(Debug)]
pub struct ViewState {
    zoom: f64,
    hierarchy_level: HierarchyLevel,
    active_tool: ToolMode,
    observers: Observers<ViewChange>,
}

pub type SharedViewState = Rc<RefCell<ViewState>>;

impl ViewState {
    pub fn new(zoom: f64, hierarchy_level: HierarchyLevel, active_tool: ToolMode) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            hierarchy_level,
            active_tool,
            observers: Observers::new(),
        }
    }

    pub fn into_shared(self) -> SharedViewState {
        Rc::new(RefCell::new(self))
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Stores `zoom` clamped to the allowed range and returns the stored value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        let clamped = clamp_zoom(zoom);
        if clamped != self.zoom {
            self.zoom = clamped;
            debug!("event=view_change module=view_state field=zoom value={}", clamped);
            self.observers.notify(&ViewChange::Zoom(clamped));
        }
        self.zoom
    }

    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        self.set_zoom(self.zoom * factor)
    }

    pub fn hierarchy_level(&self) -> HierarchyLevel {
        self.hierarchy_level
    }

    pub fn set_hierarchy_level(&mut self, level: HierarchyLevel) {
        if level != self.hierarchy_level {
            self.hierarchy_level = level;
            self.observers.notify(&ViewChange::HierarchyLevel(level));
        }
    }

    pub fn active_tool(&self) -> ToolMode {
        self.active_tool
    }

    pub fn set_tool(&mut self, tool: ToolMode) {
        if tool != self.active_tool {
            self.active_tool = tool;
            self.observers.notify(&ViewChange::Tool(tool));
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ViewChange) + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM, HierarchyLevel::default(), ToolMode::default())
    }
}
