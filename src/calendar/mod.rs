pub mod block_store;
pub mod drag;
pub mod events;
pub mod grid;
pub mod grouping;
pub mod hit;
pub mod navigator;
pub mod observe;
pub mod timeline;
pub mod tools;
pub mod view;
pub mod view_state;

pub use view::{CalendarView, MountContext, Scene};
