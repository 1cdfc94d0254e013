pub mod api;
pub mod calendar;
pub mod error;

// Convenience re-exports
pub use api::client::CockpitClient;
pub use api::types;
pub use calendar::{CalendarView, MountContext, Scene};
pub use error::{CalendarError, Result};
