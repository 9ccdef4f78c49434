// calendar-athlete-tui/src/app.rs
mod actions;
mod input;
mod navigation_helpers;
pub mod state;

pub use actions::{max_scroll_offset, SCROLL_STEP};
pub use state::{
    day_fields, ActiveEdit, ActiveModal, ActiveTab, App, DayField, EditTarget, PlanRow,
};
