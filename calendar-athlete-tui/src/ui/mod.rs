mod calendar_tab;
mod day_view;
mod layout;
mod modals;
mod plans_tab;
mod status_bar;
mod tabs;

// Re-export the main render function
pub use layout::render_ui;
