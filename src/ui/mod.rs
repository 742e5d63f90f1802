pub mod inbox_view;
pub mod main_window;
pub mod thread_view;
