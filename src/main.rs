mod app;
mod model;
mod receipts;
mod state;
mod ui;
mod utils;

use adw::prelude::*;
use adw::Application;

fn main() {
    let app = Application::builder()
        .application_id("com.example.CourierGtk")
        .build();
    app.connect_activate(|app| {
        crate::app::build_ui(app);
    });
    app.run();
}
