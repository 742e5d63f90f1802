use adw::Application;

pub fn build_ui(app: &Application) {
    crate::ui::main_window::show_main_window(app);
}
