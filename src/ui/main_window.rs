use std::cell::RefCell;
use std::rc::Rc;

use adw::Application;
use adw::prelude::*;

use crate::ui::inbox_view::InboxView;
use crate::ui::thread_view::ThreadView;

pub fn show_main_window(app: &Application) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Courier")
        .default_width(960)
        .default_height(640)
        .build();

    let split = adw::Flap::builder()
        .reveal_flap(true)
        .locked(true)
        .modal(false)
        .build();

    let inbox = InboxView::new();
    split.set_flap(Some(&inbox.widget()));

    let placeholder = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    placeholder.set_valign(gtk4::Align::Center);
    placeholder.set_hexpand(true);
    let hint = gtk4::Label::new(Some("Select an inbox to start chatting."));
    hint.add_css_class("dim-label");
    placeholder.append(&hint);
    split.set_content(Some(&placeholder));

    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk4::Label::new(Some("Courier"));
    header.set_title_widget(Some(&title));
    container.append(&header);
    container.append(&split);
    window.set_content(Some(&container));

    // Sole strong handle on the open thread. Replacing it drops the previous
    // session, which strands that session's pending read receipts.
    let current_thread: Rc<RefCell<Option<Rc<ThreadView>>>> = Rc::new(RefCell::new(None));
    {
        let split = split.clone();
        let current_thread = current_thread.clone();
        inbox.set_on_select(move |handoff| {
            let view = ThreadView::new(handoff);
            split.set_content(Some(&view.widget()));
            *current_thread.borrow_mut() = Some(view);
        });
    }

    window.present();
}
