use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use gtk4 as gtk;
use gtk4::prelude::*;
use log::debug;

use crate::model::{MAX_MESSAGE_CHARS, Message, MessageId, ThreadHandoff};
use crate::receipts::{self, READ_RECEIPT_DELAY};
use crate::state::thread::{Submit, ThreadSession};
use crate::utils;

const COMPOSE_EMOJI: [&str; 6] = ["😀", "🎉", "❤️", "😂", "👍", "🥳"];

/// Chat pane for one opened inbox. Owns the thread session; dropping the view
/// tears the session down and strands any receipt still in flight.
pub struct ThreadView {
    root: gtk::Box,
    scroller: gtk::ScrolledWindow,
    messages_box: gtk::Box,
    entry: gtk::Entry,
    counter: gtk::Label,
    emoji_row: gtk::Box,
    session: RefCell<ThreadSession>,
    receipt_tx: glib::Sender<MessageId>,
}

impl ThreadView {
    pub fn new(handoff: ThreadHandoff) -> Rc<Self> {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let title = gtk::Label::new(Some(&format!("📨 {} Messages", handoff.display_name)));
        title.add_css_class("heading");
        root.append(&title);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 6);
        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        let counter = gtk::Label::new(Some(&format!("0/{MAX_MESSAGE_CHARS}")));
        counter.add_css_class("dim-label");
        counter.set_halign(gtk::Align::End);
        root.append(&counter);

        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Type a message… 💬"));
        input_row.append(&entry);
        let emoji_toggle = gtk::Button::with_label("😊");
        input_row.append(&emoji_toggle);
        let send_btn = gtk::Button::with_label("Send");
        send_btn.add_css_class("suggested-action");
        input_row.append(&send_btn);
        root.append(&input_row);

        let emoji_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        emoji_row.set_halign(gtk::Align::Center);
        emoji_row.set_visible(false);
        root.append(&emoji_row);

        let (receipt_tx, receipt_rx) = utils::glib_channel::<MessageId>();

        let view = Rc::new(Self {
            root,
            scroller,
            messages_box,
            entry: entry.clone(),
            counter,
            emoji_row: emoji_row.clone(),
            session: RefCell::new(ThreadSession::new(handoff.display_name)),
            receipt_tx,
        });

        // Widget callbacks hold weak references; the window keeps the only
        // strong handle, so replacing the pane drops the whole session.
        {
            let weak = Rc::downgrade(&view);
            entry.connect_changed(move |entry| {
                if let Some(view) = weak.upgrade() {
                    let used = entry.text().chars().count();
                    view.counter.set_label(&format!("{used}/{MAX_MESSAGE_CHARS}"));
                }
            });
        }
        {
            let weak = Rc::downgrade(&view);
            emoji_toggle.connect_clicked(move |_| {
                if let Some(view) = weak.upgrade() {
                    view.emoji_row.set_visible(!view.emoji_row.is_visible());
                }
            });
        }
        for glyph in COMPOSE_EMOJI {
            let btn = gtk::Button::with_label(glyph);
            btn.add_css_class("flat");
            let weak = Rc::downgrade(&view);
            btn.connect_clicked(move |_| {
                if let Some(view) = weak.upgrade() {
                    let text = format!("{}{}", view.entry.text(), glyph);
                    view.entry.set_text(&text);
                    view.entry.set_position(-1);
                }
            });
            emoji_row.append(&btn);
        }
        {
            let weak = Rc::downgrade(&view);
            send_btn.connect_clicked(move |_| {
                if let Some(view) = weak.upgrade() {
                    view.submit();
                }
            });
        }
        {
            let weak = Rc::downgrade(&view);
            entry.connect_activate(move |_| {
                if let Some(view) = weak.upgrade() {
                    view.submit();
                }
            });
        }

        // Receipt firings land on the main context. After teardown the
        // upgrade fails and the transition is abandoned.
        {
            let weak = Rc::downgrade(&view);
            receipt_rx.attach(None, move |id| {
                match weak.upgrade() {
                    Some(view) => {
                        view.session.borrow_mut().mark_read(id, Local::now());
                        view.render();
                    }
                    None => debug!("read receipt for {:?} arrived after teardown", id),
                }
                glib::ControlFlow::Continue
            });
        }

        view.render();
        view
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    fn submit(self: &Rc<Self>) {
        let text = self.entry.text().to_string();
        match self.session.borrow_mut().submit(&text, Local::now()) {
            Ok(Submit::Sent(id)) => {
                let tx = self.receipt_tx.clone();
                receipts::schedule(READ_RECEIPT_DELAY, id, move |id| {
                    let _ = tx.send(id);
                });
            }
            Ok(Submit::Edited(_)) => {}
            Err(err) => {
                // invalid input is ignored and the buffer kept
                debug!("submit rejected: {err}");
                return;
            }
        }
        self.entry.set_text("");
        self.emoji_row.set_visible(false);
        self.render();
        let adj = self.scroller.vadjustment();
        adj.set_value(adj.upper());
    }

    /// Clears and rebuilds the bubble rows from the session, oldest first.
    fn render(self: &Rc<Self>) {
        while let Some(child) = self.messages_box.first_child() {
            self.messages_box.remove(&child);
        }
        let session = self.session.borrow();
        for message in session.messages() {
            self.messages_box.append(&self.message_row(message));
        }
    }

    fn message_row(self: &Rc<Self>, message: &Message) -> gtk::Widget {
        let row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        row.set_halign(gtk::Align::End);

        let avatar = gtk::Label::new(Some("🧑"));
        avatar.set_valign(gtk::Align::End);
        row.append(&avatar);

        let bubble = gtk::Box::new(gtk::Orientation::Vertical, 4);
        bubble.add_css_class("card");
        bubble.set_margin_top(2);
        bubble.set_margin_bottom(2);

        let body = if message.starred {
            format!("⭐ {}", message.text)
        } else {
            message.text.clone()
        };
        let text = gtk::Label::new(Some(&body));
        text.set_wrap(true);
        text.set_xalign(0.0);
        text.set_margin_top(6);
        text.set_margin_start(8);
        text.set_margin_end(8);
        bubble.append(&text);

        let read_part = message
            .read_at
            .map(|ts| format!(" at {}", utils::clock_label(ts)))
            .unwrap_or_default();
        let caption = gtk::Label::new(Some(&format!(
            "{} → {}\n{}{} | {}",
            message.sender,
            message.receiver,
            message.status.label(),
            read_part,
            utils::clock_label(message.created_at),
        )));
        caption.add_css_class("dim-label");
        caption.add_css_class("caption");
        caption.set_xalign(0.0);
        caption.set_margin_start(8);
        caption.set_margin_end(8);
        bubble.append(&caption);

        let icons = gtk::Box::new(gtk::Orientation::Horizontal, 2);
        icons.set_margin_start(4);
        icons.set_margin_bottom(2);
        let id = message.id;

        let star_icon = if message.starred {
            "starred-symbolic"
        } else {
            "non-starred-symbolic"
        };
        let star = gtk::Button::from_icon_name(star_icon);
        star.add_css_class("flat");
        {
            let weak = Rc::downgrade(self);
            star.connect_clicked(move |_| {
                if let Some(view) = weak.upgrade() {
                    view.session.borrow_mut().toggle_star(id);
                    view.render();
                }
            });
        }
        icons.append(&star);

        let edit = gtk::Button::from_icon_name("document-edit-symbolic");
        edit.add_css_class("flat");
        {
            let weak = Rc::downgrade(self);
            edit.connect_clicked(move |_| {
                if let Some(view) = weak.upgrade() {
                    let text = view
                        .session
                        .borrow_mut()
                        .begin_edit(id)
                        .map(str::to_string);
                    if let Some(text) = text {
                        view.entry.set_text(&text);
                        view.entry.grab_focus();
                        view.entry.set_position(-1);
                    }
                }
            });
        }
        icons.append(&edit);

        let trash = gtk::Button::from_icon_name("user-trash-symbolic");
        trash.add_css_class("flat");
        {
            let weak = Rc::downgrade(self);
            trash.connect_clicked(move |_| {
                if let Some(view) = weak.upgrade() {
                    view.session.borrow_mut().delete(id);
                    view.render();
                }
            });
        }
        icons.append(&trash);

        bubble.append(&icons);
        row.append(&bubble);
        row.upcast()
    }
}
