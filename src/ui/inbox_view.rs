use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::model::{GLYPH_PALETTE, ThreadHandoff};
use crate::state::inbox::InboxRegistry;

/// Sidebar pane: the inbox list plus the creation row with its glyph picker.
pub struct InboxView {
    root: gtk::Box,
    list: gtk::ListBox,
    empty_label: gtk::Label,
    registry: RefCell<InboxRegistry>,
    on_select: RefCell<Option<Rc<dyn Fn(ThreadHandoff)>>>,
}

impl InboxView {
    pub fn new() -> Rc<Self> {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let title = gtk::Label::new(Some("📣 Inbox"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Add new inbox…"));
        input_row.append(&entry);

        let glyph_btn = gtk::MenuButton::new();
        glyph_btn.set_label(crate::model::DEFAULT_GLYPH);
        let popover = gtk::Popover::new();
        glyph_btn.set_popover(Some(&popover));
        input_row.append(&glyph_btn);

        let add_btn = gtk::Button::from_icon_name("list-add-symbolic");
        add_btn.add_css_class("suggested-action");
        input_row.append(&add_btn);
        root.append(&input_row);

        let list = gtk::ListBox::new();
        root.append(&list);

        let empty_label = gtk::Label::new(Some("No inboxes yet. Add one above!"));
        empty_label.add_css_class("dim-label");
        root.append(&empty_label);

        let view = Rc::new(Self {
            root,
            list: list.clone(),
            empty_label,
            registry: RefCell::new(InboxRegistry::seeded()),
            on_select: RefCell::new(None),
        });

        // Glyph palette popover; the choice only applies to the next create.
        let palette = gtk::FlowBox::new();
        palette.set_max_children_per_line(4);
        palette.set_selection_mode(gtk::SelectionMode::None);
        for glyph in GLYPH_PALETTE {
            let btn = gtk::Button::with_label(glyph);
            btn.add_css_class("flat");
            let view_for_glyph = view.clone();
            let glyph_btn = glyph_btn.clone();
            let popover = popover.clone();
            btn.connect_clicked(move |_| {
                view_for_glyph.registry.borrow_mut().select_glyph(glyph);
                glyph_btn.set_label(glyph);
                popover.popdown();
            });
            palette.insert(&btn, -1);
        }
        popover.set_child(Some(&palette));

        let add: Rc<dyn Fn()> = {
            let view = view.clone();
            let entry = entry.clone();
            let glyph_btn = glyph_btn.clone();
            Rc::new(move || {
                let created = view.registry.borrow_mut().create(&entry.text());
                if created.is_some() {
                    entry.set_text("");
                    glyph_btn.set_label(view.registry.borrow().pending_glyph());
                    view.refresh();
                }
            })
        };
        {
            let add = add.clone();
            add_btn.connect_clicked(move |_| (add)());
        }
        {
            let add = add.clone();
            entry.connect_activate(move |_| (add)());
        }

        {
            let view_for_select = view.clone();
            list.connect_row_activated(move |_, row| {
                let index = row.index();
                if index < 0 {
                    return;
                }
                let handoff = {
                    let registry = view_for_select.registry.borrow();
                    registry
                        .entries()
                        .get(index as usize)
                        .and_then(|entry| registry.handoff(entry.id))
                };
                let callback = view_for_select.on_select.borrow().clone();
                if let (Some(handoff), Some(callback)) = (handoff, callback) {
                    callback(handoff);
                }
            });
        }

        view.refresh();
        view
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn set_on_select(&self, callback: impl Fn(ThreadHandoff) + 'static) {
        *self.on_select.borrow_mut() = Some(Rc::new(callback));
    }

    /// Clears and rebuilds the list rows from the registry, newest first.
    fn refresh(self: &Rc<Self>) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        let registry = self.registry.borrow();
        self.empty_label.set_visible(registry.is_empty());
        for entry in registry.entries() {
            let row = gtk::ListBoxRow::new();
            let hbox = gtk::Box::new(gtk::Orientation::Horizontal, 8);
            hbox.set_margin_top(8);
            hbox.set_margin_bottom(8);
            hbox.set_margin_start(8);
            hbox.set_margin_end(8);

            let glyph = gtk::Label::new(Some(&entry.glyph));
            hbox.append(&glyph);

            let name = gtk::Label::new(Some(&entry.name));
            name.set_halign(gtk::Align::Start);
            name.set_hexpand(true);
            hbox.append(&name);

            let trash = gtk::Button::from_icon_name("user-trash-symbolic");
            trash.add_css_class("flat");
            let id = entry.id;
            let view = self.clone();
            trash.connect_clicked(move |_| {
                view.registry.borrow_mut().delete(id);
                view.refresh();
            });
            hbox.append(&trash);

            row.set_child(Some(&hbox));
            self.list.append(&row);
        }
    }
}
