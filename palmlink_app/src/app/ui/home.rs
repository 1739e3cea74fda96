use eframe::egui::{self, Color32, RichText};

use palmlink_client::models::{contact_url, Contact, ContactKind};

use super::super::state::{ContactFormState, HomeState};
use super::super::PalmlinkApp;

pub enum HomeAction {
    Reload,
    ReloadContacts,
    SubmitContactForm,
    ConfirmDelete(String),
    OpenLink(String),
}

pub fn render(app: &mut PalmlinkApp, ctx: &egui::Context) -> Option<HomeAction> {
    let mut home = std::mem::take(&mut app.home);
    let mut form = std::mem::take(&mut app.contact_form);
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(error) = &home.error {
            ui.colored_label(Color32::LIGHT_RED, format!("Error: {error}"));
            if ui.button("Retry").clicked() {
                action = Some(HomeAction::Reload);
            }
            ui.separator();
        }

        if home.profile.is_none() && home.profile_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading profile…");
            });
            return;
        }

        if let Some(profile) = home.profile.clone() {
            render_profile_header(app, ui, &profile);
            ui.separator();

            ui.horizontal(|ui| {
                ui.heading("Contacts");
                if ui.button("➕ Add").clicked() {
                    form = ContactFormState::default();
                    form.open = true;
                }
                if ui.button("⟳").on_hover_text("Refresh contacts").clicked() {
                    action = Some(HomeAction::ReloadContacts);
                }
                if home.contacts_loading {
                    ui.spinner();
                }
            });

            if home.contacts_loaded && home.contacts.is_empty() && !home.contacts_loading {
                ui.label(RichText::new("No contact info yet — add your first one").italics());
            }

            render_contacts_grid(ui, &mut home, &mut form, &mut action);
        }
    });

    render_contact_form(ctx, &mut form, &mut action);
    render_delete_confirm(ctx, &mut home, &mut action);

    app.home = home;
    app.contact_form = form;
    action
}

fn render_profile_header(app: &mut PalmlinkApp, ui: &mut egui::Ui, profile: &palmlink_client::models::Profile) {
    ui.horizontal(|ui| {
        let texture = profile
            .profile_picture
            .as_deref()
            .and_then(|reference| app.avatar_texture(ui.ctx(), reference));
        match texture {
            Some(texture) => {
                ui.add(
                    egui::Image::from_texture(&texture).fit_to_exact_size(egui::vec2(72.0, 72.0)),
                );
            }
            None => {
                ui.label(RichText::new("🖐").size(48.0));
            }
        }
        ui.vertical(|ui| {
            ui.heading(&profile.username);
            ui.label(profile.bio.as_deref().unwrap_or("No bio added"));
            ui.label(
                RichText::new(profile.job_title.as_deref().unwrap_or("No job title")).weak(),
            );
        });
    });
}

fn render_contacts_grid(
    ui: &mut egui::Ui,
    home: &mut HomeState,
    form: &mut ContactFormState,
    action: &mut Option<HomeAction>,
) {
    let mut edit_target: Option<Contact> = None;
    let mut delete_target: Option<Contact> = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("contacts_grid")
            .num_columns(2)
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (index, contact) in home.contacts.iter().enumerate() {
                    render_contact_card(ui, contact, &mut edit_target, &mut delete_target, action);
                    if index % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    });

    if let Some(contact) = edit_target {
        *form = ContactFormState {
            open: true,
            editing_id: contact.contact_id.clone(),
            kind: contact.contact_type.clone(),
            value: contact.contact_value.clone(),
            notes: contact.notes.clone().unwrap_or_default(),
            submitting: false,
            error: None,
        };
    }
    if let Some(contact) = delete_target {
        home.confirm_delete = Some(contact);
    }
}

fn render_contact_card(
    ui: &mut egui::Ui,
    contact: &Contact,
    edit_target: &mut Option<Contact>,
    delete_target: &mut Option<Contact>,
    action: &mut Option<HomeAction>,
) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(10.0, 8.0))
        .show(ui, |ui| {
            ui.set_min_width(150.0);
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.label(contact.contact_type.icon());
                    ui.label(RichText::new(contact.contact_type.label()).strong());
                });
                ui.label(&contact.contact_value);
                if let Some(notes) = contact.notes.as_deref().filter(|n| !n.is_empty()) {
                    ui.label(RichText::new(notes).small().weak());
                }
                ui.horizontal(|ui| {
                    if let Some(url) = contact_url(contact) {
                        if ui.small_button("Open").clicked() {
                            *action = Some(HomeAction::OpenLink(url));
                        }
                    }
                    if contact.contact_id.is_some() {
                        if ui.small_button("Edit").clicked() {
                            *edit_target = Some(contact.clone());
                        }
                        if ui.small_button("Delete").clicked() {
                            *delete_target = Some(contact.clone());
                        }
                    }
                });
            });
        });
}

fn render_contact_form(
    ctx: &egui::Context,
    form: &mut ContactFormState,
    action: &mut Option<HomeAction>,
) {
    if !form.open {
        return;
    }
    let title = if form.editing_id.is_some() {
        "Edit contact"
    } else {
        "Add contact"
    };
    let mut open = form.open;
    egui::Window::new(title)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Type");
                // The type is fixed once a contact exists.
                ui.add_enabled_ui(form.editing_id.is_none(), |ui| {
                    egui::ComboBox::from_id_salt("contact_form_kind")
                        .selected_text(form.kind.label().to_string())
                        .show_ui(ui, |ui| {
                            for kind in ContactKind::CREATABLE {
                                let label = kind.label().to_string();
                                ui.selectable_value(&mut form.kind, kind, label);
                            }
                        });
                });
            });
            ui.label("Value");
            ui.text_edit_singleline(&mut form.value);
            ui.label("Notes");
            ui.text_edit_singleline(&mut form.notes);

            if let Some(error) = &form.error {
                ui.add_space(6.0);
                ui.colored_label(Color32::LIGHT_RED, error);
            }

            ui.add_space(10.0);
            if form.submitting {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Saving…");
                });
            } else {
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        *action = Some(HomeAction::SubmitContactForm);
                    }
                    if ui.button("Cancel").clicked() {
                        *form = ContactFormState::default();
                    }
                });
            }
        });
    if form.open && !open {
        *form = ContactFormState::default();
    }
}

fn render_delete_confirm(
    ctx: &egui::Context,
    home: &mut HomeState,
    action: &mut Option<HomeAction>,
) {
    let Some(contact) = home.confirm_delete.clone() else {
        return;
    };
    let mut open = true;
    egui::Window::new("Delete contact")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "Remove the {} contact \"{}\"?",
                contact.contact_type.label(),
                contact.contact_value
            ));
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    if let Some(contact_id) = contact.contact_id.clone() {
                        *action = Some(HomeAction::ConfirmDelete(contact_id));
                    }
                    home.confirm_delete = None;
                }
                if ui.button("Cancel").clicked() {
                    home.confirm_delete = None;
                }
            });
        });
    if !open {
        home.confirm_delete = None;
    }
}
