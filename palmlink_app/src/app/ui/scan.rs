use eframe::egui::{self, Color32, RichText};

use palmlink_client::models::contact_url;

use super::super::PalmlinkApp;

pub enum ScanAction {
    PickImage,
    Recognize,
    OpenLink(String),
}

pub fn render(app: &mut PalmlinkApp, ctx: &egui::Context) -> Option<ScanAction> {
    let mut state = std::mem::take(&mut app.scan);
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Scan a palm");
        ui.label("Pick a photo of the other person's palm to look them up.");
        ui.add_space(10.0);

        match &state.palm_image {
            Some(path) => {
                ui.label(format!("Selected: {}", path.display()));
            }
            None => {
                ui.label(RichText::new("No image selected yet").italics());
            }
        }
        ui.horizontal(|ui| {
            if ui.button("Choose image…").clicked() {
                action = Some(ScanAction::PickImage);
            }
            let ready = state.palm_image.is_some() && !state.is_loading;
            if ui
                .add_enabled(ready, egui::Button::new("Recognize"))
                .clicked()
            {
                action = Some(ScanAction::Recognize);
            }
        });

        if state.is_loading {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Identifying palm…");
            });
        }

        if let Some(error) = &state.error {
            ui.add_space(10.0);
            ui.colored_label(Color32::LIGHT_RED, error);
        }

        if let Some(profile) = state.profile.clone() {
            ui.add_space(14.0);
            egui::Frame::group(ui.style())
                .fill(ui.visuals().extreme_bg_color)
                .inner_margin(egui::vec2(12.0, 10.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let texture = profile
                            .profile_picture
                            .as_deref()
                            .and_then(|reference| app.avatar_texture(ui.ctx(), reference));
                        match texture {
                            Some(texture) => {
                                ui.add(
                                    egui::Image::from_texture(&texture)
                                        .fit_to_exact_size(egui::vec2(56.0, 56.0)),
                                );
                            }
                            None => {
                                ui.label(RichText::new("🖐").size(36.0));
                            }
                        }
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&profile.username).strong().size(18.0));
                            ui.label(RichText::new(&profile.email).weak());
                            if let Some(bio) = profile.bio.as_deref() {
                                ui.label(bio);
                            }
                        });
                    });

                    if !state.contacts.is_empty() {
                        ui.separator();
                        for contact in &state.contacts {
                            ui.horizontal(|ui| {
                                ui.label(contact.contact_type.icon());
                                ui.label(format!(
                                    "{}: {}",
                                    contact.contact_type.label(),
                                    contact.contact_value
                                ));
                                if let Some(url) = contact_url(contact) {
                                    if ui.small_button("Open").clicked() {
                                        action = Some(ScanAction::OpenLink(url));
                                    }
                                }
                            });
                        }
                    }
                });
        }
    });

    app.scan = state;
    action
}
