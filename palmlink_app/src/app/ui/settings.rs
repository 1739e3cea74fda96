use eframe::egui::{self, Color32, RichText};

use super::super::PalmlinkApp;

pub enum SettingsAction {
    Retry,
    Save,
    PickPicture,
    Logout,
}

pub fn render(app: &mut PalmlinkApp, ctx: &egui::Context) -> Option<SettingsAction> {
    let mut state = std::mem::take(&mut app.settings);
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Settings");
        ui.add_space(8.0);

        if state.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Working…");
            });
            if state.slow_load() {
                ui.label(
                    RichText::new("Still working — the server is taking longer than usual…")
                        .weak(),
                );
            }
        }

        if let Some(error) = &state.error {
            ui.colored_label(Color32::LIGHT_RED, format!("Error: {error}"));
            if ui.button("Retry").clicked() {
                action = Some(SettingsAction::Retry);
            }
            ui.separator();
        }

        if state.profile.is_some() {
            ui.horizontal(|ui| {
                let texture = state
                    .profile
                    .as_ref()
                    .and_then(|profile| profile.profile_picture.as_deref())
                    .and_then(|reference| app.avatar_texture(ui.ctx(), reference));
                match texture {
                    Some(texture) => {
                        ui.add(
                            egui::Image::from_texture(&texture)
                                .fit_to_exact_size(egui::vec2(64.0, 64.0)),
                        );
                    }
                    None => {
                        ui.label(RichText::new("🖐").size(40.0));
                    }
                }
                ui.vertical(|ui| {
                    if let Some(path) = &state.new_picture {
                        ui.label(format!("New picture: {}", path.display()));
                    }
                    if ui.button("Change picture…").clicked() {
                        action = Some(SettingsAction::PickPicture);
                    }
                });
            });
            ui.add_space(10.0);

            ui.label("Username");
            ui.text_edit_singleline(&mut state.fields.username);
            ui.label("Bio");
            ui.text_edit_multiline(&mut state.fields.bio);
            ui.label("Job title");
            ui.text_edit_singleline(&mut state.fields.job_title);
            ui.label("Company");
            ui.text_edit_singleline(&mut state.fields.company);

            ui.add_space(12.0);
            if !state.is_loading && ui.button("Save changes").clicked() {
                action = Some(SettingsAction::Save);
            }
        }

        ui.add_space(20.0);
        ui.separator();
        if ui.button("Log out").clicked() {
            action = Some(SettingsAction::Logout);
        }
    });

    app.settings = state;
    action
}
