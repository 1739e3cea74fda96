use eframe::egui::{self, Color32};

use super::super::PalmlinkApp;

pub enum LoginAction {
    Submit,
    Back,
}

pub fn render(app: &mut PalmlinkApp, ctx: &egui::Context) -> Option<LoginAction> {
    let mut state = std::mem::take(&mut app.login);
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("Welcome back");
        });
        ui.add_space(24.0);

        ui.label("Email");
        ui.text_edit_singleline(&mut state.email);
        ui.add_space(8.0);
        ui.label("Password");
        ui.add(egui::TextEdit::singleline(&mut state.password).password(true));

        if let Some(notice) = &state.notice {
            ui.add_space(8.0);
            ui.colored_label(Color32::LIGHT_RED, notice);
        }

        ui.add_space(16.0);
        if state.submitting {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Signing in…");
            });
        } else {
            ui.horizontal(|ui| {
                if ui.button("Log in").clicked() {
                    action = Some(LoginAction::Submit);
                }
                if ui.button("Back").clicked() {
                    action = Some(LoginAction::Back);
                }
            });
        }
    });

    app.login = state;
    action
}
