use eframe::egui::{self, RichText};

pub enum LandingAction {
    GoLogin,
    GoRegister,
}

pub fn render(ctx: &egui::Context) -> Option<LandingAction> {
    let mut action = None;
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading(RichText::new("Palmlink").size(32.0));
            ui.label("Share your contact card with a palm scan");
            ui.add_space(40.0);
            if ui
                .add_sized([200.0, 36.0], egui::Button::new("Log in"))
                .clicked()
            {
                action = Some(LandingAction::GoLogin);
            }
            ui.add_space(8.0);
            if ui
                .add_sized([200.0, 36.0], egui::Button::new("Sign up"))
                .clicked()
            {
                action = Some(LandingAction::GoRegister);
            }
        });
    });
    action
}
