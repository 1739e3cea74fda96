use eframe::egui;

use super::super::state::ViewState;

pub enum NavAction {
    Go(ViewState),
    Logout,
}

pub fn render(ctx: &egui::Context, current: ViewState) -> Option<NavAction> {
    let mut action = None;
    egui::TopBottomPanel::bottom("bottom_nav").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui
                .selectable_label(current == ViewState::Home, "🏠 Home")
                .clicked()
            {
                action = Some(NavAction::Go(ViewState::Home));
            }
            if ui
                .selectable_label(current == ViewState::History, "🕘 History")
                .clicked()
            {
                action = Some(NavAction::Go(ViewState::History));
            }
            if ui
                .selectable_label(current == ViewState::Scan, "🖐 Scan")
                .clicked()
            {
                action = Some(NavAction::Go(ViewState::Scan));
            }
            if ui
                .selectable_label(current == ViewState::Settings, "⚙ Settings")
                .clicked()
            {
                action = Some(NavAction::Go(ViewState::Settings));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🚪 Log out").clicked() {
                    action = Some(NavAction::Logout);
                }
            });
        });
    });
    action
}
