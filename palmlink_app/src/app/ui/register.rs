use eframe::egui::{self, Color32, RichText};

use palmlink_client::models::ContactKind;

use super::super::state::RegisterStep;
use super::super::PalmlinkApp;

/// The registration picker offers the social channels only; email and
/// phone contacts are added later from the home screen.
const REGISTER_KINDS: [ContactKind; 5] = [
    ContactKind::Instagram,
    ContactKind::Whatsapp,
    ContactKind::Facebook,
    ContactKind::X,
    ContactKind::Linkedin,
];

pub enum RegisterAction {
    AdvanceAccount,
    PickPalmImage,
    SubmitRegistration,
    PickProfilePicture,
    AddDraftContact,
    FinishSetup,
    Back,
}

pub fn render(app: &mut PalmlinkApp, ctx: &egui::Context) -> Option<RegisterAction> {
    let mut state = std::mem::take(&mut app.register);
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| match state.step {
            RegisterStep::Account => {
                ui.heading("Create your account");
                ui.add_space(16.0);
                ui.label("Username");
                ui.text_edit_singleline(&mut state.username);
                ui.label("Email");
                ui.text_edit_singleline(&mut state.email);
                ui.label("Password");
                ui.add(egui::TextEdit::singleline(&mut state.password).password(true));
                ui.label("Confirm password");
                ui.add(egui::TextEdit::singleline(&mut state.confirm_password).password(true));

                if let Some(error) = &state.error {
                    ui.add_space(8.0);
                    ui.colored_label(Color32::LIGHT_RED, error);
                }

                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    if ui.button("Continue").clicked() {
                        action = Some(RegisterAction::AdvanceAccount);
                    }
                    if ui.button("Back").clicked() {
                        action = Some(RegisterAction::Back);
                    }
                });
            }
            RegisterStep::PalmImage => {
                ui.heading("Register your palm");
                ui.add_space(8.0);
                ui.label("Please ensure:");
                ui.label("• a clear photo of your palm");
                ui.label("• your entire palm is visible");
                ui.label("• good lighting");
                ui.label("• the palm faces the camera directly");
                ui.label("• no blur or dark areas");
                ui.add_space(12.0);

                match &state.palm_image {
                    Some(path) => {
                        ui.label(format!("Selected: {}", path.display()));
                    }
                    None => {
                        ui.label(RichText::new("No image selected yet").italics());
                    }
                }
                if ui.button("Choose palm image…").clicked() {
                    action = Some(RegisterAction::PickPalmImage);
                }

                if let Some(error) = &state.error {
                    ui.add_space(8.0);
                    ui.colored_label(Color32::LIGHT_RED, error);
                }

                ui.add_space(16.0);
                if state.submitting {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Creating account…");
                    });
                } else {
                    ui.horizontal(|ui| {
                        if ui.button("Create account").clicked() {
                            action = Some(RegisterAction::SubmitRegistration);
                        }
                        if ui.button("Back").clicked() {
                            state.error = None;
                            state.step = RegisterStep::Account;
                        }
                    });
                }
            }
            RegisterStep::ProfileSetup => {
                ui.heading("Set up your profile");
                ui.add_space(12.0);
                ui.label("Bio");
                ui.text_edit_multiline(&mut state.bio);
                ui.label("Job title");
                ui.text_edit_singleline(&mut state.job_title);
                ui.label("Company");
                ui.text_edit_singleline(&mut state.company);

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    match &state.profile_picture {
                        Some(path) => ui.label(format!("Picture: {}", path.display())),
                        None => ui.label(RichText::new("No profile picture yet").italics()),
                    };
                    if ui.button("Choose picture…").clicked() {
                        action = Some(RegisterAction::PickProfilePicture);
                    }
                });

                ui.separator();
                ui.label(RichText::new("Contact info").strong());
                ui.horizontal(|ui| {
                    egui::ComboBox::from_id_salt("draft_contact_kind")
                        .selected_text(state.draft_kind.label().to_string())
                        .show_ui(ui, |ui| {
                            for kind in REGISTER_KINDS {
                                let label = kind.label().to_string();
                                ui.selectable_value(&mut state.draft_kind, kind, label);
                            }
                        });
                    ui.text_edit_singleline(&mut state.draft_value);
                });
                ui.horizontal(|ui| {
                    ui.label("Notes");
                    ui.text_edit_singleline(&mut state.draft_notes);
                    if ui.button("Add").clicked() {
                        action = Some(RegisterAction::AddDraftContact);
                    }
                });

                let mut remove = None;
                for (index, draft) in state.draft_contacts.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(draft.contact_type.icon());
                        ui.label(format!(
                            "{}: {}",
                            draft.contact_type.label(),
                            draft.contact_value
                        ));
                        if ui.small_button("✖").clicked() {
                            remove = Some(index);
                        }
                    });
                }
                if let Some(index) = remove {
                    state.draft_contacts.remove(index);
                }

                if let Some(error) = &state.error {
                    ui.add_space(8.0);
                    ui.colored_label(Color32::LIGHT_RED, error);
                }

                ui.add_space(16.0);
                if state.finishing {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Saving profile…");
                    });
                } else if ui.button("Finish").clicked() {
                    action = Some(RegisterAction::FinishSetup);
                }
            }
        });
    });

    app.register = state;
    action
}
