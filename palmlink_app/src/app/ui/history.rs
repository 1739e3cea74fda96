use eframe::egui::{self, Color32, RichText};

use palmlink_client::history::{self, HistoryRow};
use palmlink_client::models::HistoryEntry;

use super::super::state::HistoryTab;
use super::super::PalmlinkApp;

pub enum HistoryAction {
    Retry,
}

pub fn render(app: &mut PalmlinkApp, ctx: &egui::Context) -> Option<HistoryAction> {
    let mut state = std::mem::take(&mut app.history);
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Scan history");
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui
                .selectable_label(state.tab == HistoryTab::WhoScannedMe, "Who scanned me")
                .clicked()
            {
                state.tab = HistoryTab::WhoScannedMe;
            }
            if ui
                .selectable_label(state.tab == HistoryTab::WhoIScanned, "Who I scanned")
                .clicked()
            {
                state.tab = HistoryTab::WhoIScanned;
            }
        });

        ui.horizontal(|ui| {
            ui.label("🔍");
            ui.text_edit_singleline(&mut state.query);
        });
        ui.add_space(6.0);

        if state.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading history…");
            });
            return;
        }

        if let Some(error) = &state.error {
            ui.colored_label(Color32::LIGHT_RED, format!("Error: {error}"));
            if ui.button("Retry").clicked() {
                action = Some(HistoryAction::Retry);
            }
            return;
        }

        // Bucketing and filtering recompute the full row list every frame;
        // the lists are small enough that this beats caching.
        let today = chrono::Local::now().date_naive();
        let rows = history::filter_rows(
            &history::build_rows(state.entries(), today),
            state.query.trim(),
        );

        if rows.is_empty() {
            ui.label(RichText::new("No scans here yet").italics());
            return;
        }

        let mut selected = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for row in &rows {
                match row {
                    HistoryRow::Header(bucket) => {
                        ui.add_space(10.0);
                        ui.label(RichText::new(bucket.label()).strong().size(16.0));
                        ui.separator();
                    }
                    HistoryRow::Entry(entry) => {
                        if render_entry(ui, entry) {
                            selected = Some(entry.clone());
                        }
                    }
                }
            }
        });
        if selected.is_some() {
            state.selected = selected;
        }
    });

    render_detail(ctx, &mut state.selected);

    app.history = state;
    action
}

fn render_entry(ui: &mut egui::Ui, entry: &HistoryEntry) -> bool {
    let mut clicked = false;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(10.0, 8.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&entry.profile.name).strong());
                    ui.label(RichText::new(format_scan_date(&entry.time_scanned)).weak());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("View").clicked() {
                        clicked = true;
                    }
                });
            });
        });
    clicked
}

fn render_detail(ctx: &egui::Context, selected: &mut Option<HistoryEntry>) {
    let Some(entry) = selected.clone() else {
        return;
    };
    let mut open = true;
    egui::Window::new(entry.profile.name.clone())
        .open(&mut open)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.label(RichText::new(format_scan_date(&entry.time_scanned)).weak());
            if let Some(bio) = entry.profile.bio.as_deref().filter(|b| !b.is_empty()) {
                ui.label(bio);
            }
            let position = match (
                entry.profile.job_title.as_deref(),
                entry.profile.company.as_deref(),
            ) {
                (Some(job), Some(company)) => Some(format!("{job} at {company}")),
                (Some(job), None) => Some(job.to_string()),
                (None, Some(company)) => Some(company.to_string()),
                (None, None) => None,
            };
            if let Some(position) = position {
                ui.label(position);
            }

            if !entry.contacts.is_empty() {
                ui.separator();
                ui.label(RichText::new("Shared contacts").strong());
                for contact in &entry.contacts {
                    ui.horizontal(|ui| {
                        ui.label(contact.contact_type.icon());
                        ui.label(format!(
                            "{}: {}",
                            contact.contact_type.label(),
                            contact.contact_value
                        ));
                    });
                }
            }
        });
    if !open {
        *selected = None;
    }
}

fn format_scan_date(raw: &str) -> String {
    history::parse_scan_timestamp(raw)
        .map(|scanned| scanned.format("%A, %b %d %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}
