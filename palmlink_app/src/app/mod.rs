use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, Context};
use log::error;

use palmlink_client::api::ApiClient;
use palmlink_client::credentials::FileCredentialStore;
use palmlink_client::models::{AddContactRequest, EditContactRequest, ProfileEdit};
use palmlink_client::policy;
use palmlink_client::session::SessionGuard;

mod handlers_contacts;
mod handlers_history;
mod handlers_profile;
mod handlers_scan;
mod handlers_session;
mod messages;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{
    AvatarCache, ContactFormState, HistoryState, HomeState, LoginState, PickPurpose,
    RegisterState, RegisterStep, ScanState, SettingsState, ViewState,
};
use tasks::ContactMutation;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

pub(crate) const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

pub struct PalmlinkApp {
    api: ApiClient,
    session: SessionGuard,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    view: ViewState,
    base_url_input: String,
    info_banner: Option<String>,
    confirm_logout: bool,
    login: LoginState,
    register: RegisterState,
    home: HomeState,
    contact_form: ContactFormState,
    history: HistoryState,
    scan: ScanState,
    settings: SettingsState,
    avatars: AvatarCache,
}

impl PalmlinkApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let base_url =
            std::env::var("PALMLINK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api = ApiClient::new(base_url).unwrap_or_else(|err| {
            error!("failed to initialise API client: {err}");
            ApiClient::new(DEFAULT_API_URL).expect("fallback API client")
        });
        let session = SessionGuard::new(Arc::new(FileCredentialStore::new()));
        Self::from_parts(api, session)
    }

    /// Constructor without platform wiring, shared with tests.
    pub(crate) fn from_parts(api: ApiClient, session: SessionGuard) -> Self {
        let (tx, rx) = mpsc::channel();
        let base_url_input = api.base_url().to_string();
        let mut app = Self {
            api,
            session,
            tx,
            rx,
            view: ViewState::Landing,
            base_url_input,
            info_banner: None,
            confirm_logout: false,
            login: LoginState::default(),
            register: RegisterState::default(),
            home: HomeState::default(),
            contact_form: ContactFormState::default(),
            history: HistoryState::default(),
            scan: ScanState::default(),
            settings: SettingsState::default(),
            avatars: AvatarCache::default(),
        };
        // A stored credential skips the landing flow entirely.
        if app.session.is_authenticated() {
            app.navigate(ViewState::Home);
        }
        app
    }

    pub(crate) fn navigate(&mut self, view: ViewState) {
        self.view = view;
        match view {
            ViewState::Home => {
                self.home = HomeState::default();
                self.contact_form = ContactFormState::default();
                self.spawn_load_profile();
            }
            ViewState::History => {
                self.history = HistoryState::default();
                self.spawn_load_history();
            }
            ViewState::Scan => {
                self.scan = ScanState::default();
            }
            ViewState::Settings => {
                self.settings = SettingsState::default();
                self.spawn_load_settings_profile();
            }
            ViewState::Login => {
                self.login = LoginState::default();
            }
            ViewState::Register => {
                self.register = RegisterState::default();
            }
            ViewState::Landing => {}
        }
    }

    /// Ends the session and lands on the login screen, discarding every
    /// authenticated screen's in-flight state. Used both for a missing
    /// credential at screen load and for a server-rejected one.
    pub(crate) fn force_login(&mut self, notice: Option<&str>) {
        self.session.logout();
        self.home = HomeState::default();
        self.contact_form = ContactFormState::default();
        self.history = HistoryState::default();
        self.scan = ScanState::default();
        self.settings = SettingsState::default();
        self.login = LoginState::default();
        self.login.notice = notice.map(str::to_string);
        self.confirm_logout = false;
        self.view = ViewState::Login;
    }

    /// Routes a failed call through the session guard. Returns true when
    /// the session ended and the caller should stop touching its state.
    fn absorb_auth_failure(&mut self, err: &palmlink_client::error::ApiError) -> bool {
        if self.session.handle_error(err) {
            self.force_login(Some(SESSION_EXPIRED_NOTICE));
            true
        } else {
            false
        }
    }

    // Spawns. Each clones the client and channel into a worker thread; the
    // result comes back through process_messages on the next frame.

    pub(crate) fn spawn_load_profile(&mut self) {
        if policy::PROFILE_LOAD.dedupe_in_flight && self.home.profile_loading {
            return;
        }
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        self.home.profile_loading = true;
        self.home.error = None;
        tasks::load_profile_with_contacts(self.api.clone(), self.tx.clone(), token);
    }

    pub(crate) fn spawn_load_contacts(&mut self) {
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        self.home.contacts_loading = true;
        tasks::load_contacts(self.api.clone(), self.tx.clone(), token);
    }

    pub(crate) fn spawn_mutate_contact(&mut self, mutation: ContactMutation) {
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        self.home.contacts_loading = true;
        self.home.error = None;
        tasks::mutate_contact(self.api.clone(), self.tx.clone(), token, mutation);
    }

    pub(crate) fn spawn_load_history(&mut self) {
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        self.history.is_loading = true;
        self.history.error = None;
        tasks::load_history(self.api.clone(), self.tx.clone(), token);
    }

    pub(crate) fn spawn_load_settings_profile(&mut self) {
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        self.settings.is_loading = true;
        self.settings.busy_since = Some(Instant::now());
        self.settings.error = None;
        tasks::load_settings_profile(self.api.clone(), self.tx.clone(), token);
    }

    // Form submissions. Local validation runs before anything reaches the
    // network.

    pub(crate) fn submit_login(&mut self) {
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.login.notice = Some("Please fill in all fields".into());
            return;
        }
        if !state::looks_like_email(&email) {
            self.login.notice = Some("Invalid email format".into());
            return;
        }
        if password.len() < 8 {
            self.login.notice = Some("Password must be at least 8 characters".into());
            return;
        }
        self.login.submitting = true;
        self.login.notice = None;
        tasks::login(self.api.clone(), self.tx.clone(), email, password);
    }

    pub(crate) fn advance_register_account(&mut self) {
        let username = self.register.username.trim().to_string();
        let email = self.register.email.trim().to_string();
        if username.is_empty() || email.is_empty() || self.register.password.is_empty() {
            self.register.error = Some("Please fill in all fields".into());
            return;
        }
        if !state::looks_like_email(&email) {
            self.register.error = Some("Invalid email format".into());
            return;
        }
        if self.register.password.len() < 8 {
            self.register.error = Some("Password must be at least 8 characters".into());
            return;
        }
        if self.register.password != self.register.confirm_password {
            self.register.error = Some("Passwords do not match".into());
            return;
        }
        self.register.error = None;
        self.register.step = RegisterStep::PalmImage;
    }

    pub(crate) fn submit_registration(&mut self) {
        let Some(palm_image) = self.register.palm_image.clone() else {
            self.register.error = Some("Please upload a palm image".into());
            return;
        };
        self.register.submitting = true;
        self.register.error = None;
        tasks::register_and_login(
            self.api.clone(),
            self.tx.clone(),
            palm_image,
            self.register.email.trim().to_string(),
            self.register.username.trim().to_string(),
            self.register.password.clone(),
        );
    }

    pub(crate) fn add_draft_contact(&mut self) {
        let value = self.register.draft_value.trim().to_string();
        if value.is_empty() {
            self.register.error = Some("Please enter contact value".into());
            return;
        }
        self.register.draft_contacts.push(AddContactRequest {
            contact_type: self.register.draft_kind.clone(),
            contact_value: value,
            notes: self.register.draft_notes.trim().to_string(),
        });
        self.register.draft_value.clear();
        self.register.draft_notes.clear();
        self.register.error = None;
    }

    pub(crate) fn finish_register_setup(&mut self) {
        let mut missing = Vec::new();
        if self.register.bio.trim().is_empty() {
            missing.push("bio");
        }
        if self.register.job_title.trim().is_empty() {
            missing.push("job title");
        }
        if self.register.company.trim().is_empty() {
            missing.push("company");
        }
        if self.register.profile_picture.is_none() {
            missing.push("profile picture");
        }
        if !missing.is_empty() {
            self.register.error = Some(format!("Please enter your {}", missing.join(", ")));
            return;
        }
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        let fields = ProfileEdit {
            username: self.register.username.trim().to_string(),
            bio: self.register.bio.trim().to_string(),
            job_title: self.register.job_title.trim().to_string(),
            company: self.register.company.trim().to_string(),
        };
        self.register.finishing = true;
        self.register.error = None;
        tasks::finish_setup(
            self.api.clone(),
            self.tx.clone(),
            token,
            fields,
            self.register.profile_picture.clone(),
            self.register.draft_contacts.clone(),
        );
    }

    pub(crate) fn submit_contact_form(&mut self) {
        let value = self.contact_form.value.trim().to_string();
        if value.is_empty() {
            self.contact_form.error = Some("Please enter contact value".into());
            return;
        }
        let notes = self.contact_form.notes.trim().to_string();
        let mutation = match &self.contact_form.editing_id {
            Some(contact_id) => ContactMutation::Edit(EditContactRequest {
                contact_id: contact_id.clone(),
                contact_type: self.contact_form.kind.clone(),
                contact_value: value,
                notes,
            }),
            None => ContactMutation::Add(AddContactRequest {
                contact_type: self.contact_form.kind.clone(),
                contact_value: value,
                notes,
            }),
        };
        self.contact_form.submitting = true;
        self.contact_form.error = None;
        self.spawn_mutate_contact(mutation);
    }

    pub(crate) fn submit_settings(&mut self) {
        if self.settings.fields.username.trim().is_empty() {
            self.settings.error = Some("Username cannot be empty".into());
            return;
        }
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        self.settings.is_loading = true;
        self.settings.busy_since = Some(Instant::now());
        self.settings.error = None;
        tasks::save_profile(
            self.api.clone(),
            self.tx.clone(),
            token,
            self.settings.fields.clone(),
            self.settings.new_picture.clone(),
        );
    }

    pub(crate) fn start_scan(&mut self) {
        let Some(palm_image) = self.scan.palm_image.clone() else {
            self.scan.error = Some("Pick a palm image first".into());
            return;
        };
        let Some(token) = self.session.token() else {
            self.force_login(None);
            return;
        };
        self.scan.is_loading = true;
        self.scan.error = None;
        self.scan.profile = None;
        self.scan.contacts.clear();
        tasks::scan_palm(self.api.clone(), self.tx.clone(), token, palm_image);
    }

    pub(crate) fn handle_file_picked(
        &mut self,
        purpose: PickPurpose,
        path: Option<std::path::PathBuf>,
    ) {
        let Some(path) = path else {
            return;
        };
        match purpose {
            PickPurpose::ScanPalm => self.scan.palm_image = Some(path),
            PickPurpose::RegisterPalm => self.register.palm_image = Some(path),
            PickPurpose::RegisterPicture => self.register.profile_picture = Some(path),
            PickPurpose::SettingsPicture => self.settings.new_picture = Some(path),
        }
    }

    /// Texture for a profile-picture reference, kicking off the download on
    /// first sight. `None` while the download is still in flight (the
    /// caller draws a placeholder).
    pub(crate) fn avatar_texture(
        &mut self,
        ctx: &egui::Context,
        reference: &str,
    ) -> Option<egui::TextureHandle> {
        let url = if reference.starts_with("http") {
            reference.to_string()
        } else {
            self.api.asset_url(reference)
        };
        if self.avatars.needs_fetch(&url) {
            self.avatars.mark_loading(&url);
            tasks::fetch_avatar(self.api.clone(), self.tx.clone(), url.clone());
        }
        self.avatars.texture(ctx, &url)
    }

    fn render_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Server");
                ui.text_edit_singleline(&mut self.base_url_input);
                if ui.button("Apply").clicked() {
                    match self.api.set_base_url(self.base_url_input.clone()) {
                        Ok(()) => {
                            self.info_banner = Some("Server URL updated".into());
                        }
                        Err(err) => {
                            self.info_banner = Some(format!("Failed to update URL: {err}"));
                        }
                    }
                }
            });

            if let Some(message) = self.info_banner.clone() {
                let mut dismiss = false;
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(message.as_str());
                            if ui.button("Dismiss").clicked() {
                                dismiss = true;
                            }
                        });
                    });
                if dismiss {
                    self.info_banner = None;
                }
            }
        });
    }

    fn render_logout_confirm(&mut self, ctx: &Context) {
        if !self.confirm_logout {
            return;
        }
        let mut open = true;
        let mut decided = None;
        egui::Window::new("Log out")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Are you sure you want to log out?");
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        decided = Some(true);
                    }
                    if ui.button("No").clicked() {
                        decided = Some(false);
                    }
                });
            });
        if !open {
            self.confirm_logout = false;
        }
        match decided {
            Some(true) => {
                self.session.logout();
                self.confirm_logout = false;
                self.navigate(ViewState::Landing);
            }
            Some(false) => self.confirm_logout = false,
            None => {}
        }
    }

    fn on_authenticated_screen(&self) -> bool {
        matches!(
            self.view,
            ViewState::Home | ViewState::History | ViewState::Scan | ViewState::Settings
        )
    }

    fn any_worker_pending(&self) -> bool {
        self.home.profile_loading
            || self.home.contacts_loading
            || self.history.is_loading
            || self.scan.is_loading
            || self.settings.is_loading
            || self.login.submitting
            || self.register.submitting
            || self.register.finishing
            || self.contact_form.submitting
    }
}

impl eframe::App for PalmlinkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        messages::process_messages(self);

        self.render_top_bar(ctx);

        if self.on_authenticated_screen() {
            if let Some(action) = ui::nav::render(ctx, self.view) {
                match action {
                    ui::nav::NavAction::Go(view) => {
                        if view != self.view {
                            self.navigate(view);
                        }
                    }
                    ui::nav::NavAction::Logout => self.confirm_logout = true,
                }
            }
        }

        match self.view {
            ViewState::Landing => {
                if let Some(action) = ui::landing::render(ctx) {
                    match action {
                        ui::landing::LandingAction::GoLogin => self.navigate(ViewState::Login),
                        ui::landing::LandingAction::GoRegister => {
                            self.navigate(ViewState::Register)
                        }
                    }
                }
            }
            ViewState::Login => {
                if let Some(action) = ui::login::render(self, ctx) {
                    match action {
                        ui::login::LoginAction::Submit => self.submit_login(),
                        ui::login::LoginAction::Back => self.navigate(ViewState::Landing),
                    }
                }
            }
            ViewState::Register => {
                if let Some(action) = ui::register::render(self, ctx) {
                    match action {
                        ui::register::RegisterAction::AdvanceAccount => {
                            self.advance_register_account()
                        }
                        ui::register::RegisterAction::PickPalmImage => {
                            tasks::pick_image(self.tx.clone(), PickPurpose::RegisterPalm)
                        }
                        ui::register::RegisterAction::SubmitRegistration => {
                            self.submit_registration()
                        }
                        ui::register::RegisterAction::PickProfilePicture => {
                            tasks::pick_image(self.tx.clone(), PickPurpose::RegisterPicture)
                        }
                        ui::register::RegisterAction::AddDraftContact => self.add_draft_contact(),
                        ui::register::RegisterAction::FinishSetup => self.finish_register_setup(),
                        ui::register::RegisterAction::Back => self.navigate(ViewState::Landing),
                    }
                }
            }
            ViewState::Home => {
                if let Some(action) = ui::home::render(self, ctx) {
                    match action {
                        ui::home::HomeAction::Reload => self.spawn_load_profile(),
                        ui::home::HomeAction::ReloadContacts => self.spawn_load_contacts(),
                        ui::home::HomeAction::SubmitContactForm => self.submit_contact_form(),
                        ui::home::HomeAction::ConfirmDelete(contact_id) => {
                            self.home.confirm_delete = None;
                            self.spawn_mutate_contact(ContactMutation::Delete { contact_id });
                        }
                        ui::home::HomeAction::OpenLink(url) => {
                            if let Err(err) = open::that(&url) {
                                self.info_banner = Some(format!("Could not open {url}: {err}"));
                            }
                        }
                    }
                }
            }
            ViewState::History => {
                if let Some(action) = ui::history::render(self, ctx) {
                    match action {
                        ui::history::HistoryAction::Retry => self.spawn_load_history(),
                    }
                }
            }
            ViewState::Scan => {
                if let Some(action) = ui::scan::render(self, ctx) {
                    match action {
                        ui::scan::ScanAction::PickImage => {
                            tasks::pick_image(self.tx.clone(), PickPurpose::ScanPalm)
                        }
                        ui::scan::ScanAction::Recognize => self.start_scan(),
                        ui::scan::ScanAction::OpenLink(url) => {
                            if let Err(err) = open::that(&url) {
                                self.info_banner = Some(format!("Could not open {url}: {err}"));
                            }
                        }
                    }
                }
            }
            ViewState::Settings => {
                if let Some(action) = ui::settings::render(self, ctx) {
                    match action {
                        ui::settings::SettingsAction::Retry => self.spawn_load_settings_profile(),
                        ui::settings::SettingsAction::Save => self.submit_settings(),
                        ui::settings::SettingsAction::PickPicture => {
                            tasks::pick_image(self.tx.clone(), PickPurpose::SettingsPicture)
                        }
                        ui::settings::SettingsAction::Logout => self.confirm_logout = true,
                    }
                }
            }
        }

        self.render_logout_confirm(ctx);

        // Worker results only become visible on a repaint; keep frames
        // coming while anything is in flight.
        if self.any_worker_pending() {
            ctx.request_repaint_after(Duration::from_millis(150));
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use palmlink_client::credentials::MemoryCredentialStore;

    /// App wired to an unroutable endpoint and an in-memory credential
    /// store. Workers spawned against it fail fast with a network error.
    /// The store starts empty so the constructor spawns nothing; the token
    /// is established afterwards and tests drive spawns explicitly.
    pub fn app_with_token(token: Option<&str>) -> PalmlinkApp {
        let api = ApiClient::new("http://127.0.0.1:9").expect("client");
        let session = SessionGuard::new(Arc::new(MemoryCredentialStore::default()));
        let app = PalmlinkApp::from_parts(api, session);
        if let Some(token) = token {
            app.session.establish(token);
        }
        app
    }
}
