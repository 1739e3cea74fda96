use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use palmlink_client::models::{
    AddContactRequest, Contact, ContactKind, HistoryEntry, HistoryFeed, Profile, ProfileEdit,
};

/// How long a load may run before the settings screen switches to its
/// "still working" messaging. Messaging only; the call is never cancelled.
pub const SLOW_LOAD_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Landing,
    Login,
    Register,
    Home,
    History,
    Scan,
    Settings,
}

#[derive(Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterStep {
    #[default]
    Account,
    PalmImage,
    ProfileSetup,
}

pub struct RegisterState {
    pub step: RegisterStep,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub palm_image: Option<PathBuf>,
    pub submitting: bool,
    pub error: Option<String>,
    // Profile-setup step.
    pub bio: String,
    pub job_title: String,
    pub company: String,
    pub profile_picture: Option<PathBuf>,
    pub draft_kind: ContactKind,
    pub draft_value: String,
    pub draft_notes: String,
    pub draft_contacts: Vec<AddContactRequest>,
    pub finishing: bool,
}

impl Default for RegisterState {
    fn default() -> Self {
        Self {
            step: RegisterStep::default(),
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            palm_image: None,
            submitting: false,
            error: None,
            bio: String::new(),
            job_title: String::new(),
            company: String::new(),
            profile_picture: None,
            draft_kind: ContactKind::Instagram,
            draft_value: String::new(),
            draft_notes: String::new(),
            draft_contacts: Vec::new(),
            finishing: false,
        }
    }
}

#[derive(Default)]
pub struct HomeState {
    pub profile: Option<Profile>,
    pub contacts: Vec<Contact>,
    /// Distinguishes "no contacts yet" from "not loaded yet".
    pub contacts_loaded: bool,
    pub profile_loading: bool,
    pub contacts_loading: bool,
    pub error: Option<String>,
    pub confirm_delete: Option<Contact>,
}

pub struct ContactFormState {
    pub open: bool,
    /// `Some` when editing an existing contact; the kind is immutable then.
    pub editing_id: Option<String>,
    pub kind: ContactKind,
    pub value: String,
    pub notes: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for ContactFormState {
    fn default() -> Self {
        Self {
            open: false,
            editing_id: None,
            kind: ContactKind::Instagram,
            value: String::new(),
            notes: String::new(),
            submitting: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryTab {
    #[default]
    WhoScannedMe,
    WhoIScanned,
}

#[derive(Default)]
pub struct HistoryState {
    pub feed: Option<HistoryFeed>,
    pub tab: HistoryTab,
    pub query: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected: Option<HistoryEntry>,
}

impl HistoryState {
    pub fn entries(&self) -> &[HistoryEntry] {
        match (&self.feed, self.tab) {
            (Some(feed), HistoryTab::WhoScannedMe) => &feed.who_scanned_me,
            (Some(feed), HistoryTab::WhoIScanned) => &feed.who_i_scanned,
            (None, _) => &[],
        }
    }
}

#[derive(Default)]
pub struct ScanState {
    pub palm_image: Option<PathBuf>,
    pub is_loading: bool,
    pub profile: Option<Profile>,
    pub contacts: Vec<Contact>,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct SettingsState {
    pub profile: Option<Profile>,
    pub fields: ProfileEdit,
    pub initialized_inputs: bool,
    pub new_picture: Option<PathBuf>,
    pub is_loading: bool,
    pub busy_since: Option<Instant>,
    pub error: Option<String>,
}

impl SettingsState {
    pub fn slow_load(&self) -> bool {
        self.is_loading
            && self
                .busy_since
                .is_some_and(|since| since.elapsed() >= SLOW_LOAD_AFTER)
    }
}

/// Which picker dialog a picked file belongs to; the picker runs on a
/// worker thread and reports back as a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickPurpose {
    ScanPalm,
    RegisterPalm,
    RegisterPicture,
    SettingsPicture,
}

/// Decoded RGBA image handed back by a download worker, ready to become a
/// texture on the UI thread.
#[derive(Clone)]
pub struct LoadedImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// Profile pictures keyed by URL: downloaded bytes arrive as
/// [`LoadedImage`]s and are promoted to textures lazily at render time.
#[derive(Default)]
pub struct AvatarCache {
    textures: HashMap<String, egui::TextureHandle>,
    pending: HashMap<String, LoadedImage>,
    loading: HashSet<String>,
    errors: HashMap<String, String>,
}

impl AvatarCache {
    pub fn needs_fetch(&self, url: &str) -> bool {
        !self.textures.contains_key(url)
            && !self.pending.contains_key(url)
            && !self.loading.contains(url)
            && !self.errors.contains_key(url)
    }

    pub fn mark_loading(&mut self, url: &str) {
        self.loading.insert(url.to_string());
    }

    pub fn apply(&mut self, url: String, result: Result<LoadedImage, String>) {
        self.loading.remove(&url);
        match result {
            Ok(image) => {
                self.pending.insert(url, image);
            }
            Err(err) => {
                log::warn!("avatar download failed for {url}: {err}");
                self.errors.insert(url, err);
            }
        }
    }

    pub fn texture(&mut self, ctx: &egui::Context, url: &str) -> Option<egui::TextureHandle> {
        if let Some(texture) = self.textures.get(url) {
            return Some(texture.clone());
        }
        if let Some(image) = self.pending.remove(url) {
            let color = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.pixels);
            let texture = ctx.load_texture(url, color, egui::TextureOptions::default());
            self.textures.insert(url.to_string(), texture.clone());
            return Some(texture);
        }
        None
    }
}

/// Local email plausibility check used by the login and register forms
/// before anything reaches the network.
pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_check_accepts_plausible_addresses() {
        assert!(looks_like_email("ann@example.com"));
        assert!(looks_like_email("a.b+c@mail.example.co"));
    }

    #[test]
    fn email_check_rejects_malformed_addresses() {
        assert!(!looks_like_email("ann"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ann@example"));
        assert!(!looks_like_email("ann@.com"));
        assert!(!looks_like_email("ann@example."));
        assert!(!looks_like_email("ann@ex@ample.com"));
    }

    #[test]
    fn slow_load_requires_elapsed_loading() {
        let mut settings = SettingsState::default();
        assert!(!settings.slow_load());

        settings.is_loading = true;
        settings.busy_since = Some(Instant::now());
        assert!(!settings.slow_load());

        settings.busy_since = Some(Instant::now() - SLOW_LOAD_AFTER);
        assert!(settings.slow_load());

        settings.is_loading = false;
        assert!(!settings.slow_load());
    }

    #[test]
    fn history_tab_selects_feed_section() {
        let mut state = HistoryState::default();
        assert!(state.entries().is_empty());

        state.feed = Some(HistoryFeed {
            who_scanned_me: vec![],
            who_i_scanned: vec![HistoryEntry {
                time_scanned: "2024-06-10T09:00:00".into(),
                profile: palmlink_client::models::ProfileCard {
                    name: "Ann".into(),
                    bio: None,
                    job_title: None,
                    company: None,
                    profile_picture: None,
                },
                contacts: vec![],
            }],
        });
        assert!(state.entries().is_empty());
        state.tab = HistoryTab::WhoIScanned;
        assert_eq!(state.entries().len(), 1);
    }
}
