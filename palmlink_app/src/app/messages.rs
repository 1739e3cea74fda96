use std::path::PathBuf;

use palmlink_client::error::ApiError;
use palmlink_client::models::{Contact, HistoryFeed, LoginSession, Profile};

use super::state::{LoadedImage, PickPurpose};
use super::PalmlinkApp;

/// Results delivered from worker threads back to the UI thread. Every
/// network operation finishes as exactly one of these (plus a trailing
/// `ContactsLoaded` when a reload was chained).
pub enum AppMessage {
    LoggedIn(Result<LoginSession, ApiError>),
    /// Registration chained into an automatic login; the session is the
    /// login's.
    RegisterCompleted(Result<LoginSession, ApiError>),
    /// Profile-setup step finished (profile edit plus initial contacts).
    SetupFinished(Result<Profile, ApiError>),
    ProfileLoaded(Result<Profile, ApiError>),
    ContactsLoaded(Result<Vec<Contact>, ApiError>),
    ContactMutated(Result<String, ApiError>),
    SettingsProfileLoaded(Result<Profile, ApiError>),
    ProfileSaved(Result<Profile, ApiError>),
    HistoryLoaded(Result<HistoryFeed, ApiError>),
    /// Recognition response with identity merged into the profile.
    PalmRecognized(Result<Profile, ApiError>),
    /// Contacts snapshot pulled from the newest matching history entry.
    ScanContactsLoaded(Result<Vec<Contact>, ApiError>),
    FilePicked {
        purpose: PickPurpose,
        path: Option<PathBuf>,
    },
    AvatarLoaded {
        url: String,
        result: Result<LoadedImage, String>,
    },
}

pub(super) fn process_messages(app: &mut PalmlinkApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::LoggedIn(result) => app.handle_logged_in(result),
            AppMessage::RegisterCompleted(result) => app.handle_register_completed(result),
            AppMessage::SetupFinished(result) => app.handle_setup_finished(result),
            AppMessage::ProfileLoaded(result) => app.handle_profile_loaded(result),
            AppMessage::ContactsLoaded(result) => app.handle_contacts_loaded(result),
            AppMessage::ContactMutated(result) => app.handle_contact_mutated(result),
            AppMessage::SettingsProfileLoaded(result) => app.handle_settings_profile_loaded(result),
            AppMessage::ProfileSaved(result) => app.handle_profile_saved(result),
            AppMessage::HistoryLoaded(result) => app.handle_history_loaded(result),
            AppMessage::PalmRecognized(result) => app.handle_palm_recognized(result),
            AppMessage::ScanContactsLoaded(result) => app.handle_scan_contacts_loaded(result),
            AppMessage::FilePicked { purpose, path } => app.handle_file_picked(purpose, path),
            AppMessage::AvatarLoaded { url, result } => app.avatars.apply(url, result),
        }
    }
}
