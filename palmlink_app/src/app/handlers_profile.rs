use palmlink_client::error::ApiError;
use palmlink_client::models::{Profile, ProfileEdit};

use super::state::ViewState;
use super::PalmlinkApp;

impl PalmlinkApp {
    pub(super) fn handle_profile_loaded(&mut self, result: Result<Profile, ApiError>) {
        self.home.profile_loading = false;
        match result {
            Ok(profile) => {
                self.home.profile = Some(profile);
                // The worker chains straight into the contacts fetch.
                self.home.contacts_loading = true;
            }
            Err(err) => {
                if self.absorb_auth_failure(&err) {
                    return;
                }
                self.home.error = Some(err.to_string());
            }
        }
    }

    pub(super) fn handle_settings_profile_loaded(&mut self, result: Result<Profile, ApiError>) {
        if self.view != ViewState::Settings {
            return;
        }
        self.settings.is_loading = false;
        self.settings.busy_since = None;
        match result {
            Ok(profile) => {
                if !self.settings.initialized_inputs {
                    self.settings.fields = edit_fields_of(&profile);
                    self.settings.initialized_inputs = true;
                }
                self.settings.profile = Some(profile);
            }
            Err(err) => {
                if self.absorb_auth_failure(&err) {
                    return;
                }
                self.settings.error = Some(err.to_string());
            }
        }
    }

    pub(super) fn handle_profile_saved(&mut self, result: Result<Profile, ApiError>) {
        if self.view != ViewState::Settings {
            return;
        }
        self.settings.is_loading = false;
        self.settings.busy_since = None;
        match result {
            Ok(profile) => {
                self.settings.fields = edit_fields_of(&profile);
                self.settings.profile = Some(profile);
                self.settings.new_picture = None;
                self.info_banner = Some("Profile updated".into());
            }
            Err(err) => {
                if self.absorb_auth_failure(&err) {
                    return;
                }
                self.settings.error = Some(err.to_string());
            }
        }
    }
}

fn edit_fields_of(profile: &Profile) -> ProfileEdit {
    ProfileEdit {
        username: profile.username.clone(),
        bio: profile.bio.clone().unwrap_or_default(),
        job_title: profile.job_title.clone().unwrap_or_default(),
        company: profile.company.clone().unwrap_or_default(),
    }
}
