use palmlink_client::error::ApiError;
use palmlink_client::models::{Contact, Profile};

use super::state::ViewState;
use super::PalmlinkApp;

impl PalmlinkApp {
    pub(super) fn handle_palm_recognized(&mut self, result: Result<Profile, ApiError>) {
        if self.view != ViewState::Scan {
            return;
        }
        match result {
            Ok(profile) => {
                // Loading stays on: the contacts snapshot is still being
                // pulled from history.
                self.scan.profile = Some(profile);
            }
            Err(err) => {
                self.scan.is_loading = false;
                if self.absorb_auth_failure(&err) {
                    return;
                }
                self.scan.error = Some(scan_error_message(&err));
            }
        }
    }

    pub(super) fn handle_scan_contacts_loaded(&mut self, result: Result<Vec<Contact>, ApiError>) {
        if self.view != ViewState::Scan {
            return;
        }
        self.scan.is_loading = false;
        match result {
            Ok(contacts) => {
                self.scan.contacts = contacts;
            }
            Err(_) => {
                self.scan.error = Some("Failed to fetch history".into());
            }
        }
    }
}

fn scan_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Server { status: 404, .. } => "Palm not found in database".into(),
        ApiError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::app_with_token;
    use super::*;
    use palmlink_client::models::ContactKind;
    use pretty_assertions::assert_eq;

    fn recognized() -> Profile {
        Profile {
            email: "ann@example.com".into(),
            username: "ann".into(),
            bio: Some("hi".into()),
            company: None,
            job_title: None,
            profile_picture: None,
        }
    }

    #[test]
    fn recognition_keeps_loading_until_contacts_arrive() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Scan;
        app.scan.is_loading = true;

        app.handle_palm_recognized(Ok(recognized()));
        assert!(app.scan.is_loading);
        assert_eq!(
            app.scan.profile.as_ref().map(|p| p.username.as_str()),
            Some("ann")
        );

        app.handle_scan_contacts_loaded(Ok(vec![Contact {
            contact_id: Some("c1".into()),
            contact_type: ContactKind::Whatsapp,
            contact_value: "+628".into(),
            notes: None,
        }]));
        assert!(!app.scan.is_loading);
        assert_eq!(app.scan.contacts.len(), 1);
        assert_eq!(app.scan.error, None);
    }

    #[test]
    fn unknown_palm_maps_to_a_friendly_message() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Scan;
        app.scan.is_loading = true;

        app.handle_palm_recognized(Err(ApiError::Server {
            status: 404,
            message: "no match".into(),
        }));
        assert!(!app.scan.is_loading);
        assert_eq!(app.scan.error.as_deref(), Some("Palm not found in database"));
    }

    #[test]
    fn scan_auth_failure_forces_login() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Scan;
        app.handle_palm_recognized(Err(ApiError::Auth {
            status: 401,
            message: "expired".into(),
        }));
        assert_eq!(app.session.token(), None);
        assert_eq!(app.view, ViewState::Login);
    }

    #[test]
    fn failed_history_chain_surfaces_scan_error() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Scan;
        app.scan.is_loading = true;
        app.scan.profile = Some(recognized());

        app.handle_scan_contacts_loaded(Err(ApiError::Network("refused".into())));
        assert_eq!(app.scan.error.as_deref(), Some("Failed to fetch history"));
    }

    #[test]
    fn scan_results_are_dropped_after_leaving_screen() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.handle_palm_recognized(Ok(recognized()));
        app.handle_scan_contacts_loaded(Ok(vec![]));
        assert!(app.scan.profile.is_none());
        assert!(!app.scan.is_loading);
    }
}
