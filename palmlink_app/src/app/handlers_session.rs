use palmlink_client::error::ApiError;
use palmlink_client::models::{LoginSession, Profile};

use super::state::{RegisterStep, ViewState};
use super::PalmlinkApp;

impl PalmlinkApp {
    pub(super) fn handle_logged_in(&mut self, result: Result<LoginSession, ApiError>) {
        self.login.submitting = false;
        match result {
            Ok(session) => {
                self.session.establish(&session.access_token);
                self.navigate(ViewState::Home);
            }
            Err(ApiError::Network(_)) => {
                self.login.notice = Some("Login failed. Please try again.".into());
            }
            Err(_) => {
                self.login.notice = Some("Incorrect email or password".into());
            }
        }
    }

    pub(super) fn handle_register_completed(&mut self, result: Result<LoginSession, ApiError>) {
        self.register.submitting = false;
        match result {
            Ok(session) => {
                self.session.establish(&session.access_token);
                self.register.error = None;
                self.register.step = RegisterStep::ProfileSetup;
            }
            Err(err) => {
                self.register.error = Some(register_error_message(&err));
            }
        }
    }

    pub(super) fn handle_setup_finished(&mut self, result: Result<Profile, ApiError>) {
        self.register.finishing = false;
        match result {
            Ok(_) => {
                self.info_banner = Some("Registration complete. Welcome!".into());
                self.navigate(ViewState::Home);
            }
            Err(err) => {
                if self.absorb_auth_failure(&err) {
                    return;
                }
                self.register.error = Some(err.to_string());
            }
        }
    }
}

/// Maps registration failures to the guidance the user actually needs; the
/// backend distinguishes the cases only in the body text.
fn register_error_message(err: &ApiError) -> String {
    if matches!(err, ApiError::Network(_)) {
        return "Network error: unable to connect to the server".into();
    }
    let detail = match err {
        ApiError::Auth { message, .. } | ApiError::Server { message, .. } => message.as_str(),
        ApiError::Validation(message) => message.as_str(),
        _ => "",
    };
    if detail.contains("palm image") {
        "Your palm image couldn't be processed. Please take a clear photo with good lighting and try again.".into()
    } else if detail.contains("email format") {
        "Please enter a valid email address.".into()
    } else if detail.contains("already exists") {
        "This email is already registered. Please use a different email.".into()
    } else {
        "The palm is already registered. Please try again.".into()
    }
}
