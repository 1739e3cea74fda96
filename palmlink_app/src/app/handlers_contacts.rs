use palmlink_client::error::ApiError;
use palmlink_client::models::Contact;

use super::state::ContactFormState;
use super::PalmlinkApp;

impl PalmlinkApp {
    pub(super) fn handle_contacts_loaded(&mut self, result: Result<Vec<Contact>, ApiError>) {
        self.home.contacts_loading = false;
        match result {
            Ok(contacts) => {
                // Wholesale replacement; an empty list is a valid steady
                // state, not an error.
                self.home.contacts = contacts;
                self.home.contacts_loaded = true;
            }
            Err(err) => {
                if self.absorb_auth_failure(&err) {
                    return;
                }
                self.home.error = Some(err.to_string());
            }
        }
    }

    pub(super) fn handle_contact_mutated(&mut self, result: Result<String, ApiError>) {
        self.contact_form.submitting = false;
        match result {
            Ok(message) => {
                // Close the form; the authoritative list arrives with the
                // chained reload.
                self.contact_form = ContactFormState::default();
                self.info_banner = Some(message);
            }
            Err(err) => {
                if self.absorb_auth_failure(&err) {
                    return;
                }
                // Failed add/edit chains no reload; stop the spinner here.
                self.home.contacts_loading = false;
                if self.contact_form.open {
                    self.contact_form.error = Some(err.to_string());
                } else {
                    self.home.error = Some(err.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::ViewState;
    use super::super::test_support::app_with_token;
    use super::*;
    use palmlink_client::models::ContactKind;
    use pretty_assertions::assert_eq;

    fn contact(id: &str) -> Contact {
        Contact {
            contact_id: Some(id.into()),
            contact_type: ContactKind::Email,
            contact_value: "a@b.co".into(),
            notes: None,
        }
    }

    #[test]
    fn loaded_contacts_replace_the_list_wholesale() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.home.contacts = vec![contact("old")];
        app.home.contacts_loading = true;

        app.handle_contacts_loaded(Ok(vec![contact("c1"), contact("c2")]));
        assert!(!app.home.contacts_loading);
        assert!(app.home.contacts_loaded);
        let ids: Vec<_> = app
            .home
            .contacts
            .iter()
            .filter_map(|c| c.contact_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn empty_contact_list_is_a_valid_state_not_an_error() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.home.contacts_loading = true;

        // The 404-with-marker case already arrives here as an empty Ok.
        app.handle_contacts_loaded(Ok(Vec::new()));
        assert!(app.home.contacts.is_empty());
        assert!(app.home.contacts_loaded);
        assert_eq!(app.home.error, None);
    }

    #[test]
    fn contacts_auth_failure_forces_login() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.handle_contacts_loaded(Err(ApiError::Auth {
            status: 403,
            message: "Could not validate credentials".into(),
        }));
        assert_eq!(app.session.token(), None);
        assert_eq!(app.view, ViewState::Login);
    }

    #[test]
    fn successful_mutation_closes_form_and_banners_message() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.contact_form.open = true;
        app.contact_form.submitting = true;
        app.contact_form.value = "a@b.co".into();
        app.home.contacts_loading = true;

        app.handle_contact_mutated(Ok("Contact added successfully".into()));
        assert!(!app.contact_form.open);
        assert!(app.contact_form.value.is_empty());
        assert_eq!(app.info_banner.as_deref(), Some("Contact added successfully"));
        // Reload is still in flight.
        assert!(app.home.contacts_loading);
    }

    #[test]
    fn failed_mutation_keeps_form_open_with_error() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.contact_form.open = true;
        app.contact_form.submitting = true;
        app.home.contacts_loading = true;

        app.handle_contact_mutated(Err(ApiError::Validation("contact_value required".into())));
        assert!(app.contact_form.open);
        assert_eq!(
            app.contact_form.error.as_deref(),
            Some("contact_value required")
        );
        assert!(!app.home.contacts_loading);
    }

    #[test]
    fn failed_delete_surfaces_on_the_screen_not_the_form() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.home.contacts_loading = true;

        app.handle_contact_mutated(Err(ApiError::Server {
            status: 500,
            message: "boom".into(),
        }));
        assert!(app.home.error.as_deref().unwrap_or("").contains("boom"));
    }
}
