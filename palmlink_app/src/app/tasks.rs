use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use log::{error, warn};

use palmlink_client::api::ApiClient;
use palmlink_client::error::ApiError;
use palmlink_client::history;
use palmlink_client::models::{
    AddContactRequest, Contact, EditContactRequest, ProfileEdit,
};
use palmlink_client::policy::{self, RetryPolicy};

use super::messages::AppMessage;
use super::state::{LoadedImage, PickPurpose};

fn send(tx: &Sender<AppMessage>, message: AppMessage) {
    if tx.send(message).is_err() {
        error!("app channel closed, dropping worker result");
    }
}

pub fn login(api: ApiClient, tx: Sender<AppMessage>, email: String, password: String) {
    thread::spawn(move || {
        let result = api.login(&email, &password);
        send(&tx, AppMessage::LoggedIn(result));
    });
}

/// Registration immediately chains a login so the new account lands in the
/// app with a live session.
pub fn register_and_login(
    api: ApiClient,
    tx: Sender<AppMessage>,
    palm_image: PathBuf,
    email: String,
    username: String,
    password: String,
) {
    thread::spawn(move || {
        let result = api
            .register(&palm_image, &email, &username, &password)
            .and_then(|_| api.login(&email, &password));
        send(&tx, AppMessage::RegisterCompleted(result));
    });
}

/// Profile-setup step of registration: submit the profile, then upload the
/// locally assembled contact list. Individual contact failures are logged
/// and skipped; the profile edit alone decides success.
pub fn finish_setup(
    api: ApiClient,
    tx: Sender<AppMessage>,
    token: String,
    fields: ProfileEdit,
    picture: Option<PathBuf>,
    contacts: Vec<AddContactRequest>,
) {
    thread::spawn(move || {
        let result = api
            .edit_profile(&token, &fields, picture.as_deref())
            .map(|profile| {
                for contact in &contacts {
                    if let Err(err) = api.add_contact(&token, contact) {
                        warn!(
                            "failed to upload initial {} contact: {err}",
                            contact.contact_type.code()
                        );
                    }
                }
                profile
            });
        send(&tx, AppMessage::SetupFinished(result));
    });
}

/// Profile and contacts refresh as one logical unit: a successful profile
/// fetch chains straight into the contacts fetch.
pub fn load_profile_with_contacts(api: ApiClient, tx: Sender<AppMessage>, token: String) {
    thread::spawn(move || match api.get_profile(&token) {
        Ok(profile) => {
            send(&tx, AppMessage::ProfileLoaded(Ok(profile)));
            send(&tx, AppMessage::ContactsLoaded(api.list_contacts(&token)));
        }
        Err(err) => send(&tx, AppMessage::ProfileLoaded(Err(err))),
    });
}

pub fn load_contacts(api: ApiClient, tx: Sender<AppMessage>, token: String) {
    thread::spawn(move || {
        send(&tx, AppMessage::ContactsLoaded(api.list_contacts(&token)));
    });
}

pub fn load_settings_profile(api: ApiClient, tx: Sender<AppMessage>, token: String) {
    thread::spawn(move || {
        send(&tx, AppMessage::SettingsProfileLoaded(api.get_profile(&token)));
    });
}

pub fn save_profile(
    api: ApiClient,
    tx: Sender<AppMessage>,
    token: String,
    fields: ProfileEdit,
    picture: Option<PathBuf>,
) {
    thread::spawn(move || {
        let result = api.edit_profile(&token, &fields, picture.as_deref());
        send(&tx, AppMessage::ProfileSaved(result));
    });
}

pub fn load_history(api: ApiClient, tx: Sender<AppMessage>, token: String) {
    thread::spawn(move || {
        send(&tx, AppMessage::HistoryLoaded(api.get_history(&token)));
    });
}

/// Recognition chains a history fetch; the recognized user's contacts are
/// the snapshot on the newest `who_i_scanned` entry.
pub fn scan_palm(api: ApiClient, tx: Sender<AppMessage>, token: String, palm_image: PathBuf) {
    thread::spawn(move || match api.recognize_palm(&token, &palm_image) {
        Ok(result) => {
            send(&tx, AppMessage::PalmRecognized(Ok(result.into_profile())));
            let contacts = api.get_history(&token).map(|feed| {
                history::latest_scan(&feed.who_i_scanned)
                    .map(|entry| entry.contacts.clone())
                    .unwrap_or_default()
            });
            send(&tx, AppMessage::ScanContactsLoaded(contacts));
        }
        Err(err) => send(&tx, AppMessage::PalmRecognized(Err(err))),
    });
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactMutation {
    Add(AddContactRequest),
    Edit(EditContactRequest),
    Delete { contact_id: String },
}

impl ContactMutation {
    /// Delete reloads the list whatever the outcome; add/edit only reload
    /// once the server accepted the change.
    fn reloads_unconditionally(&self) -> bool {
        matches!(self, ContactMutation::Delete { .. })
    }
}

pub fn mutate_contact(
    api: ApiClient,
    tx: Sender<AppMessage>,
    token: String,
    mutation: ContactMutation,
) {
    thread::spawn(move || {
        let (outcome, reload) = run_mutation_with_reload(
            policy::CONTACT_MUTATION.retry,
            mutation.reloads_unconditionally(),
            || apply_mutation(&api, &token, &mutation),
            || api.list_contacts(&token),
        );
        send(&tx, AppMessage::ContactMutated(outcome));
        if let Some(result) = reload {
            send(&tx, AppMessage::ContactsLoaded(result));
        }
    });
}

fn apply_mutation(
    api: &ApiClient,
    token: &str,
    mutation: &ContactMutation,
) -> Result<String, ApiError> {
    match mutation {
        ContactMutation::Add(req) => api
            .add_contact(token, req)
            .map(|_| "Contact added successfully".to_string()),
        ContactMutation::Edit(req) => api
            .edit_contact(token, req)
            .map(|ack| ack.message.unwrap_or_else(|| "Contact updated".to_string())),
        ContactMutation::Delete { contact_id } => api
            .delete_contact(token, contact_id)
            .map(|ack| ack.message.unwrap_or_else(|| "Contact deleted".to_string())),
    }
}

/// The mutation→reload sequence: retry the mutation within policy, then
/// reload the full list so the display reflects server truth. The reload,
/// not the mutation response, is what the list renders from.
fn run_mutation_with_reload(
    retry: RetryPolicy,
    unconditional_reload: bool,
    mutate: impl FnMut() -> Result<String, ApiError>,
    reload: impl FnOnce() -> Result<Vec<Contact>, ApiError>,
) -> (
    Result<String, ApiError>,
    Option<Result<Vec<Contact>, ApiError>>,
) {
    let outcome = policy::run_with_retry(retry, mutate);
    let reload_result = if unconditional_reload || outcome.is_ok() {
        Some(reload())
    } else {
        None
    };
    (outcome, reload_result)
}

pub fn pick_image(tx: Sender<AppMessage>, purpose: PickPurpose) {
    thread::spawn(move || {
        let path = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file();
        send(&tx, AppMessage::FilePicked { purpose, path });
    });
}

pub fn fetch_avatar(api: ApiClient, tx: Sender<AppMessage>, url: String) {
    thread::spawn(move || {
        let result = (|| {
            let bytes = api.fetch_bytes(&url).map_err(|err| err.to_string())?;
            let decoded = image::load_from_memory(&bytes).map_err(|err| err.to_string())?;
            let size = [decoded.width() as usize, decoded.height() as usize];
            let rgba = decoded.to_rgba8();
            Ok(LoadedImage {
                size,
                pixels: rgba.into_raw(),
            })
        })();
        send(&tx, AppMessage::AvatarLoaded { url, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use palmlink_client::models::ContactKind;
    use pretty_assertions::assert_eq;

    fn network() -> ApiError {
        ApiError::Network("connection refused".into())
    }

    fn retry3() -> RetryPolicy {
        policy::CONTACT_MUTATION.retry
    }

    fn sample_contacts() -> Vec<Contact> {
        vec![Contact {
            contact_id: Some("c1".into()),
            contact_type: ContactKind::Email,
            contact_value: "a@b.co".into(),
            notes: None,
        }]
    }

    #[test]
    fn successful_mutation_reloads_exactly_once() {
        let mut reloads = 0;
        let (outcome, reload) = run_mutation_with_reload(
            retry3(),
            false,
            || Ok("Contact added successfully".into()),
            || {
                reloads += 1;
                Ok(sample_contacts())
            },
        );
        assert_eq!(outcome, Ok("Contact added successfully".to_string()));
        assert_eq!(reloads, 1);
        assert_eq!(reload, Some(Ok(sample_contacts())));
    }

    #[test]
    fn success_on_second_retry_reloads_once_without_error() {
        let mut attempts = 0;
        let mut reloads = 0;
        let (outcome, _) = run_mutation_with_reload(
            retry3(),
            false,
            || {
                attempts += 1;
                if attempts < 3 {
                    Err(network())
                } else {
                    Ok("Contact added successfully".into())
                }
            },
            || {
                reloads += 1;
                Ok(Vec::new())
            },
        );
        assert!(outcome.is_ok());
        assert_eq!(attempts, 3);
        assert_eq!(reloads, 1);
    }

    #[test]
    fn exhausted_network_retries_surface_error_without_reload() {
        let mut attempts = 0;
        let (outcome, reload) = run_mutation_with_reload(
            retry3(),
            false,
            || {
                attempts += 1;
                Err(network())
            },
            || panic!("no reload after a failed add"),
        );
        assert_eq!(outcome, Err(network()));
        assert_eq!(attempts, 4);
        assert_eq!(reload, None);
    }

    #[test]
    fn delete_reloads_even_on_failure() {
        let mut reloads = 0;
        let (outcome, reload) = run_mutation_with_reload(
            retry3(),
            true,
            || {
                Err(ApiError::Server {
                    status: 500,
                    message: "boom".into(),
                })
            },
            || {
                reloads += 1;
                Ok(sample_contacts())
            },
        );
        assert!(outcome.is_err());
        assert_eq!(reloads, 1);
        assert_eq!(reload, Some(Ok(sample_contacts())));
    }

    #[test]
    fn validation_failure_is_not_retried() {
        let mut attempts = 0;
        let (outcome, reload) = run_mutation_with_reload(
            retry3(),
            false,
            || {
                attempts += 1;
                Err(ApiError::Validation("contact_value required".into()))
            },
            || unreachable!("no reload on validation failure"),
        );
        assert!(matches!(outcome, Err(ApiError::Validation(_))));
        assert_eq!(attempts, 1);
        assert_eq!(reload, None);
    }

    #[test]
    fn only_delete_reloads_unconditionally() {
        assert!(ContactMutation::Delete {
            contact_id: "c1".into()
        }
        .reloads_unconditionally());
        assert!(!ContactMutation::Add(AddContactRequest {
            contact_type: ContactKind::Email,
            contact_value: "a@b.co".into(),
            notes: String::new(),
        })
        .reloads_unconditionally());
    }
}
