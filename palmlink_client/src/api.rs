use std::path::Path;
use std::time::Duration;

use log::debug;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::{self, ApiError};
use crate::models::{
    AddContactRequest, Contact, ContactList, DeleteContactRequest, EditContactRequest,
    HistoryFeed, LoginRequest, LoginSession, MutationAck, Profile, ProfileEdit, RecognitionResult,
    RegisterAck,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Public bucket that serves uploaded profile pictures by reference.
pub const DEFAULT_ASSET_BASE_URL: &str = "https://storage.googleapis.com/palmlink_public";

/// Typed binding over the backend's REST endpoints. Transport only: no
/// retries and no credential handling happen here — callers pass the bearer
/// token per call and own the failure policy.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    asset_base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            base_url: base,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<(), ApiError> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    /// Resolves a server-issued picture reference to a fetchable URL.
    pub fn asset_url(&self, reference: &str) -> String {
        format!(
            "{}/{}",
            self.asset_base_url.trim_end_matches('/'),
            reference.trim_start_matches('/')
        )
    }

    pub fn register(
        &self,
        palm_image: &Path,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<RegisterAck, ApiError> {
        let form = Form::new()
            .text("email", email.to_string())
            .text("username", username.to_string())
            .text("password", password.to_string())
            .file("palm_image", palm_image)
            .map_err(|err| {
                ApiError::Config(format!("cannot read {}: {err}", palm_image.display()))
            })?;
        let request = self
            .client
            .post(self.url("/api/v1/register")?)
            .multipart(form);
        self.execute(request)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LoginSession, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.client.post(self.url("/api/v1/login")?).json(&body);
        self.execute(request)
    }

    pub fn get_profile(&self, token: &str) -> Result<Profile, ApiError> {
        let request = self.client.get(self.url("/api/v1/profile")?).bearer_auth(token);
        self.execute(request)
    }

    /// Submits the edit form; the picture part is attached only when given
    /// so an unchanged picture is never re-uploaded.
    pub fn edit_profile(
        &self,
        token: &str,
        fields: &ProfileEdit,
        picture: Option<&Path>,
    ) -> Result<Profile, ApiError> {
        let mut form = Form::new()
            .text("username", fields.username.clone())
            .text("bio", fields.bio.clone())
            .text("job_title", fields.job_title.clone())
            .text("company", fields.company.clone());
        if let Some(path) = picture {
            form = form.file("profile_picture", path).map_err(|err| {
                ApiError::Config(format!("cannot read {}: {err}", path.display()))
            })?;
        }
        let request = self
            .client
            .post(self.url("/api/v1/profile/edit")?)
            .bearer_auth(token)
            .multipart(form);
        self.execute(request)
    }

    /// Lists the caller's contacts. The backend answers an account with no
    /// contact info with a marked 404; that case is an empty list here, not
    /// an error.
    pub fn list_contacts(&self, token: &str) -> Result<Vec<Contact>, ApiError> {
        let request = self
            .client
            .get(self.url("/api/v1/contact_info")?)
            .bearer_auth(token);
        let response = request
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if (200..300).contains(&status) {
            let list: ContactList = decode(status, &body)?;
            return Ok(list.contacts);
        }
        if status == 404 && error::is_no_contacts_body(&body) {
            debug!("contact list empty for account (marked 404)");
            return Ok(Vec::new());
        }
        Err(error::classify_http_failure(status, &body))
    }

    pub fn add_contact(&self, token: &str, req: &AddContactRequest) -> Result<ContactList, ApiError> {
        let request = self
            .client
            .post(self.url("/api/v1/contact_info/add")?)
            .bearer_auth(token)
            .json(req);
        self.execute(request)
    }

    pub fn edit_contact(
        &self,
        token: &str,
        req: &EditContactRequest,
    ) -> Result<MutationAck, ApiError> {
        let request = self
            .client
            .put(self.url("/api/v1/contact_info/edit")?)
            .bearer_auth(token)
            .json(req);
        self.execute(request)
    }

    pub fn delete_contact(&self, token: &str, contact_id: &str) -> Result<MutationAck, ApiError> {
        let body = DeleteContactRequest {
            contact_id: contact_id.to_string(),
        };
        let request = self
            .client
            .delete(self.url("/api/v1/contact_info/delete")?)
            .bearer_auth(token)
            .json(&body);
        self.execute(request)
    }

    pub fn recognize_palm(
        &self,
        token: &str,
        palm_image: &Path,
    ) -> Result<RecognitionResult, ApiError> {
        let form = Form::new().file("palm_image", palm_image).map_err(|err| {
            ApiError::Config(format!("cannot read {}: {err}", palm_image.display()))
        })?;
        let request = self
            .client
            .post(self.url("/api/v1/recognize_palm")?)
            .bearer_auth(token)
            .multipart(form);
        self.execute(request)
    }

    pub fn get_history(&self, token: &str) -> Result<HistoryFeed, ApiError> {
        let request = self.client.get(self.url("/api/v1/history")?).bearer_auth(token);
        self.execute(request)
    }

    /// Raw download of a public asset (profile pictures), sharing the
    /// client's timeout.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if (200..300).contains(&status) {
            Ok(bytes.to_vec())
        } else {
            Err(error::classify_http_failure(
                status,
                &String::from_utf8_lossy(&bytes),
            ))
        }
    }

    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        self.handle(response)
    }

    fn handle<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if (200..300).contains(&status) {
            decode(status, &body)
        } else {
            Err(error::classify_http_failure(status, &body))
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| ApiError::Config(format!("invalid base URL: {err}")))?;
        url.set_path(path.trim_start_matches('/'));
        Ok(url)
    }
}

fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Server {
        status,
        message: format!("unexpected response body: {err}"),
    })
}

fn sanitize_base_url(mut base: String) -> Result<String, ApiError> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    Url::parse(&base).map_err(|err| ApiError::Config(format!("invalid base URL: {err}")))?;
    Ok(base)
}
