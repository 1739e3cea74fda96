use std::fmt;

use serde::{Deserialize, Serialize};

/// The caller's own account profile as returned by `GET /api/v1/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Snapshot of another user's profile as embedded in history entries and
/// recognition responses. Unlike [`Profile`] it carries a display `name`
/// rather than account identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCard {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Wire codes for the supported contact channels. Servers occasionally hand
/// back codes outside the fixed set; those are preserved verbatim as
/// [`ContactKind::Other`] and rendered generically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContactKind {
    Instagram,
    Whatsapp,
    Facebook,
    X,
    Linkedin,
    Email,
    Phone,
    Other(String),
}

impl ContactKind {
    /// The kinds a user may pick when creating a contact.
    pub const CREATABLE: [ContactKind; 7] = [
        ContactKind::Instagram,
        ContactKind::Whatsapp,
        ContactKind::Facebook,
        ContactKind::X,
        ContactKind::Linkedin,
        ContactKind::Email,
        ContactKind::Phone,
    ];

    pub fn code(&self) -> &str {
        match self {
            ContactKind::Instagram => "IG",
            ContactKind::Whatsapp => "WA",
            ContactKind::Facebook => "FB",
            ContactKind::X => "X",
            ContactKind::Linkedin => "LI",
            ContactKind::Email => "EMAIL",
            ContactKind::Phone => "PHONE",
            ContactKind::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ContactKind::Instagram => "Instagram",
            ContactKind::Whatsapp => "WhatsApp",
            ContactKind::Facebook => "Facebook",
            ContactKind::X => "Twitter",
            ContactKind::Linkedin => "LinkedIn",
            ContactKind::Email => "Email",
            ContactKind::Phone => "Phone",
            ContactKind::Other(code) => code,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ContactKind::Instagram => "📷",
            ContactKind::Whatsapp => "💬",
            ContactKind::Facebook => "👥",
            ContactKind::X => "🐦",
            ContactKind::Linkedin => "💼",
            ContactKind::Email => "✉",
            ContactKind::Phone => "📞",
            ContactKind::Other(_) => "📇",
        }
    }
}

impl From<String> for ContactKind {
    fn from(raw: String) -> Self {
        match raw.to_uppercase().as_str() {
            "IG" => ContactKind::Instagram,
            "WA" => ContactKind::Whatsapp,
            "FB" => ContactKind::Facebook,
            "X" => ContactKind::X,
            "LI" => ContactKind::Linkedin,
            "EMAIL" => ContactKind::Email,
            "PHONE" => ContactKind::Phone,
            _ => ContactKind::Other(raw),
        }
    }
}

impl From<ContactKind> for String {
    fn from(kind: ContactKind) -> Self {
        kind.code().to_string()
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Absent until the server has created the contact.
    #[serde(default)]
    pub contact_id: Option<String>,
    pub contact_type: ContactKind,
    pub contact_value: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Resolves a contact to something the platform can open: a web URL, a
/// `mailto:` address, or a `tel:` number. Kinds with no canonical link form
/// yield `None` and are displayed without click-through.
pub fn contact_url(contact: &Contact) -> Option<String> {
    let value = contact.contact_value.trim();
    if value.is_empty() {
        return None;
    }
    match contact.contact_type {
        ContactKind::Whatsapp => {
            let digits = value.replace(['+', '-'], "");
            Some(format!("https://api.whatsapp.com/send?phone={digits}"))
        }
        ContactKind::Instagram => Some(if value.starts_with("http") {
            value.to_string()
        } else if value.starts_with("instagram.com/") {
            format!("https://{value}")
        } else {
            format!("http://instagram.com/{}", value.trim_start_matches('@'))
        }),
        ContactKind::Linkedin => Some(if value.starts_with("http") {
            value.to_string()
        } else if value.starts_with("linkedin.com/") {
            format!("https://{value}")
        } else {
            format!("https://www.linkedin.com/in/{value}")
        }),
        ContactKind::Facebook => Some(value.to_string()),
        ContactKind::Email => Some(format!("mailto:{value}")),
        ContactKind::Phone => Some(format!("tel:{value}")),
        ContactKind::X | ContactKind::Other(_) => None,
    }
}

// Request bodies.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddContactRequest {
    pub contact_type: ContactKind,
    pub contact_value: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditContactRequest {
    pub contact_id: String,
    pub contact_type: ContactKind,
    pub contact_value: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteContactRequest {
    pub contact_id: String,
}

/// Profile fields submitted to the edit endpoint. The picture travels as a
/// separate multipart file part, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEdit {
    pub username: String,
    pub bio: String,
    pub job_title: String,
    pub company: String,
}

// Response bodies.

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactList {
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

/// Ack shape shared by the contact edit/delete endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub contact_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEntry {
    pub time_scanned: String,
    pub profile: ProfileCard,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryFeed {
    #[serde(default)]
    pub who_scanned_me: Vec<HistoryEntry>,
    #[serde(default)]
    pub who_i_scanned: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognizedUser {
    pub email: String,
    pub username: String,
}

/// Raw recognition response: account identity plus a profile whose identity
/// fields the server leaves blank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognitionResult {
    pub user: RecognizedUser,
    pub profile: RecognizedProfile,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognizedProfile {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl RecognitionResult {
    /// Merges the identity fields into the profile snapshot for display.
    pub fn into_profile(self) -> Profile {
        Profile {
            email: self.user.email,
            username: self.user.username,
            bio: self.profile.bio,
            company: self.profile.company,
            job_title: self.profile.job_title,
            profile_picture: self.profile.profile_picture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contact(kind: ContactKind, value: &str) -> Contact {
        Contact {
            contact_id: Some("c1".into()),
            contact_type: kind,
            contact_value: value.into(),
            notes: None,
        }
    }

    #[test]
    fn contact_kind_round_trips_wire_codes() {
        for kind in ContactKind::CREATABLE {
            let json = serde_json::to_string(&kind).expect("serialize");
            let back: ContactKind = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn unknown_contact_code_is_preserved() {
        let kind: ContactKind = serde_json::from_str("\"TELEGRAM\"").expect("deserialize");
        assert_eq!(kind, ContactKind::Other("TELEGRAM".into()));
        assert_eq!(kind.code(), "TELEGRAM");
        assert_eq!(serde_json::to_string(&kind).expect("serialize"), "\"TELEGRAM\"");
    }

    #[test]
    fn contact_codes_are_case_insensitive() {
        let kind: ContactKind = serde_json::from_str("\"wa\"").expect("deserialize");
        assert_eq!(kind, ContactKind::Whatsapp);
    }

    #[test]
    fn whatsapp_url_strips_formatting() {
        let url = contact_url(&contact(ContactKind::Whatsapp, "+62-812-3456"));
        assert_eq!(
            url.as_deref(),
            Some("https://api.whatsapp.com/send?phone=628123456")
        );
    }

    #[test]
    fn instagram_url_handles_all_value_forms() {
        assert_eq!(
            contact_url(&contact(ContactKind::Instagram, "@ann")).as_deref(),
            Some("http://instagram.com/ann")
        );
        assert_eq!(
            contact_url(&contact(ContactKind::Instagram, "instagram.com/ann")).as_deref(),
            Some("https://instagram.com/ann")
        );
        assert_eq!(
            contact_url(&contact(ContactKind::Instagram, "https://instagram.com/ann")).as_deref(),
            Some("https://instagram.com/ann")
        );
    }

    #[test]
    fn linkedin_bare_handle_becomes_profile_url() {
        assert_eq!(
            contact_url(&contact(ContactKind::Linkedin, "ann-lee")).as_deref(),
            Some("https://www.linkedin.com/in/ann-lee")
        );
    }

    #[test]
    fn email_and_phone_use_platform_schemes() {
        assert_eq!(
            contact_url(&contact(ContactKind::Email, "a@b.co")).as_deref(),
            Some("mailto:a@b.co")
        );
        assert_eq!(
            contact_url(&contact(ContactKind::Phone, "+123")).as_deref(),
            Some("tel:+123")
        );
    }

    #[test]
    fn kinds_without_link_form_yield_none() {
        assert_eq!(contact_url(&contact(ContactKind::X, "@ann")), None);
        assert_eq!(
            contact_url(&contact(ContactKind::Other("TELEGRAM".into()), "ann")),
            None
        );
        assert_eq!(contact_url(&contact(ContactKind::Email, "   ")), None);
    }

    #[test]
    fn recognition_merge_fills_identity() {
        let result = RecognitionResult {
            user: RecognizedUser {
                email: "ann@example.com".into(),
                username: "ann".into(),
            },
            profile: RecognizedProfile {
                bio: Some("hi".into()),
                company: None,
                job_title: Some("Engineer".into()),
                profile_picture: None,
            },
        };
        let profile = result.into_profile();
        assert_eq!(profile.username, "ann");
        assert_eq!(profile.email, "ann@example.com");
        assert_eq!(profile.job_title.as_deref(), Some("Engineer"));
    }

    #[test]
    fn history_feed_tolerates_missing_sections() {
        let feed: HistoryFeed = serde_json::from_str("{}").expect("deserialize");
        assert!(feed.who_scanned_me.is_empty());
        assert!(feed.who_i_scanned.is_empty());
    }
}
