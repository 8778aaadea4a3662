//! Recipient contact model.

use crate::ids::generate_unique_id;
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity tokens for contact instances. Two contacts constructed
/// separately never compare as the same membership entry, even with
/// identical field values.
static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// A single message recipient.
///
/// Packet membership checks ([`crate::CommandPacket::has_contact`])
/// compare instance identity, not field values. Cloning preserves the
/// identity token: a clone is the same contact as its original.
#[derive(Debug, Clone)]
pub struct Contact {
    identity: u64,
    app_unique_id: String,
    first_name: String,
    last_name: String,
    name: Option<String>,
    email: String,
    callback_url: Option<String>,
}

impl Contact {
    /// Create a contact with an auto-generated application id when
    /// `app_unique_id` is not supplied.
    pub fn new(app_unique_id: Option<&str>) -> Self {
        Self {
            identity: NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed),
            app_unique_id: app_unique_id
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(generate_unique_id),
            first_name: String::new(),
            last_name: String::new(),
            name: None,
            email: String::new(),
            callback_url: None,
        }
    }

    /// Create a fully populated contact.
    ///
    /// The callback URL is applied only when non-empty.
    pub fn create(
        first_name: &str,
        last_name: &str,
        email: &str,
        callback_url: Option<&str>,
        app_unique_id: Option<&str>,
    ) -> Self {
        let mut contact = Self::new(app_unique_id);
        contact
            .set_first_name(first_name)
            .set_last_name(last_name)
            .set_email(email);

        if let Some(url) = callback_url.filter(|u| !u.is_empty()) {
            contact.set_callback_url(url);
        }

        contact
    }

    /// Application-unique id for this contact. Immutable once created.
    pub fn app_unique_id(&self) -> &str {
        &self.app_unique_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn set_first_name(&mut self, first_name: &str) -> &mut Self {
        self.first_name = first_name.to_string();
        self
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn set_last_name(&mut self, last_name: &str) -> &mut Self {
        self.last_name = last_name.to_string();
        self
    }

    /// Display name.
    ///
    /// Returns the explicit override when one has been set; otherwise
    /// derives `"{first} {last}"` from the current field values at
    /// call time.
    pub fn name(&self) -> String {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Set an explicit display name, overriding derivation.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: &str) -> &mut Self {
        self.email = email.to_string();
        self
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    pub fn set_callback_url(&mut self, callback_url: &str) -> &mut Self {
        self.callback_url = Some(callback_url.to_string());
        self
    }

    /// Membership identity check used by the packet.
    pub(crate) fn is_same(&self, other: &Contact) -> bool {
        self.identity == other.identity
    }

    /// Wire payload for the `contact` array of a command packet.
    ///
    /// `callbackUrl` is omitted entirely when unset or empty.
    pub fn to_payload(&self) -> Value {
        let mut out = json!({
            "appuniqueid": self.app_unique_id,
            "First Name": self.first_name,
            "Last Name": self.last_name,
            "name": self.name(),
            "email": self.email,
        });

        if let Some(url) = self.callback_url.as_deref().filter(|u| !u.is_empty()) {
            out["callbackUrl"] = json!(url);
        }

        out
    }
}

impl Serialize for Contact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST_NAME: &str = "First";
    const LAST_NAME: &str = "Last";
    const EMAIL: &str = "first.last@example.org";
    const CALLBACK_URL: &str = "http://example.org";
    const UNIQUE_ID: &str = "id";

    fn full_contact() -> Contact {
        Contact::create(
            FIRST_NAME,
            LAST_NAME,
            EMAIL,
            Some(CALLBACK_URL),
            Some(UNIQUE_ID),
        )
    }

    #[test]
    fn creates_unique_id_by_default() {
        let contact = Contact::new(None);
        let id = contact.app_unique_id();
        assert!(id.len() >= 5 && id.len() <= 40);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn accepts_unique_id() {
        assert_eq!(full_contact().app_unique_id(), UNIQUE_ID);
    }

    #[test]
    fn accepts_callback_url() {
        assert_eq!(full_contact().callback_url(), Some(CALLBACK_URL));
    }

    #[test]
    fn empty_callback_url_is_not_applied() {
        let contact = Contact::create(FIRST_NAME, LAST_NAME, EMAIL, Some(""), None);
        assert!(contact.callback_url().is_none());
    }

    #[test]
    fn setters_chain_fluently() {
        let mut contact = Contact::new(None);
        contact
            .set_first_name(FIRST_NAME)
            .set_last_name(LAST_NAME)
            .set_email(EMAIL);
        assert_eq!(contact.first_name(), FIRST_NAME);
        assert_eq!(contact.last_name(), LAST_NAME);
        assert_eq!(contact.email(), EMAIL);
    }

    #[test]
    fn explicit_name_wins() {
        let mut contact = full_contact();
        contact.set_name("Full Name");
        assert_eq!(contact.name(), "Full Name");
    }

    #[test]
    fn name_derives_from_first_and_last() {
        let contact = full_contact();
        assert_eq!(contact.name(), "First Last");
    }

    #[test]
    fn derived_name_tracks_later_field_changes() {
        let mut contact = full_contact();
        contact.set_first_name("Second");
        assert_eq!(contact.name(), "Second Last");
    }

    #[test]
    fn identical_fields_are_distinct_contacts() {
        let a = Contact::create("A", "B", "a@b.com", None, Some("same"));
        let b = Contact::create("A", "B", "a@b.com", None, Some("same"));
        assert!(!a.is_same(&b));
    }

    #[test]
    fn clone_is_same_contact() {
        let a = full_contact();
        let b = a.clone();
        assert!(a.is_same(&b));
    }

    #[test]
    fn payload_contains_required_keys() {
        let payload = full_contact().to_payload();
        assert_eq!(payload["appuniqueid"], UNIQUE_ID);
        assert_eq!(payload["First Name"], FIRST_NAME);
        assert_eq!(payload["Last Name"], LAST_NAME);
        assert_eq!(payload["name"], "First Last");
        assert_eq!(payload["email"], EMAIL);
        assert_eq!(payload["callbackUrl"], CALLBACK_URL);
    }

    #[test]
    fn payload_omits_unset_callback_url() {
        let contact = Contact::create("A", "B", "a@b.com", None, None);
        let payload = contact.to_payload();
        assert!(payload.get("callbackUrl").is_none());
    }

    #[test]
    fn serialize_matches_payload() {
        let contact = full_contact();
        let via_serde = serde_json::to_value(&contact).unwrap();
        assert_eq!(via_serde, contact.to_payload());
    }
}
