//! Command packet assembly and wire serialization.
//!
//! A [`CommandPacket`] models one job submission to Velma: sponsor
//! identity, authentication keys, recipient contacts, product/template
//! selection, and free-form user variables for template rendering.
//! [`CommandPacket::to_payload`] produces the exact JSON shape the
//! `job` route expects.

use crate::contact::Contact;
use crate::error::{VelmaError, VelmaResult};
use crate::ids::generate_unique_id;
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// One Velma job submission.
///
/// Assembly is pure in-memory work with no internal synchronization;
/// confine an instance to one logical flow of control.
#[derive(Debug, Clone)]
pub struct CommandPacket {
    version: String,
    packet_type: String,
    callback_uri: Option<String>,
    job_unique_id: String,
    sponsor_name: String,
    sponsor_key: String,
    client_key: String,
    email_subject: Option<String>,
    from_name: Option<String>,
    from_email: Option<String>,
    product_id: Option<String>,
    product_template: Option<String>,
    contacts: Vec<Contact>,
    user_variables: Map<String, Value>,
}

impl CommandPacket {
    /// Protocol version sent when none is supplied.
    pub const DEFAULT_VERSION: &'static str = "1.5";
    /// The only packet type with specialised fields.
    pub const TYPE_EMAIL: &'static str = "email";

    /// Create an email packet with the default version and a freshly
    /// generated job id.
    pub fn new(sponsor_name: &str, sponsor_key: &str, client_key: &str) -> Self {
        Self::with_options(sponsor_name, sponsor_key, client_key, None, None, None)
    }

    /// Create a packet, overriding type, version, or job id.
    ///
    /// Empty or absent overrides fall back to [`Self::TYPE_EMAIL`],
    /// [`Self::DEFAULT_VERSION`], and a generated job id respectively.
    pub fn with_options(
        sponsor_name: &str,
        sponsor_key: &str,
        client_key: &str,
        packet_type: Option<&str>,
        version: Option<&str>,
        job_unique_id: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        Self {
            version: non_empty(version).unwrap_or_else(|| Self::DEFAULT_VERSION.to_string()),
            packet_type: non_empty(packet_type).unwrap_or_else(|| Self::TYPE_EMAIL.to_string()),
            callback_uri: None,
            job_unique_id: non_empty(job_unique_id).unwrap_or_else(generate_unique_id),
            sponsor_name: sponsor_name.to_string(),
            sponsor_key: sponsor_key.to_string(),
            client_key: client_key.to_string(),
            email_subject: None,
            from_name: None,
            from_email: None,
            product_id: None,
            product_template: None,
            contacts: Vec::new(),
            user_variables: Map::new(),
        }
    }

    // ─── Read-only construction fields ───────────────────────────────

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn packet_type(&self) -> &str {
        &self.packet_type
    }

    /// Job correlation id. Immutable once constructed.
    pub fn job_unique_id(&self) -> &str {
        &self.job_unique_id
    }

    pub fn sponsor_name(&self) -> &str {
        &self.sponsor_name
    }

    pub fn sponsor_key(&self) -> &str {
        &self.sponsor_key
    }

    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    // ─── Optional top-level fields ───────────────────────────────────

    pub fn callback_uri(&self) -> Option<&str> {
        self.callback_uri.as_deref()
    }

    pub fn set_callback_uri(&mut self, callback_uri: &str) -> &mut Self {
        self.callback_uri = Some(callback_uri.to_string());
        self
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn set_product_id(&mut self, product_id: &str) -> &mut Self {
        self.product_id = Some(product_id.to_string());
        self
    }

    pub fn product_template(&self) -> Option<&str> {
        self.product_template.as_deref()
    }

    pub fn set_product_template(&mut self, product_template: &str) -> &mut Self {
        self.product_template = Some(product_template.to_string());
        self
    }

    // ─── Email-only fields ───────────────────────────────────────────
    //
    // Each accessor asserts the packet type first and signals
    // BadPacketDefinition without mutating anything otherwise.

    pub fn email_subject(&self) -> VelmaResult<Option<&str>> {
        self.assert_email_type()?;
        Ok(self.email_subject.as_deref())
    }

    pub fn set_email_subject(&mut self, email_subject: &str) -> VelmaResult<&mut Self> {
        self.assert_email_type()?;
        self.email_subject = Some(email_subject.to_string());
        Ok(self)
    }

    pub fn from_name(&self) -> VelmaResult<Option<&str>> {
        self.assert_email_type()?;
        Ok(self.from_name.as_deref())
    }

    pub fn set_from_name(&mut self, from_name: &str) -> VelmaResult<&mut Self> {
        self.assert_email_type()?;
        self.from_name = Some(from_name.to_string());
        Ok(self)
    }

    pub fn from_email(&self) -> VelmaResult<Option<&str>> {
        self.assert_email_type()?;
        Ok(self.from_email.as_deref())
    }

    pub fn set_from_email(&mut self, from_email: &str) -> VelmaResult<&mut Self> {
        self.assert_email_type()?;
        self.from_email = Some(from_email.to_string());
        Ok(self)
    }

    fn assert_email_type(&self) -> VelmaResult<()> {
        if self.packet_type != Self::TYPE_EMAIL {
            return Err(VelmaError::bad_packet_definition());
        }
        Ok(())
    }

    // ─── Contacts ────────────────────────────────────────────────────

    /// All contacts, in insertion order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Membership test by instance identity, not field value.
    pub fn has_contact(&self, contact: &Contact) -> bool {
        self.contacts.iter().any(|c| c.is_same(contact))
    }

    /// Append a contact unless it is already present. Idempotent.
    pub fn add_contact(&mut self, contact: Contact) -> &mut Self {
        if !self.has_contact(&contact) {
            self.contacts.push(contact);
        }
        self
    }

    /// Remove a contact if present; no-op otherwise. Relative order of
    /// the remaining contacts is preserved.
    pub fn remove_contact(&mut self, contact: &Contact) -> &mut Self {
        self.contacts.retain(|c| !c.is_same(contact));
        self
    }

    /// Build a contact via [`Contact::create`] and add it.
    pub fn create_contact(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        callback_url: Option<&str>,
        app_unique_id: Option<&str>,
    ) -> &mut Self {
        let contact = Contact::create(first_name, last_name, email, callback_url, app_unique_id);
        self.add_contact(contact)
    }

    // ─── User variables ──────────────────────────────────────────────
    //
    // A stored explicit null counts as absent for lookup and removal,
    // but still appears in the serialized `user` object.

    /// The full user-variable map as it will serialize.
    pub fn user_variables(&self) -> &Map<String, Value> {
        &self.user_variables
    }

    /// Look up a single user variable. Returns `None` for missing keys
    /// and for stored nulls; chain `unwrap_or` for a default.
    pub fn user_variable(&self, key: &str) -> Option<&Value> {
        self.user_variables.get(key).filter(|v| !v.is_null())
    }

    pub fn has_user_variable(&self, key: &str) -> bool {
        self.user_variable(key).is_some()
    }

    /// Insert or overwrite a user variable.
    pub fn add_user_variable(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.user_variables.insert(key.to_string(), value.into());
        self
    }

    /// Remove a user variable if present; no-op otherwise.
    pub fn remove_user_variable(&mut self, key: &str) -> &mut Self {
        if self.has_user_variable(key) {
            self.user_variables.remove(key);
        }
        self
    }

    // ─── Serialization ───────────────────────────────────────────────

    /// Wire payload for the `job` route.
    ///
    /// Conditional shape:
    /// - `callbackUri` is present only when set and non-empty;
    /// - `email` is present only for email-typed packets and then
    ///   always carries `subject` and `from.name` / `from.email`,
    ///   null where unset;
    /// - `product` is present only when at least one of id/template is
    ///   set, and each subkey independently only when set.
    pub fn to_payload(&self) -> Value {
        let mut out = json!({
            "version": self.version,
            "type": self.packet_type,
            "jobuniqueid": self.job_unique_id,
            "sponsor": {
                "name": self.sponsor_name,
            },
            "authentication": {
                "sponsorkey": self.sponsor_key,
                "clientkey": self.client_key,
            },
            "user": self.user_variables,
            "contact": self.contacts.iter().map(Contact::to_payload).collect::<Vec<_>>(),
        });

        if let Some(uri) = self.callback_uri.as_deref().filter(|u| !u.is_empty()) {
            out["callbackUri"] = json!(uri);
        }

        if self.packet_type == Self::TYPE_EMAIL {
            out["email"] = json!({
                "subject": self.email_subject,
                "from": {
                    "name": self.from_name,
                    "email": self.from_email,
                },
            });
        }

        let product_id = self.product_id.as_deref().filter(|p| !p.is_empty());
        let product_template = self.product_template.as_deref().filter(|p| !p.is_empty());
        if product_id.is_some() || product_template.is_some() {
            let mut product = Map::new();
            if let Some(id) = product_id {
                product.insert("id".to_string(), json!(id));
            }
            if let Some(template) = product_template {
                product.insert("template".to_string(), json!(template));
            }
            out["product"] = Value::Object(product);
        }

        out
    }
}

impl Serialize for CommandPacket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}
