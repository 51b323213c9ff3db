//! Account model types.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alphabet of the random id suffix.
const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random id suffix.
const ID_SUFFIX_LEN: usize = 9;

/// Unique identifier for an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    /// Create an account ID from an existing value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id: the current Unix time in milliseconds followed by
    /// a random base-36 suffix.
    ///
    /// Uniqueness is probabilistic; callers do not re-check it.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| char::from(ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())]))
            .collect();
        Self(format!("{}{suffix}", Utc::now().timestamp_millis()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Authentication backend of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccountType {
    /// Directory account; the password lives in LDAP, not here.
    #[serde(rename = "LDAP")]
    Ldap,
    /// Local account with its own password.
    #[default]
    #[serde(rename = "Локальная", alias = "LOCAL")]
    Local,
}

impl AccountType {
    /// Get display name for the account type.
    ///
    /// This is also the label the type is persisted under.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Ldap => "LDAP",
            Self::Local => "Локальная",
        }
    }

    /// Whether accounts of this type must carry a password.
    #[must_use]
    pub const fn requires_password(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single display tag attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountLabel {
    /// Tag text, already trimmed.
    pub text: String,
}

impl AccountLabel {
    /// Creates a new label.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, assigned on creation and never changed.
    pub id: AccountId,
    /// Display labels, in input order.
    #[serde(rename = "label", default)]
    pub labels: Vec<AccountLabel>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Login name.
    pub login: String,
    /// Password (absent for LDAP accounts).
    #[serde(default)]
    pub password: Option<String>,
}

impl Account {
    /// Returns the label texts joined for display.
    #[must_use]
    pub fn label_text(&self) -> String {
        super::labels::format_labels(&self.labels)
    }
}

/// An account that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewAccount {
    /// Display labels.
    #[serde(rename = "label", default)]
    pub labels: Vec<AccountLabel>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Login name.
    pub login: String,
    /// Password (absent for LDAP accounts).
    #[serde(default)]
    pub password: Option<String>,
}

impl NewAccount {
    /// Creates a new account draft without labels or password.
    #[must_use]
    pub fn new(account_type: AccountType, login: impl Into<String>) -> Self {
        Self {
            labels: Vec::new(),
            account_type,
            login: login.into(),
            password: None,
        }
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<AccountLabel>) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Attaches an id, producing a stored account.
    #[must_use]
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            labels: self.labels,
            account_type: self.account_type,
            login: self.login,
            password: self.password,
        }
    }
}

/// A partial set of account fields.
///
/// Used both as the input of an update, where present fields replace the
/// stored ones, and as the input of validation. The id is not part of a
/// patch and can never be changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountPatch {
    /// Replacement labels.
    pub labels: Option<Vec<AccountLabel>>,
    /// Replacement account type.
    pub account_type: Option<AccountType>,
    /// Replacement login.
    pub login: Option<String>,
    /// Replacement password. `Some(None)` clears it.
    pub password: Option<Option<String>>,
}

impl AccountPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the labels.
    #[must_use]
    pub fn labels(mut self, labels: Vec<AccountLabel>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Sets the account type.
    #[must_use]
    pub const fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// Sets the login.
    #[must_use]
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Sets or clears the password.
    #[must_use]
    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = Some(password);
        self
    }

    /// Returns true if the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.labels.is_none()
            && self.account_type.is_none()
            && self.login.is_none()
            && self.password.is_none()
    }

    /// The password carried by the patch, if one is set.
    #[must_use]
    pub fn password_value(&self) -> Option<&str> {
        self.password.as_ref().and_then(Option::as_deref)
    }

    /// Overlays the present fields onto `account`, leaving its id untouched.
    pub fn apply_to(self, account: &mut Account) {
        if let Some(labels) = self.labels {
            account.labels = labels;
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(login) = self.login {
            account.login = login;
        }
        if let Some(password) = self.password {
            account.password = password;
        }
    }
}

impl From<&Account> for AccountPatch {
    fn from(account: &Account) -> Self {
        Self {
            labels: Some(account.labels.clone()),
            account_type: Some(account.account_type),
            login: Some(account.login.clone()),
            password: Some(account.password.clone()),
        }
    }
}

impl From<&NewAccount> for AccountPatch {
    fn from(account: &NewAccount) -> Self {
        Self {
            labels: Some(account.labels.clone()),
            account_type: Some(account.account_type),
            login: Some(account.login.clone()),
            password: Some(account.password.clone()),
        }
    }
}

impl From<NewAccount> for AccountPatch {
    fn from(account: NewAccount) -> Self {
        Self {
            labels: Some(account.labels),
            account_type: Some(account.account_type),
            login: Some(account.login),
            password: Some(account.password),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn stored(id: &str) -> Account {
        NewAccount::new(AccountType::Local, "alice")
            .with_labels(vec![AccountLabel::new("work")])
            .with_password("secret")
            .into_account(AccountId::new(id))
    }

    mod account_id_tests {
        use super::*;

        #[test]
        fn display() {
            let id = AccountId::new("123abc");
            assert_eq!(format!("{id}"), "123abc");
            assert_eq!(id.as_str(), "123abc");
        }

        #[test]
        fn generate_has_timestamp_prefix_and_suffix() {
            let before = Utc::now().timestamp_millis();
            let id = AccountId::generate();
            let (millis, suffix) = id.as_str().split_at(id.as_str().len() - ID_SUFFIX_LEN);
            assert!(millis.parse::<i64>().unwrap() >= before);
            assert!(
                suffix
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
            );
        }

        #[test]
        fn generate_is_unique() {
            let ids: std::collections::HashSet<_> =
                (0..1000).map(|_| AccountId::generate()).collect();
            assert_eq!(ids.len(), 1000);
        }

        #[test]
        fn serializes_as_plain_string() {
            let json = serde_json::to_string(&AccountId::new("42x")).unwrap();
            assert_eq!(json, "\"42x\"");
        }
    }

    mod account_type_tests {
        use super::*;

        #[test]
        fn default_is_local() {
            assert_eq!(AccountType::default(), AccountType::Local);
        }

        #[test]
        fn display_names() {
            assert_eq!(AccountType::Ldap.display_name(), "LDAP");
            assert_eq!(AccountType::Local.to_string(), "Локальная");
        }

        #[test]
        fn only_local_requires_password() {
            assert!(AccountType::Local.requires_password());
            assert!(!AccountType::Ldap.requires_password());
        }

        #[test]
        fn serialized_as_label() {
            assert_eq!(
                serde_json::to_string(&AccountType::Local).unwrap(),
                "\"Локальная\""
            );
            assert_eq!(serde_json::to_string(&AccountType::Ldap).unwrap(), "\"LDAP\"");
        }

        #[test]
        fn accepts_local_alias() {
            let ty: AccountType = serde_json::from_str("\"LOCAL\"").unwrap();
            assert_eq!(ty, AccountType::Local);
        }
    }

    mod account_tests {
        use super::*;

        #[test]
        fn json_shape() {
            let account = NewAccount::new(AccountType::Ldap, "bob")
                .with_labels(vec![AccountLabel::new("a"), AccountLabel::new("b")])
                .into_account(AccountId::new("1"));
            let value = serde_json::to_value(&account).unwrap();
            assert_eq!(
                value,
                serde_json::json!({
                    "id": "1",
                    "label": [{ "text": "a" }, { "text": "b" }],
                    "type": "LDAP",
                    "login": "bob",
                    "password": null,
                })
            );
        }

        #[test]
        fn missing_labels_and_password_default() {
            let account: Account =
                serde_json::from_str(r#"{"id":"7","type":"LDAP","login":"x"}"#).unwrap();
            assert!(account.labels.is_empty());
            assert!(account.password.is_none());
        }

        #[test]
        fn label_text_joins_labels() {
            let mut account = stored("1");
            account.labels.push(AccountLabel::new("home"));
            assert_eq!(account.label_text(), "work; home");
        }
    }

    mod patch_tests {
        use super::*;

        #[test]
        fn empty_patch_changes_nothing() {
            let mut account = stored("1");
            let before = account.clone();
            let patch = AccountPatch::new();
            assert!(patch.is_empty());
            patch.apply_to(&mut account);
            assert_eq!(account, before);
        }

        #[test]
        fn overlays_present_fields_only() {
            let mut account = stored("1");
            AccountPatch::new().login("carol").apply_to(&mut account);
            assert_eq!(account.id, AccountId::new("1"));
            assert_eq!(account.login, "carol");
            assert_eq!(account.password.as_deref(), Some("secret"));
            assert_eq!(account.labels, vec![AccountLabel::new("work")]);
        }

        #[test]
        fn can_clear_password() {
            let mut account = stored("1");
            AccountPatch::new()
                .account_type(AccountType::Ldap)
                .password(None)
                .apply_to(&mut account);
            assert_eq!(account.account_type, AccountType::Ldap);
            assert!(account.password.is_none());
        }

        #[test]
        fn from_new_account_sets_every_field() {
            let draft = NewAccount::new(AccountType::Local, "dave").with_password("pw");
            let patch = AccountPatch::from(&draft);
            assert_eq!(patch.login.as_deref(), Some("dave"));
            assert_eq!(patch.password_value(), Some("pw"));
            assert_eq!(patch.account_type, Some(AccountType::Local));
            assert_eq!(patch.labels, Some(Vec::new()));
        }
    }
}
