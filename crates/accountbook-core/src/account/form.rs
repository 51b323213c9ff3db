//! Raw account form input.

use serde::{Deserialize, Serialize};

use super::labels::{format_labels, parse_labels};
use super::model::{Account, AccountPatch, AccountType, NewAccount};

/// Account fields as typed into an edit form.
///
/// Labels are still a single `;`-separated string and the password is always
/// a string, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountForm {
    /// Raw label input.
    pub label_input: String,
    /// Selected account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Login input.
    pub login: String,
    /// Password input.
    pub password: String,
}

impl AccountForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The password the form resolves to: none for LDAP or blank input.
    fn resolved_password(&self) -> Option<String> {
        if self.account_type.requires_password() && !self.password.is_empty() {
            Some(self.password.clone())
        } else {
            None
        }
    }

    /// Converts the form into an account ready to be added.
    #[must_use]
    pub fn to_new_account(&self) -> NewAccount {
        NewAccount {
            labels: parse_labels(&self.label_input),
            account_type: self.account_type,
            login: self.login.clone(),
            password: self.resolved_password(),
        }
    }

    /// Converts the form into a patch replacing every editable field.
    #[must_use]
    pub fn to_patch(&self) -> AccountPatch {
        AccountPatch::from(self.to_new_account())
    }
}

impl From<&Account> for AccountForm {
    fn from(account: &Account) -> Self {
        Self {
            label_input: format_labels(&account.labels),
            account_type: account.account_type,
            login: account.login.clone(),
            password: account.password.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::account::{AccountId, AccountLabel, is_valid};

    #[test]
    fn test_local_form_keeps_password() {
        let form = AccountForm {
            label_input: "ops; db ".to_string(),
            account_type: AccountType::Local,
            login: "root".to_string(),
            password: "hunter2".to_string(),
        };
        let account = form.to_new_account();
        assert_eq!(
            account.labels,
            vec![AccountLabel::new("ops"), AccountLabel::new("db")]
        );
        assert_eq!(account.password.as_deref(), Some("hunter2"));
        assert!(is_valid(&form.to_patch()));
    }

    #[test]
    fn test_ldap_form_drops_password() {
        let form = AccountForm {
            account_type: AccountType::Ldap,
            login: "jdoe".to_string(),
            password: "leftover".to_string(),
            ..AccountForm::new()
        };
        assert!(form.to_new_account().password.is_none());
        assert_eq!(form.to_patch().password, Some(None));
    }

    #[test]
    fn test_blank_local_password_fails_validation() {
        let form = AccountForm {
            login: "root".to_string(),
            ..AccountForm::new()
        };
        assert!(form.to_new_account().password.is_none());
        assert!(!is_valid(&form.to_patch()));
    }

    #[test]
    fn test_prefill_from_account() {
        let account = NewAccount::new(AccountType::Local, "root")
            .with_labels(vec![AccountLabel::new("a"), AccountLabel::new("b")])
            .with_password("pw")
            .into_account(AccountId::new("1"));
        let form = AccountForm::from(&account);
        assert_eq!(form.label_input, "a; b");
        assert_eq!(form.password, "pw");
        assert_eq!(form.to_new_account().into_account(account.id.clone()), account);
    }

    #[test]
    fn test_json_field_names() {
        let form: AccountForm = serde_json::from_str(
            r#"{"labelInput":"x","type":"LDAP","login":"l","password":""}"#,
        )
        .unwrap();
        assert_eq!(form.label_input, "x");
        assert_eq!(form.account_type, AccountType::Ldap);
    }
}
