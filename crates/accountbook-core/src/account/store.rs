//! Persisted account store.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::labels;
use super::model::{Account, AccountId, AccountLabel, AccountPatch, NewAccount};
use super::validation::{self, ValidationResult};
use crate::config::StoreConfig;
use crate::storage::{FileStorage, KeyValueStorage};
use crate::Result;

/// Slot the account list is stored under unless configured otherwise.
pub const DEFAULT_SLOT: &str = "accounts";

/// Ordered list of accounts mirrored to a key-value slot.
///
/// Every mutation rewrites the whole list to the slot, so the stored value
/// always matches the in-memory list after a successful call.
pub struct AccountStore<S> {
    storage: S,
    slot: String,
    accounts: Vec<Account>,
    view: watch::Sender<Vec<Account>>,
}

impl<S: KeyValueStorage> AccountStore<S> {
    /// Create a store backed by `storage`, loading the default slot.
    ///
    /// A missing, unreadable or corrupt slot yields an empty store.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_slot(storage, DEFAULT_SLOT)
    }

    /// Create a store backed by `storage`, loading the given slot.
    #[must_use]
    pub fn with_slot(storage: S, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let accounts = load_accounts(&storage, &slot);
        info!("Loaded {} accounts from slot {}", accounts.len(), slot);
        let (view, _) = watch::channel(accounts.clone());
        Self {
            storage,
            slot,
            accounts,
            view,
        }
    }

    /// Current accounts, in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Get account by ID.
    #[must_use]
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| &account.id == id)
    }

    /// Number of stored accounts.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if there are no accounts.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Slot name the list is persisted under.
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Subscribe to the account list.
    ///
    /// The receiver always holds the latest snapshot and is marked changed
    /// after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Account>> {
        self.view.subscribe()
    }

    /// Add an account, assigning it a fresh id.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written to storage. The
    /// account stays in memory in that case.
    pub fn add(&mut self, account: NewAccount) -> Result<Account> {
        let account = account.into_account(AccountId::generate());
        self.accounts.push(account.clone());
        debug!("Added account {} ({})", account.id, account.account_type);
        self.persist()?;
        Ok(account)
    }

    /// Overlay `patch` onto the first account with `id`.
    ///
    /// Unknown ids are ignored and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written to storage.
    pub fn update(&mut self, id: &AccountId, patch: AccountPatch) -> Result<()> {
        let Some(account) = self.accounts.iter_mut().find(|account| &account.id == id) else {
            debug!("Update of unknown account {id} ignored");
            return Ok(());
        };
        patch.apply_to(account);
        debug!("Updated account {id}");
        self.persist()
    }

    /// Remove every account with `id`.
    ///
    /// The list is written even if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written to storage.
    pub fn remove(&mut self, id: &AccountId) -> Result<()> {
        let before = self.accounts.len();
        self.accounts.retain(|account| &account.id != id);
        debug!("Removed {} account(s) with id {id}", before - self.accounts.len());
        self.persist()
    }

    /// Parse a raw `;`-separated label string. See [`labels::parse_labels`].
    #[must_use]
    pub fn parse_labels(&self, raw: &str) -> Vec<AccountLabel> {
        labels::parse_labels(raw)
    }

    /// Check account fields. See [`validation::is_valid`].
    #[must_use]
    pub fn validate(&self, account: &AccountPatch) -> bool {
        validation::is_valid(account)
    }

    /// Check account fields, listing every failed rule.
    ///
    /// # Errors
    ///
    /// Returns the validation errors if any field is invalid.
    pub fn validate_detailed(&self, account: &AccountPatch) -> ValidationResult {
        validation::validate_account(account)
    }

    /// Consume the store, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Publish the list to subscribers and write it to the slot.
    fn persist(&mut self) -> Result<()> {
        self.view.send_replace(self.accounts.clone());
        let json = serde_json::to_string(&self.accounts)?;
        self.storage.set(&self.slot, &json)?;
        debug!("Persisted {} accounts to slot {}", self.accounts.len(), self.slot);
        Ok(())
    }
}

impl AccountStore<FileStorage> {
    /// Open a file-backed store as described by `config`.
    #[must_use]
    pub fn open(config: &StoreConfig) -> Self {
        Self::with_slot(FileStorage::new(&config.data_dir), config.slot.clone())
    }
}

impl<S> std::fmt::Debug for AccountStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("slot", &self.slot)
            .field("accounts", &self.accounts.len())
            .finish_non_exhaustive()
    }
}

/// Read the account list from a slot, degrading to an empty list.
fn load_accounts<S: KeyValueStorage>(storage: &S, slot: &str) -> Vec<Account> {
    let raw = match storage.get(slot) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read accounts from storage: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(accounts) => accounts,
        Err(e) => {
            warn!("Failed to parse stored accounts, starting empty: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use crate::storage::{MemoryStorage, StorageError, StorageResult};
    use crate::Error;

    /// Storage whose reads and writes always fail.
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn set(&mut self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    fn local(login: &str) -> NewAccount {
        NewAccount::new(AccountType::Local, login).with_password("secret")
    }

    fn stored_json(storage: &MemoryStorage) -> Vec<Account> {
        serde_json::from_str(storage.raw(DEFAULT_SLOT).unwrap()).unwrap()
    }

    #[test]
    fn test_starts_empty_without_slot() {
        let store = AccountStore::new(MemoryStorage::new());
        assert!(store.is_empty());
        assert_eq!(store.slot(), DEFAULT_SLOT);
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let store = AccountStore::new(MemoryStorage::with_slot(DEFAULT_SLOT, "{not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_failure_loads_empty() {
        let store = AccountStore::new(BrokenStorage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_assigns_id_and_persists() {
        let mut store = AccountStore::new(MemoryStorage::new());
        let draft = local("alice").with_labels(labels::parse_labels("a;b"));
        let account = store.add(draft.clone()).unwrap();

        assert!(!account.id.as_str().is_empty());
        assert_eq!(account.login, draft.login);
        assert_eq!(account.account_type, draft.account_type);
        assert_eq!(account.labels, draft.labels);
        assert_eq!(account.password, draft.password);
        assert_eq!(store.accounts(), std::slice::from_ref(&account));

        let storage = store.into_storage();
        assert_eq!(stored_json(&storage), vec![account]);
    }

    #[test]
    fn test_added_ids_are_unique() {
        let mut store = AccountStore::new(MemoryStorage::new());
        for i in 0..50 {
            store.add(local(&format!("user{i}"))).unwrap();
        }
        let ids: std::collections::HashSet<_> =
            store.accounts().iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_update_preserves_id() {
        let mut store = AccountStore::new(MemoryStorage::new());
        let account = store.add(local("alice")).unwrap();
        store
            .update(&account.id, AccountPatch::new().login("new"))
            .unwrap();

        let updated = store.get(&account.id).unwrap();
        assert_eq!(updated.login, "new");
        assert_eq!(updated.id, account.id);
        assert_eq!(updated.password, account.password);
        assert_eq!(stored_json(&store.into_storage())[0].login, "new");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut storage = MemoryStorage::new();
        let mut store = AccountStore::new(&mut storage);
        store
            .update(&AccountId::new("missing"), AccountPatch::new().login("x"))
            .unwrap();
        assert!(store.is_empty());
        drop(store);
        assert!(storage.raw(DEFAULT_SLOT).is_none());
    }

    #[test]
    fn test_remove() {
        let mut store = AccountStore::new(MemoryStorage::new());
        let first = store.add(local("first")).unwrap();
        let second = store.add(local("second")).unwrap();
        store.remove(&first.id).unwrap();

        assert!(store.get(&first.id).is_none());
        assert_eq!(store.accounts(), std::slice::from_ref(&second));
        assert_eq!(stored_json(&store.into_storage()), vec![second]);
    }

    #[test]
    fn test_remove_unknown_id_still_persists() {
        let mut storage = MemoryStorage::new();
        AccountStore::new(&mut storage)
            .remove(&AccountId::new("missing"))
            .unwrap();
        assert_eq!(storage.raw(DEFAULT_SLOT), Some("[]"));
    }

    #[test]
    fn test_remove_drops_duplicate_ids() {
        let json = r#"[
            {"id":"1","label":[],"type":"LDAP","login":"a","password":null},
            {"id":"1","label":[],"type":"LDAP","login":"b","password":null},
            {"id":"2","label":[],"type":"LDAP","login":"c","password":null}
        ]"#;
        let mut store = AccountStore::new(MemoryStorage::with_slot(DEFAULT_SLOT, json));
        assert_eq!(store.len(), 3);
        store.remove(&AccountId::new("1")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.accounts()[0].login, "c");
    }

    #[test]
    fn test_update_touches_first_match_only() {
        let json = r#"[
            {"id":"1","label":[],"type":"LDAP","login":"a","password":null},
            {"id":"1","label":[],"type":"LDAP","login":"b","password":null}
        ]"#;
        let mut store = AccountStore::new(MemoryStorage::with_slot(DEFAULT_SLOT, json));
        store
            .update(&AccountId::new("1"), AccountPatch::new().login("z"))
            .unwrap();
        assert_eq!(store.accounts()[0].login, "z");
        assert_eq!(store.accounts()[1].login, "b");
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut store = AccountStore::new(BrokenStorage);
        let result = store.add(local("alice"));
        assert!(matches!(result, Err(Error::Storage(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_write_failure_propagates() {
        let json = r#"[{"id":"1","label":[],"type":"LDAP","login":"a","password":null}]"#;
        let accounts: Vec<Account> = serde_json::from_str(json).unwrap();
        let mut store = AccountStore {
            storage: BrokenStorage,
            slot: DEFAULT_SLOT.to_string(),
            accounts,
            view: watch::channel(Vec::new()).0,
        };
        let result = store.update(&AccountId::new("1"), AccountPatch::new().login("b"));
        assert!(matches!(result, Err(Error::Storage(_))));
        assert_eq!(store.accounts()[0].login, "b");
    }

    #[test]
    fn test_remove_write_failure_propagates() {
        let mut store = AccountStore::new(BrokenStorage);
        let result = store.add(local("alice"));
        assert!(result.is_err());
        let id = store.accounts()[0].id.clone();

        let result = store.remove(&id);
        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let mut store = AccountStore::new(MemoryStorage::new());
        let mut view = store.subscribe();
        assert!(view.borrow().is_empty());

        let account = store.add(local("alice")).unwrap();
        assert!(view.has_changed().unwrap());
        assert_eq!(*view.borrow_and_update(), vec![account.clone()]);

        store.remove(&account.id).unwrap();
        assert!(view.has_changed().unwrap());
        assert!(view.borrow_and_update().is_empty());
    }

    #[test]
    fn test_helpers() {
        let store = AccountStore::new(MemoryStorage::new());
        assert_eq!(store.parse_labels("x; y").len(), 2);

        let invalid = AccountPatch::new()
            .account_type(AccountType::Local)
            .login("u")
            .password(None);
        assert!(!store.validate(&invalid));
        assert!(store.validate_detailed(&invalid).is_err());
        assert!(store.validate(&AccountPatch::from(&local("u"))));
    }

    #[test]
    fn test_custom_slot() {
        let mut store = AccountStore::with_slot(MemoryStorage::new(), "team");
        store.add(local("alice")).unwrap();
        let storage = store.into_storage();
        assert!(storage.raw(DEFAULT_SLOT).is_none());
        assert!(storage.raw("team").is_some());
    }
}
