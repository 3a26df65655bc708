//! Account registry
//!
//! The escrow module only reads the registry and registers agent accounts
//! in it. Accounts live in the same store as everything else, so an
//! account registered earlier in a call is visible to `exists` later in
//! the same call.

use serde::{Deserialize, Serialize};

use escrow_crypto::ModuleCredential;
use escrow_store::{IndexedTable, Indexed, KvStore, ScanOrder, Sequence};
use escrow_types::{Address, EscrowError, Result};

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAccount {
    pub address: Address,
    pub account_number: u64,
    /// Present on module-derived accounts, which have no key pair
    #[serde(default)]
    pub credential: Option<ModuleCredential>,
}

impl Indexed for BaseAccount {
    type PrimaryKey = Address;
    type IndexKey = u64;

    fn primary_key(&self) -> Address {
        self.address.clone()
    }

    fn index_key(&self) -> u64 {
        self.account_number
    }
}

/// Registry contract the module depends on
pub trait AccountRegistry: Send + Sync {
    fn exists(&self, store: &dyn KvStore, address: &Address) -> Result<bool>;

    /// Build a new account; it is not stored until `register`
    fn create_account(
        &self,
        store: &mut dyn KvStore,
        address: Address,
        credential: Option<ModuleCredential>,
    ) -> Result<BaseAccount>;

    fn register(&self, store: &mut dyn KvStore, account: &BaseAccount) -> Result<()>;

    fn account(&self, store: &dyn KvStore, address: &Address) -> Result<Option<BaseAccount>>;
}

/// Registry kept under its own prefix in the shared store
pub struct StoreAccountRegistry {
    accounts: IndexedTable<BaseAccount>,
    numbers: Sequence,
}

impl StoreAccountRegistry {
    pub fn new() -> Self {
        Self {
            accounts: IndexedTable::new("account", b"auth/\x01", b"auth/\x02"),
            numbers: Sequence::new("account_number", b"auth/\x03".to_vec(), 0),
        }
    }

    /// All accounts in address order
    pub fn all(&self, store: &dyn KvStore) -> Result<Vec<BaseAccount>> {
        Ok(self.accounts.all(store, ScanOrder::Primary)?)
    }
}

impl Default for StoreAccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountRegistry for StoreAccountRegistry {
    fn exists(&self, store: &dyn KvStore, address: &Address) -> Result<bool> {
        Ok(self.accounts.has(store, address)?)
    }

    fn create_account(
        &self,
        store: &mut dyn KvStore,
        address: Address,
        credential: Option<ModuleCredential>,
    ) -> Result<BaseAccount> {
        if address.is_empty() {
            return Err(EscrowError::invalid_input("address", "empty account address"));
        }
        let account_number = self.numbers.next(store)?;
        Ok(BaseAccount {
            address,
            account_number,
            credential,
        })
    }

    fn register(&self, store: &mut dyn KvStore, account: &BaseAccount) -> Result<()> {
        Ok(self.accounts.insert(store, account)?)
    }

    fn account(&self, store: &dyn KvStore, address: &Address) -> Result<Option<BaseAccount>> {
        Ok(self.accounts.get(store, address)?)
    }
}
