//! Governance parameters

use tracing::info;

use escrow_store::KvStore;
use escrow_types::{Params, Result};

use crate::keeper::Keeper;

impl Keeper {
    /// Current params; defaults until genesis or governance sets them
    pub fn get_params(&self, store: &dyn KvStore) -> Result<Params> {
        Ok(self.params.get(store)?.unwrap_or_default())
    }

    pub fn set_params(&self, store: &mut dyn KvStore, params: &Params) -> Result<()> {
        params.validate()?;
        self.params.set(store, params)?;
        info!(max_metadata_length = params.max_metadata_length, "escrow params set");
        Ok(())
    }
}
