//! File-backed key-value storage.
//!
//! Each key is one JSON file in the data directory. Writes go to a sibling
//! temporary file that is then renamed over the target, so a crash never
//! leaves a half-written payload. There is one writer; the last save wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use till_core::store::{CART_KEY, ORDERS_KEY};
use till_core::{
    CartRepository, NewOrder, Order, OrderError, OrderId, OrderLedger, OrderStatus, OrderStore,
    PersistedCart, StoreError,
};
use tracing::{debug, instrument};

/// A directory of JSON documents addressed by key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read the raw document for `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the document for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    #[instrument(skip(self, contents), fields(dir = %self.dir.display()))]
    pub fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, contents)?;
        fs::rename(&staging, &target)?;
        debug!(bytes = contents.len(), "Saved document");
        Ok(())
    }
}

/// Cart repository stored under [`CART_KEY`].
#[derive(Debug, Clone)]
pub struct FileCartRepository {
    store: JsonFileStore,
}

impl FileCartRepository {
    #[must_use]
    pub const fn new(store: JsonFileStore) -> Self {
        Self { store }
    }
}

impl CartRepository for FileCartRepository {
    fn load(&self) -> Result<Option<PersistedCart>, StoreError> {
        self.store
            .read(CART_KEY)?
            .map(|json| PersistedCart::from_json(&json))
            .transpose()
    }

    fn save(&mut self, cart: &PersistedCart) -> Result<(), StoreError> {
        self.store.write(CART_KEY, &cart.to_json()?)
    }
}

/// Order store stored under [`ORDERS_KEY`].
///
/// The whole ledger is loaded on open and rewritten after every change.
#[derive(Debug, Clone)]
pub struct FileOrderStore {
    store: JsonFileStore,
    ledger: OrderLedger,
}

impl FileOrderStore {
    /// Load the saved order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved history cannot be read or decoded.
    pub fn open(store: JsonFileStore) -> Result<Self, StoreError> {
        let ledger = match store.read(ORDERS_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => OrderLedger::new(),
        };
        Ok(Self { store, ledger })
    }

    fn save(&self) -> Result<(), OrderError> {
        let json = serde_json::to_string(&self.ledger).map_err(StoreError::from)?;
        self.store.write(ORDERS_KEY, &json)?;
        Ok(())
    }
}

impl OrderStore for FileOrderStore {
    fn create_order(&mut self, order: NewOrder) -> Result<Order, OrderError> {
        let order = self.ledger.create(order, Utc::now())?;
        self.save()?;
        Ok(order)
    }

    fn get_order(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.ledger.get(id).cloned())
    }

    fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.ledger.orders().to_vec())
    }

    fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.ledger.update_status(id, status)?;
        self.save()?;
        Ok(order)
    }

    fn delete_order(&mut self, id: &OrderId) -> Result<(), OrderError> {
        self.ledger.delete(id)?;
        self.save()
    }
}
