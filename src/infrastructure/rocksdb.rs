use crate::domain::ports::PrefsRepository;
use crate::error::{PaymentSheetError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing default payment method ids by customer.
pub const CF_DEFAULT_PAYMENT_METHODS: &str = "default_payment_methods";

/// A persistent preference store backed by RocksDB.
///
/// Values are stored as UTF-8 payment method ids under the customer id key.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbPrefsRepository {
    db: Arc<DB>,
}

impl RocksDbPrefsRepository {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures the default payment methods column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf = ColumnFamilyDescriptor::new(CF_DEFAULT_PAYMENT_METHODS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read(&self, customer_id: &str) -> Result<Option<String>> {
        let cf = self.db.cf_handle(CF_DEFAULT_PAYMENT_METHODS).ok_or_else(|| {
            PaymentSheetError::InternalError(Box::new(std::io::Error::other(
                "Default payment methods column family not found",
            )))
        })?;

        match self.db.get_cf(cf, customer_id.as_bytes())? {
            Some(bytes) => {
                let id = String::from_utf8(bytes)
                    .map_err(|e| PaymentSheetError::InternalError(Box::new(e)))?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PrefsRepository for RocksDbPrefsRepository {
    async fn get_default_payment_method_id(&self, customer_id: &str) -> Option<String> {
        self.read(customer_id).unwrap_or_else(|e| {
            tracing::warn!(customer_id, error = %e, "failed to read default payment method");
            None
        })
    }

    async fn save_default_payment_method_id(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<()> {
        let cf = self.db.cf_handle(CF_DEFAULT_PAYMENT_METHODS).ok_or_else(|| {
            PaymentSheetError::InternalError(Box::new(std::io::Error::other(
                "Default payment methods column family not found",
            )))
        })?;

        self.db
            .put_cf(cf, customer_id.as_bytes(), payment_method_id.as_bytes())?;
        Ok(())
    }
}
