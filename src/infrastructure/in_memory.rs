use crate::domain::ports::PrefsRepository;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory preference store.
///
/// Uses `Arc<RwLock<HashMap<String, String>>>` keyed by customer id, so clones
/// share the same preferences. Suited to tests and short-lived sessions.
#[derive(Default, Clone)]
pub struct InMemoryPrefsRepository {
    defaults: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryPrefsRepository {
    /// Creates a new, empty preference store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(customer_id, payment_method_id)` pairs.
    pub fn with_defaults<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let defaults = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            defaults: Arc::new(RwLock::new(defaults)),
        }
    }
}

#[async_trait]
impl PrefsRepository for InMemoryPrefsRepository {
    async fn get_default_payment_method_id(&self, customer_id: &str) -> Option<String> {
        let defaults = self.defaults.read().await;
        defaults.get(customer_id).cloned()
    }

    async fn save_default_payment_method_id(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<()> {
        let mut defaults = self.defaults.write().await;
        defaults.insert(customer_id.to_string(), payment_method_id.to_string());
        Ok(())
    }
}
