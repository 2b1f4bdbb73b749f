use super::payment_method::PaymentMethodType;
use crate::error::{PaymentSheetError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECRET_SEPARATOR: &str = "_secret_";

/// The secret handed to the client to operate on a single payment intent.
///
/// Always non-empty. Surrounding whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PaymentSheetError::InvalidClientSecret(
                "client secret must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The payment intent id encoded in the secret (`pi_123` for
    /// `pi_123_secret_abc`), if the secret has that shape.
    pub fn payment_intent_id(&self) -> Option<&str> {
        self.0
            .split_once(SECRET_SEPARATOR)
            .map(|(id, _)| id)
            .filter(|id| !id.is_empty())
    }
}

impl TryFrom<String> for ClientSecret {
    type Error = PaymentSheetError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClientSecret {
    type Error = PaymentSheetError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ClientSecret> for String {
    fn from(secret: ClientSecret) -> Self {
        secret.0
    }
}

impl fmt::Display for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
}

/// Snapshot of a payment intent as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub currency: String,
    /// Amount in the currency's minor unit.
    pub amount: i64,
    pub status: PaymentIntentStatus,
    /// Raw type codes, in the order the server lists them.
    #[serde(default)]
    pub payment_method_types: Vec<String>,
}

impl PaymentIntent {
    /// Decoded payment method types. Unknown codes are skipped.
    pub fn supported_payment_method_types(&self) -> Vec<PaymentMethodType> {
        PaymentMethodType::decode_all(&self.payment_method_types)
    }
}
