use super::payment_intent::{ClientSecret, PaymentIntent};
use super::payment_method::{PaymentMethod, PaymentMethodCreateParams};
use crate::error::{PaymentSheetError, Result};
use serde::{Deserialize, Serialize};

/// What the user picked to pay with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentSelection {
    GooglePay,
    Saved(PaymentMethod),
    New(PaymentMethodCreateParams),
}

impl PaymentSelection {
    /// The payment method to confirm with. Google Pay has none: it is
    /// confirmed through its own sheet.
    pub fn payment_method_choice(&self) -> Result<PaymentMethodChoice> {
        match self {
            PaymentSelection::GooglePay => Err(PaymentSheetError::UnsupportedSelection(
                "Google Pay is confirmed through the Google Pay sheet".to_string(),
            )),
            PaymentSelection::Saved(pm) => Ok(PaymentMethodChoice::Saved(pm.id.clone())),
            PaymentSelection::New(params) => Ok(PaymentMethodChoice::New(params.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodChoice {
    Saved(String),
    New(PaymentMethodCreateParams),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPaymentIntentParams {
    pub client_secret: ClientSecret,
    pub payment_method: PaymentMethodChoice,
    #[serde(default)]
    pub return_url: Option<String>,
}

/// How a payment controller treats intents that need a further customer action
/// (e.g. a 3DS challenge) after confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnHandling {
    /// The caller resumes the flow when the customer returns.
    #[default]
    Required,
    /// Any pending action is reported as a failure.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentResult {
    Completed(PaymentIntent),
    RequiresAction(PaymentIntent),
    Failed(String),
}

impl PaymentResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentResult::Completed(_))
    }
}
