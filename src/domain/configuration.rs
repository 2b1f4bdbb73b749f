use super::payment_intent::ClientSecret;
use serde::{Deserialize, Serialize};

/// Credentials attached to a single request against the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequestOptions {
    pub api_key: String,
    pub stripe_account: Option<String>,
}

impl ApiRequestOptions {
    pub fn new(api_key: impl Into<String>, stripe_account: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            stripe_account,
        }
    }
}

/// Merchant-level keys, fixed for the lifetime of a factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfiguration {
    pub publishable_key: String,
    #[serde(default)]
    pub stripe_account: Option<String>,
}

impl PaymentConfiguration {
    pub fn new(publishable_key: impl Into<String>, stripe_account: Option<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            stripe_account,
        }
    }

    /// Options for merchant-scoped calls (intent retrieval, creation, confirmation).
    pub fn request_options(&self) -> ApiRequestOptions {
        ApiRequestOptions::new(&self.publishable_key, self.stripe_account.clone())
    }

    /// Options for customer-scoped calls, authorized by the customer's ephemeral key.
    pub fn customer_request_options(&self, customer: &CustomerConfiguration) -> ApiRequestOptions {
        ApiRequestOptions::new(&customer.ephemeral_key_secret, self.stripe_account.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerConfiguration {
    pub id: String,
    pub ephemeral_key_secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GooglePayEnvironment {
    #[default]
    Test,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingAddressFormat {
    #[default]
    Min,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GooglePayConfiguration {
    pub environment: GooglePayEnvironment,
    pub country_code: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub is_email_required: bool,
    /// Requests a billing address in the given format when set.
    #[serde(default)]
    pub billing_address: Option<BillingAddressFormat>,
    #[serde(default)]
    pub existing_payment_method_required: bool,
}

/// UI-level configuration for a payment sheet presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSheetConfiguration {
    pub merchant_display_name: String,
    #[serde(default)]
    pub customer: Option<CustomerConfiguration>,
    #[serde(default)]
    pub google_pay: Option<GooglePayConfiguration>,
}

impl PaymentSheetConfiguration {
    pub fn new(merchant_display_name: impl Into<String>) -> Self {
        Self {
            merchant_display_name: merchant_display_name.into(),
            customer: None,
            google_pay: None,
        }
    }

    pub fn with_customer(mut self, customer: CustomerConfiguration) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn with_google_pay(mut self, google_pay: GooglePayConfiguration) -> Self {
        self.google_pay = Some(google_pay);
        self
    }
}

/// Arguments handed verbatim to the flow controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowControllerArgs {
    pub client_secret: ClientSecret,
    pub config: Option<PaymentSheetConfiguration>,
}
