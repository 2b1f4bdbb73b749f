use super::configuration::ApiRequestOptions;
use super::confirmation::{ConfirmPaymentIntentParams, PaymentResult, ReturnHandling};
use super::payment_intent::{ClientSecret, PaymentIntent};
use super::payment_method::{PaymentMethod, PaymentMethodCreateParams, PaymentMethodType};
use crate::error::{Result, TransportResult};
use async_trait::async_trait;
use std::sync::Arc;

/// The remote payments API.
#[async_trait]
pub trait PaymentServiceClient: Send + Sync {
    /// Returns `Ok(None)` when the call succeeded but no intent matched.
    async fn retrieve_payment_intent(
        &self,
        client_secret: &ClientSecret,
        options: &ApiRequestOptions,
    ) -> TransportResult<Option<PaymentIntent>>;

    async fn list_payment_methods(
        &self,
        customer_id: &str,
        r#type: PaymentMethodType,
        options: &ApiRequestOptions,
        product_usage: &str,
    ) -> TransportResult<Vec<PaymentMethod>>;

    async fn create_payment_method(
        &self,
        params: &PaymentMethodCreateParams,
        options: &ApiRequestOptions,
    ) -> TransportResult<PaymentMethod>;

    async fn confirm_payment_intent(
        &self,
        params: &ConfirmPaymentIntentParams,
        options: &ApiRequestOptions,
    ) -> TransportResult<PaymentIntent>;
}

/// Customer preferences persisted on the device.
#[async_trait]
pub trait PrefsRepository: Send + Sync {
    /// Never fails: an unreadable preference is reported as absent.
    async fn get_default_payment_method_id(&self, customer_id: &str) -> Option<String>;

    async fn save_default_payment_method_id(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<()>;
}

/// Confirms payment intents and handles any follow-up the confirmation needs.
#[async_trait]
pub trait PaymentController: Send + Sync {
    async fn confirm(&self, params: ConfirmPaymentIntentParams) -> Result<PaymentResult>;

    fn return_handling(&self) -> ReturnHandling;
}

pub type PaymentServiceClientRef = Arc<dyn PaymentServiceClient>;
pub type PrefsRepositoryRef = Arc<dyn PrefsRepository>;
pub type PaymentControllerBox = Box<dyn PaymentController>;

/// Builds a payment controller bound to the given merchant credentials.
pub type PaymentControllerFactory =
    Box<dyn Fn(&ApiRequestOptions, ReturnHandling) -> PaymentControllerBox + Send + Sync>;
