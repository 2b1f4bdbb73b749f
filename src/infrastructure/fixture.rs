use crate::domain::configuration::ApiRequestOptions;
use crate::domain::confirmation::{ConfirmPaymentIntentParams, PaymentMethodChoice};
use crate::domain::payment_intent::{ClientSecret, PaymentIntent, PaymentIntentStatus};
use crate::domain::payment_method::{
    CardDetails, PaymentMethod, PaymentMethodCreateParams, PaymentMethodType,
};
use crate::domain::ports::PaymentServiceClient;
use crate::error::{Result, TransportError, TransportResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Canned responses for the remote payments API.
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    /// Payment intents keyed by client secret.
    #[serde(default)]
    pub payment_intents: HashMap<String, PaymentIntent>,
    /// Saved payment methods keyed by customer id.
    #[serde(default)]
    pub payment_methods: HashMap<String, Vec<PaymentMethod>>,
    /// Listing a type in this set fails with a server error.
    #[serde(default)]
    pub failing_types: HashSet<PaymentMethodType>,
    /// Client secrets whose confirmation leaves the intent in `requires_action`.
    #[serde(default)]
    pub requires_action: HashSet<String>,
}

/// A `PaymentServiceClient` answering from a [`Fixture`].
///
/// Used by the CLI and by tests that need a realistic service without a
/// network. Created payment methods get sequential `pm_fixture_N` ids.
pub struct FixturePaymentService {
    fixture: Fixture,
    next_id: AtomicU64,
}

impl FixturePaymentService {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            next_id: AtomicU64::new(1),
        }
    }

    /// Reads a JSON fixture from any `Read` source.
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let fixture: Fixture = serde_json::from_reader(source).map_err(TransportError::from)?;
        Ok(Self::new(fixture))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

/// Last four characters of a card number, fewer when the number is shorter.
fn last4(number: &str) -> String {
    let mut tail: Vec<char> = number.chars().rev().take(4).collect();
    tail.reverse();
    tail.into_iter().collect()
}

fn card_brand(number: &str) -> &'static str {
    match number.chars().next() {
        Some('4') => "visa",
        Some('5') => "mastercard",
        Some('3') => "amex",
        Some('6') => "discover",
        _ => "unknown",
    }
}

#[async_trait]
impl PaymentServiceClient for FixturePaymentService {
    async fn retrieve_payment_intent(
        &self,
        client_secret: &ClientSecret,
        _options: &ApiRequestOptions,
    ) -> TransportResult<Option<PaymentIntent>> {
        Ok(self
            .fixture
            .payment_intents
            .get(client_secret.as_str())
            .cloned())
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
        r#type: PaymentMethodType,
        _options: &ApiRequestOptions,
        _product_usage: &str,
    ) -> TransportResult<Vec<PaymentMethod>> {
        if self.fixture.failing_types.contains(&r#type) {
            return Err(TransportError::Api {
                status: 500,
                message: format!("listing {} payment methods failed", r#type),
            });
        }

        Ok(self
            .fixture
            .payment_methods
            .get(customer_id)
            .map(|methods| {
                methods
                    .iter()
                    .filter(|pm| pm.r#type == r#type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_payment_method(
        &self,
        params: &PaymentMethodCreateParams,
        options: &ApiRequestOptions,
    ) -> TransportResult<PaymentMethod> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let card = params.card.as_ref().map(|card| CardDetails {
            brand: card_brand(&card.number).to_string(),
            last4: last4(&card.number),
            exp_month: card.exp_month,
            exp_year: card.exp_year,
        });

        Ok(PaymentMethod {
            id: format!("pm_fixture_{n}"),
            r#type: params.r#type,
            customer_id: None,
            created: 0,
            livemode: options.api_key.starts_with("pk_live_"),
            card,
        })
    }

    async fn confirm_payment_intent(
        &self,
        params: &ConfirmPaymentIntentParams,
        _options: &ApiRequestOptions,
    ) -> TransportResult<PaymentIntent> {
        let secret = params.client_secret.as_str();
        let mut intent = self
            .fixture
            .payment_intents
            .get(secret)
            .cloned()
            .ok_or_else(|| TransportError::Api {
                status: 404,
                message: format!("No such payment_intent for secret {secret}"),
            })?;

        if let PaymentMethodChoice::New(new) = &params.payment_method
            && !intent
                .supported_payment_method_types()
                .contains(&new.r#type)
        {
            return Err(TransportError::Api {
                status: 400,
                message: format!("{} is not supported by {}", new.r#type, intent.id),
            });
        }

        intent.status = if self.fixture.requires_action.contains(secret) {
            PaymentIntentStatus::RequiresAction
        } else {
            PaymentIntentStatus::Succeeded
        };
        Ok(intent)
    }
}
