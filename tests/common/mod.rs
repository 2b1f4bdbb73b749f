#![allow(dead_code)]

use async_trait::async_trait;
use paysheet::application::flow_controller_factory::FlowControllerFactory;
use paysheet::domain::configuration::{
    ApiRequestOptions, CustomerConfiguration, PaymentConfiguration, PaymentSheetConfiguration,
};
use paysheet::domain::confirmation::{ConfirmPaymentIntentParams, PaymentResult, ReturnHandling};
use paysheet::domain::payment_intent::{ClientSecret, PaymentIntent, PaymentIntentStatus};
use paysheet::domain::payment_method::{PaymentMethod, PaymentMethodCreateParams, PaymentMethodType};
use paysheet::domain::ports::{
    PaymentController, PaymentControllerBox, PaymentControllerFactory, PaymentServiceClient,
};
use paysheet::error::{Result, TransportError, TransportResult};
use paysheet::infrastructure::in_memory::InMemoryPrefsRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub enum IntentScript {
    Found(PaymentIntent),
    Absent,
    Fails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListCall {
    pub customer_id: String,
    pub r#type: PaymentMethodType,
    pub api_key: String,
    pub product_usage: String,
}

/// A payment service answering from a script and recording every call.
pub struct ScriptedService {
    intent: IntentScript,
    listings: HashMap<PaymentMethodType, TransportResult<Vec<PaymentMethod>>>,
    delays: HashMap<PaymentMethodType, Duration>,
    pub intent_calls: Mutex<Vec<String>>,
    pub list_calls: Mutex<Vec<ListCall>>,
}

impl ScriptedService {
    pub fn new(intent: IntentScript) -> Self {
        Self {
            intent,
            listings: HashMap::new(),
            delays: HashMap::new(),
            intent_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn listing(mut self, r#type: PaymentMethodType, methods: Vec<PaymentMethod>) -> Self {
        self.listings.insert(r#type, Ok(methods));
        self
    }

    pub fn failing_listing(mut self, r#type: PaymentMethodType) -> Self {
        self.listings.insert(
            r#type,
            Err(TransportError::Network("connection reset".to_string())),
        );
        self
    }

    pub fn delayed(mut self, r#type: PaymentMethodType, delay: Duration) -> Self {
        self.delays.insert(r#type, delay);
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentServiceClient for ScriptedService {
    async fn retrieve_payment_intent(
        &self,
        _client_secret: &ClientSecret,
        options: &ApiRequestOptions,
    ) -> TransportResult<Option<PaymentIntent>> {
        self.intent_calls
            .lock()
            .unwrap()
            .push(options.api_key.clone());
        match &self.intent {
            IntentScript::Found(intent) => Ok(Some(intent.clone())),
            IntentScript::Absent => Ok(None),
            IntentScript::Fails => Err(TransportError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }),
        }
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
        r#type: PaymentMethodType,
        options: &ApiRequestOptions,
        product_usage: &str,
    ) -> TransportResult<Vec<PaymentMethod>> {
        self.list_calls.lock().unwrap().push(ListCall {
            customer_id: customer_id.to_string(),
            r#type,
            api_key: options.api_key.clone(),
            product_usage: product_usage.to_string(),
        });
        if let Some(delay) = self.delays.get(&r#type) {
            tokio::time::sleep(*delay).await;
        }
        match self.listings.get(&r#type) {
            Some(Ok(methods)) => Ok(methods.clone()),
            Some(Err(e)) => Err(TransportError::Network(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn create_payment_method(
        &self,
        params: &PaymentMethodCreateParams,
        _options: &ApiRequestOptions,
    ) -> TransportResult<PaymentMethod> {
        Ok(payment_method("pm_created", params.r#type))
    }

    async fn confirm_payment_intent(
        &self,
        _params: &ConfirmPaymentIntentParams,
        _options: &ApiRequestOptions,
    ) -> TransportResult<PaymentIntent> {
        match &self.intent {
            IntentScript::Found(intent) => Ok(intent.clone()),
            _ => Err(TransportError::Network("no intent".to_string())),
        }
    }
}

/// Records the options and return handling each controller was built with.
#[derive(Default, Clone)]
pub struct ControllerLog {
    pub built: Arc<Mutex<Vec<(ApiRequestOptions, ReturnHandling)>>>,
}

struct NoopController(ReturnHandling);

#[async_trait]
impl PaymentController for NoopController {
    async fn confirm(&self, _params: ConfirmPaymentIntentParams) -> Result<PaymentResult> {
        Ok(PaymentResult::Failed("noop".to_string()))
    }

    fn return_handling(&self) -> ReturnHandling {
        self.0
    }
}

impl ControllerLog {
    pub fn factory(&self) -> PaymentControllerFactory {
        let built = self.built.clone();
        Box::new(move |options: &ApiRequestOptions, return_handling: ReturnHandling| {
            built
                .lock()
                .unwrap()
                .push((options.clone(), return_handling));
            Box::new(NoopController(return_handling)) as PaymentControllerBox
        })
    }
}

pub fn payment_intent(types: &[&str]) -> PaymentIntent {
    PaymentIntent {
        id: "pi_123".to_string(),
        currency: "eur".to_string(),
        amount: 1099,
        status: PaymentIntentStatus::RequiresPaymentMethod,
        payment_method_types: types.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn payment_method(id: &str, r#type: PaymentMethodType) -> PaymentMethod {
    PaymentMethod {
        id: id.to_string(),
        r#type,
        customer_id: Some("cus_1".to_string()),
        created: 1_600_000_000,
        livemode: false,
        card: None,
    }
}

pub fn customer_config() -> PaymentSheetConfiguration {
    PaymentSheetConfiguration::new("Widgets").with_customer(CustomerConfiguration {
        id: "cus_1".to_string(),
        ephemeral_key_secret: "ek_test_1".to_string(),
    })
}

pub fn secret(s: &str) -> ClientSecret {
    ClientSecret::new(s).unwrap()
}

pub fn build_factory(
    service: Arc<ScriptedService>,
    prefs: InMemoryPrefsRepository,
    log: &ControllerLog,
) -> Arc<FlowControllerFactory> {
    Arc::new(FlowControllerFactory::new(
        service,
        Arc::new(prefs),
        log.factory(),
        PaymentConfiguration::new("pk_test_1", Some("acct_1".to_string())),
    ))
}
