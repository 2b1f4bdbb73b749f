use crate::domain::configuration::ApiRequestOptions;
use crate::domain::confirmation::{ConfirmPaymentIntentParams, PaymentResult, ReturnHandling};
use crate::domain::payment_intent::PaymentIntentStatus;
use crate::domain::ports::{
    PaymentController, PaymentControllerBox, PaymentControllerFactory, PaymentServiceClientRef,
};
use crate::error::Result;
use async_trait::async_trait;

/// Confirms payment intents through the remote payment service.
pub struct ServicePaymentController {
    service: PaymentServiceClientRef,
    options: ApiRequestOptions,
    return_handling: ReturnHandling,
}

impl ServicePaymentController {
    pub fn new(
        service: PaymentServiceClientRef,
        options: ApiRequestOptions,
        return_handling: ReturnHandling,
    ) -> Self {
        Self {
            service,
            options,
            return_handling,
        }
    }

    /// A factory producing controllers that share `service`.
    pub fn factory(service: PaymentServiceClientRef) -> PaymentControllerFactory {
        Box::new(move |options: &ApiRequestOptions, return_handling: ReturnHandling| {
            Box::new(ServicePaymentController::new(
                service.clone(),
                options.clone(),
                return_handling,
            )) as PaymentControllerBox
        })
    }
}

#[async_trait]
impl PaymentController for ServicePaymentController {
    async fn confirm(&self, params: ConfirmPaymentIntentParams) -> Result<PaymentResult> {
        let intent = self
            .service
            .confirm_payment_intent(&params, &self.options)
            .await?;

        let result = match intent.status {
            PaymentIntentStatus::Succeeded
            | PaymentIntentStatus::Processing
            | PaymentIntentStatus::RequiresCapture => PaymentResult::Completed(intent),
            PaymentIntentStatus::RequiresAction => match self.return_handling {
                ReturnHandling::Required => PaymentResult::RequiresAction(intent),
                ReturnHandling::None => PaymentResult::Failed(format!(
                    "payment intent {} requires an action that this controller cannot handle",
                    intent.id
                )),
            },
            status => PaymentResult::Failed(format!(
                "payment intent {} ended in status {:?}",
                intent.id, status
            )),
        };
        Ok(result)
    }

    fn return_handling(&self) -> ReturnHandling {
        self.return_handling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::confirmation::PaymentMethodChoice;
    use crate::domain::payment_intent::ClientSecret;
    use crate::infrastructure::fixture::FixturePaymentService;
    use std::sync::Arc;

    const FIXTURE: &str = r#"{
        "payment_intents": {
            "pi_1_secret_a": {
                "id": "pi_1", "currency": "usd", "amount": 500,
                "status": "requires_payment_method",
                "payment_method_types": ["card"]
            },
            "pi_2_secret_b": {
                "id": "pi_2", "currency": "usd", "amount": 500,
                "status": "requires_payment_method",
                "payment_method_types": ["card"]
            }
        },
        "requires_action": ["pi_2_secret_b"]
    }"#;

    fn params(secret: &str) -> ConfirmPaymentIntentParams {
        ConfirmPaymentIntentParams {
            client_secret: ClientSecret::new(secret).unwrap(),
            payment_method: PaymentMethodChoice::Saved("pm_1".to_string()),
            return_url: None,
        }
    }

    fn controller(return_handling: ReturnHandling) -> PaymentControllerBox {
        let service: PaymentServiceClientRef =
            Arc::new(FixturePaymentService::from_reader(FIXTURE.as_bytes()).unwrap());
        let factory = ServicePaymentController::factory(service);
        factory(&ApiRequestOptions::new("pk_test_1", None), return_handling)
    }

    #[tokio::test]
    async fn test_confirm_completes_succeeded_intent() {
        let controller = controller(ReturnHandling::Required);
        let result = controller.confirm(params("pi_1_secret_a")).await.unwrap();
        assert!(result.is_completed());
    }

    #[tokio::test]
    async fn test_confirm_requires_action_depends_on_return_handling() {
        let required = controller(ReturnHandling::Required);
        assert!(matches!(
            required.confirm(params("pi_2_secret_b")).await.unwrap(),
            PaymentResult::RequiresAction(_)
        ));

        let none = controller(ReturnHandling::None);
        assert_eq!(none.return_handling(), ReturnHandling::None);
        assert!(matches!(
            none.confirm(params("pi_2_secret_b")).await.unwrap(),
            PaymentResult::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_confirm_propagates_transport_error() {
        let controller = controller(ReturnHandling::Required);
        assert!(controller.confirm(params("pi_404_secret_x")).await.is_err());
    }
}
