use super::flow_controller::FlowController;
use crate::domain::configuration::{GooglePayConfiguration, GooglePayEnvironment};
use crate::interfaces::google_pay::{GooglePayJsonFactory, TransactionInfo};
use serde::Serialize;
use serde_json::Value;

/// A request body for the Google Pay API together with the environment the
/// wallet client has to be created for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GooglePayRequest {
    pub environment: GooglePayEnvironment,
    pub request: Value,
}

/// Coordinates the wallet flow for an assembled [`FlowController`].
///
/// Only exists when the sheet was configured with Google Pay.
pub struct GooglePayViewModel {
    json_factory: GooglePayJsonFactory,
    transaction_info: TransactionInfo,
}

impl GooglePayViewModel {
    /// `None` when the controller's sheet configuration has no Google Pay section.
    pub fn from_flow_controller(controller: &FlowController) -> Option<Self> {
        let config: GooglePayConfiguration =
            controller.args().config.as_ref()?.google_pay.clone()?;
        let transaction_info =
            TransactionInfo::from_payment_intent(controller.payment_intent(), &config);
        Some(Self {
            json_factory: GooglePayJsonFactory::new(
                controller.payment_configuration().clone(),
                config,
            ),
            transaction_info,
        })
    }

    pub fn environment(&self) -> GooglePayEnvironment {
        self.json_factory.config().environment
    }

    pub fn transaction_info(&self) -> &TransactionInfo {
        &self.transaction_info
    }

    pub fn is_ready_to_pay_request(&self) -> GooglePayRequest {
        GooglePayRequest {
            environment: self.environment(),
            request: self.json_factory.create_is_ready_to_pay_request(),
        }
    }

    pub fn payment_data_request(&self) -> GooglePayRequest {
        GooglePayRequest {
            environment: self.environment(),
            request: self
                .json_factory
                .create_payment_data_request(&self.transaction_info),
        }
    }
}
