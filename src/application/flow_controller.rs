use crate::domain::configuration::{FlowControllerArgs, PaymentConfiguration};
use crate::domain::confirmation::{ConfirmPaymentIntentParams, PaymentResult, PaymentSelection};
use crate::domain::payment_intent::PaymentIntent;
use crate::domain::payment_method::{PaymentMethod, PaymentMethodType};
use crate::domain::ports::PaymentControllerBox;
use crate::error::{PaymentSheetError, Result};
use std::fmt;

/// Drives payment option selection and confirmation for one payment intent.
///
/// Built by [`FlowControllerFactory`](super::flow_controller_factory::FlowControllerFactory)
/// with everything it needs already fetched; it performs no lookups of its own
/// beyond confirmation.
pub struct FlowController {
    payment_controller: PaymentControllerBox,
    payment_configuration: PaymentConfiguration,
    args: FlowControllerArgs,
    payment_intent: PaymentIntent,
    payment_method_types: Vec<PaymentMethodType>,
    payment_methods: Vec<PaymentMethod>,
    default_payment_method_id: Option<String>,
    selection: Option<PaymentSelection>,
}

impl FlowController {
    pub fn new(
        payment_controller: PaymentControllerBox,
        payment_configuration: PaymentConfiguration,
        args: FlowControllerArgs,
        payment_intent: PaymentIntent,
        payment_method_types: Vec<PaymentMethodType>,
        payment_methods: Vec<PaymentMethod>,
        default_payment_method_id: Option<String>,
    ) -> Self {
        let mut controller = Self {
            payment_controller,
            payment_configuration,
            args,
            payment_intent,
            payment_method_types,
            payment_methods,
            default_payment_method_id,
            selection: None,
        };
        controller.selection = controller.initial_selection();
        controller
    }

    pub fn payment_configuration(&self) -> &PaymentConfiguration {
        &self.payment_configuration
    }

    pub fn publishable_key(&self) -> &str {
        &self.payment_configuration.publishable_key
    }

    pub fn stripe_account(&self) -> Option<&str> {
        self.payment_configuration.stripe_account.as_deref()
    }

    pub fn args(&self) -> &FlowControllerArgs {
        &self.args
    }

    pub fn payment_intent(&self) -> &PaymentIntent {
        &self.payment_intent
    }

    pub fn payment_method_types(&self) -> &[PaymentMethodType] {
        &self.payment_method_types
    }

    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    pub fn default_payment_method_id(&self) -> Option<&str> {
        self.default_payment_method_id.as_deref()
    }

    /// The saved method matching the customer's default, if it was fetched.
    pub fn initial_selection(&self) -> Option<PaymentSelection> {
        let default_id = self.default_payment_method_id.as_deref()?;
        self.payment_methods
            .iter()
            .find(|pm| pm.id == default_id)
            .cloned()
            .map(PaymentSelection::Saved)
    }

    pub fn payment_option(&self) -> Option<&PaymentSelection> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, selection: PaymentSelection) {
        self.selection = Some(selection);
    }

    /// Confirms the intent with the current selection.
    pub async fn confirm(&self) -> Result<PaymentResult> {
        let payment_method = self
            .selection
            .as_ref()
            .ok_or(PaymentSheetError::NoPaymentSelection)?
            .payment_method_choice()?;

        let params = ConfirmPaymentIntentParams {
            client_secret: self.args.client_secret.clone(),
            payment_method,
            return_url: None,
        };
        self.payment_controller.confirm(params).await
    }
}

impl fmt::Debug for FlowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowController")
            .field("args", &self.args)
            .field("payment_intent", &self.payment_intent.id)
            .field("payment_method_types", &self.payment_method_types)
            .field("payment_methods", &self.payment_methods.len())
            .field("default_payment_method_id", &self.default_payment_method_id)
            .field("selection", &self.selection)
            .finish()
    }
}
