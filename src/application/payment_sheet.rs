use super::flow_controller_factory::fetch_customer_payment_methods;
use crate::domain::configuration::{CustomerConfiguration, FlowControllerArgs, PaymentConfiguration};
use crate::domain::confirmation::{
    ConfirmPaymentIntentParams, PaymentResult, PaymentSelection, ReturnHandling,
};
use crate::domain::payment_intent::PaymentIntent;
use crate::domain::payment_method::{PaymentMethod, PaymentMethodCreateParams};
use crate::domain::ports::{
    PaymentControllerBox, PaymentControllerFactory, PaymentServiceClientRef, PrefsRepositoryRef,
};
use crate::error::{PaymentSheetError, Result};
use tokio::sync::watch;
use tracing::{debug, warn};

/// State holder for the full payment sheet.
///
/// Every piece of UI state is published on a `watch` channel; observers call
/// the `subscribe_*` methods and react to changes.
pub struct PaymentSheetViewModel {
    service: PaymentServiceClientRef,
    prefs: PrefsRepositoryRef,
    payment_controller: PaymentControllerBox,
    payment_configuration: PaymentConfiguration,
    args: FlowControllerArgs,
    payment_intent: watch::Sender<Option<PaymentIntent>>,
    payment_methods: watch::Sender<Vec<PaymentMethod>>,
    selection: watch::Sender<Option<PaymentSelection>>,
    processing: watch::Sender<bool>,
}

impl PaymentSheetViewModel {
    pub fn new(
        service: PaymentServiceClientRef,
        prefs: PrefsRepositoryRef,
        controller_factory: &PaymentControllerFactory,
        payment_configuration: PaymentConfiguration,
        args: FlowControllerArgs,
    ) -> Self {
        let payment_controller = controller_factory(
            &payment_configuration.request_options(),
            ReturnHandling::Required,
        );
        Self {
            service,
            prefs,
            payment_controller,
            payment_configuration,
            args,
            payment_intent: watch::Sender::new(None),
            payment_methods: watch::Sender::new(Vec::new()),
            selection: watch::Sender::new(None),
            processing: watch::Sender::new(false),
        }
    }

    pub fn subscribe_payment_intent(&self) -> watch::Receiver<Option<PaymentIntent>> {
        self.payment_intent.subscribe()
    }

    pub fn subscribe_payment_methods(&self) -> watch::Receiver<Vec<PaymentMethod>> {
        self.payment_methods.subscribe()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<Option<PaymentSelection>> {
        self.selection.subscribe()
    }

    pub fn subscribe_processing(&self) -> watch::Receiver<bool> {
        self.processing.subscribe()
    }

    fn customer(&self) -> Option<&CustomerConfiguration> {
        self.args.config.as_ref()?.customer.as_ref()
    }

    /// Fetches the payment intent and, with a customer, their saved payment
    /// methods. Selects the customer's default method when it is among them.
    pub async fn load(&self) -> Result<()> {
        let options = self.payment_configuration.request_options();
        let intent = self
            .service
            .retrieve_payment_intent(&self.args.client_secret, &options)
            .await?
            .ok_or(PaymentSheetError::PaymentIntentNotFound)?;
        let types = intent.supported_payment_method_types();
        self.payment_intent.send_replace(Some(intent));

        if let Some(customer) = self.customer() {
            let default_id = self.prefs.get_default_payment_method_id(&customer.id).await;
            let customer_options = self.payment_configuration.customer_request_options(customer);
            let methods = fetch_customer_payment_methods(
                self.service.as_ref(),
                customer,
                &types,
                &customer_options,
            )
            .await;

            let default_method = default_id
                .and_then(|id| methods.iter().find(|pm| pm.id == id).cloned());
            if let Some(pm) = default_method {
                self.selection.send_replace(Some(PaymentSelection::Saved(pm)));
            }
            debug!(count = methods.len(), "payment methods loaded");
            self.payment_methods.send_replace(methods);
        }
        Ok(())
    }

    pub fn select(&self, selection: PaymentSelection) {
        self.selection.send_replace(Some(selection));
    }

    /// Creates a payment method remotely, puts it first in the list and
    /// selects it.
    pub async fn add_payment_method(
        &self,
        params: PaymentMethodCreateParams,
    ) -> Result<PaymentMethod> {
        let options = self.payment_configuration.request_options();
        let payment_method = self.service.create_payment_method(&params, &options).await?;

        self.payment_methods
            .send_modify(|methods| methods.insert(0, payment_method.clone()));
        self.select(PaymentSelection::Saved(payment_method.clone()));
        Ok(payment_method)
    }

    /// Confirms the payment intent with the current selection.
    ///
    /// `processing` is true for the duration of the confirmation. A completed
    /// payment with a saved method becomes the customer's default.
    pub async fn checkout(&self) -> Result<PaymentResult> {
        let selection = self
            .selection
            .borrow()
            .clone()
            .ok_or(PaymentSheetError::NoPaymentSelection)?;
        let params = ConfirmPaymentIntentParams {
            client_secret: self.args.client_secret.clone(),
            payment_method: selection.payment_method_choice()?,
            return_url: None,
        };

        self.processing.send_replace(true);
        let result = self.payment_controller.confirm(params).await;
        self.processing.send_replace(false);
        let result = result?;

        if let PaymentResult::Completed(intent) = &result {
            self.payment_intent.send_replace(Some(intent.clone()));
            if let (Some(customer), PaymentSelection::Saved(pm)) = (self.customer(), &selection)
                && let Err(e) = self
                    .prefs
                    .save_default_payment_method_id(&customer.id, &pm.id)
                    .await
            {
                warn!(
                    customer_id = %customer.id,
                    error = %e,
                    "failed to save default payment method"
                );
            }
        }
        Ok(result)
    }
}
