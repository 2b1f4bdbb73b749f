use super::flow_controller::FlowController;
use crate::domain::configuration::{
    ApiRequestOptions, CustomerConfiguration, FlowControllerArgs, PaymentConfiguration,
    PaymentSheetConfiguration,
};
use crate::domain::confirmation::ReturnHandling;
use crate::domain::payment_intent::{ClientSecret, PaymentIntent};
use crate::domain::payment_method::{PaymentMethod, PaymentMethodType};
use crate::domain::ports::{
    PaymentControllerFactory, PaymentServiceClient, PaymentServiceClientRef, PrefsRepositoryRef,
};
use crate::error::{PaymentSheetError, Result, TransportResult};
use futures::future::join_all;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Attribution label sent with every payment method listing.
pub const PRODUCT_USAGE: &str = "PaymentSheet";

/// Outcome of one flow controller assembly.
pub type AssemblyResult = Result<FlowController>;

/// Assembles [`FlowController`]s from a client secret and sheet configuration.
///
/// Holds only immutable, shareable collaborators; every call to
/// [`create`](Self::create) works on freshly allocated values, so one factory
/// can serve concurrent assemblies.
pub struct FlowControllerFactory {
    service: PaymentServiceClientRef,
    prefs: PrefsRepositoryRef,
    controller_factory: PaymentControllerFactory,
    payment_configuration: PaymentConfiguration,
}

impl FlowControllerFactory {
    /// Creates a new `FlowControllerFactory`.
    ///
    /// # Arguments
    ///
    /// * `service` - The remote payments API.
    /// * `prefs` - Where customers' default payment methods are remembered.
    /// * `controller_factory` - Builds the confirmation handler for each flow controller.
    /// * `payment_configuration` - The merchant's publishable key and connected account.
    pub fn new(
        service: PaymentServiceClientRef,
        prefs: PrefsRepositoryRef,
        controller_factory: PaymentControllerFactory,
        payment_configuration: PaymentConfiguration,
    ) -> Self {
        Self {
            service,
            prefs,
            controller_factory,
            payment_configuration,
        }
    }

    /// Runs the assembly pipeline to completion.
    ///
    /// With a customer configured, the customer's saved payment methods and
    /// default method are fetched as well; failures listing a single method
    /// type only empty that type's contribution. Failing to retrieve the
    /// payment intent fails the whole assembly.
    pub async fn create(
        &self,
        client_secret: ClientSecret,
        config: Option<PaymentSheetConfiguration>,
    ) -> AssemblyResult {
        let customer = config.as_ref().and_then(|c| c.customer.clone());
        let args = FlowControllerArgs {
            client_secret,
            config,
        };

        match customer {
            Some(customer) => {
                debug!(customer_id = %customer.id, "assembling flow controller with customer");
                self.create_with_customer(args, &customer).await
            }
            None => {
                debug!("assembling flow controller without customer");
                self.create_without_customer(args).await
            }
        }
    }

    /// Runs [`create`](Self::create) on a background task and returns a
    /// receiver resolving to its single result.
    pub fn spawn(
        self: &Arc<Self>,
        client_secret: ClientSecret,
        config: Option<PaymentSheetConfiguration>,
    ) -> oneshot::Receiver<AssemblyResult> {
        let (tx, rx) = oneshot::channel();
        let factory = Arc::clone(self);
        tokio::spawn(async move {
            let result = factory.create(client_secret, config).await;
            // The caller may have stopped waiting; the result is then dropped.
            let _ = tx.send(result);
        });
        rx
    }

    /// Runs [`create`](Self::create) on a background task and invokes
    /// `on_complete` exactly once on the `completion` runtime.
    ///
    /// If the completion runtime has shut down by the time the result is
    /// ready, `on_complete` is dropped without being called and a warning is
    /// logged. The returned handle resolves once the callback has run or been
    /// dropped.
    pub fn create_with_callback<F>(
        self: &Arc<Self>,
        client_secret: ClientSecret,
        config: Option<PaymentSheetConfiguration>,
        completion: Handle,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(AssemblyResult) + Send + 'static,
    {
        let factory = Arc::clone(self);
        tokio::spawn(async move {
            let result = factory.create(client_secret, config).await;
            if let Err(e) = completion.spawn(async move { on_complete(result) }).await {
                warn!(error = %e, "completion callback did not run");
            }
        })
    }

    async fn create_without_customer(&self, args: FlowControllerArgs) -> AssemblyResult {
        let payment_intent = self.retrieve_payment_intent(&args.client_secret).await?;
        let payment_method_types = payment_intent.supported_payment_method_types();

        Ok(self.assemble(args, payment_intent, payment_method_types, Vec::new(), None))
    }

    async fn create_with_customer(
        &self,
        args: FlowControllerArgs,
        customer: &CustomerConfiguration,
    ) -> AssemblyResult {
        let default_payment_method_id =
            self.prefs.get_default_payment_method_id(&customer.id).await;

        let payment_intent = self.retrieve_payment_intent(&args.client_secret).await?;
        let payment_method_types = payment_intent.supported_payment_method_types();

        let options = self.payment_configuration.customer_request_options(customer);
        let payment_methods = fetch_customer_payment_methods(
            self.service.as_ref(),
            customer,
            &payment_method_types,
            &options,
        )
        .await;

        Ok(self.assemble(
            args,
            payment_intent,
            payment_method_types,
            payment_methods,
            default_payment_method_id,
        ))
    }

    async fn retrieve_payment_intent(&self, client_secret: &ClientSecret) -> Result<PaymentIntent> {
        let options = self.payment_configuration.request_options();
        match self
            .service
            .retrieve_payment_intent(client_secret, &options)
            .await
        {
            Ok(Some(intent)) => Ok(intent),
            Ok(None) => {
                warn!(
                    payment_intent = ?client_secret.payment_intent_id(),
                    "payment intent not found"
                );
                Err(PaymentSheetError::PaymentIntentNotFound)
            }
            Err(e) => {
                warn!(error = %e, "failed to retrieve payment intent");
                Err(e.into())
            }
        }
    }

    fn assemble(
        &self,
        args: FlowControllerArgs,
        payment_intent: PaymentIntent,
        payment_method_types: Vec<PaymentMethodType>,
        payment_methods: Vec<PaymentMethod>,
        default_payment_method_id: Option<String>,
    ) -> FlowController {
        let payment_controller = (self.controller_factory)(
            &self.payment_configuration.request_options(),
            ReturnHandling::Required,
        );

        info!(
            payment_intent = %payment_intent.id,
            types = payment_method_types.len(),
            payment_methods = payment_methods.len(),
            has_default = default_payment_method_id.is_some(),
            "flow controller assembled"
        );

        FlowController::new(
            payment_controller,
            self.payment_configuration.clone(),
            args,
            payment_intent,
            payment_method_types,
            payment_methods,
            default_payment_method_id,
        )
    }
}

/// Lists the customer's saved payment methods for each type, in type order.
///
/// Each type is listed independently. A failed listing contributes nothing
/// and is not reported to the caller.
pub(crate) async fn fetch_customer_payment_methods(
    service: &dyn PaymentServiceClient,
    customer: &CustomerConfiguration,
    types: &[PaymentMethodType],
    options: &ApiRequestOptions,
) -> Vec<PaymentMethod> {
    // join_all yields results in input order, whatever order they complete in.
    let attempts: Vec<(PaymentMethodType, TransportResult<Vec<PaymentMethod>>)> =
        join_all(types.iter().map(|&r#type| async move {
            let result = service
                .list_payment_methods(&customer.id, r#type, options, PRODUCT_USAGE)
                .await;
            (r#type, result)
        }))
        .await;

    attempts
        .into_iter()
        .flat_map(|(r#type, result)| match result {
            Ok(methods) => methods,
            Err(e) => {
                warn!(
                    customer_id = %customer.id,
                    payment_method_type = %r#type,
                    error = %e,
                    "listing payment methods failed, treating as empty"
                );
                Vec::new()
            }
        })
        .collect()
}
