//! Application layer orchestrating the payment flows.
//!
//! `FlowControllerFactory` assembles a `FlowController` from remote state on a
//! background task and hands back exactly one result. `PaymentSheetViewModel`
//! holds the state of the full payment sheet on `tokio::sync::watch` channels.
//! `GooglePayViewModel` builds the wallet requests for an assembled controller.

pub mod flow_controller;
pub mod flow_controller_factory;
pub mod google_pay;
pub mod payment_sheet;
