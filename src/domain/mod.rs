//! Domain layer: payment values exchanged with the remote service and the
//! ports through which the application layer reaches its collaborators.

pub mod configuration;
pub mod confirmation;
pub mod payment_intent;
pub mod payment_method;
pub mod ports;
