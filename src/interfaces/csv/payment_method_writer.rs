use crate::domain::payment_method::{PaymentMethod, PaymentMethodType};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct PaymentMethodRow<'a> {
    id: &'a str,
    r#type: PaymentMethodType,
    customer: &'a str,
    last4: &'a str,
    default: bool,
}

/// Writes payment methods as CSV with a `id,type,customer,last4,default` header.
pub struct PaymentMethodWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentMethodWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes every method, flagging the one matching `default_id`.
    ///
    /// The header is written even when there are no methods.
    pub fn write_payment_methods(
        &mut self,
        methods: &[PaymentMethod],
        default_id: Option<&str>,
    ) -> Result<()> {
        if methods.is_empty() {
            self.writer
                .write_record(["id", "type", "customer", "last4", "default"])?;
        }
        for pm in methods {
            self.writer.serialize(PaymentMethodRow {
                id: &pm.id,
                r#type: pm.r#type,
                customer: pm.customer_id.as_deref().unwrap_or_default(),
                last4: pm.card.as_ref().map(|c| c.last4.as_str()).unwrap_or_default(),
                default: default_id == Some(pm.id.as_str()),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
