use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    CardPresent,
    Ideal,
    SepaDebit,
    AuBecsDebit,
    BacsDebit,
    Sofort,
    P24,
    Bancontact,
    Giropay,
    Eps,
    Fpx,
    Oxxo,
    Alipay,
    Grabpay,
    Upi,
    Netbanking,
}

impl PaymentMethodType {
    pub const ALL: [PaymentMethodType; 17] = [
        Self::Card,
        Self::CardPresent,
        Self::Ideal,
        Self::SepaDebit,
        Self::AuBecsDebit,
        Self::BacsDebit,
        Self::Sofort,
        Self::P24,
        Self::Bancontact,
        Self::Giropay,
        Self::Eps,
        Self::Fpx,
        Self::Oxxo,
        Self::Alipay,
        Self::Grabpay,
        Self::Upi,
        Self::Netbanking,
    ];

    /// The wire code for this type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::CardPresent => "card_present",
            Self::Ideal => "ideal",
            Self::SepaDebit => "sepa_debit",
            Self::AuBecsDebit => "au_becs_debit",
            Self::BacsDebit => "bacs_debit",
            Self::Sofort => "sofort",
            Self::P24 => "p24",
            Self::Bancontact => "bancontact",
            Self::Giropay => "giropay",
            Self::Eps => "eps",
            Self::Fpx => "fpx",
            Self::Oxxo => "oxxo",
            Self::Alipay => "alipay",
            Self::Grabpay => "grabpay",
            Self::Upi => "upi",
            Self::Netbanking => "netbanking",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Decodes a list of wire codes, dropping the ones this client does not
    /// know. Order and duplicates are kept.
    pub fn decode_all<S: AsRef<str>>(codes: &[S]) -> Vec<Self> {
        codes
            .iter()
            .filter_map(|code| Self::from_code(code.as_ref()))
            .collect()
    }
}

impl fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
}

/// A payment method stored on the remote service, optionally attached to a
/// customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: PaymentMethodType,
    #[serde(default, rename = "customer")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub card: Option<CardDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardParams {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodCreateParams {
    #[serde(rename = "type")]
    pub r#type: PaymentMethodType,
    #[serde(default)]
    pub card: Option<CardParams>,
    #[serde(default)]
    pub billing_name: Option<String>,
}

impl PaymentMethodCreateParams {
    pub fn card(card: CardParams) -> Self {
        Self {
            r#type: PaymentMethodType::Card,
            card: Some(card),
            billing_name: None,
        }
    }
}
