use crate::domain::configuration::{GooglePayConfiguration, PaymentConfiguration};
use crate::domain::payment_intent::PaymentIntent;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};

const API_VERSION: u8 = 2;
const API_VERSION_MINOR: u8 = 0;
const STRIPE_API_VERSION: &str = "2020-03-02";
const ALLOWED_AUTH_METHODS: [&str; 2] = ["PAN_ONLY", "CRYPTOGRAM_3DS"];
const ALLOWED_CARD_NETWORKS: [&str; 4] = ["AMEX", "DISCOVER", "MASTERCARD", "VISA"];

/// Currencies whose amounts have no minor unit.
const ZERO_DECIMAL_CURRENCIES: [&str; 16] = [
    "bif", "clp", "djf", "gnf", "jpy", "kmf", "krw", "mga", "pyg", "rwf", "ugx", "vnd", "vuv",
    "xaf", "xof", "xpf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TotalPriceStatus {
    NotCurrentlyKnown,
    Estimated,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInfo {
    pub currency_code: String,
    pub total_price_status: TotalPriceStatus,
    /// In the currency's minor unit.
    pub total_price: Option<i64>,
    pub country_code: Option<String>,
}

impl TransactionInfo {
    /// Final-price transaction info for the intent's amount, in the
    /// merchant's configured country.
    pub fn from_payment_intent(intent: &PaymentIntent, config: &GooglePayConfiguration) -> Self {
        Self {
            currency_code: intent.currency.clone(),
            total_price_status: TotalPriceStatus::Final,
            total_price: Some(intent.amount),
            country_code: Some(config.country_code.clone()),
        }
    }
}

/// Formats a minor-unit amount as Google Pay's decimal `totalPrice`.
pub fn format_price(amount: i64, currency_code: &str) -> String {
    let currency = currency_code.to_ascii_lowercase();
    let scale = if ZERO_DECIMAL_CURRENCIES.contains(&currency.as_str()) {
        0
    } else {
        2
    };
    Decimal::new(amount, scale).to_string()
}

/// Builds the JSON requests handed to the Google Pay API.
pub struct GooglePayJsonFactory {
    payment_configuration: PaymentConfiguration,
    config: GooglePayConfiguration,
}

impl GooglePayJsonFactory {
    pub fn new(
        payment_configuration: PaymentConfiguration,
        config: GooglePayConfiguration,
    ) -> Self {
        Self {
            payment_configuration,
            config,
        }
    }

    pub fn config(&self) -> &GooglePayConfiguration {
        &self.config
    }

    /// An `IsReadyToPayRequest` for card payments.
    pub fn create_is_ready_to_pay_request(&self) -> Value {
        json!({
            "apiVersion": API_VERSION,
            "apiVersionMinor": API_VERSION_MINOR,
            "allowedPaymentMethods": [self.card_payment_method(false)],
            "existingPaymentMethodRequired": self.config.existing_payment_method_required,
        })
    }

    /// A `PaymentDataRequest` tokenizing through Stripe.
    pub fn create_payment_data_request(&self, transaction_info: &TransactionInfo) -> Value {
        let mut request = json!({
            "apiVersion": API_VERSION,
            "apiVersionMinor": API_VERSION_MINOR,
            "allowedPaymentMethods": [self.card_payment_method(true)],
            "transactionInfo": transaction_info_json(transaction_info),
            "emailRequired": self.config.is_email_required,
        });

        if let Some(merchant_name) = &self.config.merchant_name {
            request["merchantInfo"] = json!({ "merchantName": merchant_name });
        }
        request
    }

    fn card_payment_method(&self, with_tokenization: bool) -> Value {
        let mut parameters = json!({
            "allowedAuthMethods": ALLOWED_AUTH_METHODS,
            "allowedCardNetworks": ALLOWED_CARD_NETWORKS,
        });
        if let Some(format) = self.config.billing_address {
            parameters["billingAddressRequired"] = json!(true);
            parameters["billingAddressParameters"] = json!({ "format": format });
        }

        let mut method = json!({
            "type": "CARD",
            "parameters": parameters,
        });
        if with_tokenization {
            method["tokenizationSpecification"] = self.tokenization_specification();
        }
        method
    }

    fn tokenization_specification(&self) -> Value {
        let publishable_key = match &self.payment_configuration.stripe_account {
            Some(account) => format!("{}/{}", self.payment_configuration.publishable_key, account),
            None => self.payment_configuration.publishable_key.clone(),
        };
        json!({
            "type": "PAYMENT_GATEWAY",
            "parameters": {
                "gateway": "stripe",
                "stripe:version": STRIPE_API_VERSION,
                "stripe:publishableKey": publishable_key,
            }
        })
    }
}

fn transaction_info_json(info: &TransactionInfo) -> Value {
    let mut value = json!({
        "currencyCode": info.currency_code.to_ascii_uppercase(),
        "totalPriceStatus": info.total_price_status,
    });
    if let Some(total_price) = info.total_price {
        value["totalPrice"] = json!(format_price(total_price, &info.currency_code));
    }
    if let Some(country_code) = &info.country_code {
        value["countryCode"] = json!(country_code);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration::{BillingAddressFormat, GooglePayEnvironment};
    use crate::domain::payment_intent::PaymentIntentStatus;
    use rust_decimal_macros::dec;

    fn google_pay_config() -> GooglePayConfiguration {
        GooglePayConfiguration {
            environment: GooglePayEnvironment::Test,
            country_code: "US".to_string(),
            merchant_name: Some("Widgets".to_string()),
            is_email_required: true,
            billing_address: None,
            existing_payment_method_required: false,
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1099, "usd"), "10.99");
        assert_eq!(format_price(1000, "EUR"), "10.00");
        assert_eq!(format_price(5, "usd"), "0.05");
        assert_eq!(format_price(500, "jpy"), "500");
    }

    #[test]
    fn test_format_price_is_exact() {
        let price: Decimal = format_price(123_456_789, "usd").parse().unwrap();
        assert_eq!(price, dec!(1234567.89));
    }

    #[test]
    fn test_is_ready_to_pay_request() {
        let factory = GooglePayJsonFactory::new(
            PaymentConfiguration::new("pk_test_1", None),
            google_pay_config(),
        );
        let request = factory.create_is_ready_to_pay_request();

        assert_eq!(request["apiVersion"], 2);
        assert_eq!(request["apiVersionMinor"], 0);
        let card = &request["allowedPaymentMethods"][0];
        assert_eq!(card["type"], "CARD");
        assert_eq!(
            card["parameters"]["allowedCardNetworks"],
            json!(["AMEX", "DISCOVER", "MASTERCARD", "VISA"])
        );
        assert!(card.get("tokenizationSpecification").is_none());
        assert!(card["parameters"].get("billingAddressRequired").is_none());
    }

    #[test]
    fn test_payment_data_request() {
        let mut config = google_pay_config();
        config.billing_address = Some(BillingAddressFormat::Full);
        let factory = GooglePayJsonFactory::new(
            PaymentConfiguration::new("pk_test_1", Some("acct_9".to_string())),
            config,
        );
        let intent = PaymentIntent {
            id: "pi_1".to_string(),
            currency: "usd".to_string(),
            amount: 2550,
            status: PaymentIntentStatus::RequiresPaymentMethod,
            payment_method_types: vec!["card".to_string()],
        };

        let info = TransactionInfo::from_payment_intent(&intent, factory.config());
        let request = factory.create_payment_data_request(&info);

        let tokenization = &request["allowedPaymentMethods"][0]["tokenizationSpecification"];
        assert_eq!(tokenization["parameters"]["gateway"], "stripe");
        assert_eq!(
            tokenization["parameters"]["stripe:publishableKey"],
            "pk_test_1/acct_9"
        );
        let parameters = &request["allowedPaymentMethods"][0]["parameters"];
        assert_eq!(parameters["billingAddressRequired"], true);
        assert_eq!(parameters["billingAddressParameters"]["format"], "FULL");

        let info = &request["transactionInfo"];
        assert_eq!(info["currencyCode"], "USD");
        assert_eq!(info["totalPriceStatus"], "FINAL");
        assert_eq!(info["totalPrice"], "25.50");
        assert_eq!(info["countryCode"], "US");

        assert_eq!(request["merchantInfo"]["merchantName"], "Widgets");
        assert_eq!(request["emailRequired"], true);
    }
}
