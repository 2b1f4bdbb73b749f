use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paysheet::application::flow_controller_factory::FlowControllerFactory;
use paysheet::application::google_pay::GooglePayViewModel;
use paysheet::domain::configuration::{
    CustomerConfiguration, GooglePayConfiguration, GooglePayEnvironment, PaymentConfiguration,
    PaymentSheetConfiguration,
};
use paysheet::domain::payment_intent::ClientSecret;
use paysheet::domain::ports::{PaymentServiceClientRef, PrefsRepositoryRef};
use paysheet::infrastructure::fixture::FixturePaymentService;
use paysheet::infrastructure::in_memory::InMemoryPrefsRepository;
use paysheet::infrastructure::payment_controller::ServicePaymentController;
use paysheet::interfaces::csv::payment_method_writer::PaymentMethodWriter;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON fixture standing in for the remote payments API
    fixture: PathBuf,

    /// Client secret of the payment intent to present
    #[arg(long)]
    client_secret: String,

    /// Merchant publishable key
    #[arg(long, env = "PAYSHEET_PUBLISHABLE_KEY", default_value = "pk_test_paysheet")]
    publishable_key: String,

    /// Connected account to act on behalf of
    #[arg(long, env = "PAYSHEET_STRIPE_ACCOUNT")]
    stripe_account: Option<String>,

    /// Merchant name shown on the sheet
    #[arg(long, default_value = "paysheet")]
    merchant_display_name: String,

    /// Customer whose saved payment methods are listed
    #[arg(long, requires = "ephemeral_key")]
    customer_id: Option<String>,

    /// Ephemeral key secret for the customer
    #[arg(long, requires = "customer_id")]
    ephemeral_key: Option<String>,

    /// Merchant country; enables Google Pay and prints its payment data request
    #[arg(long)]
    google_pay_country: Option<String>,

    /// Target the production Google Pay environment instead of test
    #[arg(long, requires = "google_pay_country")]
    google_pay_production: bool,

    /// Path to persistent preferences (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn prefs_repository(db_path: Option<PathBuf>) -> Result<PrefsRepositoryRef> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = paysheet::infrastructure::rocksdb::RocksDbPrefsRepository::open(path)
                .into_diagnostic()?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent preferences requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Arc::new(InMemoryPrefsRepository::new()))
        }
        None => Ok(Arc::new(InMemoryPrefsRepository::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let service: PaymentServiceClientRef =
        Arc::new(FixturePaymentService::from_path(&cli.fixture).into_diagnostic()?);
    let prefs = prefs_repository(cli.db_path)?;
    let factory = Arc::new(FlowControllerFactory::new(
        service.clone(),
        prefs,
        ServicePaymentController::factory(service),
        PaymentConfiguration::new(cli.publishable_key, cli.stripe_account),
    ));

    let mut config = PaymentSheetConfiguration::new(cli.merchant_display_name);
    if let (Some(id), Some(ephemeral_key_secret)) = (cli.customer_id, cli.ephemeral_key) {
        config = config.with_customer(CustomerConfiguration {
            id,
            ephemeral_key_secret,
        });
    }

    if let Some(country_code) = cli.google_pay_country {
        let environment = if cli.google_pay_production {
            GooglePayEnvironment::Production
        } else {
            GooglePayEnvironment::Test
        };
        let merchant_name = Some(config.merchant_display_name.clone());
        config = config.with_google_pay(GooglePayConfiguration {
            environment,
            country_code,
            merchant_name,
            is_email_required: false,
            billing_address: None,
            existing_payment_method_required: false,
        });
    }

    let client_secret = ClientSecret::new(cli.client_secret).into_diagnostic()?;
    let controller = factory
        .spawn(client_secret, Some(config))
        .await
        .into_diagnostic()?
        .into_diagnostic()?;

    let intent = controller.payment_intent();
    let types: Vec<&str> = controller
        .payment_method_types()
        .iter()
        .map(|t| t.code())
        .collect();
    eprintln!(
        "Payment intent {} ({} {}) supports [{}]",
        intent.id,
        intent.amount,
        intent.currency,
        types.join(", ")
    );

    if let Some(google_pay) = GooglePayViewModel::from_flow_controller(&controller) {
        let request = serde_json::to_string(&google_pay.payment_data_request()).into_diagnostic()?;
        eprintln!("Google Pay request: {request}");
    }

    let stdout = io::stdout();
    let mut writer = PaymentMethodWriter::new(stdout.lock());
    writer
        .write_payment_methods(
            controller.payment_methods(),
            controller.default_payment_method_id(),
        )
        .into_diagnostic()?;

    Ok(())
}
