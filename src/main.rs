use clap::Parser;
use mollie_checkout::adapters::SystemClock;
use mollie_checkout::core::bodies_to_json;
use mollie_checkout::utils::error::{ErrorSeverity, MollieError, Result};
use mollie_checkout::utils::{logger, validation::Validate};
use mollie_checkout::{
    ApiKind, CliArgs, PaymentMethod, PaymentModel, PluginConfig, RequestBody, RequestBuilder,
};

fn main() {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting mollie-requests CLI");
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = args.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&args) {
        Ok(bodies) => {
            tracing::info!("✅ Built {} request body(ies)", bodies.len());
        }
        Err(e) => {
            tracing::error!(
                "❌ Request build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn run(args: &CliArgs) -> Result<Vec<RequestBody>> {
    let config = match &args.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path.display());
            let config = PluginConfig::from_file(path)?;
            config.validate()?;
            config
        }
        None => PluginConfig::default(),
    };

    let content = std::fs::read_to_string(&args.model).map_err(MollieError::IoError)?;
    let model: PaymentModel = serde_json::from_str(&content)?;
    let method = PaymentMethod::from_code(&args.method)?;

    let apis = match args.api.kind() {
        Some(api) => vec![api],
        None => [ApiKind::Payments, ApiKind::Orders]
            .into_iter()
            .filter(|api| method.supports(*api))
            .collect(),
    };

    let builder = RequestBuilder::new(SystemClock);
    let mut bodies = Vec::with_capacity(apis.len());

    for api in apis {
        let mut model = model.clone();
        config.checkout.apply_to(&mut model, method, api);
        model.validate()?;

        tracing::info!("🔧 Building {} request for {}", api, method);
        bodies.push(builder.build(method.code(), api, &model)?);
    }

    let document = bodies_to_json(&bodies)?;
    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(bodies)
}
