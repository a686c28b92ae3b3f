use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_audiobook::domain::audiobook::{AudiobookService, AudiobookServiceApi};
use tts_audiobook::error::{AppError, AppResult};
use tts_audiobook::infrastructure::cli::Cli;
use tts_audiobook::infrastructure::config::{Config, LogFormat, ProviderCredentials};
use tts_audiobook::infrastructure::google::GoogleAuth;
use tts_audiobook::infrastructure::repositories::{
    GoogleTtsRepository, OpenAiTtsRepository, PollyTtsRepository, TtsRepository,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration (and .env, when present)
    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(err) => {
            init_logging(&LogFormat::from_env());
            exit_with(err.into());
        }
    };

    // Initialize logging
    init_logging(&config.log_format);

    if let Err(err) = run(config).await {
        exit_with(err);
    }
}

fn exit_with(err: AppError) -> ! {
    tracing::error!(error = %err, "Audiobook generation failed");
    if err.is_resumable() {
        tracing::info!("Cached segments are kept, run again with the same output to resume");
    }
    std::process::exit(err.exit_code());
}

async fn run(config: Config) -> AppResult<()> {
    tracing::info!(
        text_file = %config.text_file.display(),
        output = %config.output.display(),
        gender = %config.gender,
        length = config.length,
        provider = %config.provider,
        scratch_dir = %config.scratch_dir.display(),
        "Starting audiobook generation"
    );

    let tts_repo = create_tts_repository(&config).await?;
    let audiobook_service = AudiobookService::new(
        tts_repo,
        config.scratch_dir.clone(),
        config.silence_gap,
    );

    let summary = audiobook_service.run(&config.audiobook_request()).await?;

    tracing::info!(
        segments = summary.segment_count,
        synthesized = summary.synthesis.synthesized,
        skipped = summary.synthesis.skipped,
        duration_secs = summary.join.duration.as_secs(),
        output_size = summary.join.output_size,
        output = %config.output.display(),
        "Complete!"
    );

    Ok(())
}

async fn create_tts_repository(config: &Config) -> Result<Arc<dyn TtsRepository>, AppError> {
    match &config.credentials {
        ProviderCredentials::GoogleFile(path) => {
            tracing::info!(credentials = %path.display(), "Initializing Google Cloud TTS client");
            let auth = Arc::new(GoogleAuth::from_path(path)?);
            Ok(Arc::new(GoogleTtsRepository::new(
                auth,
                config.google_endpoint.clone(),
            )))
        }
        ProviderCredentials::AwsDefaultChain => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (profile, instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            Ok(Arc::new(PollyTtsRepository::new(polly_client)))
        }
        ProviderCredentials::OpenAiKey(api_key) => {
            tracing::info!(model = %config.openai_model, "Initializing OpenAI TTS client");
            let openai_config = async_openai::config::OpenAIConfig::new().with_api_key(api_key.clone());
            let client = Arc::new(async_openai::Client::with_config(openai_config));
            Ok(Arc::new(OpenAiTtsRepository::new(
                client,
                config.openai_model.clone(),
            )))
        }
    }
}

fn init_logging(log_format: &LogFormat) {
    if *log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_audiobook=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_audiobook=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
