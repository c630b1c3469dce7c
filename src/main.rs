use adstudio::{
    logger::{self, LogLevel, LoggerConfig},
    studio::{accept_images, export_batch},
    AspectRatio, EnvCredentialGate, GeminiClient, ImageSize, InputFile, Slot, StudioConfig,
    StudioSession, Tier,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "adstudio", version, about = "Generate commercial product shots in batches")]
struct Cli {
    /// Scene description; a default commercial prompt is used when empty
    #[arg(short, long, default_value = "")]
    prompt: String,

    /// Product shots (up to 5)
    #[arg(long = "product")]
    products: Vec<PathBuf>,

    /// Background references (up to 5)
    #[arg(long = "background")]
    backgrounds: Vec<PathBuf>,

    /// Previous render to refine
    #[arg(long)]
    reference: Option<PathBuf>,

    #[arg(short, long, default_value = "flash")]
    tier: Tier,

    #[arg(short = 'n', long, default_value_t = 4)]
    count: usize,

    #[arg(long, default_value = "1:1")]
    aspect_ratio: AspectRatio,

    /// Only honoured on the pro tier
    #[arg(long, default_value = "1K")]
    size: ImageSize,

    #[arg(long, default_value = "none")]
    style: String,

    #[arg(long, default_value = "none")]
    angle: String,

    #[arg(long, default_value = "none")]
    theme: String,

    /// Rewrite the prompt with the text model before generating
    #[arg(long)]
    optimize: bool,

    #[arg(short, long)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<String>,
}

async fn load_files(paths: &[PathBuf]) -> Result<Vec<InputFile>, Box<dyn std::error::Error>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(InputFile::from_path(path).await?);
    }
    Ok(accept_images(files))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let base = if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::default().with_level(LogLevel::Info)
    };
    let mut logger_config = base.with_json_output(cli.log_json);
    if let Some(path) = cli.log_file.as_deref() {
        logger_config = logger_config.with_file_output(path);
    }
    logger::init_with_config(logger_config)?;
    logger::log_startup_info("adstudio", env!("CARGO_PKG_VERSION"));
    if !env_loaded {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = StudioConfig::from_env();
    logger::log_config_info(&config);

    let provider = Arc::new(GeminiClient::new(&config)?);
    let credentials = Arc::new(EnvCredentialGate::new(&config));
    let export_dir = config.export_dir.clone();
    let mut studio = StudioSession::new(config, provider, credentials);

    let products = load_files(&cli.products).await?;
    let backgrounds = load_files(&cli.backgrounds).await?;
    let kept = studio.slots_mut().add(products, Slot::Product);
    if kept < cli.products.len() {
        log::warn!("Using {} of {} product images", kept, cli.products.len());
    }
    let kept = studio.slots_mut().add(backgrounds, Slot::Background);
    if kept < cli.backgrounds.len() {
        log::warn!("Using {} of {} background images", kept, cli.backgrounds.len());
    }
    if let Some(path) = &cli.reference {
        let reference = InputFile::from_path(path).await?;
        studio.slots_mut().set_reference(Some(reference.into_payload()));
    }

    studio.set_prompt(cli.prompt);
    studio.select_style(&cli.style);
    studio.select_angle(&cli.angle);
    studio.select_theme(&cli.theme);
    studio.set_tier(cli.tier).await;
    {
        let settings = studio.settings_mut();
        settings.batch_count = cli.count;
        settings.aspect_ratio = cli.aspect_ratio;
        settings.image_size = cli.size;
    }

    if cli.optimize {
        let optimized = studio.optimize_prompt().await;
        log::info!("📝 Prompt: {}", optimized);
    }

    match studio.submit().await {
        Ok(entries) => {
            log::info!("✅ Generated {} of {} image(s)", entries.len(), cli.count);
            for path in export_batch(studio.current_batch(), &export_dir).await? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Err(e) if e.is_auth() => {
            log::error!("❌ Authentication failed (401/403). Select a valid API key and retry.");
            Err(e.into())
        }
        Err(e) => {
            log::error!("❌ Image generation failed: {}", e);
            Err(e.into())
        }
    }
}
