//! Card generator CLI.
//!
//! Renders card images from the template registry: single cards, JSON
//! batches, asset checks and template listings.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use card_common::{FieldName, TemplateRegistry};
use card_generator::{
    parse_jobs, GenerationRequest, GenerationService, Generator, OutputFormat, ServiceConfig,
};

#[derive(Parser, Debug)]
#[command(name = "card-generator")]
#[command(about = "Render card images from templates")]
struct Args {
    /// Template configuration file
    #[arg(short, long, env = "CARD_CONFIG", default_value = card_generator::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Root directory for relative asset paths (default: config file directory)
    #[arg(long, env = "CARD_ASSET_ROOT")]
    asset_root: Option<PathBuf>,

    /// Number of concurrent generation workers (default: number of CPU cores)
    #[arg(short, long, env = "CARD_WORKERS")]
    workers: Option<usize>,

    /// Fail at startup if any referenced asset is missing
    #[arg(long)]
    strict: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card to a file
    Generate {
        /// Template key
        #[arg(short, long)]
        template: String,

        /// Field value as NAME=TEXT (repeatable)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(FieldName, String)>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (png or jpeg)
        #[arg(long, default_value = "png")]
        format: OutputFormat,

        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,
    },

    /// Render every job in a JSON file concurrently
    Batch {
        /// JSON array of {"template", "fields", "format"?} objects
        #[arg(short, long)]
        jobs: PathBuf,

        /// Directory for the rendered cards
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Default output format (png or jpeg)
        #[arg(long, default_value = "png")]
        format: OutputFormat,
    },

    /// Verify that every referenced base image, overlay and font exists
    Check,

    /// List templates and their fields
    Templates,
}

fn parse_field(s: &str) -> Result<(FieldName, String), String> {
    let (name, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TEXT, got '{}'", s))?;
    Ok((name.parse()?, text.to_string()))
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    let defaults = ServiceConfig::default();
    let config = ServiceConfig {
        config_path: args.config.clone(),
        asset_root: args.asset_root.clone(),
        workers: args.workers.filter(|n| *n > 0).unwrap_or(defaults.workers),
    };

    let registry = config
        .load_registry()
        .with_context(|| format!("loading {}", config.config_path.display()))?;

    if let Command::Check = args.command {
        return check_assets(&registry);
    }

    if args.strict {
        check_assets(&registry).context("strict asset check failed")?;
    }

    if let Command::Templates = args.command {
        list_templates(&registry);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main(args.command, config, registry))
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn async_main(command: Command, config: ServiceConfig, registry: TemplateRegistry) -> Result<()> {
    let generator = Arc::new(Generator::new(Arc::new(registry)));
    let service = GenerationService::new(generator, config.workers);

    match command {
        Command::Generate {
            template,
            fields,
            output,
            format,
            quality,
        } => {
            let format = with_quality(format, quality);
            let request = fields
                .into_iter()
                .fold(GenerationRequest::new(template), |request, (field, text)| {
                    request.with(field, text)
                });

            let bytes = service.generate_with_format(request, format).await?;
            write_output(&output, &bytes)?;
            info!(path = %output.display(), size = bytes.len(), "Wrote card");
            Ok(())
        }
        Command::Batch {
            jobs,
            out_dir,
            format,
        } => run_batch(&service, &jobs, &out_dir, format).await,
        Command::Check | Command::Templates => Ok(()),
    }
}

fn with_quality(format: OutputFormat, quality: Option<u8>) -> OutputFormat {
    match (format, quality) {
        (OutputFormat::Jpeg { .. }, Some(quality)) => OutputFormat::Jpeg { quality },
        (format, _) => format,
    }
}

async fn run_batch(
    service: &GenerationService,
    jobs_path: &Path,
    out_dir: &Path,
    default_format: OutputFormat,
) -> Result<()> {
    let batch_id = Uuid::new_v4();
    let json = std::fs::read_to_string(jobs_path)
        .with_context(|| format!("reading {}", jobs_path.display()))?;
    let jobs = parse_jobs(&json).with_context(|| format!("parsing {}", jobs_path.display()))?;

    let mut requests = Vec::with_capacity(jobs.len());
    for (index, job) in jobs.into_iter().enumerate() {
        let (request, format) = job
            .into_request()
            .map_err(|e| anyhow::anyhow!("job {}: {}", index, e))?;
        requests.push((request, format.unwrap_or(default_format)));
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    info!(
        batch = %batch_id,
        jobs = requests.len(),
        workers = service.workers(),
        "Starting batch"
    );

    let names: Vec<String> = requests
        .iter()
        .enumerate()
        .map(|(index, (request, format))| {
            format!("{}-{}.{}", index, request.template, format.extension())
        })
        .collect();

    let results = service.generate_all(requests).await;

    let mut failed = 0;
    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(bytes) => write_output(&out_dir.join(name), &bytes)?,
            Err(e) => {
                error!(batch = %batch_id, job = %name, code = e.code(), error = %e, "Job failed");
                failed += 1;
            }
        }
    }

    info!(
        batch = %batch_id,
        succeeded = names.len() - failed,
        failed,
        "Batch complete"
    );

    if failed > 0 {
        bail!("{} of {} jobs failed", failed, names.len());
    }
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn check_assets(registry: &TemplateRegistry) -> Result<()> {
    let missing = registry.verify_assets();
    if missing.is_empty() {
        info!(templates = registry.len(), "All template assets present");
        return Ok(());
    }
    for asset in &missing {
        warn!("{}", asset);
    }
    bail!("{} referenced asset(s) missing", missing.len())
}

fn list_templates(registry: &TemplateRegistry) {
    for template in registry.templates() {
        let fields: Vec<&str> = template.fields.iter().map(|f| f.name.as_str()).collect();
        let overlay = match &template.overlay {
            Some(overlay) => overlay.path().display().to_string(),
            None => "-".to_string(),
        };
        println!(
            "{}\tbase={}\tfields={}\toverlay={}",
            template.key,
            template.base_image.display(),
            fields.join(","),
            overlay
        );
    }
}
