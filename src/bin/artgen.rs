//! CLI for artgen - text-to-image generation.

use artgen::{
    Dispatcher, GeneratedImage, GenerationFailure, GenerationRequest, GenerationResult,
    GenerationView, ImageFormat, ProviderKind,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "artgen")]
#[command(about = "Generate images from text via Pollinations or Hugging Face")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a text prompt
    Image(ImageArgs),

    /// List available providers
    Providers,
}

#[derive(Args)]
struct ImageArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Output file path
    #[arg(short, long, required_unless_present = "data_url")]
    output: Option<PathBuf>,

    /// Provider to use
    #[arg(short, long, value_enum, default_value = "pollinations")]
    provider: ProviderArg,

    /// Image width in pixels
    #[arg(long, default_value_t = artgen::image::DEFAULT_DIMENSION)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = artgen::image::DEFAULT_DIMENSION)]
    height: u32,

    /// Print the image as a base64 data URL instead of writing a file
    #[arg(long)]
    data_url: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Pollinations,
    #[value(name = "huggingface", alias = "hf")]
    HuggingFace,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Pollinations => ProviderKind::Pollinations,
            ProviderArg::HuggingFace => ProviderKind::HuggingFace,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env is fine; the environment may already carry HF_TOKEN.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("artgen=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Image(args) => generate_image(args, cli.json).await,
        Commands::Providers => {
            list_providers(cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn validate_image_args(args: &ImageArgs) -> anyhow::Result<()> {
    if args.timeout == 0 {
        anyhow::bail!("--timeout must be at least one second");
    }
    Ok(())
}

fn build_dispatcher(timeout: Duration) -> anyhow::Result<Dispatcher> {
    #[allow(unused_mut)]
    let mut builder = Dispatcher::builder();

    #[cfg(feature = "pollinations")]
    {
        builder = builder.pollinations(
            artgen::PollinationsProvider::builder()
                .timeout(timeout)
                .build()?,
        );
    }
    #[cfg(feature = "huggingface")]
    {
        builder = builder.huggingface(
            artgen::HuggingFaceProvider::builder()
                .timeout(timeout)
                .build()?,
        );
    }
    #[cfg(not(any(feature = "pollinations", feature = "huggingface")))]
    let _ = timeout;

    Ok(builder.build())
}

async fn generate_image(args: ImageArgs, json_output: bool) -> anyhow::Result<ExitCode> {
    validate_image_args(&args)?;

    let dispatcher = build_dispatcher(Duration::from_secs(args.timeout))?;
    let request = GenerationRequest::new(&args.prompt, args.provider.into())
        .with_size(args.width, args.height);

    let mut view = TerminalView::new(args.output.clone(), args.data_url, json_output);
    let Some(result) = dispatcher.submit(&request, &mut view).await else {
        return Ok(ExitCode::FAILURE);
    };

    if let Some(err) = view.save_error.take() {
        return Err(err.into());
    }

    if json_output {
        let summary = match &result {
            GenerationResult::Success(image) => serde_json::json!({
                "type": "image",
                "success": true,
                "output": view.location(),
                "data_url": view.data_url.as_deref(),
                "size_bytes": image.size(),
                "mime": image.mime_type(),
                "provider": image.provider.to_string(),
                "model": image.metadata.model,
                "duration_ms": image.metadata.duration_ms,
            }),
            GenerationResult::Failure(failure) => serde_json::json!({
                "type": "image",
                "success": false,
                "provider": request.provider.to_string(),
                "kind": failure.kind,
                "message": failure.message,
                "hint": failure.hint.map(|h| h.tip()),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Renders a submission to the terminal: progress and errors on stderr,
/// the image to a file (or a data URL on stdout).
///
/// In quiet (JSON) mode nothing but the summary may reach stdout, so a data
/// URL is kept for the summary instead of being printed.
struct TerminalView {
    output: Option<PathBuf>,
    want_data_url: bool,
    quiet: bool,
    saved_to: Option<PathBuf>,
    data_url: Option<String>,
    save_error: Option<artgen::GenArtError>,
}

impl TerminalView {
    fn new(output: Option<PathBuf>, want_data_url: bool, quiet: bool) -> Self {
        Self {
            output,
            want_data_url,
            quiet,
            saved_to: None,
            data_url: None,
            save_error: None,
        }
    }

    /// Where the image ended up, as a locally-addressable URL.
    fn location(&self) -> Option<String> {
        self.saved_to.as_deref().map(file_url)
    }
}

impl GenerationView for TerminalView {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn set_busy(&mut self, busy: bool) {
        // A terminal has no button to disable; `submit` already holds `&mut self`.
        tracing::debug!(busy, "submit control state changed");
    }

    fn show_loading(&mut self, provider: ProviderKind) {
        if !self.quiet {
            eprintln!(
                "Generating with {}... This may take {}",
                provider.display_name(),
                provider.typical_wait()
            );
        }
    }

    fn show_image(&mut self, image: &GeneratedImage) {
        if self.want_data_url {
            let url = image.to_data_url();
            if self.quiet {
                self.data_url = Some(url);
            } else {
                println!("{url}");
            }
            return;
        }

        let Some(path) = self.output.clone() else {
            return;
        };
        if let Some((declared, actual)) = extension_mismatch(&path, image) {
            tracing::warn!(
                path = %path.display(),
                "file extension says {} but the image is {}",
                declared.extension(),
                actual.extension()
            );
        }
        if let Err(err) = image.save(&path) {
            self.save_error = Some(err);
            return;
        }

        if !self.quiet {
            println!(
                "Generated image: {} ({} bytes, {}) via {}",
                path.display(),
                image.size(),
                image.mime_type(),
                image.provider
            );
            println!("View at: {}", file_url(&path));
            if let Some(duration) = image.metadata.duration_ms {
                println!("Duration: {}ms", duration);
            }
        }
        self.saved_to = Some(path);
    }

    fn show_error(&mut self, failure: &GenerationFailure) {
        if self.quiet {
            return;
        }
        eprintln!("✗ {}", failure.message);
        if let Some(hint) = failure.hint {
            eprintln!("  Tip: {hint}");
        }
    }
}

/// Returns the format implied by `path` and the image's actual format, when they differ.
fn extension_mismatch(path: &Path, image: &GeneratedImage) -> Option<(ImageFormat, ImageFormat)> {
    let declared = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)?;
    let actual = image.detected_format().unwrap_or(image.format);
    (declared != actual).then_some((declared, actual))
}

fn file_url(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

fn list_providers(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct ProviderInfo {
        name: &'static str,
        kind: String,
        env_var: Option<&'static str>,
        configured: bool,
        enabled: bool,
    }

    let providers: Vec<ProviderInfo> = ProviderKind::ALL
        .into_iter()
        .map(|kind| {
            let env_var = kind.credential_env_var();
            ProviderInfo {
                name: kind.display_name(),
                kind: kind.to_string(),
                env_var,
                configured: env_var.map_or(true, |var| {
                    std::env::var(var).is_ok_and(|v| !v.trim().is_empty())
                }),
                enabled: match kind {
                    ProviderKind::Pollinations => cfg!(feature = "pollinations"),
                    ProviderKind::HuggingFace => cfg!(feature = "huggingface"),
                },
            }
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&providers)?);
    } else {
        println!("Available providers:\n");
        for p in &providers {
            let status = if p.enabled { "✓" } else { "✗" };
            println!("  {} {} ({})", status, p.name, p.kind);
            match p.env_var {
                Some(var) if p.configured => println!("    API key: {var} (set)"),
                Some(var) => println!("    API key: {var} (not set)"),
                None => println!("    API key: none required"),
            }
        }
    }

    Ok(())
}
