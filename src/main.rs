use clap::{Parser, Subcommand};
use image_converter::analysis::{UseCase, quality_preset};
use image_converter::config::{self, ConverterConfig};
use image_converter::format::TargetFormat;
use image_converter::imaging::RustBackend;
use image_converter::output;
use image_converter::tools::{
    self, BatchArgs, ConvertArgs, ImageArgs, OPERATIONS, PredictArgs, ToolCall, ToolResponse,
    WebArgs,
};
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-converter")]
#[command(about = "Convert, analyze and batch-process raster images")]
#[command(long_about = "\
Convert, analyze and batch-process raster images

Targets: png, jpg, jpeg, ico, webp, avif, tiff, bmp.
Encoder settings follow a fixed policy per format; --optimize picks the
higher-effort branch. A bmp target is written as PNG.

Operations can also be driven by name with JSON arguments:

  image-converter call analyze_image '{\"imagePath\": \"photo.jpg\"}'
  echo '{\"name\": \"get_image_info\", \"arguments\": {\"imagePath\": \"a.png\"}}' \\
    | image-converter serve

Run 'image-converter gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file overriding the stock defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Parallel batch workers (overrides [processing] max_processes)
    #[arg(long, global = true)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one image
    Convert(ConvertArgs),
    /// Convert every matching image in a directory
    Batch(BatchArgs),
    /// Show image metadata
    Info(ImageArgs),
    /// Recommend formats, compression and resizing
    Analyze(ImageArgs),
    /// Estimate the converted file size
    Predict(PredictArgs),
    /// Choose a web format and size, then convert
    OptimizeWeb(WebArgs),
    /// Show suggested encoder settings for a format
    Preset {
        format: String,
        #[arg(long, value_enum, default_value_t = UseCase::Web)]
        use_case: UseCase,
    },
    /// Run an operation by name with JSON arguments
    Call {
        operation: String,
        /// JSON object with camelCase keys
        #[arg(default_value = "{}")]
        args: String,
    },
    /// Answer JSON requests from stdin, one per line
    Serve,
    /// List operation names
    Operations,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// One `serve` request line.
#[derive(Deserialize)]
struct Request {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut converter_config = config::load_config(cli.config.as_deref())?;
    if let Some(jobs) = cli.jobs {
        converter_config.processing.max_processes = Some(jobs.max(1));
    }
    let backend = RustBackend::new();

    let call = match cli.command {
        Command::Convert(args) => ToolCall::ConvertImage(args),
        Command::Batch(args) => ToolCall::BatchConvertImages(args),
        Command::Info(args) => ToolCall::GetImageInfo(args),
        Command::Analyze(args) => ToolCall::AnalyzeImage(args),
        Command::Predict(args) => ToolCall::PredictFileSize(args),
        Command::OptimizeWeb(args) => ToolCall::OptimizeForWeb(args),
        Command::Call { operation, args } => {
            let args: serde_json::Value = serde_json::from_str(&args)?;
            let response = tools::call_tool(&backend, &converter_config, &operation, args);
            return Ok(finish(&response));
        }
        Command::Preset { format, use_case } => {
            let format: TargetFormat = format.parse()?;
            let preset = quality_preset(format, use_case);
            for line in output::format_quality_preset(format, use_case, &preset) {
                println!("{line}");
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Serve => {
            serve(&backend, &converter_config)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Operations => {
            for op in OPERATIONS {
                println!("{:<22} {}", op.name, op.description);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(ExitCode::SUCCESS);
        }
    };

    let response = tools::respond(tools::execute(&backend, &converter_config, &call));
    Ok(finish(&response))
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn finish(response: &ToolResponse) -> ExitCode {
    println!("{}", response.text);
    if response.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn serve(backend: &RustBackend, config: &ConverterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(req) => tools::call_tool(backend, config, &req.name, req.arguments),
            Err(e) => ToolResponse {
                text: format!("{}Invalid request: {e}", tools::ERROR_MARKER),
                is_error: true,
            },
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}
