//! Main entry point for the streamsift CLI

use clap::Parser;
use streamsift::cli::args::{Args, VerbosityLevel};
use streamsift::cli::output::OutputFormatter;
use streamsift::core::extract;
use streamsift::error::SiftError;
use streamsift::platform::metadata::MetadataClient;
use streamsift::platform::player::source_for;
use streamsift::utils::url::extract_video_id;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbosity_level())?;
    info!("Starting streamsift with args: {:?}", args);

    let mut formatter = OutputFormatter::new(args.verbosity_level());

    match run(&args, &mut formatter).await {
        Ok(()) => Ok(()),
        Err(SiftError::AccessDenied { status, payload }) => {
            formatter.error(&format!("Access denied by provider: {}", status));
            // The provider's verdict document goes to stdout unchanged
            match serde_json::to_string_pretty(&payload) {
                Ok(document) => println!("{}", document),
                Err(_) => println!("{}", payload),
            }
            std::process::exit(1)
        }
        Err(error) => {
            if error.needs_pattern_update() {
                formatter.warning("Player layout changed; the decipher patterns need an update");
            }
            Err(error.into())
        }
    }
}

/// Run the requested reports in order
async fn run(args: &Args, formatter: &mut OutputFormatter) -> Result<(), SiftError> {
    if let Some(input) = &args.input {
        report_stream_inventory(input, args, formatter).await?;
    }

    if let Some(script_ref) = &args.player_js {
        report_decipher_program(script_ref, args, formatter).await?;
    }

    Ok(())
}

/// Fetch metadata for a video and print its stream inventory
async fn report_stream_inventory(
    input: &str,
    args: &Args,
    formatter: &mut OutputFormatter,
) -> Result<(), SiftError> {
    let video_id = extract_video_id(input)?;
    debug!("Resolved video id: {}", video_id);

    let mut client = MetadataClient::with_config(args.http_config());
    if let Some(base) = &args.api_base {
        client = client.with_base_url(base);
    }

    formatter.start_spinner(&format!("Fetching metadata for {}...", video_id));
    let result = client.fetch_streams(&video_id).await;
    formatter.finish_spinner();
    let inventory = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inventory)?);
    } else {
        formatter.print_inventory(&inventory);
        formatter.success(&format!(
            "{} streams ({} playable, {} ciphered)",
            inventory.stream_count(),
            inventory.playable().count(),
            inventory.ciphered().count()
        ));
    }

    Ok(())
}

/// Acquire a player script and print its decipher program
async fn report_decipher_program(
    script_ref: &str,
    args: &Args,
    formatter: &mut OutputFormatter,
) -> Result<(), SiftError> {
    let source = source_for(script_ref, args.http_config());
    let location = source.location();

    formatter.start_spinner(&format!("Fetching player script from {}...", location));
    let result = source.script_text().await;
    formatter.finish_spinner();
    let script = result?;
    debug!("Player script is {} bytes", script.len());

    let program = extract(&script)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&program)?);
    } else {
        formatter.print_program(&location, &program);
        formatter.success(&format!(
            "Transform table `{}` recovered",
            program.transform_table_name
        ));
    }

    Ok(())
}

/// Initialize the tracing subscriber
fn init_logging(verbosity: VerbosityLevel) -> anyhow::Result<()> {
    let fallback = match verbosity {
        VerbosityLevel::Quiet => "error",
        VerbosityLevel::Normal => "warn",
        VerbosityLevel::Verbose => "debug",
    };

    // RUST_LOG wins when set, the verbosity flags only pick the fallback
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();

    Ok(())
}
