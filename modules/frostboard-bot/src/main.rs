use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use discord_client::DiscordClient;
use frostboard_bot::intake::{DiscordIntake, FileIntake};
use frostboard_bot::ledger::ImageLedger;
use frostboard_bot::nickname::NicknameResolver;
use frostboard_bot::pin::PinStore;
use frostboard_bot::traits::{DiscordSummaryChannel, GoogleSheetProvider, UploadIntake};
use frostboard_bot::transcript::Transcript;
use frostboard_bot::upload::{UploadError, UploadPipeline};
use frostboard_common::{Config, EventType};
use frostboard_ocr::OcrClient;
use sheets_client::SheetsClient;

#[derive(Parser)]
#[command(name = "frostboard", about = "Screenshot-to-leaderboard reconciliation bot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one leaderboard upload for an event.
    Upload {
        /// Event, by label or slug: "Bear Trap 1", "bear-trap-1", "svs", ...
        #[arg(long)]
        event: EventType,

        /// Screenshot files. When omitted, waits for an upload in the
        /// Discord leaderboard channel instead.
        images: Vec<PathBuf>,

        /// Name recorded in the OCR transcript.
        #[arg(long, default_value = "operator")]
        caller: String,

        /// Discord user id whose upload answers the prompt; anyone's
        /// when omitted.
        #[arg(long)]
        uploader: Option<String>,
    },

    /// List the known event types.
    Events,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("frostboard_bot=info".parse()?))
        .init();

    match Cli::parse().command {
        Command::Events => {
            for event in EventType::ALL {
                println!("{}", event.label());
            }
            Ok(())
        }
        Command::Upload {
            event,
            images,
            caller,
            uploader,
        } => run_upload(event, images, &caller, uploader).await,
    }
}

async fn run_upload(
    event: EventType,
    images: Vec<PathBuf>,
    caller: &str,
    uploader: Option<String>,
) -> Result<()> {
    let config = Config::from_env();

    let discord = DiscordClient::new(config.discord_token.clone());
    let recognizer = match &config.ocr_api_url {
        Some(url) => OcrClient::with_base_url(config.ocr_api_key.clone(), url.clone()),
        None => OcrClient::new(config.ocr_api_key.clone()),
    };
    let sheets = SheetsClient::new(config.sheets_token.clone());

    let mut pipeline = UploadPipeline::new(
        Arc::new(recognizer),
        Arc::new(GoogleSheetProvider::new(sheets, config.spreadsheet_id.clone())),
        Arc::new(DiscordSummaryChannel::new(
            discord.clone(),
            config.leaderboard_channel_id.clone(),
        )),
        NicknameResolver::load(&config.data_dir.join("nicknames.json"))?,
        ImageLedger::load(&config.data_dir.join("processed-images.json"))?,
        Transcript::new(&config.data_dir.join("ocr-transcript.log")),
        PinStore::load(&config.data_dir.join("pinned-messages.json"))?,
        Some(config.clan_tag.clone()),
    );

    let intake: Box<dyn UploadIntake> = if images.is_empty() {
        info!(
            timeout_secs = config.upload_timeout_secs,
            "Waiting for a screenshot upload in the leaderboard channel"
        );
        Box::new(DiscordIntake::new(
            discord,
            config.leaderboard_channel_id.clone(),
            uploader,
        ))
    } else {
        Box::new(FileIntake::new(images))
    };
    let wait = intake
        .await_upload(Duration::from_secs(config.upload_timeout_secs))
        .await?;

    match pipeline.run(event, caller, wait).await {
        Ok(report) => {
            println!("{report}");
            Ok(())
        }
        // Terminal-but-benign outcomes: report and exit cleanly.
        Err(
            err @ (UploadError::TimedOut
            | UploadError::NoImages
            | UploadError::NoLines
            | UploadError::NoEntries),
        ) => {
            println!("{err}");
            Ok(())
        }
        Err(UploadError::Transport(err)) => Err(err),
    }
}
