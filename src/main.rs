use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tgmusic::{AudioProber, BotClient, CachedTrack, ChatId, Config, Error, PlaybackNotifier, sec_to_min};

const USAGE: &str = "usage: tgmusic <media-file> [chat-id]";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tgmusic=debug,warn")),
        )
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .init();

    dotenv().ok();

    let mut args = env::args().skip(1);
    let Some(file_path) = args.next().map(PathBuf::from) else {
        error!("{}", USAGE);
        return Err(USAGE.into());
    };
    let chat_id = args.next().map(|arg| ChatId::from(arg.as_str()));

    let config = Config::from_env()?;
    let prober = AudioProber::from_config(&config);

    let name = file_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.display().to_string());
    let mut track = CachedTrack::new(
        file_path.display().to_string(),
        name,
        0,
        "console",
        "local",
    )
    .with_file_path(&file_path);

    prober.fill_duration(&mut track).await;
    info!(
        "{} is {}",
        track.name,
        sec_to_min(track.duration).unwrap_or_else(|| "of unknown length".to_string())
    );

    if let Some(chat_id) = chat_id {
        let client = BotClient::from_config(&config)?;
        let notifier = PlaybackNotifier::from_config(client, &config);
        notifier.send_logger(&chat_id, Some(&track)).await;
    }

    Ok(())
}
