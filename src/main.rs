use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, time::Duration};
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod media;
mod runner;
mod utils;

use config::{Config, LogFormat};
use media::{MediaType, Orientation, PexelsClient};
use runner::{QueryRunner, RunConfig, DEFAULT_REQUEST_DELAY};

/// Search Pexels and download matching photos or videos.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search query, text file of queries, or '-' for stdin
    input: String,

    /// Type of media to download
    #[arg(short = 't', long, value_enum, default_value = "videos")]
    media_type: MediaType,

    /// Quality (hd/uhd/sd for videos, any size label for images)
    #[arg(short, long, default_value = "hd")]
    quality: String,

    /// Media orientation
    #[arg(short, long, value_enum, default_value = "landscape")]
    orientation: Orientation,

    /// Number of items to download per query
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    number: u32,

    /// Output directory
    #[arg(short = 'd', long, default_value = "downloads")]
    output: PathBuf,

    /// Seconds to wait after each download [default: 18]
    #[arg(long)]
    delay: Option<u64>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn get_config_path(args: &Args) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = PathBuf::from(xdg_config_home).join("pexgrab/config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".config/pexgrab/config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

async fn run(args: Args, config: Config) -> Result<()> {
    let api_key = std::env::var("PEXELS_API_KEY").ok();

    let request_delay = args
        .delay
        .map(Duration::from_secs)
        .or_else(|| config.request_delay())
        .unwrap_or(DEFAULT_REQUEST_DELAY);

    let client = match config.base_url() {
        Some(base_url) => PexelsClient::with_base_url(api_key, base_url),
        None => PexelsClient::new(api_key),
    };
    let runner = QueryRunner::new(
        Box::new(client),
        RunConfig {
            media_type: args.media_type,
            quality: args.quality,
            orientation: args.orientation,
            number: args.number as usize,
            output: args.output,
            request_delay,
        },
    );

    let queries = runner::resolve_queries(&args.input).await?;
    runner.run(&queries).await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // A missing .env is fine; the key may already be exported.
    let _ = dotenvy::dotenv();

    let config_path = get_config_path(&args);
    let config = match &config_path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    };

    let log_format = config
        .as_ref()
        .map(Config::logging_format)
        .unwrap_or_default();
    init_logging(log_format);

    let config = match config {
        Ok(config) => {
            if let Some(path) = &config_path {
                info!("Loaded config from: {}", path.display());
            }
            config
        }
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let outcome = run(args, config).await;
    if let Err(e) = outcome {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pexgrab", "sunset"]).unwrap();
        assert_eq!(args.input, "sunset");
        assert_eq!(args.media_type, MediaType::Videos);
        assert_eq!(args.quality, "hd");
        assert_eq!(args.orientation, Orientation::Landscape);
        assert_eq!(args.number, 2);
        assert_eq!(args.output, PathBuf::from("downloads"));
        assert_eq!(args.delay, None);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "pexgrab", "-", "-t", "images", "-q", "large", "-o", "square", "-n", "5", "-d", "out",
        ])
        .unwrap();
        assert_eq!(args.input, "-");
        assert_eq!(args.media_type, MediaType::Images);
        assert_eq!(args.quality, "large");
        assert_eq!(args.orientation, Orientation::Square);
        assert_eq!(args.number, 5);
        assert_eq!(args.output, PathBuf::from("out"));
    }

    #[test]
    fn test_rejects_unknown_choices() {
        assert!(Args::try_parse_from(["pexgrab", "x", "-t", "gifs"]).is_err());
        assert!(Args::try_parse_from(["pexgrab", "x", "-o", "diagonal"]).is_err());
        assert!(Args::try_parse_from(["pexgrab", "x", "-n", "0"]).is_err());
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = Args::try_parse_from(["pexgrab", "x", "--config", "my.toml"]).unwrap();
        assert_eq!(get_config_path(&args), Some(PathBuf::from("my.toml")));
    }
}
