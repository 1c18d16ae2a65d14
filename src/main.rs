use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forum_image_exif::config::AppConfig;
use forum_image_exif::error::AppError;
use forum_image_exif::{decode_legacy_blob, render_post, web_server, AttachmentSource, DirectoryStore, Renderer};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about = "Render photo metadata for forum attachments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve attachment fragments over HTTP (default)
    Serve,
    /// Print the fragment for one post
    Render {
        post_id: u64,
    },
    /// Print the fragment for a legacy attachment blob file
    RenderBlob {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new()?;

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .build_global()
        .map_err(|e| AppError::Generic(e.to_string()))?;

    let renderer = Renderer::new();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting forum-image-exif");
            let store = DirectoryStore::new(&config)?;
            let media_directory = store.media_directory().to_path_buf();
            let source: Arc<dyn AttachmentSource> = Arc::new(store);

            if let Err(e) = web_server::start_web_server(config.web_port, source, renderer, media_directory).await {
                log::error!("Web server error: {}", e);
            }
            info!("forum-image-exif finished");
        }
        Command::Render { post_id } => {
            let store = DirectoryStore::new(&config)?;
            print!("{}", render_post(&store, &renderer, post_id));
        }
        Command::RenderBlob { file } => {
            let blob = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let records = decode_legacy_blob(&blob)
                .with_context(|| format!("decoding {}", file.display()))?;
            print!("{}", renderer.render(&records));
        }
    }

    Ok(())
}
