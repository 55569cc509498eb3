use anyhow::{bail, Context};
use std::path::PathBuf;
use std::sync::Arc;

use artifact_uploader::config::{get_default_config_path, load_config};
use artifact_uploader::{collect_directory_assets, LogReporter, ReceiverClient, UploadOrchestrator};

const USAGE: &str = "Usage: artifact-uploader [CONFIG] <OUTPUT_DIR>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, output_dir) = match args.as_slice() {
        [output_dir] => (get_default_config_path()?, PathBuf::from(output_dir)),
        [config, output_dir] => (PathBuf::from(config), PathBuf::from(output_dir)),
        _ => bail!(USAGE),
    };

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let client = ReceiverClient::from_config(&config)?;

    let entries = collect_directory_assets(&output_dir)
        .await
        .with_context(|| format!("Failed to read build output {}", output_dir.display()))?;

    log::info!(
        "Uploading from {} to {} ({} candidate files)",
        output_dir.display(),
        config.receiver,
        entries.len()
    );

    let orchestrator =
        UploadOrchestrator::new(config, Arc::new(client))?.with_reporter(Arc::new(LogReporter));
    let result = orchestrator.run(entries).await;

    println!(
        "Uploaded {}/{} files in {}ms ({} attempts)",
        result.succeeded,
        result.total,
        result.elapsed.as_millis(),
        result.attempts
    );
    for filename in &result.failed {
        println!("FAILED {}", filename);
    }

    Ok(())
}
