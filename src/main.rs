use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lane_centerline::capture::{FrameSource, SourceSpec};
use lane_centerline::config::Config;
use lane_centerline::Pipeline;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lane_centerline=info")),
        )
        .init();

    let config = Config::parse();
    if let Err(e) = run(&config) {
        error!("Quitting the program: {:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(config: &Config) -> Result<()> {
    let spec = match &config.video {
        Some(path) => SourceSpec::File(path.clone()),
        None => SourceSpec::Camera(config.camera),
    };

    // 캡처 장치는 여기서 열고 루프가 끝나면 여기서 해제
    let mut source = FrameSource::open(spec)?;
    let pipeline = Pipeline::new(config);
    info!(policy = ?config.policy(), visible = config.visible(), "starting detection");

    let reason = pipeline.start_detection(&mut source)?;
    source.release()?;
    info!(?reason, "stopped");
    Ok(())
}
