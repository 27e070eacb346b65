use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aperture_runtime::Driver;

mod app;
mod gpu;
mod overlay;
mod platform;

#[derive(Parser)]
#[command(name = "aperture-desktop", about = "Interactive real-time rendering host")]
struct Cli {
    /// Window title
    #[arg(long, default_value = "Aperture")]
    title: String,

    /// Window width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const SCENE_SHADER_PATH: &str = "assets/shaders/scene.wgsl";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("aperture-desktop starting");

    let platform = platform::DesktopPlatform::new(&cli.title, cli.width, cli.height)?;
    let app = app::HostApp::new(&platform, SCENE_SHADER_PATH)?;

    let mut driver = Driver::new(platform, app);
    driver.run();

    Ok(())
}
