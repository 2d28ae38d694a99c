use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use tri_raster::app::run_cli;
use tri_raster::io::config::Config;
use tri_raster::pipeline::shading::ShadingMode;

/// Renders a TOML scene description into an image.
#[derive(Parser, Debug)]
#[command(name = "tri-raster")]
#[command(about = "CPU triangle rasterizer with flat, Gouraud and Phong shading")]
struct Cli {
    /// Scene file (TOML). Without it the built-in demo scene is rendered.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output image; `.tga` is written as 24-bit TGA, other extensions via `image`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// flat, gouraud or phong
    #[arg(short, long)]
    shading: Option<ShadingMode>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,
}

impl Cli {
    fn into_config(self) -> tri_raster::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading scene: {path}");
                Config::load(path)?
            }
            None => {
                info!("No scene file given; using the built-in demo scene");
                Config::default()
            }
        };

        if let Some(output) = self.output {
            config.render.output = output;
        }
        if let Some(shading) = self.shading {
            config.render.shading = shading;
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_level(true)
        .init();

    let result = Cli::parse().into_config().and_then(|config| run_cli(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
