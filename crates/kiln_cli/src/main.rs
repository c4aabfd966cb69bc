mod output;
mod scenes;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kiln_core::load_image;
use kiln_renderer::{render, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenes::SceneName;

#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Offline path tracer")]
struct Args {
    #[arg(long, value_enum, default_value_t)]
    /// Scene to render
    scene: SceneName,

    #[arg(long)]
    /// JSON render settings; flags below override its fields
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    /// Samples per pixel
    spp: Option<u32>,

    #[arg(long)]
    max_depth: Option<u32>,

    #[arg(long)]
    /// Row bands rendered in parallel (defaults to the core count)
    threads: Option<usize>,

    #[arg(long)]
    /// Seed for scene generation and sampling
    seed: Option<u64>,

    #[arg(long)]
    /// Image used by the earth and final scenes
    texture: Option<PathBuf>,

    #[arg(short, long, default_value = "out.ppm")]
    /// Output file; `.ppm` is written as plain text, other extensions go
    /// through the image encoders
    output: PathBuf,
}

fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => RenderConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(spp) = args.spp {
        config.samples_per_pixel = spp;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    log::debug!("{config:?}");

    let texture = match &args.texture {
        Some(path) => Some(Arc::new(load_image(path)?)),
        None => None,
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let setup = scenes::build(args.scene, config.aspect_ratio(), texture, &mut rng)?;

    let image = render(&setup.camera, &setup.scene, &config)?;
    output::save(&image, &args.output)?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("kiln-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "width": 64, "height": 32, "samples_per_pixel": 4 }"#).unwrap();

        let args = Args::parse_from([
            "kiln",
            "--config",
            path.to_str().unwrap(),
            "--spp",
            "9",
            "--seed",
            "3",
        ]);
        let config = load_config(&args).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((config.width, config.height), (64, 32));
        assert_eq!(config.samples_per_pixel, 9);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.seed, Some(3));
        assert_eq!(args.scene, SceneName::CornellBox);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args::parse_from(["kiln", "--width", "0"]);
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_scene_names_parse_kebab_case() {
        let args = Args::parse_from(["kiln", "--scene", "two-perlin-spheres", "-o", "a.png"]);
        assert_eq!(args.scene, SceneName::TwoPerlinSpheres);
        assert_eq!(args.output, PathBuf::from("a.png"));
    }
}
