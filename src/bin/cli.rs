use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use mapgen::codec::to_json;
use mapgen::{MapConfig, MapGenerator, ViewMode, center_colors};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Генератор полигональных карт-островов
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию: встроенные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Путь для сохранения графа в проводной форме JSON
    #[arg(short, long, default_value = "map.json")]
    output: PathBuf,

    /// Переопределяет noiseSeed из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Режим раскраски полигонов для --palette
    #[arg(long, value_enum, default_value_t = ViewMode::Biomes)]
    view: ViewMode,

    /// Путь для сохранения цветов полигонов (JSON-массив RGB в порядке id)
    #[arg(long)]
    palette: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("mapgen=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "загрузка конфигурации");
            MapConfig::from_toml_file(path)
                .map_err(|e| anyhow!("не удалось прочитать {}: {e}", path.display()))?
        }
        None => MapConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.noise_seed = seed;
    }

    info!(
        width = config.width,
        height = config.height,
        points = config.num_points,
        seed = config.noise_seed,
        "генерация карты"
    );
    let map = MapGenerator::new(config)?.generate()?;

    let json = to_json(&map.graph).context("сериализация графа")?;
    fs::write(&cli.output, json)
        .with_context(|| format!("запись {}", cli.output.display()))?;
    info!(path = %cli.output.display(), "граф сохранён");

    if let Some(path) = &cli.palette {
        let colors = center_colors(&map.graph, cli.view);
        fs::write(path, serde_json::to_string(&colors)?)
            .with_context(|| format!("запись {}", path.display()))?;
        info!(path = %path.display(), mode = ?cli.view, "палитра сохранена");
    }

    Ok(())
}
