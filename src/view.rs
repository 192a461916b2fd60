//! Режимы отображения для растеризатора
//!
//! Крейт не рисует пиксели: он отдаёт цвет каждого полигона, а заливку
//! выполняет внешний рендерер.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::graph::{Center, MapGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Классические цвета биомов
    #[default]
    Biomes,
    /// Оттенки серого по высоте, вода синяя
    Elevation,
    /// От сухого коричневого к влажному синему
    Moisture,
    /// Цвет биома, осветлённый с высотой
    Stylized,
}

const WATER: [u8; 3] = [0x44, 0x44, 0x7a];
const DRY: [u8; 3] = [0xbe, 0x9b, 0x6e];
const WET: [u8; 3] = [0x3c, 0x6e, 0xb4];
const PEAK: [u8; 3] = [0xff, 0xff, 0xff];

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let channel = |i: usize| (f32::from(a[i]) + (f32::from(b[i]) - f32::from(a[i])) * t).round() as u8;
    [channel(0), channel(1), channel(2)]
}

fn center_color(center: &Center, mode: ViewMode) -> [u8; 3] {
    let biome = center.biome.map_or(WATER, |b| b.to_rgb());
    match mode {
        ViewMode::Biomes => biome,
        ViewMode::Elevation if center.water => WATER,
        ViewMode::Elevation => {
            let v = (center.elevation * 255.0).round() as u8;
            [v, v, v]
        }
        ViewMode::Moisture => mix(DRY, WET, center.moisture),
        ViewMode::Stylized if center.water => biome,
        ViewMode::Stylized => mix(biome, PEAK, 0.35 * center.elevation),
    }
}

/// Цвет каждого полигона в порядке id
#[must_use]
pub fn center_colors(graph: &MapGraph, mode: ViewMode) -> Vec<[u8; 3]> {
    graph.centers.iter().map(|c| center_color(c, mode)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::graph::{CenterId, Point};

    fn center(biome: Biome, water: bool, elevation: f32, moisture: f32) -> Center {
        let mut c = Center::new(CenterId(0), Point::new(0.0, 0.0));
        c.biome = Some(biome);
        c.water = water;
        c.elevation = elevation;
        c.moisture = moisture;
        c
    }

    #[test]
    fn biome_mode_uses_biome_palette() {
        let c = center(Biome::Grassland, false, 0.4, 0.5);
        assert_eq!(center_color(&c, ViewMode::Biomes), Biome::Grassland.to_rgb());
    }

    #[test]
    fn elevation_mode_is_grayscale_on_land() {
        let c = center(Biome::Snow, false, 1.0, 0.5);
        assert_eq!(center_color(&c, ViewMode::Elevation), [255, 255, 255]);
        let sea = center(Biome::Ocean, true, 0.0, 1.0);
        assert_eq!(center_color(&sea, ViewMode::Elevation), WATER);
    }

    #[test]
    fn moisture_mode_spans_dry_to_wet() {
        assert_eq!(center_color(&center(Biome::Bare, false, 0.5, 0.0), ViewMode::Moisture), DRY);
        assert_eq!(center_color(&center(Biome::Bare, false, 0.5, 1.0), ViewMode::Moisture), WET);
    }

    #[test]
    fn stylized_mode_lightens_with_height() {
        let low = center_color(&center(Biome::Grassland, false, 0.0, 0.5), ViewMode::Stylized);
        let high = center_color(&center(Biome::Grassland, false, 1.0, 0.5), ViewMode::Stylized);
        assert_eq!(low, Biome::Grassland.to_rgb());
        assert!(high.iter().zip(low).all(|(&h, l)| h >= l));
    }

    #[test]
    fn view_mode_parses_from_lowercase() {
        let mode: ViewMode = serde_json::from_str("\"stylized\"").unwrap();
        assert_eq!(mode, ViewMode::Stylized);
        assert_eq!(ViewMode::from_str("moisture", true), Ok(ViewMode::Moisture));
    }
}
