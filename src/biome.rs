//! Биомы и таблица их назначения
//!
//! Биом определяется флагами воды, затем полосой высоты, затем полосой влажности.
//! Таблица задаётся конфигурацией; [`BiomeTable::validate`]
//! гарантирует, что любая достижимая комбинация получает ровно один биом.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Lake,
    Marsh,
    Ice,
    Beach,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    TemperateDesert,
    TemperateRainForest,
    TemperateDeciduousForest,
    Grassland,
    SubtropicalDesert,
    TropicalRainForest,
    TropicalSeasonalForest,
}

impl Biome {
    pub const ALL: [Biome; 18] = [
        Biome::Ocean,
        Biome::Lake,
        Biome::Marsh,
        Biome::Ice,
        Biome::Beach,
        Biome::Snow,
        Biome::Tundra,
        Biome::Bare,
        Biome::Scorched,
        Biome::Taiga,
        Biome::Shrubland,
        Biome::TemperateDesert,
        Biome::TemperateRainForest,
        Biome::TemperateDeciduousForest,
        Biome::Grassland,
        Biome::SubtropicalDesert,
        Biome::TropicalRainForest,
        Biome::TropicalSeasonalForest,
    ];

    #[must_use]
    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            Biome::Ocean => [0x44, 0x44, 0x7a],
            Biome::Lake => [0x33, 0x66, 0x99],
            Biome::Marsh => [0x2f, 0x66, 0x66],
            Biome::Ice => [0x99, 0xff, 0xff],
            Biome::Beach => [0xa0, 0x90, 0x77],
            Biome::Snow => [0xff, 0xff, 0xff],
            Biome::Tundra => [0xbb, 0xbb, 0xaa],
            Biome::Bare => [0x88, 0x88, 0x88],
            Biome::Scorched => [0x55, 0x55, 0x55],
            Biome::Taiga => [0x99, 0xaa, 0x77],
            Biome::Shrubland => [0x88, 0x99, 0x77],
            Biome::TemperateDesert => [0xc9, 0xd2, 0x9b],
            Biome::TemperateRainForest => [0x44, 0x88, 0x55],
            Biome::TemperateDeciduousForest => [0x67, 0x94, 0x59],
            Biome::Grassland => [0x88, 0xaa, 0x55],
            Biome::SubtropicalDesert => [0xd2, 0xb9, 0x8b],
            Biome::TropicalRainForest => [0x33, 0x77, 0x55],
            Biome::TropicalSeasonalForest => [0x55, 0x99, 0x44],
        }
    }

    /// Водный биом (океан, озеро, болото, лёд на озере)
    #[must_use]
    pub fn is_water(self) -> bool {
        matches!(self, Biome::Ocean | Biome::Lake | Biome::Marsh | Biome::Ice)
    }
}

/// Биомы для водных полигонов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterBiomes {
    pub ocean: Biome,
    pub lake: Biome,
    /// Озеро ниже этой высоты считается болотом
    pub marsh_below: f32,
    pub marsh: Biome,
    /// Озеро выше этой высоты замерзает
    pub ice_above: f32,
    pub ice: Biome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoistureBand {
    pub min_moisture: f32,
    pub biome: Biome,
}

/// Полоса высоты со своей шкалой влажности (по убыванию `min_moisture`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationBand {
    pub min_elevation: f32,
    pub moisture: Vec<MoistureBand>,
}

/// Таблица назначения биомов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomeTable {
    pub water: WaterBiomes,
    /// Биом для прибрежной суши
    pub coast: Biome,
    /// Полосы высоты по убыванию `min_elevation`, последняя начинается с 0
    pub bands: Vec<ElevationBand>,
}

fn band(min_elevation: f32, moisture: &[(f32, Biome)]) -> ElevationBand {
    ElevationBand {
        min_elevation,
        moisture: moisture
            .iter()
            .map(|&(min_moisture, biome)| MoistureBand {
                min_moisture,
                biome,
            })
            .collect(),
    }
}

impl Default for BiomeTable {
    fn default() -> Self {
        Self {
            water: WaterBiomes {
                ocean: Biome::Ocean,
                lake: Biome::Lake,
                marsh_below: 0.1,
                marsh: Biome::Marsh,
                ice_above: 0.8,
                ice: Biome::Ice,
            },
            coast: Biome::Beach,
            bands: vec![
                band(
                    0.8,
                    &[
                        (0.5, Biome::Snow),
                        (0.33, Biome::Tundra),
                        (0.16, Biome::Bare),
                        (0.0, Biome::Scorched),
                    ],
                ),
                band(
                    0.6,
                    &[
                        (0.66, Biome::Taiga),
                        (0.33, Biome::Shrubland),
                        (0.0, Biome::TemperateDesert),
                    ],
                ),
                band(
                    0.3,
                    &[
                        (0.83, Biome::TemperateRainForest),
                        (0.5, Biome::TemperateDeciduousForest),
                        (0.16, Biome::Grassland),
                        (0.0, Biome::TemperateDesert),
                    ],
                ),
                band(
                    0.0,
                    &[
                        (0.66, Biome::TropicalRainForest),
                        (0.33, Biome::TropicalSeasonalForest),
                        (0.16, Biome::Grassland),
                        (0.0, Biome::SubtropicalDesert),
                    ],
                ),
            ],
        }
    }
}

impl BiomeTable {
    /// Проверяет полноту таблицы: полосы упорядочены и покрывают [0, 1]
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.water;
        if !(0.0..=1.0).contains(&w.marsh_below) || !(0.0..=1.0).contains(&w.ice_above) {
            return Err("water biome thresholds must be in [0, 1]".into());
        }
        if self.bands.is_empty() {
            return Err("biome table has no elevation bands".into());
        }
        for pair in self.bands.windows(2) {
            if pair[0].min_elevation <= pair[1].min_elevation {
                return Err("elevation bands must be sorted by descending minElevation".into());
            }
        }
        if self.bands.last().map(|b| b.min_elevation) != Some(0.0) {
            return Err("lowest elevation band must start at 0".into());
        }
        for band in &self.bands {
            if !(0.0..=1.0).contains(&band.min_elevation) {
                return Err(format!(
                    "elevation band {} is outside [0, 1]",
                    band.min_elevation
                ));
            }
            if band.moisture.windows(2).any(|p| p[0].min_moisture <= p[1].min_moisture) {
                return Err(format!(
                    "moisture bands of elevation band {} must be sorted by descending minMoisture",
                    band.min_elevation
                ));
            }
            if band.moisture.last().map(|m| m.min_moisture) != Some(0.0) {
                return Err(format!(
                    "elevation band {} has no moisture band starting at 0",
                    band.min_elevation
                ));
            }
        }
        Ok(())
    }

    /// Ищет биом. `None` возможен только для значений вне [0, 1] (или NaN)
    #[must_use]
    pub fn lookup(
        &self,
        ocean: bool,
        water: bool,
        coast: bool,
        elevation: f32,
        moisture: f32,
    ) -> Option<Biome> {
        if !(0.0..=1.0).contains(&elevation) || !(0.0..=1.0).contains(&moisture) {
            return None;
        }
        if ocean {
            return Some(self.water.ocean);
        }
        if water {
            let biome = if elevation < self.water.marsh_below {
                self.water.marsh
            } else if elevation > self.water.ice_above {
                self.water.ice
            } else {
                self.water.lake
            };
            return Some(biome);
        }
        if coast {
            return Some(self.coast);
        }
        let band = self.bands.iter().find(|b| elevation >= b.min_elevation)?;
        band.moisture
            .iter()
            .find(|m| moisture >= m.min_moisture)
            .map(|m| m.biome)
    }
}
