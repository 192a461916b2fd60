// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией острова:
//! - Размеры карты и количество полигонов
//! - Форма острова и параметры шума
//! - Озёра, реки и точки интереса
//! - Таблица биомов
//!
//! Все структуры поддерживают сериализацию в TOML/JSON. Ключи в camelCase,
//! чтобы конфигурация в проводной форме графа совпадала с входной.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomeTable};
use crate::error::{MapError, MapResult};

/// Минимальное количество точек для триангуляции
pub const MIN_POINTS: usize = 3;

/// Форма острова
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IslandShape {
    /// Круглые острова: высота суши монотонно падает от центра острова
    #[default]
    Radial,
    /// Радиальный спад, искажённый когерентным шумом
    Complex,
}

/// Способ выбора исходных точек диаграммы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointSelection {
    /// Равномерно случайные точки
    Random,
    /// Диск Пуассона (синий шум), более ровные полигоны
    #[default]
    Poisson,
}

/// Основные параметры генерации карты
///
/// Неизменяемый набор значений, который передаётся через все этапы конвейера.
///
/// # Пример
/// ```toml
/// width = 512.0
/// height = 512.0
/// numPoints = 200
/// islandFactor = 0.3
/// relaxationIterations = 2
/// lakeProbability = 0.1
/// riverCount = 3
/// islandShape = "radial"
/// noiseSeed = 42
/// noiseScale = 1.0
/// noiseIntensity = 0.5
/// islandCount = 1
/// coastalNoiseFrequency = 0.05
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub width: f32,
    pub height: f32,

    /// Количество полигонов (не меньше [`MIN_POINTS`])
    pub num_points: usize,

    /// Порог суши: точка с оценкой ниже порога — вода.
    /// Больше значение → меньше суши
    pub island_factor: f32,

    /// Число итераций релаксации Ллойда (0 = без релаксации)
    pub relaxation_iterations: usize,

    /// Вероятность того, что внутренняя низина станет озером
    pub lake_probability: f32,

    pub river_count: usize,

    pub island_shape: IslandShape,

    /// Сид всех генераторов случайных чисел и шумов
    pub noise_seed: u64,

    /// Масштаб шума формы острова (в нормализованных координатах)
    pub noise_scale: f32,

    /// Вес шума при искажении радиального спада
    pub noise_intensity: f32,

    pub island_count: usize,

    /// Частота шума береговой линии в единицах карты
    pub coastal_noise_frequency: f32,

    /// Количество точек интереса по биомам
    #[serde(default)]
    pub poi_counts: BTreeMap<Biome, usize>,

    #[serde(default)]
    pub point_selection: PointSelection,

    /// Таблица назначения биомов
    #[serde(default)]
    pub biomes: BiomeTable,
}

impl MapConfig {
    /// Проверяет, что все значения в допустимой области
    pub fn validate(&self) -> MapResult<()> {
        fn invalid(msg: String) -> MapResult<()> {
            Err(MapError::InvalidConfig(msg))
        }

        if !(self.width.is_finite() && self.width > 0.0) {
            return invalid(format!("width must be positive, got {}", self.width));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return invalid(format!("height must be positive, got {}", self.height));
        }
        if self.num_points < MIN_POINTS {
            return invalid(format!(
                "numPoints must be at least {MIN_POINTS}, got {}",
                self.num_points
            ));
        }
        if !self.island_factor.is_finite() {
            return invalid("islandFactor must be finite".into());
        }
        if !(0.0..=1.0).contains(&self.lake_probability) {
            return invalid(format!(
                "lakeProbability must be in [0, 1], got {}",
                self.lake_probability
            ));
        }
        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return invalid(format!(
                "noiseScale must be positive, got {}",
                self.noise_scale
            ));
        }
        if !(self.noise_intensity.is_finite() && self.noise_intensity >= 0.0) {
            return invalid(format!(
                "noiseIntensity must be non-negative, got {}",
                self.noise_intensity
            ));
        }
        if self.island_count == 0 {
            return invalid("islandCount must be at least 1".into());
        }
        if !(self.coastal_noise_frequency.is_finite() && self.coastal_noise_frequency >= 0.0) {
            return invalid(format!(
                "coastalNoiseFrequency must be non-negative, got {}",
                self.coastal_noise_frequency
            ));
        }
        self.biomes.validate().map_err(MapError::InvalidConfig)
    }

    /// Загружает параметры из TOML-строки
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        Ok(config)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 512.0,
            num_points: 1000,
            island_factor: 0.3,
            relaxation_iterations: 2,
            lake_probability: 0.1,
            river_count: 10,
            island_shape: IslandShape::Radial,
            noise_seed: 0,
            noise_scale: 1.0,
            noise_intensity: 0.5,
            island_count: 1,
            coastal_noise_frequency: 0.05,
            poi_counts: BTreeMap::new(),
            point_selection: PointSelection::Poisson,
            biomes: BiomeTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
width = 512.0
height = 512.0
numPoints = 200
islandFactor = 0.3
relaxationIterations = 2
lakeProbability = 0.1
riverCount = 3
islandShape = "radial"
noiseSeed = 42
noiseScale = 1.0
noiseIntensity = 0.5
islandCount = 1
coastalNoiseFrequency = 0.05
"#;

    #[test]
    fn parses_camel_case_toml_with_defaults() {
        let config = MapConfig::from_toml_str(SCENARIO).unwrap();
        assert_eq!(config.num_points, 200);
        assert_eq!(config.island_shape, IslandShape::Radial);
        assert!(config.poi_counts.is_empty());
        assert_eq!(config.point_selection, PointSelection::Poisson);
        assert_eq!(config.biomes, BiomeTable::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let without_seed = SCENARIO.replace("noiseSeed = 42\n", "");
        assert!(MapConfig::from_toml_str(&without_seed).is_err());
    }

    #[test]
    fn poi_counts_are_keyed_by_biome() {
        let toml = format!("{SCENARIO}\n[poiCounts]\nGrassland = 2\nBeach = 1\n");
        let config = MapConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.poi_counts.get(&Biome::Grassland), Some(&2));
        assert_eq!(config.poi_counts.get(&Biome::Beach), Some(&1));
    }

    #[test]
    fn too_few_points_is_invalid() {
        let config = MapConfig {
            num_points: 2,
            ..MapConfig::default()
        };
        assert!(matches!(config.validate(), Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn out_of_domain_values_are_invalid() {
        let cases = [
            MapConfig { width: -1.0, ..MapConfig::default() },
            MapConfig { height: 0.0, ..MapConfig::default() },
            MapConfig { lake_probability: 1.5, ..MapConfig::default() },
            MapConfig { noise_scale: 0.0, ..MapConfig::default() },
            MapConfig { noise_intensity: -0.1, ..MapConfig::default() },
            MapConfig { island_count: 0, ..MapConfig::default() },
            MapConfig { coastal_noise_frequency: f32::NAN, ..MapConfig::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(MapError::InvalidConfig(_))),
                "{config:?}"
            );
        }
    }
}
