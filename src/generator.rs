// src/generator.rs
//! Конвейер генерации карты
//!
//! Точки → релаксация → граф → рельеф → реки → влажность с реками → биомы →
//! точки интереса → проверка инвариантов. Каждый этап — отдельный span `tracing`.

use std::time::Instant;

use tracing::{debug, error, info, info_span};

use crate::cancel::CancelToken;
use crate::config::MapConfig;
use crate::error::{MapError, MapResult};
use crate::graph::{MapGraph, build_graph, relax_sites};
use crate::points::sample_points;
use crate::poi::{PointOfInterest, place_pois};
use crate::rivers::{RiverPath, generate_rivers};
use crate::terrain::TerrainClassifier;
use crate::validate::validate_graph;

/// Результат генерации. После возврата не изменяется
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMap {
    pub graph: MapGraph,
    pub rivers: Vec<RiverPath>,
    pub pois: Vec<PointOfInterest>,
}

/// Генератор карты с проверенной конфигурацией
#[derive(Debug, Clone)]
pub struct MapGenerator {
    config: MapConfig,
    cancel: CancelToken,
}

impl MapGenerator {
    /// Проверяет конфигурацию. Некорректная конфигурация не доходит до генерации
    pub fn new(config: MapConfig) -> MapResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
        })
    }

    /// Подключает внешний токен отмены
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Запускает конвейер целиком
    ///
    /// # Ошибки
    /// `GraphConstruction` для вырожденного набора точек, `Cancelled` при отмене,
    /// `Classification` при нарушении инварианта (пишется в лог вместе с конфигурацией).
    pub fn generate(&self) -> MapResult<GeneratedMap> {
        let started = Instant::now();
        let result = self.run();
        match &result {
            Ok(map) => {
                let (centers, edges, corners) = map.graph.counts();
                info!(
                    centers,
                    edges,
                    corners,
                    rivers = map.rivers.len(),
                    pois = map.pois.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "карта сгенерирована"
                );
            }
            Err(MapError::Classification(msg)) => {
                error!(config = ?self.config, "нарушен инвариант классификации: {msg}");
            }
            Err(e) => debug!("генерация прервана: {e}"),
        }
        result
    }

    fn run(&self) -> MapResult<GeneratedMap> {
        let config = &self.config;
        let seed = config.noise_seed;

        let sites = {
            let _span = info_span!("points").entered();
            let raw = sample_points(
                config.width,
                config.height,
                config.num_points,
                seed,
                config.point_selection,
            );
            relax_sites(&raw, config, &self.cancel)?
        };

        let mut graph = {
            let _span = info_span!("graph").entered();
            let graph = build_graph(&sites, config)?;
            let (centers, edges, corners) = graph.counts();
            debug!(centers, edges, corners, "граф построен");
            graph
        };
        self.cancel.checkpoint()?;

        let classifier = TerrainClassifier::new(config);
        {
            let _span = info_span!("terrain").entered();
            classifier.classify(&mut graph);
        }
        self.cancel.checkpoint()?;

        let rivers = {
            let _span = info_span!("rivers").entered();
            generate_rivers(&mut graph, config.river_count, seed, &self.cancel)?
        };

        {
            let _span = info_span!("biomes").entered();
            classifier.refine_moisture(&mut graph);
            classifier.assign_biomes(&mut graph)?;
        }

        let pois = place_pois(&graph, &config.poi_counts, seed);
        validate_graph(&graph)?;

        Ok(GeneratedMap {
            graph,
            rivers,
            pois,
        })
    }
}

/// Генерирует карту по конфигурации без внешней отмены
pub fn generate_map(config: MapConfig) -> MapResult<GeneratedMap> {
    MapGenerator::new(config)?.generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> MapConfig {
        MapConfig {
            width: 200.0,
            height: 200.0,
            num_points: 150,
            river_count: 5,
            ..MapConfig::default()
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let config = MapConfig {
            num_points: 2,
            ..small()
        };
        assert!(matches!(
            MapGenerator::new(config),
            Err(MapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_map(small()).unwrap();
        let b = generate_map(small()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_map(small()).unwrap();
        let b = generate_map(MapConfig {
            noise_seed: 99,
            ..small()
        })
        .unwrap();
        assert_ne!(a.graph, b.graph);
    }

    #[test]
    fn cancelled_token_stops_generation() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let generator = MapGenerator::new(small()).unwrap().with_cancel(cancel);
        assert!(matches!(generator.generate(), Err(MapError::Cancelled)));
    }

    #[test]
    fn every_center_has_a_biome() {
        let map = generate_map(small()).unwrap();
        assert!(map.graph.centers.iter().all(|c| c.biome.is_some()));
        assert_eq!(map.rivers.len(), 5);
    }
}
