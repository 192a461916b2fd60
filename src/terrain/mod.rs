//! Классификация рельефа: вода, побережье, высоты, влажность, биомы

pub mod elevation;
pub mod island;
pub mod moisture;
pub mod water;

use tracing::debug;

use crate::config::MapConfig;
use crate::error::{MapError, MapResult};
use crate::graph::{CenterId, MapGraph};
use crate::noise::{MOISTURE_SEED_OFFSET, NoiseField};

pub use island::IslandShaper;

/// Классификатор рельефа. Шумы и конфигурация передаются явно, без глобального состояния
#[derive(Debug)]
pub struct TerrainClassifier<'a> {
    config: &'a MapConfig,
    shaper: IslandShaper,
    moisture_noise: NoiseField,
}

impl<'a> TerrainClassifier<'a> {
    pub fn new(config: &'a MapConfig) -> Self {
        Self {
            config,
            shaper: IslandShaper::new(config),
            moisture_noise: NoiseField::derived(config.noise_seed, MOISTURE_SEED_OFFSET),
        }
    }

    /// Первый проход: вода, побережье, высоты, влажность по близости к воде
    pub fn classify(&self, graph: &mut MapGraph) {
        let lowlands = water::assign_water(
            graph,
            &self.shaper,
            self.config.lake_probability,
            self.config.noise_seed,
        );
        elevation::assign_elevations(graph, &lowlands);
        self.assign_moisture(graph, false);
        debug!(
            land = graph.centers.iter().filter(|c| !c.water).count(),
            coast = graph.centers.iter().filter(|c| c.coast).count(),
            "рельеф классифицирован"
        );
    }

    /// Второй проход после рек: реки становятся источниками влаги
    pub fn refine_moisture(&self, graph: &mut MapGraph) {
        self.assign_moisture(graph, true);
    }

    fn assign_moisture(&self, graph: &mut MapGraph, with_rivers: bool) {
        moisture::assign_moisture(
            graph,
            &self.moisture_noise,
            self.config.noise_scale,
            self.config.noise_intensity,
            with_rivers,
        );
    }

    /// Назначает биомы полигонам по таблице из конфигурации
    ///
    /// Высота озера всегда низкая, поэтому его вариант (болото, лёд) выбирается
    /// по средней высоте сухих соседей — высоте берегов.
    ///
    /// # Ошибки
    /// `Classification`, если комбинация не нашлась в таблице (дефект, а не ввод).
    pub fn assign_biomes(&self, graph: &mut MapGraph) -> MapResult<()> {
        let table = &self.config.biomes;
        let keys: Vec<f32> = graph
            .centers
            .iter()
            .map(|c| {
                if !c.water || c.ocean {
                    return c.elevation;
                }
                shore_elevation(graph, c.id).unwrap_or(c.elevation)
            })
            .collect();

        for (center, elevation) in graph.centers.iter_mut().zip(keys) {
            let biome = table
                .lookup(
                    center.ocean,
                    center.water,
                    center.coast,
                    elevation,
                    center.moisture,
                )
                .ok_or_else(|| {
                    MapError::Classification(format!(
                        "no biome for center {} (elevation {}, moisture {}, ocean {}, water {}, coast {})",
                        center.id.0,
                        elevation,
                        center.moisture,
                        center.ocean,
                        center.water,
                        center.coast
                    ))
                })?;
            center.biome = Some(biome);
        }
        Ok(())
    }
}

/// Средняя высота сухих соседей полигона
fn shore_elevation(graph: &MapGraph, id: CenterId) -> Option<f32> {
    let (sum, count) = graph
        .center(id)
        .neighbors
        .iter()
        .map(|&n| graph.center(n))
        .filter(|n| !n.water)
        .fold((0.0, 0usize), |(sum, count), n| (sum + n.elevation, count + 1));
    (count > 0).then(|| sum / count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::config::{IslandShape, PointSelection};
    use crate::graph::build_graph;
    use crate::points::sample_points;

    fn classified() -> MapGraph {
        let config = MapConfig {
            width: 300.0,
            height: 300.0,
            num_points: 400,
            lake_probability: 0.3,
            ..MapConfig::default()
        };
        let sites = sample_points(300.0, 300.0, 400, 21, PointSelection::Poisson);
        let mut graph = build_graph(&sites, &config).unwrap();
        let classifier = TerrainClassifier::new(&config);
        classifier.classify(&mut graph);
        classifier.assign_biomes(&mut graph).unwrap();
        graph
    }

    #[test]
    fn values_are_bounded() {
        let graph = classified();
        for c in &graph.centers {
            assert!((0.0..=1.0).contains(&c.elevation));
            assert!((0.0..=1.0).contains(&c.moisture));
        }
        for q in &graph.corners {
            assert!((0.0..=1.0).contains(&q.elevation));
            assert!((0.0..=1.0).contains(&q.moisture));
        }
    }

    #[test]
    fn every_land_corner_has_a_lower_neighbor() {
        let graph = classified();
        for q in graph.corners.iter().filter(|q| !q.water) {
            assert!(
                q.adjacent.iter().any(|&a| graph.corner(a).elevation < q.elevation),
                "corner {:?} is a pit",
                q.id
            );
        }
    }

    #[test]
    fn water_corners_are_low_and_wet() {
        let graph = classified();
        for q in graph.corners.iter().filter(|q| q.water) {
            assert_eq!(q.elevation, 0.0);
            assert_eq!(q.moisture, 1.0);
        }
    }

    #[test]
    fn elevation_histogram_is_not_piled_at_the_coast() {
        let graph = classified();
        let land: Vec<f32> = graph
            .corners
            .iter()
            .filter(|q| !q.water)
            .map(|q| q.elevation)
            .collect();
        let low = land.iter().filter(|&&e| e < 0.1).count();
        assert!((low as f32) < land.len() as f32 * 0.3);
        assert!(land.iter().any(|&e| e > 0.9));
    }

    #[test]
    fn biomes_follow_water_flags() {
        let graph = classified();
        for c in &graph.centers {
            let biome = c.biome.unwrap();
            if c.ocean {
                assert_eq!(biome, Biome::Ocean);
            } else if c.water {
                assert!(matches!(biome, Biome::Lake | Biome::Marsh | Biome::Ice));
            } else if c.coast {
                assert_eq!(biome, Biome::Beach);
            } else {
                assert!(!biome.is_water());
            }
        }
    }

    #[test]
    fn corrupted_values_are_a_classification_error() {
        let config = MapConfig::default();
        let mut graph = classified();
        graph.centers[0].moisture = f32::NAN;
        let classifier = TerrainClassifier::new(&config);
        assert!(matches!(
            classifier.assign_biomes(&mut graph),
            Err(MapError::Classification(_))
        ));
    }

    fn complex(seed: u64, lake_probability: f32) -> (MapConfig, MapGraph) {
        let config = MapConfig {
            width: 300.0,
            height: 300.0,
            num_points: 500,
            island_shape: IslandShape::Complex,
            noise_intensity: 0.8,
            noise_scale: 2.0,
            noise_seed: seed,
            lake_probability,
            ..MapConfig::default()
        };
        let sites = sample_points(300.0, 300.0, 500, seed, PointSelection::Poisson);
        let mut graph = build_graph(&sites, &config).unwrap();
        let classifier = TerrainClassifier::new(&config);
        classifier.classify(&mut graph);
        classifier.assign_biomes(&mut graph).unwrap();
        (config, graph)
    }

    #[test]
    fn lakes_sit_at_water_level() {
        let mut lakes = 0;
        for seed in 0..6 {
            let (_, graph) = complex(seed, 1.0);
            for lake in graph.centers.iter().filter(|c| c.water && !c.ocean) {
                lakes += 1;
                assert!(lake.corners.iter().any(|&q| graph.corner(q).water));
                assert!(lake.elevation < 0.3, "lake {:?} at {}", lake.id, lake.elevation);
                assert!(!lake.coast);
            }
        }
        assert!(lakes > 0);
    }

    #[test]
    fn dry_lowlands_stay_at_the_bottom_of_the_scale() {
        let mut lowlands = 0;
        for seed in 0..6 {
            let (config, graph) = complex(seed, 0.0);
            let shaper = IslandShaper::new(&config);
            let low: Vec<_> = graph
                .centers
                .iter()
                .filter(|c| !c.water && !c.border && shaper.is_low(c.point))
                .collect();
            let mut low_corner = vec![false; graph.corners.len()];
            for c in &low {
                lowlands += 1;
                assert!(c.elevation < 0.5, "lowland {:?} at {}", c.id, c.elevation);
                for &q in &c.corners {
                    low_corner[q.index()] = true;
                }
            }
            // Внутренние вершины суши вдали от воды и низин всегда выше низин
            let highest_low = graph
                .corners
                .iter()
                .filter(|q| low_corner[q.id.index()] && !q.water)
                .map(|q| q.elevation)
                .fold(0.0, f32::max);
            for q in graph.corners.iter().filter(|q| !q.water && !low_corner[q.id.index()]) {
                let inland = q
                    .adjacent
                    .iter()
                    .all(|&a| !graph.corner(a).water && !low_corner[a.index()]);
                if inland {
                    assert!(q.elevation > highest_low);
                }
            }
        }
        assert!(lowlands > 0);
    }
}
