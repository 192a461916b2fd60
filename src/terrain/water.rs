//! Океан, озёра и побережье

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use super::island::IslandShaper;
use crate::graph::{CenterId, MapGraph};

/// Смещение сида для розыгрыша озёр
pub const LAKE_SEED_OFFSET: u64 = 3_000_000;

/// Отмечает низины по форме острова. Граничные полигоны всегда низины
#[cfg(feature = "parallel")]
fn low_centers(graph: &MapGraph, shaper: &IslandShaper) -> Vec<bool> {
    graph
        .centers
        .par_iter()
        .map(|c| c.border || shaper.is_low(c.point))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn low_centers(graph: &MapGraph, shaper: &IslandShaper) -> Vec<bool> {
    graph
        .centers
        .iter()
        .map(|c| c.border || shaper.is_low(c.point))
        .collect()
}

/// Назначает флаги `ocean`, `water`, `coast` полигонам и вершинам
///
/// Океан — заливка (BFS) от всех граничных полигонов по низинам, поэтому любая
/// низина, достижимая от края карты, становится океаном. Остальные низины —
/// кандидаты в озёра: каждый становится озером с вероятностью `lake_probability`.
/// Возвращает низины, не ставшие озёрами: они остаются низкой сушей.
pub fn assign_water(
    graph: &mut MapGraph,
    shaper: &IslandShaper,
    lake_probability: f32,
    seed: u64,
) -> Vec<CenterId> {
    let low = low_centers(graph, shaper);

    let mut ocean = vec![false; graph.centers.len()];
    let mut queue: VecDeque<CenterId> = graph
        .centers
        .iter()
        .filter(|c| c.border)
        .map(|c| c.id)
        .collect();
    for p in &queue {
        ocean[p.index()] = true;
    }
    while let Some(p) = queue.pop_front() {
        for &r in &graph.center(p).neighbors {
            if low[r.index()] && !ocean[r.index()] {
                ocean[r.index()] = true;
                queue.push_back(r);
            }
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(LAKE_SEED_OFFSET));
    let mut lakes = 0usize;
    let mut lowlands = Vec::new();
    for (i, center) in graph.centers.iter_mut().enumerate() {
        center.ocean = ocean[i];
        center.water = ocean[i];
        if low[i] && !ocean[i] {
            if rng.gen_bool(f64::from(lake_probability)) {
                center.water = true;
                lakes += 1;
            } else {
                lowlands.push(center.id);
            }
        }
    }

    // Побережье полигонов: суша рядом с водой
    let coast: Vec<bool> = graph
        .centers
        .iter()
        .map(|c| !c.water && c.neighbors.iter().any(|&n| graph.center(n).water))
        .collect();
    for (center, coast) in graph.centers.iter_mut().zip(coast) {
        center.coast = coast;
    }

    // Вершина — вода, если касается воды и не лежит на стыке океана и суши
    let flags: Vec<(bool, bool, bool)> = graph
        .corners
        .iter()
        .map(|q| {
            let touches = q.touches.len();
            let (mut oceans, mut waters) = (0, 0);
            for &c in &q.touches {
                let center = graph.center(c);
                oceans += usize::from(center.ocean);
                waters += usize::from(center.water);
            }
            let lands = touches - waters;
            let ocean = q.border || (touches > 0 && oceans == touches);
            let water = q.border || (waters > 0 && !(oceans > 0 && lands > 0));
            let coast = !water && waters > 0;
            (ocean, water, coast)
        })
        .collect();
    for (corner, (ocean, water, coast)) in graph.corners.iter_mut().zip(flags) {
        corner.ocean = ocean;
        corner.water = water;
        corner.coast = coast;
    }

    debug!(
        ocean = graph.centers.iter().filter(|c| c.ocean).count(),
        lakes,
        dry_lowlands = lowlands.len(),
        "вода назначена"
    );
    lowlands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IslandShape, MapConfig, PointSelection};
    use crate::graph::build_graph;
    use crate::points::sample_points;

    fn config(lake_probability: f32) -> MapConfig {
        MapConfig {
            width: 200.0,
            height: 200.0,
            num_points: 300,
            island_shape: IslandShape::Complex,
            noise_intensity: 0.8,
            noise_scale: 2.0,
            lake_probability,
            ..MapConfig::default()
        }
    }

    fn classified_with(lake_probability: f32, seed: u64) -> (MapGraph, Vec<CenterId>) {
        let config = MapConfig {
            noise_seed: seed,
            ..config(lake_probability)
        };
        let sites = sample_points(200.0, 200.0, 300, 17 + seed, PointSelection::Poisson);
        let mut graph = build_graph(&sites, &config).unwrap();
        let shaper = IslandShaper::new(&config);
        let lowlands = assign_water(&mut graph, &shaper, lake_probability, config.noise_seed);
        (graph, lowlands)
    }

    fn classified(lake_probability: f32) -> MapGraph {
        classified_with(lake_probability, 0).0
    }

    /// Первая карта из нескольких сидов, где есть внутренние низины
    fn with_interior_lows(lake_probability: f32) -> (MapGraph, Vec<CenterId>) {
        (0..20)
            .map(|seed| classified_with(lake_probability, seed))
            .find(|(graph, lowlands)| {
                !lowlands.is_empty() || graph.centers.iter().any(|c| c.water && !c.ocean)
            })
            .unwrap()
    }

    #[test]
    fn border_ring_is_ocean_and_centre_is_land() {
        let graph = classified(0.0);
        assert!(graph.centers.iter().filter(|c| c.ocean).count() > 0);
        assert!(graph.centers.iter().any(|c| !c.water));
        assert!(graph.corners.iter().filter(|q| q.border).all(|q| q.ocean));
    }

    #[test]
    fn every_border_center_is_ocean() {
        for seed in 0..5 {
            let (graph, _) = classified_with(0.5, seed);
            assert!(graph.centers.iter().filter(|c| c.border).all(|c| c.ocean));
        }
    }

    #[test]
    fn water_is_ocean_or_lake() {
        let graph = classified(1.0);
        for c in &graph.centers {
            if c.ocean {
                assert!(c.water);
            }
            assert!(!(c.coast && c.water));
        }
    }

    #[test]
    fn ocean_is_reachable_from_border() {
        let graph = classified(0.5);
        let mut seen = vec![false; graph.centers.len()];
        let mut queue: VecDeque<CenterId> = graph
            .centers
            .iter()
            .filter(|c| c.border)
            .map(|c| c.id)
            .collect();
        for p in &queue {
            seen[p.index()] = true;
        }
        while let Some(p) = queue.pop_front() {
            for &r in &graph.center(p).neighbors {
                if graph.center(r).ocean && !seen[r.index()] {
                    seen[r.index()] = true;
                    queue.push_back(r);
                }
            }
        }
        for c in &graph.centers {
            assert_eq!(c.ocean, seen[c.id.index()], "center {:?}", c.id);
        }
    }

    #[test]
    fn lake_corners_are_water() {
        let (graph, _) = with_interior_lows(1.0);
        let lakes: Vec<_> = graph.centers.iter().filter(|c| c.water && !c.ocean).collect();
        assert!(!lakes.is_empty());
        for lake in lakes {
            assert!(!lake.corners.is_empty());
            for &q in &lake.corners {
                assert!(graph.corner(q).water, "corner {q:?} of lake {:?}", lake.id);
            }
            assert!(lake.neighbors.iter().all(|&n| !graph.center(n).ocean));
        }
    }

    #[test]
    fn dry_corners_next_to_water_sit_between_ocean_and_land() {
        let (graph, _) = with_interior_lows(0.5);
        for q in graph.corners.iter().filter(|q| q.coast) {
            assert!(!q.water);
            let touches = || q.touches.iter().map(|&c| graph.center(c));
            assert!(touches().any(|c| c.ocean));
            assert!(touches().any(|c| !c.water));
        }
    }

    #[test]
    fn lost_lake_draws_are_returned_as_lowlands() {
        let (graph, lowlands) = with_interior_lows(0.0);
        assert!(!lowlands.is_empty());
        let shaper = IslandShaper::new(&MapConfig {
            noise_seed: graph.config.noise_seed,
            ..config(0.0)
        });
        for &id in &lowlands {
            let c = graph.center(id);
            assert!(!c.water && !c.border);
            assert!(shaper.is_low(c.point));
        }
    }

    #[test]
    fn lake_probability_zero_leaves_no_lakes() {
        let graph = classified(0.0);
        assert!(graph.centers.iter().all(|c| c.water == c.ocean));
    }

    #[test]
    fn coast_means_land_next_to_water() {
        let graph = classified(0.3);
        for c in &graph.centers {
            let near_water = c.neighbors.iter().any(|&n| graph.center(n).water);
            assert_eq!(c.coast, !c.water && near_water);
        }
    }
}
