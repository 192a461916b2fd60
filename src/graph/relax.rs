use tracing::debug;

use super::{MapGraph, Point, build_graph};
use crate::cancel::CancelToken;
use crate::config::MapConfig;
use crate::error::MapResult;

/// Релаксация Ллойда: ровно `config.relaxation_iterations` раз переносит каждую
/// точку в центр её полигона и перестраивает триангуляцию.
pub fn relax_sites(
    sites: &[Point],
    config: &MapConfig,
    cancel: &CancelToken,
) -> MapResult<Vec<Point>> {
    let mut sites = sites.to_vec();
    for iteration in 0..config.relaxation_iterations {
        cancel.checkpoint()?;
        let graph = build_graph(&sites, config)?;
        sites = region_centroids(&graph);
        debug!(iteration, "итерация релаксации");
    }
    Ok(sites)
}

/// Среднее вершин каждого полигона. Полигон без вершин остаётся на месте
fn region_centroids(graph: &MapGraph) -> Vec<Point> {
    graph
        .centers
        .iter()
        .map(|center| {
            if center.corners.is_empty() {
                return center.point;
            }
            let (sx, sy) = center.corners.iter().fold((0.0, 0.0), |(sx, sy), &q| {
                let p = graph.corner(q).point;
                (sx + p.x, sy + p.y)
            });
            let n = center.corners.len() as f32;
            Point::new(sx / n, sy / n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointSelection;
    use crate::error::MapError;
    use crate::points::sample_points;

    fn config(iterations: usize) -> MapConfig {
        MapConfig {
            width: 200.0,
            height: 200.0,
            relaxation_iterations: iterations,
            ..MapConfig::default()
        }
    }

    /// Коэффициент вариации расстояния до ближайшего соседа
    fn spread_of_nearest_gap(points: &[Point]) -> f32 {
        let gaps: Vec<f32> = points
            .iter()
            .enumerate()
            .map(|(i, a)| {
                points
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, b)| a.distance_squared(*b))
                    .fold(f32::INFINITY, f32::min)
                    .sqrt()
            })
            .collect();
        let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
        let var = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f32>() / gaps.len() as f32;
        var.sqrt() / mean
    }

    #[test]
    fn zero_iterations_keeps_raw_sites() {
        let sites = sample_points(200.0, 200.0, 60, 9, PointSelection::Random);
        let relaxed = relax_sites(&sites, &config(0), &CancelToken::new()).unwrap();
        assert_eq!(sites, relaxed);
    }

    #[test]
    fn relaxation_evens_out_random_sites() {
        let sites = sample_points(200.0, 200.0, 150, 9, PointSelection::Random);
        let relaxed = relax_sites(&sites, &config(3), &CancelToken::new()).unwrap();
        assert_eq!(relaxed.len(), sites.len());
        assert!(spread_of_nearest_gap(&relaxed) < spread_of_nearest_gap(&sites));
        for p in &relaxed {
            assert!((0.0..=200.0).contains(&p.x) && (0.0..=200.0).contains(&p.y));
        }
    }

    #[test]
    fn iteration_count_is_honored() {
        let sites = sample_points(200.0, 200.0, 80, 4, PointSelection::Random);
        let token = CancelToken::new();
        let once = relax_sites(&sites, &config(1), &token).unwrap();
        let twice = relax_sites(&sites, &config(2), &token).unwrap();
        let once_then_once = relax_sites(&once, &config(1), &token).unwrap();
        assert_ne!(once, twice);
        assert_eq!(twice, once_then_once);
    }

    #[test]
    fn cancelled_token_stops_relaxation() {
        let sites = sample_points(200.0, 200.0, 80, 4, PointSelection::Random);
        let token = CancelToken::new();
        token.cancel();
        assert!(matches!(
            relax_sites(&sites, &config(5), &token),
            Err(MapError::Cancelled)
        ));
    }
}
