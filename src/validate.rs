//! Проверка инвариантов готового графа
//!
//! Выполняется последним этапом конвейера. Любое нарушение — дефект генератора,
//! поэтому возвращается `Classification`.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{MapError, MapResult};
use crate::graph::MapGraph;

fn violated(msg: String) -> MapResult<()> {
    Err(MapError::Classification(msg))
}

/// Симметрия связей Center↔Center, Edge↔Center, Edge↔Corner, Corner↔Corner
pub fn check_adjacency(graph: &MapGraph) -> MapResult<()> {
    for c in &graph.centers {
        for &n in &c.neighbors {
            if !graph.center(n).neighbors.contains(&c.id) {
                return violated(format!("neighbors of centers {} and {} are asymmetric", c.id.0, n.0));
            }
        }
    }
    for q in &graph.corners {
        for &a in &q.adjacent {
            if !graph.corner(a).adjacent.contains(&q.id) {
                return violated(format!("adjacency of corners {} and {} is asymmetric", q.id.0, a.0));
            }
        }
    }
    for e in &graph.edges {
        for d in [e.d0, e.d1].into_iter().flatten() {
            if !graph.center(d).borders.contains(&e.id) {
                return violated(format!("center {} does not list edge {} in borders", d.0, e.id.0));
            }
        }
        for v in [e.v0, e.v1].into_iter().flatten() {
            if !graph.corner(v).protrudes.contains(&e.id) {
                return violated(format!("corner {} does not list edge {} in protrudes", v.0, e.id.0));
            }
        }
    }
    Ok(())
}

/// Высоты и влажность в [0, 1], у каждого полигона есть биом
pub fn check_classification(graph: &MapGraph) -> MapResult<()> {
    let unit = 0.0..=1.0;
    for c in &graph.centers {
        if !unit.contains(&c.elevation) || !unit.contains(&c.moisture) {
            return violated(format!(
                "center {} out of range: elevation {}, moisture {}",
                c.id.0, c.elevation, c.moisture
            ));
        }
        if c.ocean && !c.water {
            return violated(format!("ocean center {} is not water", c.id.0));
        }
        if c.biome.is_none() {
            return violated(format!("center {} has no biome", c.id.0));
        }
    }
    for q in &graph.corners {
        if !unit.contains(&q.elevation) || !unit.contains(&q.moisture) {
            return violated(format!(
                "corner {} out of range: elevation {}, moisture {}",
                q.id.0, q.elevation, q.moisture
            ));
        }
    }
    Ok(())
}

/// `river_size` вершины ненулевой только рядом с речным ребром
pub fn check_rivers(graph: &MapGraph) -> MapResult<()> {
    for q in graph.corners.iter().filter(|q| q.river_size > 0) {
        if !q.protrudes.iter().any(|&e| graph.edge(e).river > 0) {
            return violated(format!(
                "corner {} has river size {} without a river edge",
                q.id.0, q.river_size
            ));
        }
    }
    Ok(())
}

/// Число связных компонент океана
#[must_use]
pub fn ocean_components(graph: &MapGraph) -> usize {
    let mut ocean: UnGraph<(), ()> = UnGraph::default();
    let nodes: Vec<Option<NodeIndex>> = graph
        .centers
        .iter()
        .map(|c| c.ocean.then(|| ocean.add_node(())))
        .collect();
    for c in &graph.centers {
        let Some(a) = nodes[c.id.index()] else {
            continue;
        };
        for &n in &c.neighbors {
            if let Some(b) = nodes[n.index()].filter(|_| c.id < n) {
                ocean.add_edge(a, b, ());
            }
        }
    }
    connected_components(&ocean)
}

/// Океан — не более одной связной акватории
pub fn check_ocean(graph: &MapGraph) -> MapResult<()> {
    match ocean_components(graph) {
        0 | 1 => Ok(()),
        n => violated(format!("ocean is split into {n} components")),
    }
}

/// Все проверки готового графа
pub fn validate_graph(graph: &MapGraph) -> MapResult<()> {
    check_adjacency(graph)?;
    check_classification(graph)?;
    check_rivers(graph)?;
    check_ocean(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::config::{MapConfig, PointSelection};
    use crate::graph::build_graph;
    use crate::points::sample_points;
    use crate::terrain::TerrainClassifier;

    fn finished() -> MapGraph {
        let config = MapConfig {
            width: 250.0,
            height: 250.0,
            num_points: 250,
            ..MapConfig::default()
        };
        let sites = sample_points(250.0, 250.0, 250, 3, PointSelection::Poisson);
        let mut graph = build_graph(&sites, &config).unwrap();
        let classifier = TerrainClassifier::new(&config);
        classifier.classify(&mut graph);
        classifier.assign_biomes(&mut graph).unwrap();
        graph
    }

    #[test]
    fn classified_graph_passes() {
        let graph = finished();
        assert!(validate_graph(&graph).is_ok());
        assert_eq!(ocean_components(&graph), 1);
    }

    #[test]
    fn asymmetric_neighbors_are_reported() {
        let mut graph = finished();
        let n = graph.centers[0].neighbors[0];
        graph.centers[n.index()].neighbors.retain(|&x| x.0 != 0);
        assert!(matches!(check_adjacency(&graph), Err(MapError::Classification(_))));
    }

    #[test]
    fn missing_biome_is_reported() {
        let mut graph = finished();
        graph.centers[1].biome = None;
        assert!(check_classification(&graph).is_err());
        graph.centers[1].biome = Some(Biome::Grassland);
        graph.corners[1].moisture = 1.5;
        assert!(check_classification(&graph).is_err());
    }

    #[test]
    fn river_size_without_river_edge_is_reported() {
        let mut graph = finished();
        graph.corners[0].river_size = 1;
        assert!(check_rivers(&graph).is_err());
    }

    #[test]
    fn detached_ocean_is_reported() {
        let mut graph = finished();
        let inland = graph
            .centers
            .iter()
            .find(|c| !c.water && c.neighbors.iter().all(|&n| !graph.center(n).ocean))
            .map(|c| c.id)
            .unwrap();
        graph.centers[inland.index()].ocean = true;
        graph.centers[inland.index()].water = true;
        assert_eq!(ocean_components(&graph), 2);
        assert!(check_ocean(&graph).is_err());
    }
}
