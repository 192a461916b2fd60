//! Высоты вершин и полигонов

use std::collections::VecDeque;

use crate::graph::{CenterId, MapGraph};

/// Шаговое расстояние по смежности вершин до ближайшего источника.
/// `start(i)` — начальное расстояние вершины, `None` — не источник. Источники
/// с расстоянием 1 ставятся в очередь после нулевых, поэтому порядок BFS сохраняется
pub(crate) fn corner_distances(
    graph: &MapGraph,
    start: impl Fn(usize) -> Option<u32>,
) -> Vec<Option<u32>> {
    let count = graph.corners.len();
    let mut distance: Vec<Option<u32>> = (0..count).map(&start).collect();
    let mut queue: VecDeque<usize> = VecDeque::new();
    for level in [0, 1] {
        queue.extend((0..count).filter(|&i| distance[i] == Some(level)));
    }
    while let Some(i) = queue.pop_front() {
        let next = distance[i].map_or(0, |d| d + 1);
        for &a in &graph.corners[i].adjacent {
            if distance[a.index()].is_none() {
                distance[a.index()] = Some(next);
                queue.push_back(a.index());
            }
        }
    }
    distance
}

/// Монотонная кривая: равномерный ранг `y ∈ (0, 1]` → высота `1 - sqrt(1 - y)`.
/// Плотность высот `2(1 - x)`: низменностей больше, чем гор, но гистограмма
/// не прижата к побережью
fn redistribute(y: f32) -> f32 {
    (1.0 - (1.0 - y).max(0.0).sqrt()).clamp(0.0, 1.0)
}

/// Назначает высоты
///
/// Высота суши растёт с расстоянием до ближайшей воды, затем перераспределяется
/// по рангу (равные расстояния упорядочиваются по id). Вершины низин `lowlands`
/// считаются на расстоянии 1 от воды и остаются в нижней части шкалы.
/// Вода — 0. Высота полигона — среднее его вершин.
pub fn assign_elevations(graph: &mut MapGraph, lowlands: &[CenterId]) {
    let mut in_lowland = vec![false; graph.corners.len()];
    for &c in lowlands {
        for &q in &graph.center(c).corners {
            in_lowland[q.index()] = true;
        }
    }
    let distance = corner_distances(graph, |i| {
        if graph.corners[i].water {
            Some(0)
        } else if in_lowland[i] {
            Some(1)
        } else {
            None
        }
    });

    let mut land: Vec<usize> = (0..graph.corners.len())
        .filter(|&i| !graph.corners[i].water)
        .collect();
    // Недостижимые вершины идут последними
    land.sort_by_key(|&i| (distance[i].unwrap_or(u32::MAX), i));

    let n = land.len() as f32;
    for (rank, &i) in land.iter().enumerate() {
        graph.corners[i].elevation = redistribute((rank + 1) as f32 / n);
    }
    for corner in graph.corners.iter_mut().filter(|q| q.water) {
        corner.elevation = 0.0;
    }

    let averages: Vec<f32> = graph
        .centers
        .iter()
        .map(|c| {
            if c.corners.is_empty() {
                return 0.0;
            }
            let sum: f32 = c.corners.iter().map(|&q| graph.corner(q).elevation).sum();
            (sum / c.corners.len() as f32).clamp(0.0, 1.0)
        })
        .collect();
    for (center, elevation) in graph.centers.iter_mut().zip(averages) {
        center.elevation = elevation;
    }
}
