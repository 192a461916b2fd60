//! Реки: спуск по наибольшему уклону от высоких вершин к воде

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::{MapError, MapResult};
use crate::graph::{CornerId, MapGraph};

/// Смещение сида для выбора истоков
pub const RIVER_SEED_OFFSET: u64 = 4_000_000;

/// Чем закончилась река
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiverEnd {
    /// Дошла до водной вершины
    Water,
    /// Локальный минимум без более низких соседей
    Sink,
}

/// Путь одной реки от истока до устья
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverPath {
    pub corners: Vec<CornerId>,
    pub end: RiverEnd,
}

impl RiverPath {
    #[must_use]
    pub fn source(&self) -> CornerId {
        self.corners[0]
    }

    #[must_use]
    pub fn mouth(&self) -> CornerId {
        self.corners[self.corners.len() - 1]
    }
}

/// Самая низкая смежная вершина, строго ниже текущей. При равенстве — меньший id
#[must_use]
pub fn downslope(graph: &MapGraph, corner: CornerId) -> Option<CornerId> {
    let current = graph.corner(corner);
    current
        .adjacent
        .iter()
        .copied()
        .filter(|&a| graph.corner(a).elevation < current.elevation)
        .min_by(|&a, &b| {
            graph
                .corner(a)
                .elevation
                .total_cmp(&graph.corner(b).elevation)
                .then(a.cmp(&b))
        })
}

/// Выбирает истоки: сухие неграничные вершины, вес — квадрат высоты, без повторов
fn pick_sources(graph: &MapGraph, river_count: usize, seed: u64) -> MapResult<Vec<CornerId>> {
    let candidates: Vec<CornerId> = graph
        .corners
        .iter()
        .filter(|q| !q.water && !q.border && q.elevation > 0.0)
        .map(|q| q.id)
        .collect();
    if candidates.is_empty() || river_count == 0 {
        return Ok(Vec::new());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(RIVER_SEED_OFFSET));
    let amount = river_count.min(candidates.len());
    let chosen = candidates
        .choose_multiple_weighted(&mut rng, amount, |&q| {
            let e = f64::from(graph.corner(q).elevation);
            e * e
        })
        .map_err(|e| MapError::Classification(format!("river source sampling failed: {e}")))?;
    Ok(chosen.copied().collect())
}

/// Прокладывает одну реку, увеличивая поток на пройденных рёбрах
fn trace_river(graph: &mut MapGraph, source: CornerId) -> MapResult<RiverPath> {
    let limit = graph.corners.len();
    let mut corners = vec![source];
    let mut current = source;

    let end = loop {
        if graph.corner(current).water {
            break RiverEnd::Water;
        }
        if corners.len() > limit {
            return Err(MapError::Classification(format!(
                "river from corner {} exceeded {limit} steps",
                source.0
            )));
        }
        let Some(next) = downslope(graph, current) else {
            debug!(corner = current.0, "река закончилась в бессточной впадине");
            break RiverEnd::Sink;
        };
        let edge = graph.edge_between(current, next).ok_or_else(|| {
            MapError::Classification(format!(
                "adjacent corners {} and {} share no edge",
                current.0, next.0
            ))
        })?;
        graph.edges[edge.index()].river += 1;
        corners.push(next);
        current = next;
    };

    Ok(RiverPath { corners, end })
}

/// Генерирует `river_count` рек
///
/// Реки обрабатываются по одной. Слияние аддитивно: ниже слияния каждый приток
/// добавляет свой поток. После трассировки `river_size` вершины — максимум
/// потока по её рёбрам.
pub fn generate_rivers(
    graph: &mut MapGraph,
    river_count: usize,
    seed: u64,
    cancel: &CancelToken,
) -> MapResult<Vec<RiverPath>> {
    let sources = pick_sources(graph, river_count, seed)?;
    let mut rivers = Vec::with_capacity(sources.len());
    for source in sources {
        cancel.checkpoint()?;
        rivers.push(trace_river(graph, source)?);
    }

    let sizes: Vec<u32> = graph
        .corners
        .iter()
        .map(|q| {
            q.protrudes
                .iter()
                .map(|&e| graph.edge(e).river)
                .max()
                .unwrap_or(0)
        })
        .collect();
    for (corner, size) in graph.corners.iter_mut().zip(sizes) {
        corner.river_size = size;
    }

    debug!(
        rivers = rivers.len(),
        sinks = rivers.iter().filter(|r| r.end == RiverEnd::Sink).count(),
        "реки проложены"
    );
    Ok(rivers)
}
