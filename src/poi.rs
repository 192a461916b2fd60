//! Точки интереса: полигоны заданных биомов, выбранные детерминированно

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::biome::Biome;
use crate::graph::{CenterId, MapGraph, Point};

/// Смещение сида для расстановки точек интереса
pub const POI_SEED_OFFSET: u64 = 5_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub biome: Biome,
    pub center: CenterId,
    pub point: Point,
}

/// Расставляет точки интереса
///
/// Для каждого биома из `counts` выбирает без повторов до `count` полигонов
/// этого биома. Если подходящих полигонов меньше, ставит все и пишет warn.
/// Внутри биома точки упорядочены по id полигона.
#[must_use]
pub fn place_pois(
    graph: &MapGraph,
    counts: &BTreeMap<Biome, usize>,
    seed: u64,
) -> Vec<PointOfInterest> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(POI_SEED_OFFSET));
    let mut pois = Vec::new();

    for (&biome, &count) in counts {
        let candidates: Vec<CenterId> = graph
            .centers
            .iter()
            .filter(|c| c.biome == Some(biome))
            .map(|c| c.id)
            .collect();
        if candidates.len() < count {
            warn!(
                ?biome,
                requested = count,
                available = candidates.len(),
                "недостаточно полигонов для точек интереса"
            );
        }

        let mut chosen: Vec<CenterId> = candidates.choose_multiple(&mut rng, count).copied().collect();
        chosen.sort();
        pois.extend(chosen.into_iter().map(|center| PointOfInterest {
            biome,
            center,
            point: graph.center(center).point,
        }));
    }
    pois
}
