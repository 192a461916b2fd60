//! Проводная форма графа
//!
//! Граф в памяти — арена со связями через типизированные id. На проводе те же
//! id становятся обычными целыми числами, отсутствующая ссылка — `null`.
//! `reconstruct` проверяет, что каждая запись стоит на своём месте и каждая
//! ссылка указывает на существующую сущность.

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::config::MapConfig;
use crate::error::{EntityKind, MapResult, ReconstructionError};
use crate::graph::{Center, CenterId, Corner, CornerId, Edge, EdgeId, MapGraph, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCenter {
    pub id: u32,
    pub point: Point,
    pub ocean: bool,
    pub water: bool,
    pub coast: bool,
    pub border: bool,
    pub elevation: f32,
    pub moisture: f32,
    pub biome: Option<Biome>,
    pub neighbors: Vec<u32>,
    pub borders: Vec<u32>,
    pub corners: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdge {
    pub id: u32,
    pub midpoint: Point,
    pub river: u32,
    pub d0: Option<u32>,
    pub d1: Option<u32>,
    pub v0: Option<u32>,
    pub v1: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCorner {
    pub id: u32,
    pub point: Point,
    pub ocean: bool,
    pub water: bool,
    pub coast: bool,
    pub border: bool,
    pub elevation: f32,
    pub moisture: f32,
    pub river_size: u32,
    pub touches: Vec<u32>,
    pub protrudes: Vec<u32>,
    pub adjacent: Vec<u32>,
}

/// Граф без циклических ссылок, пригодный для сериализации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGraph {
    pub width: f32,
    pub height: f32,
    pub config: MapConfig,
    pub centers: Vec<WireCenter>,
    pub edges: Vec<WireEdge>,
    pub corners: Vec<WireCorner>,
}

fn ids<T: Copy>(list: &[T], raw: impl Fn(T) -> u32) -> Vec<u32> {
    list.iter().map(|&id| raw(id)).collect()
}

/// Заменяет все ссылки графа на целые id
#[must_use]
pub fn sanitize(graph: &MapGraph) -> WireGraph {
    let centers = graph
        .centers
        .iter()
        .map(|c| WireCenter {
            id: c.id.0,
            point: c.point,
            ocean: c.ocean,
            water: c.water,
            coast: c.coast,
            border: c.border,
            elevation: c.elevation,
            moisture: c.moisture,
            biome: c.biome,
            neighbors: ids(&c.neighbors, |id| id.0),
            borders: ids(&c.borders, |id| id.0),
            corners: ids(&c.corners, |id| id.0),
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|e| WireEdge {
            id: e.id.0,
            midpoint: e.midpoint,
            river: e.river,
            d0: e.d0.map(|id| id.0),
            d1: e.d1.map(|id| id.0),
            v0: e.v0.map(|id| id.0),
            v1: e.v1.map(|id| id.0),
        })
        .collect();

    let corners = graph
        .corners
        .iter()
        .map(|q| WireCorner {
            id: q.id.0,
            point: q.point,
            ocean: q.ocean,
            water: q.water,
            coast: q.coast,
            border: q.border,
            elevation: q.elevation,
            moisture: q.moisture,
            river_size: q.river_size,
            touches: ids(&q.touches, |id| id.0),
            protrudes: ids(&q.protrudes, |id| id.0),
            adjacent: ids(&q.adjacent, |id| id.0),
        })
        .collect();

    WireGraph {
        width: graph.width,
        height: graph.height,
        config: graph.config.clone(),
        centers,
        edges,
        corners,
    }
}

/// Раскладывает записи по их id, отвергая выход за диапазон и повторы
fn place<T>(
    kind: EntityKind,
    records: Vec<T>,
    id_of: impl Fn(&T) -> u32,
) -> Result<Vec<T>, ReconstructionError> {
    let count = records.len();
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(count).collect();
    for record in records {
        let id = id_of(&record);
        let slot = slots
            .get_mut(id as usize)
            .ok_or(ReconstructionError::IdOutOfRange { kind, id, count })?;
        if slot.is_some() {
            return Err(ReconstructionError::DuplicateId { kind, id });
        }
        *slot = Some(record);
    }
    // Ровно `count` различных id в диапазоне `0..count` заполняют все ячейки
    Ok(slots.into_iter().flatten().collect())
}

/// Проверяет ссылки одного поля сущности
struct Resolver {
    counts: [usize; 3],
}

impl Resolver {
    fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Center => self.counts[0],
            EntityKind::Edge => self.counts[1],
            EntityKind::Corner => self.counts[2],
        }
    }

    fn one(
        &self,
        owner: EntityKind,
        owner_id: u32,
        field: &'static str,
        target: EntityKind,
        target_id: u32,
    ) -> Result<u32, ReconstructionError> {
        if (target_id as usize) < self.count(target) {
            Ok(target_id)
        } else {
            Err(ReconstructionError::DanglingReference {
                owner,
                owner_id,
                field,
                target,
                target_id,
            })
        }
    }

    fn list<T: From<usize>>(
        &self,
        owner: EntityKind,
        owner_id: u32,
        field: &'static str,
        target: EntityKind,
        ids: &[u32],
    ) -> Result<Vec<T>, ReconstructionError> {
        ids.iter()
            .map(|&id| {
                self.one(owner, owner_id, field, target, id)
                    .map(|id| T::from(id as usize))
            })
            .collect()
    }

    fn optional<T: From<usize>>(
        &self,
        owner: EntityKind,
        owner_id: u32,
        field: &'static str,
        target: EntityKind,
        id: Option<u32>,
    ) -> Result<Option<T>, ReconstructionError> {
        id.map(|id| {
            self.one(owner, owner_id, field, target, id)
                .map(|id| T::from(id as usize))
        })
        .transpose()
    }
}

/// Восстанавливает граф из проводной формы
///
/// # Ошибки
/// [`ReconstructionError`] при id вне диапазона, повторном id или ссылке на
/// несуществующую сущность.
pub fn reconstruct(wire: WireGraph) -> Result<MapGraph, ReconstructionError> {
    use EntityKind::{Center as C, Corner as Q, Edge as E};

    let resolver = Resolver {
        counts: [wire.centers.len(), wire.edges.len(), wire.corners.len()],
    };

    let centers = place(C, wire.centers, |c| c.id)?
        .into_iter()
        .map(|c| {
            Ok(Center {
                id: CenterId(c.id),
                point: c.point,
                ocean: c.ocean,
                water: c.water,
                coast: c.coast,
                border: c.border,
                elevation: c.elevation,
                moisture: c.moisture,
                biome: c.biome,
                neighbors: resolver.list(C, c.id, "neighbors", C, &c.neighbors)?,
                borders: resolver.list(C, c.id, "borders", E, &c.borders)?,
                corners: resolver.list(C, c.id, "corners", Q, &c.corners)?,
            })
        })
        .collect::<Result<Vec<_>, ReconstructionError>>()?;

    let edges = place(E, wire.edges, |e| e.id)?
        .into_iter()
        .map(|e| {
            Ok(Edge {
                id: EdgeId(e.id),
                midpoint: e.midpoint,
                river: e.river,
                d0: resolver.optional(E, e.id, "d0", C, e.d0)?,
                d1: resolver.optional(E, e.id, "d1", C, e.d1)?,
                v0: resolver.optional(E, e.id, "v0", Q, e.v0)?,
                v1: resolver.optional(E, e.id, "v1", Q, e.v1)?,
            })
        })
        .collect::<Result<Vec<_>, ReconstructionError>>()?;

    let corners = place(Q, wire.corners, |q| q.id)?
        .into_iter()
        .map(|q| {
            Ok(Corner {
                id: CornerId(q.id),
                point: q.point,
                ocean: q.ocean,
                water: q.water,
                coast: q.coast,
                border: q.border,
                elevation: q.elevation,
                moisture: q.moisture,
                river_size: q.river_size,
                touches: resolver.list(Q, q.id, "touches", C, &q.touches)?,
                protrudes: resolver.list(Q, q.id, "protrudes", E, &q.protrudes)?,
                adjacent: resolver.list(Q, q.id, "adjacent", Q, &q.adjacent)?,
            })
        })
        .collect::<Result<Vec<_>, ReconstructionError>>()?;

    Ok(MapGraph {
        width: wire.width,
        height: wire.height,
        config: wire.config,
        centers,
        edges,
        corners,
    })
}

/// Сериализует граф в JSON проводной формы
pub fn to_json(graph: &MapGraph) -> serde_json::Result<String> {
    serde_json::to_string(&sanitize(graph))
}

/// Разбирает JSON и восстанавливает граф
///
/// Любая ошибка, синтаксическая или структурная, — `Reconstruction`.
pub fn from_json(json: &str) -> MapResult<MapGraph> {
    let wire: WireGraph = serde_json::from_str(json)
        .map_err(|e| ReconstructionError::Malformed(e.to_string()))?;
    Ok(reconstruct(wire)?)
}
