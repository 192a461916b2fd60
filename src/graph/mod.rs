//! Планарный граф карты: полигоны (Center), рёбра (Edge) и вершины (Corner)
//!
//! Граф хранится как арена: сущность с индексом `i` имеет id `i`, а все связи —
//! списки id, а не ссылки. Благодаря этому циклические связи
//! Center ↔ Edge ↔ Corner не создают проблем владения, а кодек сводится к
//! копированию индексов.

pub mod builder;
pub mod relax;

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::config::MapConfig;
pub use crate::points::Point;

pub use builder::build_graph;
pub use relax::relax_sites;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

entity_id!(
    /// Id полигона
    CenterId
);
entity_id!(
    /// Id ребра
    EdgeId
);
entity_id!(
    /// Id вершины
    CornerId
);

/// Полигон Вороного (ячейка карты)
#[derive(Debug, Clone, PartialEq)]
pub struct Center {
    pub id: CenterId,
    pub point: Point,
    pub ocean: bool,
    pub water: bool,
    pub coast: bool,
    pub border: bool,
    pub elevation: f32,
    pub moisture: f32,
    pub biome: Option<Biome>,

    pub neighbors: Vec<CenterId>,
    pub borders: Vec<EdgeId>,
    pub corners: Vec<CornerId>,
}

impl Center {
    #[must_use]
    pub fn new(id: CenterId, point: Point) -> Self {
        Self {
            id,
            point,
            ocean: false,
            water: false,
            coast: false,
            border: false,
            elevation: 0.0,
            moisture: 0.0,
            biome: None,
            neighbors: Vec::new(),
            borders: Vec::new(),
            corners: Vec::new(),
        }
    }
}

/// Вершина Вороного (центр описанной окружности треугольника Делоне)
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    pub id: CornerId,
    pub point: Point,
    pub ocean: bool,
    pub water: bool,
    pub coast: bool,
    pub border: bool,
    pub elevation: f32,
    pub moisture: f32,
    /// 0 — реки нет
    pub river_size: u32,

    pub touches: Vec<CenterId>,
    pub protrudes: Vec<EdgeId>,
    pub adjacent: Vec<CornerId>,
}

impl Corner {
    #[must_use]
    pub fn new(id: CornerId, point: Point) -> Self {
        Self {
            id,
            point,
            ocean: false,
            water: false,
            coast: false,
            border: false,
            elevation: 0.0,
            moisture: 0.0,
            river_size: 0,
            touches: Vec::new(),
            protrudes: Vec::new(),
            adjacent: Vec::new(),
        }
    }
}

/// Отрезок границы между двумя полигонами
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    /// Середина отрезка v0–v1
    pub midpoint: Point,
    /// Поток реки через ребро, 0 — реки нет
    pub river: u32,

    // Ребро Делоне
    pub d0: Option<CenterId>,
    pub d1: Option<CenterId>,
    // Ребро Вороного
    pub v0: Option<CornerId>,
    pub v1: Option<CornerId>,
}

impl Edge {
    #[must_use]
    pub fn new(id: EdgeId) -> Self {
        Self {
            id,
            midpoint: Point::default(),
            river: 0,
            d0: None,
            d1: None,
            v0: None,
            v1: None,
        }
    }

    /// Второй конец ребра, если `corner` — один из концов
    #[must_use]
    pub fn other_corner(&self, corner: CornerId) -> Option<CornerId> {
        match (self.v0, self.v1) {
            (Some(a), Some(b)) if a == corner => Some(b),
            (Some(a), Some(b)) if b == corner => Some(a),
            _ => None,
        }
    }
}

/// Граф карты. Владеет всеми сущностями
#[derive(Debug, Clone, PartialEq)]
pub struct MapGraph {
    pub width: f32,
    pub height: f32,
    pub config: MapConfig,
    pub centers: Vec<Center>,
    pub edges: Vec<Edge>,
    pub corners: Vec<Corner>,
}

impl MapGraph {
    #[must_use]
    pub fn center(&self, id: CenterId) -> &Center {
        &self.centers[id.index()]
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    #[must_use]
    pub fn corner(&self, id: CornerId) -> &Corner {
        &self.corners[id.index()]
    }

    /// Ребро, соединяющее две вершины
    #[must_use]
    pub fn edge_between(&self, a: CornerId, b: CornerId) -> Option<EdgeId> {
        self.corner(a)
            .protrudes
            .iter()
            .copied()
            .find(|&e| self.edge(e).other_corner(a) == Some(b))
    }

    /// Ребро между двумя соседними полигонами
    #[must_use]
    pub fn edge_between_centers(&self, a: CenterId, b: CenterId) -> Option<EdgeId> {
        self.center(a).borders.iter().copied().find(|&e| {
            let edge = self.edge(e);
            (edge.d0 == Some(a) && edge.d1 == Some(b)) || (edge.d0 == Some(b) && edge.d1 == Some(a))
        })
    }

    /// Количество (полигонов, рёбер, вершин)
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.centers.len(), self.edges.len(), self.corners.len())
    }
}
