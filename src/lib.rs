//! Процедурный генератор карт-островов на полигонах Вороного
//!
//! Граф Center/Edge/Corner строится по набору точек, релаксируется, формируется
//! в острова шумом, получает высоты, влажность, реки и биомы и передаётся
//! через границу сериализации без циклических ссылок.

pub mod biome;
pub mod cancel;
pub mod codec;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod noise;
pub mod poi;
pub mod points;
pub mod rivers;
pub mod store;
pub mod terrain;
pub mod validate;
pub mod view;

pub use biome::{Biome, BiomeTable};
pub use cancel::CancelToken;
pub use codec::{WireGraph, reconstruct, sanitize};
pub use config::{IslandShape, MapConfig, PointSelection};
pub use error::{MapError, MapResult, ReconstructionError};
pub use generator::{GeneratedMap, MapGenerator, generate_map};
pub use graph::{Center, CenterId, Corner, CornerId, Edge, EdgeId, MapGraph, Point};
pub use rivers::{RiverEnd, RiverPath};
pub use view::{ViewMode, center_colors};
