//! Форма острова: оценка «сушности» точки
//!
//! Точка переводится в нормализованные координаты `q ∈ [-1, 1]²` (центр карты — 0).
//! Радиальная форма — это `1 - |q - c| / R` для ближайшего центра острова,
//! сложная форма дополнительно искажается шумом.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{IslandShape, MapConfig};
use crate::graph::Point;
use crate::noise::{COASTAL_SEED_OFFSET, ISLAND_SEED_OFFSET, NoiseField};

/// Радиус кольца, на котором расставляются центры нескольких островов
const ISLAND_RING_RADIUS: f32 = 0.5;
/// Доля крупномасштабного шума формы (остальное — шум береговой линии)
const SHAPE_NOISE_SHARE: f32 = 0.75;

#[derive(Debug)]
pub struct IslandShaper {
    shape: IslandShape,
    threshold: f32,
    width: f32,
    height: f32,
    noise_scale: f32,
    noise_intensity: f32,
    coastal_frequency: f32,
    /// Центры островов в нормализованных координатах
    centres: Vec<(f32, f32)>,
    radius: f32,
    island_noise: NoiseField,
    coastal_noise: NoiseField,
}

impl IslandShaper {
    pub fn new(config: &MapConfig) -> Self {
        let count = config.island_count.max(1);
        let centres = if count == 1 {
            vec![(0.0, 0.0)]
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(config.noise_seed);
            let offset = rng.gen_range(0.0..std::f32::consts::TAU);
            (0..count)
                .map(|i| {
                    let angle = offset + i as f32 * std::f32::consts::TAU / count as f32;
                    (
                        ISLAND_RING_RADIUS * angle.cos(),
                        ISLAND_RING_RADIUS * angle.sin(),
                    )
                })
                .collect()
        };

        Self {
            shape: config.island_shape,
            threshold: config.island_factor,
            width: config.width,
            height: config.height,
            noise_scale: config.noise_scale,
            noise_intensity: config.noise_intensity,
            coastal_frequency: config.coastal_noise_frequency,
            centres,
            radius: 1.0 / (count as f32).sqrt(),
            island_noise: NoiseField::derived(config.noise_seed, ISLAND_SEED_OFFSET),
            coastal_noise: NoiseField::derived(config.noise_seed, COASTAL_SEED_OFFSET),
        }
    }

    pub fn normalize(&self, p: Point) -> (f32, f32) {
        (2.0 * p.x / self.width - 1.0, 2.0 * p.y / self.height - 1.0)
    }

    /// Радиальный спад от ближайшего центра острова
    fn radial(&self, (qx, qy): (f32, f32)) -> f32 {
        self.centres
            .iter()
            .map(|&(cx, cy)| {
                let d = ((qx - cx).powi(2) + (qy - cy).powi(2)).sqrt();
                1.0 - d / self.radius
            })
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn land_score(&self, p: Point) -> f32 {
        let q = self.normalize(p);
        let base = self.radial(q);
        match self.shape {
            IslandShape::Radial => base,
            IslandShape::Complex => {
                let shape = self
                    .island_noise
                    .sample_scaled(q.0, q.1, self.noise_scale, SHAPE_NOISE_SHARE);
                let coast = self.coastal_noise.sample_scaled(
                    p.x,
                    p.y,
                    self.coastal_frequency,
                    1.0 - SHAPE_NOISE_SHARE,
                );
                base + self.noise_intensity * (shape + coast)
            }
        }
    }

    /// Точка ниже порога суши
    pub fn is_low(&self, p: Point) -> bool {
        self.land_score(p) < self.threshold
    }
}
