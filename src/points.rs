//! Выбор исходных точек для диаграммы Вороного

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::PointSelection;

/// Точка на карте
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_squared(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Число попыток вокруг активной точки в алгоритме Бридсона
const POISSON_ATTEMPTS: usize = 30;

/// Генерирует ровно `count` точек внутри `[0, width] × [0, height]`
#[must_use]
pub fn sample_points(
    width: f32,
    height: f32,
    count: usize,
    seed: u64,
    selection: PointSelection,
) -> Vec<Point> {
    if count == 0 || !(width > 0.0 && height > 0.0) {
        return Vec::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match selection {
        PointSelection::Random => random_points(&mut rng, width, height, count),
        PointSelection::Poisson => poisson_points(&mut rng, width, height, count),
    }
}

fn random_points(rng: &mut ChaCha8Rng, width: f32, height: f32, count: usize) -> Vec<Point> {
    (0..count)
        .map(|_| Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect()
}

/// Диск Пуассона (Бридсон). Радиус подобран так, чтобы точек получилось с запасом;
/// лишние отбрасываются после перемешивания, недостающие добираются случайными.
fn poisson_points(rng: &mut ChaCha8Rng, width: f32, height: f32, count: usize) -> Vec<Point> {
    // Бридсон даёт ≈ 0.65·S/r² точек, при 0.5·S/count получается запас около четверти
    let radius = (0.5 * width * height / count as f32).sqrt();
    let cell = radius / std::f32::consts::SQRT_2;
    let cols = (width / cell).ceil() as usize + 1;
    let rows = (height / cell).ceil() as usize + 1;
    let mut grid: Vec<Option<usize>> = vec![None; cols * rows];
    let cell_of = |p: Point| ((p.x / cell) as usize, (p.y / cell) as usize);

    let mut points = Vec::with_capacity(count * 2);
    let mut active = Vec::new();

    let first = Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
    let (cx, cy) = cell_of(first);
    grid[cy * cols + cx] = Some(0);
    points.push(first);
    active.push(0);

    while !active.is_empty() {
        let slot = rng.gen_range(0..active.len());
        let origin = points[active[slot]];
        let mut placed = false;

        for _ in 0..POISSON_ATTEMPTS {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let dist = rng.gen_range(radius..2.0 * radius);
            let candidate = Point::new(
                origin.x + dist * angle.cos(),
                origin.y + dist * angle.sin(),
            );
            if candidate.x < 0.0
                || candidate.x >= width
                || candidate.y < 0.0
                || candidate.y >= height
            {
                continue;
            }

            let (gx, gy) = cell_of(candidate);
            let mut free = true;
            'scan: for ny in gy.saturating_sub(2)..=(gy + 2).min(rows - 1) {
                for nx in gx.saturating_sub(2)..=(gx + 2).min(cols - 1) {
                    if let Some(i) = grid[ny * cols + nx] {
                        if points[i].distance_squared(candidate) < radius * radius {
                            free = false;
                            break 'scan;
                        }
                    }
                }
            }

            if free {
                grid[gy * cols + gx] = Some(points.len());
                active.push(points.len());
                points.push(candidate);
                placed = true;
                break;
            }
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    points.shuffle(rng);
    points.truncate(count);
    while points.len() < count {
        points.push(Point::new(
            rng.gen_range(0.0..width),
            rng.gen_range(0.0..height),
        ));
    }
    points
}
