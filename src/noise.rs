use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

/// Смещения сида для независимых полей шума
pub const ISLAND_SEED_OFFSET: u64 = 0;
pub const COASTAL_SEED_OFFSET: u64 = 1_000_000;
pub const MOISTURE_SEED_OFFSET: u64 = 2_000_000;

/// Детерминированное двумерное поле когерентного шума
///
/// Значения в [-1, 1], чистая функция от `(seed, x, y)`. Частота и амплитуда
/// задаются вызывающей стороной, базовая частота поля равна 1.
pub struct NoiseField {
    seed: u64,
    noise: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let mut noise = FastNoiseLite::new();
        // Старшие 32 бита смешиваются с младшими: семена,
        // различающиеся на 1 << 32, дают разный шум
        noise.set_seed(Some((seed ^ (seed >> 32)) as i32));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(4));
        noise.set_frequency(Some(1.0));
        Self { seed, noise }
    }

    /// Поле с сидом `seed + offset`
    pub fn derived(seed: u64, offset: u64) -> Self {
        Self::new(seed.wrapping_add(offset))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        self.noise.get_noise_2d(x, y).clamp(-1.0, 1.0)
    }

    /// `amplitude * sample(x * scale, y * scale)`
    pub fn sample_scaled(&self, x: f32, y: f32, scale: f32, amplitude: f32) -> f32 {
        amplitude * self.sample(x * scale, y * scale)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}
