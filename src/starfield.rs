// Star field behind the 2D map, regenerated when the window size changes.
use fast_poisson::Poisson2D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Position with the origin at the window centre.
    pub position: [f32; 2],
    /// Twinkle phase offset in radians.
    pub phase: f32,
    pub size: f32,
}

/// Owned cache of stars. One per surface, never shared.
#[derive(Debug, Default)]
pub struct StarField {
    bounds: [f32; 2],
    seed: u64,
    stars: Vec<Star>,
}

const TWINKLE_SPEED: f32 = 2.5;

impl StarField {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Replaces every star with up to `count` blue-noise points filling `width` x `height`.
    pub fn init(&mut self, width: f32, height: f32, count: usize) {
        self.bounds = [width, height];
        self.stars.clear();
        if count == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }

        // Spacing that packs roughly `count` points into the area.
        let radius = (width * height / count as f32).sqrt() * 0.7;
        let points: Vec<[f32; 2]> = Poisson2D::new()
            .with_dimensions([width, height], radius)
            .with_seed(self.seed)
            .generate();

        self.stars = points
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(i, [x, y])| Star {
                position: [x - width / 2.0, y - height / 2.0],
                phase: (i as f32 * 2.399).rem_euclid(std::f32::consts::TAU),
                size: 1.0 + (i % 3) as f32,
            })
            .collect();
    }

    /// Reinitialises only when the bounds differ from the last `init`.
    pub fn resize(&mut self, width: f32, height: f32, count: usize) -> bool {
        if self.bounds == [width, height] {
            return false;
        }
        self.init(width, height, count);
        true
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn bounds(&self) -> [f32; 2] {
        self.bounds
    }
}

/// Brightness in `[0.3, 1.0]` for a star at time `t`.
pub fn twinkle(star: &Star, t: f32) -> f32 {
    0.65 + 0.35 * (t * TWINKLE_SPEED + star.phase).sin()
}
