/// Source of uniformly distributed numbers in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl RandomSource for fastrand::Rng {
    fn next_f64(&mut self) -> f64 {
        self.f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

/// Replays a scripted sequence, then repeats its last value.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let value = match self.values.get(self.cursor) {
            Some(value) => *value,
            None => self.values.last().copied().unwrap_or(0.0),
        };
        self.cursor += 1;
        value
    }
}
