use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::{MatrixError, Result};
use crate::math::matrix::Matrix;

fn uniform(min: f64, max: f64) -> Result<Uniform<f64>> {
    // Uniform::new panics on an empty range or when max - min overflows.
    if min.is_nan() || max.is_nan() || min >= max || !(max - min).is_finite() {
        return Err(MatrixError::InvalidRange { min, max });
    }
    Ok(Uniform::new(min, max))
}

impl Matrix {
    /// Overwrites every element with a sample from `[min, max)` using the
    /// thread-local generator.
    pub fn randomize(&mut self, min: f64, max: f64) -> Result<&mut Self> {
        self.randomize_with(&mut rand::thread_rng(), min, max)
    }

    /// Like [`Matrix::randomize`] with a caller-supplied generator, e.g. a
    /// seeded `StdRng` for reproducible output.
    pub fn randomize_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        min: f64,
        max: f64,
    ) -> Result<&mut Self> {
        let dist = uniform(min, max)?;
        Ok(self.mapv_inplace(|_| dist.sample(&mut *rng)))
    }

    pub fn random(rows: usize, cols: usize, min: f64, max: f64) -> Result<Matrix> {
        let mut m = Matrix::zeros(rows, cols);
        m.randomize(min, max)?;
        Ok(m)
    }
}
