//! Test data builders for creating test objects

use dataplot_rs::Dataset2D;

/// Builder for uniformly sampled test datasets
pub struct DatasetBuilder {
    points: usize,
    start: f64,
    step: f64,
}

impl DatasetBuilder {
    pub fn new(points: usize) -> Self {
        Self {
            points,
            start: 0.0,
            step: 1.0,
        }
    }

    pub fn start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// X values this builder produces
    pub fn x(&self) -> Vec<f64> {
        (0..self.points)
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }

    /// Build with Y computed from X
    pub fn build_with(self, f: impl Fn(f64) -> f64) -> Dataset2D {
        Dataset2D::from_points(self.x().into_iter().map(|x| (x, f(x))))
    }

    /// Build with the given Y values (extra X values are dropped)
    pub fn build_from(self, y: &[f64]) -> Dataset2D {
        Dataset2D::from_points(self.x().into_iter().zip(y.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_builder() {
        let data = DatasetBuilder::new(3)
            .start(1.0)
            .step(0.5)
            .build_with(|x| x * 2.0);

        assert_eq!(data.x(), &[1.0, 1.5, 2.0]);
        assert_eq!(data.y(), &[2.0, 3.0, 4.0]);
    }
}
