use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// Light direction of an emboss kernel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbossDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl EmbossDirection {
    pub const ALL: [EmbossDirection; 8] = [
        EmbossDirection::North,
        EmbossDirection::NorthEast,
        EmbossDirection::East,
        EmbossDirection::SouthEast,
        EmbossDirection::South,
        EmbossDirection::SouthWest,
        EmbossDirection::West,
        EmbossDirection::NorthWest,
    ];

    /// Unit step in image coordinates (y grows downwards).
    pub fn vector(&self) -> (i32, i32) {
        match self {
            EmbossDirection::North => (0, -1),
            EmbossDirection::NorthEast => (1, -1),
            EmbossDirection::East => (1, 0),
            EmbossDirection::SouthEast => (1, 1),
            EmbossDirection::South => (0, 1),
            EmbossDirection::SouthWest => (-1, 1),
            EmbossDirection::West => (-1, 0),
            EmbossDirection::NorthWest => (-1, -1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EmbossDirection::North => "north",
            EmbossDirection::NorthEast => "north-east",
            EmbossDirection::East => "east",
            EmbossDirection::SouthEast => "south-east",
            EmbossDirection::South => "south",
            EmbossDirection::SouthWest => "south-west",
            EmbossDirection::West => "west",
            EmbossDirection::NorthWest => "north-west",
        }
    }
}

/// A square convolution kernel of side `2 * radius + 1`, weights in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    radius: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// # Errors
    ///
    /// Fails if `weights` doesn't hold `(2 * radius + 1)²` entries.
    pub fn from_weights(radius: usize, weights: Vec<f32>) -> Result<Self> {
        let side = 2 * radius + 1;
        if weights.len() != side * side {
            return Err(EngineError::parameter(
                "weights",
                format!("a radius {radius} kernel needs {} weights, got {}", side * side, weights.len()),
            ));
        }
        Ok(Self { radius, weights })
    }

    fn from_fn(radius: usize, f: impl Fn(i32, i32) -> f32) -> Self {
        let r = radius as i32;
        let mut weights = Vec::with_capacity((2 * radius + 1).pow(2));
        for ky in -r..=r {
            for kx in -r..=r {
                weights.push(f(kx, ky));
            }
        }
        Self { radius, weights }
    }

    /// Box kernel averaging the `(2r+1)²` neighbourhood.
    pub fn mean(radius: usize) -> Self {
        let n = ((2 * radius + 1) * (2 * radius + 1)) as f32;
        Self::from_fn(radius, |_, _| 1.0 / n)
    }

    /// Normalised binomial kernel; radius 1 gives the classic 1-2-1 / 16 kernel.
    pub fn gaussian(radius: usize) -> Self {
        let row = binomial_row(2 * radius);
        let sum: f64 = row.iter().sum();
        let norm = sum * sum;
        let r = radius as i32;
        Self::from_fn(radius, |kx, ky| (row[(kx + r) as usize] * row[(ky + r) as usize] / norm) as f32)
    }

    pub fn sharpen() -> Self {
        Self {
            radius: 1,
            weights: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
        }
    }

    /// Horizontal gradient: positive where intensity grows towards +x.
    pub fn sobel_horizontal() -> Self {
        Self {
            radius: 1,
            weights: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    /// Vertical gradient: positive where intensity grows towards +y.
    pub fn sobel_vertical() -> Self {
        Self {
            radius: 1,
            weights: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
        }
    }

    pub fn emboss(direction: EmbossDirection) -> Self {
        let (dx, dy) = direction.vector();
        Self::from_fn(1, |kx, ky| (kx * dx + ky * dy).signum() as f32)
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at offset (`kx`, `ky`) from the centre.
    pub fn weight(&self, kx: i32, ky: i32) -> f32 {
        let r = self.radius as i32;
        self.weights[((ky + r) as usize) * self.side() + (kx + r) as usize]
    }

    #[cfg(test)]
    pub(crate) fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

fn binomial_row(n: usize) -> Vec<f64> {
    let mut row = vec![1.0f64];
    for _ in 0..n {
        let mut next = Vec::with_capacity(row.len() + 1);
        next.push(1.0);
        for w in row.windows(2) {
            next.push(w[0] + w[1]);
        }
        next.push(1.0);
        row = next;
    }
    row
}
