use serde::{Deserialize, Serialize};

/// Inclusive acceptance band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }
}

pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); undefined below two values.
pub fn sample_sd(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (xs.len() - 1) as f64).sqrt())
}

/// Observed location and spread of one metric over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: Option<f64>,
    pub sd: Option<f64>,
}

impl Summary {
    pub fn of(xs: &[f64]) -> Self {
        Self { mean: mean(xs), sd: sample_sd(xs) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_inclusive() {
        let b = Band::new(6.0, 10.0);
        assert!(b.contains(6.0));
        assert!(b.contains(10.0));
        assert!(!b.contains(5.99));
        assert!(!b.contains(10.01));
    }

    #[test]
    fn sd_uses_n_minus_one() {
        let sd = sample_sd(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138).abs() < 1e-3);
        assert_eq!(sample_sd(&[3.0]), None);
        assert_eq!(mean(&[]), None);
    }
}
