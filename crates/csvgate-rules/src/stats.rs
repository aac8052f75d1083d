//! Descriptive statistics over numeric samples.
//!
//! Every function takes the sample as given (unsorted, non-empty unless noted)
//! and reports impossible computations as `Err` with a short reason.

pub type StatResult = Result<f64, String>;

fn require_values(values: &[f64]) -> Result<(), String> {
    if values.is_empty() {
        return Err("the column has no values".to_string());
    }
    Ok(())
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> StatResult {
    require_values(values)?;
    Ok(sum(values) / values.len() as f64)
}

pub fn min(values: &[f64]) -> StatResult {
    require_values(values)?;
    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

pub fn max(values: &[f64]) -> StatResult {
    require_values(values)?;
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

pub fn median(values: &[f64]) -> StatResult {
    require_values(values)?;
    Ok(median_sorted(&sorted(values)))
}

/// Most frequent value; ties resolve to the smallest candidate.
pub fn mode(values: &[f64]) -> StatResult {
    require_values(values)?;
    let sorted = sorted(values);
    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut index = 0;
    while index < sorted.len() {
        let current = sorted[index];
        let mut run = 0;
        while index < sorted.len() && sorted[index] == current {
            run += 1;
            index += 1;
        }
        if run > best_count {
            best = current;
            best_count = run;
        }
    }
    Ok(best)
}

/// Percentile with linear interpolation between closest ranks (`0..=100`).
pub fn percentile(values: &[f64], percentile: f64) -> StatResult {
    require_values(values)?;
    if !(0.0..=100.0).contains(&percentile) {
        return Err(format!("percentile {percentile} is outside 0..100"));
    }
    let sorted = sorted(values);
    let rank = percentile / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuartileMethod {
    /// The median is excluded from both halves when the sample size is odd.
    Exclusive,
    /// The median is included in both halves when the sample size is odd.
    Inclusive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q0: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub q4: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

pub fn quartiles(values: &[f64], method: QuartileMethod) -> Result<Quartiles, String> {
    require_values(values)?;
    let sorted = sorted(values);
    let n = sorted.len();
    if n == 1 {
        let v = sorted[0];
        return Ok(Quartiles {
            q0: v,
            q1: v,
            q2: v,
            q3: v,
            q4: v,
        });
    }
    let half = n / 2;
    let (lower, upper) = if n % 2 == 0 {
        (&sorted[..half], &sorted[half..])
    } else {
        match method {
            QuartileMethod::Exclusive => (&sorted[..half], &sorted[half + 1..]),
            QuartileMethod::Inclusive => (&sorted[..=half], &sorted[half..]),
        }
    };
    Ok(Quartiles {
        q0: sorted[0],
        q1: median_sorted(lower),
        q2: median_sorted(&sorted),
        q3: median_sorted(upper),
        q4: sorted[n - 1],
    })
}

pub fn midhinge(values: &[f64]) -> StatResult {
    let q = quartiles(values, QuartileMethod::Exclusive)?;
    Ok((q.q1 + q.q3) / 2.0)
}

pub fn trimean(values: &[f64]) -> StatResult {
    let q = quartiles(values, QuartileMethod::Exclusive)?;
    Ok((q.q1 + 2.0 * q.q2 + q.q3) / 4.0)
}

/// Mean of the values lying within the interquartile range.
pub fn interquartile_mean(values: &[f64]) -> StatResult {
    let q = quartiles(values, QuartileMethod::Exclusive)?;
    let inner: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= q.q1 && *v <= q.q3)
        .collect();
    mean(&inner)
}

pub fn mean_abs_dev(values: &[f64]) -> StatResult {
    let center = mean(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    mean(&deviations)
}

pub fn median_abs_dev(values: &[f64]) -> StatResult {
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

fn squared_deviations(values: &[f64]) -> StatResult {
    let center = mean(values)?;
    Ok(values.iter().map(|v| (v - center).powi(2)).sum())
}

pub fn population_variance(values: &[f64]) -> StatResult {
    Ok(squared_deviations(values)? / values.len() as f64)
}

pub fn sample_variance(values: &[f64]) -> StatResult {
    if values.len() < 2 {
        return Err("sample variance needs at least two values".to_string());
    }
    Ok(squared_deviations(values)? / (values.len() - 1) as f64)
}

pub fn stddev(values: &[f64]) -> StatResult {
    Ok(sample_variance(values)?.sqrt())
}

pub fn stddev_pop(values: &[f64]) -> StatResult {
    Ok(population_variance(values)?.sqrt())
}

/// Sample standard deviation relative to the mean.
pub fn coef_of_var(values: &[f64]) -> StatResult {
    let center = mean(values)?;
    if center == 0.0 {
        return Err("the mean is zero".to_string());
    }
    Ok(stddev(values)? / center)
}

pub fn cubic_mean(values: &[f64]) -> StatResult {
    let cubes: Vec<f64> = values.iter().map(|v| v.powi(3)).collect();
    Ok(mean(&cubes)?.cbrt())
}

pub fn geometric_mean(values: &[f64]) -> StatResult {
    require_values(values)?;
    if values.iter().any(|v| *v <= 0.0) {
        return Err("geometric mean requires positive values".to_string());
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    Ok((log_sum / values.len() as f64).exp())
}

pub fn harmonic_mean(values: &[f64]) -> StatResult {
    require_values(values)?;
    if values.iter().any(|v| *v <= 0.0) {
        return Err("harmonic mean requires positive values".to_string());
    }
    let reciprocal_sum: f64 = values.iter().map(|v| 1.0 / v).sum();
    Ok(values.len() as f64 / reciprocal_sum)
}

pub fn root_mean_square(values: &[f64]) -> StatResult {
    let squares: Vec<f64> = values.iter().map(|v| v * v).collect();
    Ok(mean(&squares)?.sqrt())
}

pub fn contraharmonic_mean(values: &[f64]) -> StatResult {
    require_values(values)?;
    let total = sum(values);
    if total == 0.0 {
        return Err("the sum of values is zero".to_string());
    }
    let squares: f64 = values.iter().map(|v| v * v).sum();
    Ok(squares / total)
}

pub fn is_prime(value: i64) -> bool {
    if value < 2 {
        return false;
    }
    if value < 4 {
        return true;
    }
    if value % 2 == 0 {
        return false;
    }
    let mut divisor = 3i64;
    while divisor.saturating_mul(divisor) <= value {
        if value % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}
