//! Least-squares polynomial fitting.
//!
//! Abscissae are centred and scaled into `[-1, 1]` before solving the
//! normal equations, so large day ordinals stay well conditioned.

/// A fitted polynomial in the scaled variable `t = (x - center) / scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// Coefficients in ascending power order.
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl Polynomial {
    /// Fit a polynomial of at most `degree` to the points.
    ///
    /// The degree is lowered to `len - 1` when there are too few points.
    /// Returns `None` for empty or mismatched input and for singular systems.
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Self> {
        if xs.is_empty() || xs.len() != ys.len() {
            return None;
        }

        let degree = degree.min(xs.len() - 1);
        let terms = degree + 1;

        let center = xs.iter().sum::<f64>() / xs.len() as f64;
        let spread = xs
            .iter()
            .map(|x| (x - center).abs())
            .fold(0.0_f64, f64::max);
        let scale = if spread > 0.0 { spread } else { 1.0 };

        // Power sums for the normal equations.
        let mut power_sums = vec![0.0; 2 * degree + 1];
        let mut rhs = vec![0.0; terms];
        for (&x, &y) in xs.iter().zip(ys) {
            let t = (x - center) / scale;
            let mut power = 1.0;
            for (k, sum) in power_sums.iter_mut().enumerate() {
                *sum += power;
                if k < terms {
                    rhs[k] += y * power;
                }
                power *= t;
            }
        }

        let mut system: Vec<Vec<f64>> = (0..terms)
            .map(|row| {
                let mut line: Vec<f64> = (0..terms).map(|col| power_sums[row + col]).collect();
                line.push(rhs[row]);
                line
            })
            .collect();

        let coefficients = solve(&mut system)?;

        Some(Self {
            coefficients,
            center,
            scale,
        })
    }

    /// Number of coefficients minus one.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate at `x` (unscaled).
    pub fn eval(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }
}

/// Gaussian elimination with partial pivoting on an augmented matrix.
fn solve(system: &mut [Vec<f64>]) -> Option<Vec<f64>> {
    let n = system.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| {
            system[a][col]
                .abs()
                .partial_cmp(&system[b][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if system[pivot][col].abs() < 1e-12 {
            return None;
        }
        system.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = system[row][col] / system[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..=n {
                let delta = factor * system[col][k];
                system[row][k] -= delta;
            }
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| system[row][k] * solution[k]).sum();
        solution[row] = (system[row][n] - tail) / system[row][row];
    }

    Some(solution)
}
