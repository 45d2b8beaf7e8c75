use crate::domain::errors::ModelError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices of a shuffled train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..n` with `seed` and holds out `ceil(n * test_size)` rows.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<SplitIndices, ModelError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ModelError::Training {
            reason: format!("test size {} not in (0, 1)", test_size),
        });
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(ModelError::Training {
            reason: format!(
                "{} rows cannot be split {:.0}/{:.0}",
                n,
                (1.0 - test_size) * 100.0,
                test_size * 100.0
            ),
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices.split_off(n - n_test);
    Ok(SplitIndices {
        train: indices,
        test,
    })
}
