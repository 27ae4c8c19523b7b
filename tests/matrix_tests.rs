//! Tests for matrix multiplication backends.
//!
//! ## Test Organization
//!
//! 1. **Concrete Scenarios** - The 2x2 product and identity
//! 2. **Oracle Checks** - Backends against `ndarray` on random input
//! 3. **Error Reporting** - Dimension mismatch and overflow

use ndarray::Array2;
use nctools::matrix::{
    compare, initialize_matrices, multiply, multiply_with, BackendKind, Matrix, MatrixType, MultiplyBackend,
    Parallel, Sequential,
};
use nctools::KernelError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix<i64> {
    Matrix::new(rows, cols, (0..rows * cols).map(|_| rng.gen_range(-50..50)).collect()).unwrap()
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn test_two_by_two_product() {
    let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
    let expected = Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]).unwrap();

    assert_eq!(multiply(&a, &b).unwrap(), expected);
    assert_eq!(Parallel::default().multiply(&a, &b).unwrap(), expected);
}

#[test]
fn test_identity_leaves_matrix_unchanged() {
    let mut rng = StdRng::seed_from_u64(1);
    let a = random_matrix(&mut rng, 12, 12);
    let identity = Matrix::identity(12);

    assert_eq!(multiply(&a, &identity).unwrap(), a);
    assert_eq!(multiply(&identity, &a).unwrap(), a);
}

#[test]
fn test_product_sums_every_term() {
    // при присваивании вместо накопления осталось бы только последнее слагаемое
    let a: Matrix<i64> = Matrix::filled(3, 3, 1);
    let b: Matrix<i64> = Matrix::filled(3, 3, 2);
    let c = multiply(&a, &b).unwrap();
    assert!(c.as_slice().iter().all(|&v| v == 6));
}

#[test]
fn test_float_elements() {
    let a = Matrix::from_rows(vec![vec![0.5, 1.5]]).unwrap();
    let b = Matrix::from_rows(vec![vec![2.0], vec![4.0]]).unwrap();
    let c = multiply(&a, &b).unwrap();
    assert!((c[(0, 0)] - 7.0f64).abs() < 1e-12);
}

// ============================================================================
// Oracle Checks
// ============================================================================

#[test]
fn test_backends_match_ndarray_oracle() {
    let mut rng = StdRng::seed_from_u64(314);
    let backends: Vec<Box<dyn MultiplyBackend<i64>>> = vec![
        Box::new(Sequential),
        Box::new(Parallel { min_cells_per_task: 1 }),
        Box::new(Parallel::default()),
    ];

    for (m, k, n) in [(1, 1, 1), (3, 4, 5), (16, 16, 16), (31, 7, 2)] {
        let a = random_matrix(&mut rng, m, k);
        let b = random_matrix(&mut rng, k, n);
        let oracle: Array2<i64> = a.to_ndarray().dot(&b.to_ndarray());

        for backend in &backends {
            let c = multiply_with(backend.as_ref(), &a, &b).unwrap();
            assert_eq!(c.to_ndarray(), oracle, "{} differs for {m}x{k}x{n}", backend.name());
        }
    }
}

#[test]
fn test_default_size_random_fill() {
    let mut rng = StdRng::seed_from_u64(77);
    let (a, b) = initialize_matrices(MatrixType::Random, 100, 100 * 100, &mut rng).unwrap();

    let sequential = multiply(&a, &b).unwrap();
    let parallel = BackendKind::Parallel.create().unwrap().multiply(&a, &b).unwrap();

    let summary = compare(&parallel, &sequential, 0.0).unwrap();
    assert!(summary.matches(), "{summary:?}");
    assert_eq!(sequential, a.checked_product(&b).unwrap());
}

// ============================================================================
// Error Reporting
// ============================================================================

#[test]
fn test_dimension_mismatch_is_reported() {
    let a: Matrix<i64> = Matrix::zeros(3, 3);
    let b: Matrix<i64> = Matrix::zeros(4, 4);
    let expected = KernelError::DimensionMismatch { left_rows: 3, left_cols: 3, right_rows: 4, right_cols: 4 };

    assert_eq!(multiply(&a, &b).unwrap_err(), expected);
    assert_eq!(Parallel::default().multiply(&a, &b).unwrap_err(), expected);
    assert_eq!(a.checked_product(&b).unwrap_err(), expected);
    assert!(compare(&a, &b, 0.0).is_err());
}

#[test]
fn test_overflow_is_reported() {
    let a = Matrix::from_rows(vec![vec![1i64, 1], vec![i64::MAX, 1]]).unwrap();
    let b = Matrix::from_rows(vec![vec![1i64, 0], vec![1, 0]]).unwrap();
    assert_eq!(a.checked_product(&b).unwrap_err(), KernelError::Overflow { row: 1, col: 0 });
}
