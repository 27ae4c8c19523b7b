//! Модуль для работы с матрицами
//!
//! Предоставляет:
//! - Типы матриц
//! - Операции над матрицами
//! - Бэкенды умножения: последовательный, параллельный и OpenCL

mod types;
pub mod backend;
pub mod display;
pub mod operations;
#[cfg(feature = "opencl")]
pub mod kernels;

pub use types::{Element, Matrix, MatrixType};
pub use backend::{BackendKind, MultiplyBackend, Parallel, Sequential};
pub use operations::{compare, initialize_matrices, multiply, multiply_with, Comparison};
#[cfg(feature = "opencl")]
pub use kernels::MATRIX_MULTIPLY_KERNEL;
