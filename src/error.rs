//! Типы ошибок библиотеки

use thiserror::Error;

/// Основной тип ошибки для сортировки и матричных операций
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Диапазон `[low, high]` не укладывается в последовательность длины `len`
    #[error("invalid range [{low}, {high}] for sequence of length {len}")]
    InvalidRange { low: usize, high: usize, len: usize },

    /// Размеры матриц несовместимы для умножения
    #[error("dimension mismatch: {left_rows}x{left_cols} * {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Длина буфера не соответствует заявленным размерам матрицы
    #[error("buffer of {got} elements cannot hold a {rows}x{cols} matrix")]
    BufferSize { rows: usize, cols: usize, got: usize },

    /// Переполнение при вычислении ячейки (row, col)
    #[error("integer overflow while computing cell ({row}, {col})")]
    Overflow { row: usize, col: usize },

    /// Некорректная конфигурация
    #[error("configuration error: {0}")]
    Config(String),

    /// Ошибка вычислительного бэкенда (код возврата драйвера)
    #[error("backend call {call} failed with status {code}")]
    Backend { call: &'static str, code: i32 },

    /// Ошибка бэкенда без кода возврата
    #[error("backend error: {0}")]
    BackendMessage(String),
}

/// Псевдоним результата для операций библиотеки
pub type Result<T> = std::result::Result<T, KernelError>;
