//! Вспомогательные функции и утилиты

use std::time::{Duration, Instant};

use tracing::info;

/// Измеряет время выполнения функции и записывает его в лог
pub fn timed<F, T>(label: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    info!(label, ?elapsed, "finished");
    (result, elapsed)
}

/// Проверяет, что последовательность не убывает
pub fn is_sorted<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
