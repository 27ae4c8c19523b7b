//! Параллельная сортировка слиянием на пуле потоков `rayon`

use std::cmp::Ordering;

use tracing::debug;

use super::{checked_range, left_len, merge::merge};
use crate::error::{KernelError, Result};

/// Длина, ниже которой половины сортируются в текущем потоке
pub const DEFAULT_SEQUENTIAL_CUTOFF: usize = 4096;

/// Сортировка слиянием, сортирующая половины параллельно
///
/// Половины обрабатываются через `rayon::join` и синхронизируются перед
/// слиянием. Порядок результата совпадает с последовательной версией,
/// включая порядок равных элементов.
#[derive(Debug, Clone, Copy)]
pub struct ParallelMergeSort {
    cutoff: usize,
}

impl Default for ParallelMergeSort {
    fn default() -> Self {
        Self { cutoff: DEFAULT_SEQUENTIAL_CUTOFF }
    }
}

impl ParallelMergeSort {
    /// Создает сортировку с заданным порогом последовательного режима
    pub fn with_cutoff(cutoff: usize) -> Result<Self> {
        if cutoff == 0 {
            return Err(KernelError::Config("parallel cutoff must be positive".to_string()));
        }
        Ok(Self { cutoff })
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    pub fn sort<T>(&self, sequence: &mut [T])
    where
        T: Ord + Clone + Send,
    {
        self.sort_by(sequence, T::cmp);
    }

    pub fn sort_by<T, F>(&self, sequence: &mut [T], compare: F)
    where
        T: Clone + Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        debug!(len = sequence.len(), cutoff = self.cutoff, "parallel merge sort");
        self.sort_slice(sequence, &compare);
    }

    /// Сортирует включительный поддиапазон `[low, high]`
    pub fn sort_range<T>(&self, sequence: &mut [T], low: usize, high: usize) -> Result<()>
    where
        T: Ord + Clone + Send,
    {
        self.sort_range_by(sequence, low, high, T::cmp)
    }

    pub fn sort_range_by<T, F>(&self, sequence: &mut [T], low: usize, high: usize, compare: F) -> Result<()>
    where
        T: Clone + Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        let range = checked_range(sequence.len(), low, high)?;
        self.sort_by(&mut sequence[range], compare);
        Ok(())
    }

    fn sort_slice<T, F>(&self, slice: &mut [T], compare: &F)
    where
        T: Clone + Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        if slice.len() < 2 {
            return;
        }
        let mid = left_len(slice.len());
        {
            let (left, right) = slice.split_at_mut(mid);
            if left.len() + right.len() <= self.cutoff {
                self.sort_slice(left, compare);
                self.sort_slice(right, compare);
            } else {
                rayon::join(|| self.sort_slice(left, compare), || self.sort_slice(right, compare));
            }
        }
        merge(slice, mid, &mut |a: &T, b: &T| compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::merge_sort;

    #[test]
    fn matches_sequential_sort() {
        let mut expected: Vec<i64> = (0..5000).map(|i| (i * 7919) % 1013 - 500).collect();
        let mut actual = expected.clone();

        merge_sort(&mut expected);
        ParallelMergeSort::with_cutoff(16).unwrap().sort(&mut actual);

        assert_eq!(actual, expected);
    }

    #[test]
    fn keeps_equal_keys_in_order() {
        let mut data: Vec<(u8, usize)> = (0..300).map(|i| ((i % 3) as u8, i)).collect();
        ParallelMergeSort::with_cutoff(8).unwrap().sort_by(&mut data, |a, b| a.0.cmp(&b.0));

        for w in data.windows(2) {
            if w[0].0 == w[1].0 {
                assert!(w[0].1 < w[1].1);
            }
        }
    }

    #[test]
    fn range_with_comparator_sorts_descending() {
        let mut data: Vec<i32> = (0..40).collect();
        let sorter = ParallelMergeSort::with_cutoff(4).unwrap();
        sorter.sort_range_by(&mut data, 10, 19, |a, b| b.cmp(a)).unwrap();

        let expected: Vec<i32> = (0..10).chain((10..20).rev()).chain(20..40).collect();
        assert_eq!(data, expected);
        assert_eq!(
            sorter.sort_range_by(&mut data, 5, 40, |a, b| b.cmp(a)),
            Err(KernelError::InvalidRange { low: 5, high: 40, len: 40 })
        );
    }

    #[test]
    fn zero_cutoff_is_rejected() {
        assert!(ParallelMergeSort::with_cutoff(0).is_err());
        assert_eq!(ParallelMergeSort::default().cutoff(), DEFAULT_SEQUENTIAL_CUTOFF);
    }
}
