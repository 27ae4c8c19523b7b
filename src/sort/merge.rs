//! Шаг слияния двух отсортированных половин

use std::cmp::Ordering;

/// Сливает `slice[..mid]` и `slice[mid..]` обратно в `slice`
///
/// Обе половины копируются во временные буферы, освобождаемые при выходе.
/// При равенстве первым идет элемент левой половины.
pub(crate) fn merge<T, F>(slice: &mut [T], mid: usize, compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let left = slice[..mid].to_vec();
    let right = slice[mid..].to_vec();
    merge_into(slice, &left, &right, compare);
}

/// Сливает две отсортированные последовательности в `out`
///
/// `out.len()` должна равняться `left.len() + right.len()`.
pub(crate) fn merge_into<T, F>(out: &mut [T], left: &[T], right: &[T], compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    debug_assert_eq!(out.len(), left.len() + right.len());

    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        let take_left = i < left.len()
            && (j >= right.len() || compare(&left[i], &right[j]) != Ordering::Greater);
        if take_left {
            *slot = left[i].clone();
            i += 1;
        } else {
            *slot = right[j].clone();
            j += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_uneven_halves() {
        let mut data = [2, 5, 9, 1, 3];
        merge(&mut data, 3, &mut i32::cmp);
        assert_eq!(data, [1, 2, 3, 5, 9]);
    }

    #[test]
    fn ties_prefer_left_half() {
        let mut data = [(1, 'a'), (2, 'b'), (1, 'c'), (2, 'd')];
        merge(&mut data, 2, &mut |x: &(i32, char), y: &(i32, char)| x.0.cmp(&y.0));
        assert_eq!(data, [(1, 'a'), (1, 'c'), (2, 'b'), (2, 'd')]);
    }

    #[test]
    fn exhausted_right_drains_left() {
        let mut out = [0; 4];
        merge_into(&mut out, &[7, 8, 9], &[1], &mut i32::cmp);
        assert_eq!(out, [1, 7, 8, 9]);
    }
}
