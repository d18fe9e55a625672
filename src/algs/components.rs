//! Small array primitives shared by the builders.

use std::ops::Add;

use num_traits::Zero;

/// Exclusive prefix sum in place; returns the total.
///
/// `[3, 0, 2]` becomes `[0, 3, 3]` and the call returns `5`.
pub fn prefix_sum<T>(values: &mut [T]) -> T
where
    T: Copy + Zero + Add<Output = T>,
{
    let mut acc = T::zero();
    for v in values.iter_mut() {
        let next = acc + *v;
        *v = acc;
        acc = next;
    }
    acc
}

/// Sum of `values` added onto `init`.
pub fn reduce_add<T>(values: &[T], init: T) -> T
where
    T: Copy + Add<Output = T>,
{
    values.iter().fold(init, |acc, &v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_prefix_sum() {
        let mut v = [3usize, 0, 2, 5];
        assert_eq!(prefix_sum(&mut v), 10);
        assert_eq!(v, [0, 3, 3, 5]);

        let mut empty: [i32; 0] = [];
        assert_eq!(prefix_sum(&mut empty), 0);
    }

    #[test]
    fn reduce_add_starts_from_init() {
        assert_eq!(reduce_add(&[1.5, 2.5], 1.0), 5.0);
        assert_eq!(reduce_add::<u32>(&[], 7), 7);
    }
}
