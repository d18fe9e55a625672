//! Execution backends for the partition kernels.
//!
//! An [`Executor`] decides *where* the counting, filtering and sorting loops
//! run, never *what* they compute: every backend must produce exactly the
//! output of [`SerialExec`], element for element and in the same order.
//!
//! - [`SerialExec`]: single-threaded reference backend.
//! - [`RayonExec`]: data-parallel backend (feature `rayon`).

use std::cmp::Ordering;

use crate::dist_error::DistError;

/// Data-parallel capability used by the builders.
pub trait Executor: Send + Sync {
    /// Backend name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Ordered, fallible filter-map over `items`.
    ///
    /// Each worker creates its own state with `init` and threads it through
    /// successive calls of `f`; the builders keep their range-lookup hints in
    /// it. The result keeps the relative order of `items`. The first error
    /// (in item order for serial execution) aborts the whole call.
    fn try_filter_map_with<T, S, U, I, F>(
        &self,
        items: &[T],
        init: I,
        f: F,
    ) -> Result<Vec<U>, DistError>
    where
        T: Sync,
        U: Send,
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, &T) -> Result<Option<U>, DistError> + Sync + Send;

    /// Stable sort of `items` by `compare`.
    fn sort_by<T, F>(&self, items: &mut [T], compare: F)
    where
        T: Send,
        F: Fn(&T, &T) -> Ordering + Sync;
}

/// Reference backend: plain loops on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialExec;

impl Executor for SerialExec {
    fn name(&self) -> &'static str {
        "serial"
    }

    /// Two passes: count the survivors, then fill a buffer of exactly that size.
    fn try_filter_map_with<T, S, U, I, F>(
        &self,
        items: &[T],
        init: I,
        f: F,
    ) -> Result<Vec<U>, DistError>
    where
        T: Sync,
        U: Send,
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, &T) -> Result<Option<U>, DistError> + Sync + Send,
    {
        let mut state = init();
        let mut count = 0usize;
        for item in items {
            if f(&mut state, item)?.is_some() {
                count += 1;
            }
        }

        let mut out = Vec::with_capacity(count);
        let mut state = init();
        for item in items {
            if let Some(value) = f(&mut state, item)? {
                out.push(value);
            }
        }
        Ok(out)
    }

    fn sort_by<T, F>(&self, items: &mut [T], compare: F)
    where
        T: Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        items.sort_by(compare);
    }
}

#[cfg(feature = "rayon")]
mod rayon_backend {
    use super::*;
    use rayon::prelude::*;

    /// Data-parallel backend on the global Rayon pool.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct RayonExec;

    impl Executor for RayonExec {
        fn name(&self) -> &'static str {
            "rayon"
        }

        fn try_filter_map_with<T, S, U, I, F>(
            &self,
            items: &[T],
            init: I,
            f: F,
        ) -> Result<Vec<U>, DistError>
        where
            T: Sync,
            U: Send,
            I: Fn() -> S + Sync + Send,
            F: Fn(&mut S, &T) -> Result<Option<U>, DistError> + Sync + Send,
        {
            items
                .par_iter()
                .map_init(init, |state, item| f(state, item))
                .filter_map(Result::transpose)
                .collect()
        }

        fn sort_by<T, F>(&self, items: &mut [T], compare: F)
        where
            T: Send,
            F: Fn(&T, &T) -> Ordering + Sync,
        {
            items.par_sort_by(compare);
        }
    }
}

#[cfg(feature = "rayon")]
pub use rayon_backend::RayonExec;
