//! Unconditional cleanup for execution exit paths.

/// Runs a closure on every exit path, normal return or unwind.
///
/// Move-only by construction; there is no way to disarm it. Exists so the
/// per-run teardown survives a panic unwinding out of JIT'd code.
pub(crate) struct ScopedExit<F: FnOnce()> {
    cleanup: Option<F>,
}

impl<F: FnOnce()> ScopedExit<F> {
    pub(crate) fn new(cleanup: F) -> Self {
        ScopedExit {
            cleanup: Some(cleanup),
        }
    }
}

impl<F: FnOnce()> Drop for ScopedExit<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn runs_on_normal_exit() {
        let count = AtomicU32::new(0);
        {
            let _guard = ScopedExit::new(|| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn runs_exactly_once_on_unwind() {
        let count = AtomicU32::new(0);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _guard = ScopedExit::new(|| {
                count.fetch_add(1, Ordering::SeqCst);
            });
            panic!("boom");
        }));
        assert!(outcome.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
