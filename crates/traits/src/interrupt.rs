use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared, one-way cancellation flag.
///
/// Clones observe the same flag. Once triggered it stays triggered for the
/// rest of the run.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_flag() {
        let interrupt = Interrupt::new();
        let observer = interrupt.clone();
        assert!(!observer.is_triggered());
        interrupt.trigger();
        assert!(observer.is_triggered());
    }
}
