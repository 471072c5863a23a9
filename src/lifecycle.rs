use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    Timer,
    ResizeListener,
}

impl std::fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timer => f.write_str("timer"),
            Self::ResizeListener => f.write_str("resize_listener"),
        }
    }
}

/// Tracks timers and listeners registered by a view.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    active: Arc<AtomicUsize>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource; `on_release` runs exactly once, on the first
    /// `release()` or on drop.
    pub fn register<F>(&self, kind: RegistrationKind, on_release: F) -> Registration
    where
        F: FnOnce() + Send + 'static,
    {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(kind = %kind, active, "registered");
        Registration {
            kind,
            active: Arc::clone(&self.active),
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Number of registrations not yet released.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

pub struct Registration {
    kind: RegistrationKind,
    active: Arc<AtomicUsize>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("kind", &self.kind)
            .field("released", &self.is_released())
            .finish()
    }
}

impl Registration {
    pub fn kind(&self) -> RegistrationKind {
        self.kind
    }

    pub fn is_released(&self) -> bool {
        self.on_release.is_none()
    }

    /// Release the resource. Later calls are no-ops.
    pub fn release(&mut self) {
        let Some(on_release) = self.on_release.take() else {
            return;
        };
        on_release();
        let remaining = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(kind = %self.kind, active = remaining, "released");
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn release_runs_callback_once() {
        let lifecycle = Lifecycle::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let mut reg = lifecycle.register(RegistrationKind::Timer, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(lifecycle.active(), 1);

        reg.release();
        reg.release();
        drop(reg);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(lifecycle.active(), 0);
    }

    #[test]
    fn drop_releases() {
        let lifecycle = Lifecycle::new();
        let flag = Arc::new(AtomicBool::new(true));
        let f = Arc::clone(&flag);
        {
            let _reg = lifecycle.register(RegistrationKind::ResizeListener, move || {
                f.store(false, Ordering::SeqCst)
            });
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
        assert_eq!(lifecycle.active(), 0);
    }
}
