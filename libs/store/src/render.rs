//! Stale render-pass suppression.
//!
//! Refresh triggers can overlap: a slow load kicked off by one trigger may
//! finish after a newer trigger has already rendered fresher state. Each
//! pass captures the generation counter when it begins; a pass that is no
//! longer current discards its output instead of applying it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter for render passes.
#[derive(Debug, Default)]
pub struct RenderGate {
    generation: AtomicU64,
}

/// Token for one render pass, captured at [`RenderGate::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPass {
    generation: u64,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new pass, invalidating every earlier one.
    pub fn begin(&self) -> RenderPass {
        RenderPass {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Whether a newer pass has started since this one began.
    pub fn is_stale(&self, pass: RenderPass) -> bool {
        self.generation.load(Ordering::SeqCst) != pass.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_latest_pass_is_current() {
        let gate = RenderGate::new();
        let pass = gate.begin();
        assert!(!gate.is_stale(pass));
    }

    #[test]
    fn test_new_pass_invalidates_older_ones() {
        let gate = RenderGate::new();
        let first = gate.begin();
        let second = gate.begin();
        assert!(gate.is_stale(first));
        assert!(!gate.is_stale(second));
    }

    #[tokio::test]
    async fn test_slow_pass_detects_staleness_across_tasks() {
        let gate = Arc::new(RenderGate::new());

        let slow = gate.begin();
        let slow_gate = Arc::clone(&gate);
        let slow_task = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            slow_gate.is_stale(slow)
        });

        // A fresh trigger arrives while the slow pass is still loading.
        let fast = gate.begin();
        assert!(!gate.is_stale(fast));

        assert!(slow_task.await.unwrap());
    }
}
