//! Debounce and single-flight bookkeeping shared by the controllers.

use std::time::Duration;

use tokio::task::JoinHandle;

/// At most one outstanding fetch per controller.
///
/// Every decision bumps the generation; a fetch may only publish its result
/// while its generation is still current, so a superseded fetch stays silent
/// even if it completes between the abort and its next await point.
#[derive(Debug, Default)]
pub(crate) struct Flight {
    generation: u64,
    pending: Option<(usize, JoinHandle<()>)>,
}

impl Flight {
    /// Cancels the outstanding fetch, if any, and returns its owner.
    pub(crate) fn supersede(&mut self) -> Option<usize> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take().map(|(owner, handle)| {
            handle.abort();
            owner
        })
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn launch(&mut self, owner: usize, handle: JoinHandle<()>) {
        self.pending = Some((owner, handle));
    }

    /// Called by a finished fetch. `false` means it was superseded and must
    /// discard its result.
    pub(crate) fn settle(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.pending = None;
        true
    }
}

/// Restartable delay: only the last scheduled action within the window runs.
#[derive(Debug)]
pub(crate) struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub(crate) fn schedule<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
