use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use nukus_types::{OverlayStyle, TranslatedBlock};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::layout::layout_captions;
use crate::surface::{OverlayError, OverlaySurface};

/// Draws the latest translated blocks, coalescing bursts of updates.
///
/// Updates only store the newest blocks and raise a pending flag. A render pass
/// clears the flag and paints whatever is stored at that moment, so several
/// updates between passes produce a single paint.
pub struct OverlayRenderer {
    surface: Mutex<Box<dyn OverlaySurface>>,
    blocks: Mutex<Vec<TranslatedBlock>>,
    style: Mutex<OverlayStyle>,
    attached: AtomicBool,
    render_pending: AtomicBool,
    wake: Notify,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl OverlayRenderer {
    pub fn new(surface: Box<dyn OverlaySurface>) -> Self {
        Self {
            surface: Mutex::new(surface),
            blocks: Mutex::new(Vec::new()),
            style: Mutex::new(OverlayStyle::default()),
            attached: AtomicBool::new(false),
            render_pending: AtomicBool::new(false),
            wake: Notify::new(),
        }
    }

    /// Show the overlay with `style`. Attaching twice is a no-op.
    pub fn attach(&self, style: OverlayStyle) -> Result<(), OverlayError> {
        *lock(&self.style) = style;
        if self.attached.load(Ordering::Acquire) {
            return Ok(());
        }

        lock(&self.surface).attach(&style)?;
        self.attached.store(true, Ordering::Release);
        tracing::info!("[OVERLAY] attached");

        // Updates that arrived while detached were never painted
        self.render_pending.store(true, Ordering::Release);
        self.wake.notify_one();
        Ok(())
    }

    /// Remove the overlay. Safe to call when already detached.
    pub fn detach(&self) {
        if !self.attached.swap(false, Ordering::AcqRel) {
            tracing::debug!("[OVERLAY] detach ignored, not attached");
            return;
        }

        if let Err(e) = lock(&self.surface).detach() {
            tracing::warn!("[OVERLAY] detach failed: {}", e);
        } else {
            tracing::info!("[OVERLAY] detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Replace the blocks to draw; only the latest set survives until the next pass
    pub fn set_blocks(&self, blocks: Vec<TranslatedBlock>) {
        *lock(&self.blocks) = blocks;
        self.request_render();
    }

    /// Applies on the next render pass
    pub fn set_style(&self, style: OverlayStyle) {
        *lock(&self.style) = style;
        self.request_render();
    }

    pub fn style(&self) -> OverlayStyle {
        *lock(&self.style)
    }

    fn request_render(&self) {
        if self
            .render_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.wake.notify_one();
        }
    }

    /// Paint if anything changed since the last pass. Returns the number of captions drawn.
    pub fn render_if_needed(&self) -> Option<usize> {
        if !self.is_attached() {
            return None;
        }
        if !self.render_pending.swap(false, Ordering::AcqRel) {
            return None;
        }

        let style = self.style();
        let captions = {
            let blocks = lock(&self.blocks);
            layout_captions(&blocks, &style)
        };

        match lock(&self.surface).paint(&captions) {
            Ok(()) => {
                tracing::debug!("[OVERLAY] painted {} captions", captions.len());
                Some(captions.len())
            }
            Err(e) => {
                tracing::warn!("[OVERLAY] paint failed: {}", e);
                None
            }
        }
    }

    /// Render task: paints after each wake-up until cancelled, then detaches
    pub async fn run(&self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.wake.notified() => {
                    self.render_if_needed();
                }
            }
        }

        self.detach();
        tracing::info!("[OVERLAY] render task stopped");
    }
}
