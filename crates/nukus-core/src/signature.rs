use std::fmt;
use std::time::Instant;

use nukus_types::TextBlock;

/// Coarse grid used to absorb OCR bounding box jitter
const QUANTUM: f64 = 10.0;

/// Fingerprint of the recognized text and its coarse placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FrameSignature(String);

impl FrameSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FrameSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nearest grid cell, halves round toward positive infinity
fn quantize(v: i32) -> i64 {
    (v as f64 / QUANTUM + 0.5).floor() as i64
}

/// Order independent signature over a frame's blocks
pub fn signature(blocks: &[TextBlock]) -> FrameSignature {
    let mut parts: Vec<String> = blocks
        .iter()
        .map(|b| {
            format!(
                "{}|{}:{}:{}:{}",
                b.text(),
                quantize(b.left),
                quantize(b.top),
                quantize(b.right),
                quantize(b.bottom)
            )
        })
        .collect();
    parts.sort();

    FrameSignature(parts.join("||"))
}

/// Remembers the last signature and reports whether a new frame differs from it
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<FrameSignature>,
    retry_at: Option<Instant>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, blocks: &[TextBlock]) -> Option<FrameSignature> {
        self.observe_at(blocks, Instant::now())
    }

    /// Signature of the frame if it should be processed, None when unchanged.
    ///
    /// An empty frame is never reported as unchanged. An unchanged frame is processed
    /// again once a scheduled retry is due.
    pub fn observe_at(&mut self, blocks: &[TextBlock], now: Instant) -> Option<FrameSignature> {
        let sig = signature(blocks);
        let retry_due = self.retry_at.is_some_and(|at| now >= at);
        if !sig.is_empty() && !retry_due && self.last.as_ref() == Some(&sig) {
            return None;
        }

        self.last = Some(sig.clone());
        self.retry_at = None;
        Some(sig)
    }

    /// Process the current screen once more at `at`, even if it has not changed
    pub fn schedule_retry(&mut self, at: Instant) {
        self.retry_at = Some(at);
    }
}
