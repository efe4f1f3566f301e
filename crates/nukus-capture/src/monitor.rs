use std::time::Duration;

use xcap::Monitor;

use crate::surface::{CaptureError, Frame, FrameSurface};

/// Mirrors one monitor through xcap.
///
/// xcap captures on demand, so there is no buffered frame to drain when a frame is
/// throttled away and each wait simply paces the capture thread. Only the monitor id
/// is kept since platform monitor handles are not `Send`.
pub struct MonitorSurface {
    monitor_id: u32,
    width: u32,
    height: u32,
}

fn find_monitor(monitor_id: Option<u32>) -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::Surface(e.to_string()))?;

    match monitor_id {
        Some(id) => monitors.into_iter().find(|m| m.id() == id),
        None => {
            let primary = monitors.iter().position(|m| m.is_primary()).unwrap_or(0);
            monitors.into_iter().nth(primary)
        }
    }
    .ok_or(CaptureError::NoMonitor)
}

impl MonitorSurface {
    /// Surface for the given monitor id, or the primary monitor
    pub fn open(monitor_id: Option<u32>) -> Result<Self, CaptureError> {
        let monitor = find_monitor(monitor_id)?;

        tracing::info!(
            "Mirroring monitor {} ({}x{})",
            monitor.id(),
            monitor.width(),
            monitor.height()
        );

        Ok(Self {
            monitor_id: monitor.id(),
            width: monitor.width(),
            height: monitor.height(),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FrameSurface for MonitorSurface {
    fn wait_for_frame(&mut self, timeout: Duration) -> Result<bool, CaptureError> {
        std::thread::sleep(timeout);
        Ok(true)
    }

    fn acquire_latest(&mut self) -> Result<Option<Frame>, CaptureError> {
        let monitor = find_monitor(Some(self.monitor_id))?;
        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Surface(e.to_string()))?;
        Ok(Some(Frame::new(image)))
    }

    fn discard_latest(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }
}
