use anyhow::{Context, Result};
use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
use windows::Win32::System::Com::{COINIT_MULTITHREADED, CoInitializeEx, CoUninitialize};

/// Keeps COM initialized on the current thread while alive.
///
/// A thread that already joined another apartment keeps it and is not uninitialized on drop.
pub struct ComGuard {
    owned: bool,
}

impl ComGuard {
    pub fn initialize() -> Result<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            tracing::debug!("COM already initialized with another apartment model");
            return Ok(ComGuard { owned: false });
        }

        hr.ok().context("Failed to initialize COM")?;
        Ok(ComGuard { owned: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.owned {
            unsafe { CoUninitialize() };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_guards_initialize() {
        let outer = ComGuard::initialize().unwrap();
        let inner = ComGuard::initialize().unwrap();
        drop(inner);
        drop(outer);

        assert!(ComGuard::initialize().is_ok());
    }
}
