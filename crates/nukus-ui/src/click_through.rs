use std::ffi::c_void;

use anyhow::{Context, Result, bail};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_EXSTYLE, GetWindowLongPtrW, SetWindowLongPtrW, WS_EX_LAYERED, WS_EX_TOOLWINDOW,
    WS_EX_TRANSPARENT,
};

/// Let mouse input pass through the window and keep it out of the taskbar
pub fn apply(window: &slint::Window) -> Result<()> {
    let handle = window.window_handle();
    let raw = handle
        .window_handle()
        .context("Window has no native handle yet")?
        .as_raw();

    let RawWindowHandle::Win32(win32) = raw else {
        bail!("Unexpected window handle kind");
    };
    let hwnd = HWND(win32.hwnd.get() as *mut c_void);

    let extra = (WS_EX_LAYERED.0 | WS_EX_TRANSPARENT.0 | WS_EX_TOOLWINDOW.0) as isize;
    unsafe {
        let current = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
        SetWindowLongPtrW(hwnd, GWL_EXSTYLE, current | extra);
    }

    tracing::debug!("[OVERLAY] click-through enabled");
    Ok(())
}
