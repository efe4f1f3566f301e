use std::cell::RefCell;
use std::rc::Rc;

use nukus_overlay::{Caption, OverlayError, OverlaySurface};
use nukus_types::{Argb, OverlayStyle};
use slint::ComponentHandle;

#[cfg(windows)]
mod click_through;

slint::include_modules!();

thread_local! {
    // Lives on the UI thread only; every surface call is posted there
    static OVERLAY: RefCell<Option<OverlayWindow>> = const { RefCell::new(None) };
}

/// Create the overlay window on the calling thread, which must be the one that runs
/// [`run_event_loop`]. The window stays hidden until a surface attaches.
pub fn prepare() -> anyhow::Result<()> {
    let window = OverlayWindow::new()?;
    OVERLAY.with(|slot| *slot.borrow_mut() = Some(window));
    Ok(())
}

/// Run the Slint event loop on the current thread until [`quit`] is called
pub fn run_event_loop() -> anyhow::Result<()> {
    slint::run_event_loop_until_quit()?;
    Ok(())
}

/// Ask the event loop to stop, callable from any thread
pub fn quit() {
    if let Err(e) = slint::quit_event_loop() {
        tracing::warn!("Failed to quit UI event loop: {}", e);
    }
}

/// Transparent, always-on-top, click-through window covering the captured monitor
pub struct SlintOverlaySurface {
    width: u32,
    height: u32,
}

impl SlintOverlaySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

fn post(task: impl FnOnce() + Send + 'static) -> Result<(), OverlayError> {
    slint::invoke_from_event_loop(task).map_err(|e| OverlayError::Surface(e.to_string()))
}

fn color(argb: Argb) -> slint::Color {
    slint::Color::from_argb_u8(argb.alpha(), argb.red(), argb.green(), argb.blue())
}

/// Caption in logical pixels for the window's scale factor
fn caption_item(c: Caption, scale: f32) -> CaptionItem {
    let px = |v: i32| v as f32 / scale;
    CaptionItem {
        text: c.text.into(),
        x: px(c.x),
        y: px(c.y),
        width: px(c.width),
        font_size: c.text_size_sp,
        color: color(c.text_color),
        background: color(c.background),
        padding_left: px(c.padding.left),
        padding_top: px(c.padding.top),
        padding_right: px(c.padding.right),
        padding_bottom: px(c.padding.bottom),
    }
}

impl OverlaySurface for SlintOverlaySurface {
    fn attach(&mut self, style: &OverlayStyle) -> Result<(), OverlayError> {
        let (width, height) = (self.width, self.height);
        tracing::debug!(
            "[OVERLAY] attaching {}x{} window, text {}sp",
            width,
            height,
            style.text_size_sp
        );

        post(move || {
            OVERLAY.with(|slot| {
                let mut slot = slot.borrow_mut();
                if slot.is_none() {
                    match OverlayWindow::new() {
                        Ok(window) => *slot = Some(window),
                        Err(e) => {
                            tracing::error!("[OVERLAY] failed to create window: {}", e);
                            return;
                        }
                    }
                }
                let Some(window) = slot.as_ref() else {
                    return;
                };

                let handle = window.window();
                handle.set_position(slint::PhysicalPosition::new(0, 0));
                handle.set_size(slint::PhysicalSize::new(width, height));
                if let Err(e) = window.show() {
                    tracing::error!("[OVERLAY] failed to show window: {}", e);
                    return;
                }

                #[cfg(windows)]
                if let Err(e) = click_through::apply(handle) {
                    tracing::warn!("[OVERLAY] window is not click-through: {}", e);
                }
            });
        })
    }

    fn detach(&mut self) -> Result<(), OverlayError> {
        post(|| {
            OVERLAY.with(|slot| {
                if let Some(window) = slot.borrow_mut().take() {
                    if let Err(e) = window.hide() {
                        tracing::debug!("[OVERLAY] hide failed: {}", e);
                    }
                }
            });
        })
    }

    fn paint(&mut self, captions: &[Caption]) -> Result<(), OverlayError> {
        let captions = captions.to_vec();

        post(move || {
            OVERLAY.with(|slot| {
                let slot = slot.borrow();
                let Some(window) = slot.as_ref() else {
                    tracing::debug!("[OVERLAY] paint dropped, window gone");
                    return;
                };

                let scale = window.window().scale_factor();
                let items: Vec<CaptionItem> = captions
                    .into_iter()
                    .map(|c| caption_item(c, scale))
                    .collect();
                window.set_captions(Rc::new(slint::VecModel::from(items)).into());
            });
        })
    }
}
