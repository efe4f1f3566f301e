mod grant;
mod monitor;
mod source;
mod surface;
mod throttle;

pub use grant::{CaptureGrant, GrantReceiver, GrantSender, Revoker, grant_channel};
pub use monitor::MonitorSurface;
pub use source::FrameSource;
pub use surface::{CaptureError, Frame, FrameSurface};
pub use throttle::Throttle;
