use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kanal::{AsyncReceiver, AsyncSender};
use uuid::Uuid;

/// Opaque token proving the user consented to screen capture.
///
/// Clones share the same revocation state.
#[derive(Debug, Clone)]
pub struct CaptureGrant {
    id: Uuid,
    revoked: Arc<AtomicBool>,
}

/// Invalidates a [`CaptureGrant`] from outside the capture session
#[derive(Debug, Clone)]
pub struct Revoker {
    revoked: Arc<AtomicBool>,
}

impl CaptureGrant {
    /// Issue a new grant together with its revocation handle
    pub fn issue() -> (Self, Revoker) {
        let revoked = Arc::new(AtomicBool::new(false));
        (
            Self {
                id: Uuid::new_v4(),
                revoked: revoked.clone(),
            },
            Revoker { revoked },
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        !self.revoked.load(Ordering::Acquire)
    }
}

impl Revoker {
    pub fn revoke(&self) {
        self.revoked.store(true, Ordering::Release);
    }
}

/// Consent flow side of the grant handoff
#[derive(Clone)]
pub struct GrantSender {
    tx: AsyncSender<CaptureGrant>,
}

/// Capture side of the grant handoff
#[derive(Clone)]
pub struct GrantReceiver {
    rx: AsyncReceiver<CaptureGrant>,
}

/// Channel carrying grants from the consent flow to the capture component
pub fn grant_channel() -> (GrantSender, GrantReceiver) {
    let (tx, rx) = kanal::bounded_async(1);
    (GrantSender { tx }, GrantReceiver { rx })
}

impl GrantSender {
    /// Hand over a grant without waiting; false if one is already pending or nobody listens
    pub fn offer(&self, grant: CaptureGrant) -> bool {
        matches!(self.tx.try_send(grant), Ok(true))
    }

    pub async fn send(&self, grant: CaptureGrant) -> bool {
        self.tx.send(grant).await.is_ok()
    }
}

impl GrantReceiver {
    /// Next grant, None once every sender is gone
    pub async fn recv(&self) -> Option<CaptureGrant> {
        self.rx.recv().await.ok()
    }
}
