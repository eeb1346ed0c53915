use super::bridge::BridgeRequest;
use super::error::Result;

/// Outbound half of the storage bridge.
///
/// `send` only enqueues; replies come back later on the kernel bus. An `Err`
/// means the request never left (the other side is gone), not that the
/// operation failed.
pub trait StorageService {
    fn send(&self, request: BridgeRequest) -> Result<()>;
}

impl<S: StorageService + ?Sized> StorageService for Box<S> {
    fn send(&self, request: BridgeRequest) -> Result<()> {
        (**self).send(request)
    }
}
