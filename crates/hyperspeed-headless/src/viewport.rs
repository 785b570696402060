use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;
use hyperspeed_platform::{Result, SubscriptionId, ViewportSize, ViewportSource};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct ViewportInner {
    size: ViewportSize,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Sender<ViewportSize>)>,
}

/// Viewport whose size is set by the host, possibly from another thread.
/// Every change is broadcast to subscribers as one whole [`ViewportSize`].
#[derive(Debug, Clone, Default)]
pub struct SharedViewport {
    inner: Arc<Mutex<ViewportInner>>,
}

impl SharedViewport {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewportInner {
                size,
                ..ViewportInner::default()
            })),
        }
    }

    pub fn set_size(&self, size: ViewportSize) {
        let Ok(mut inner) = self.inner.lock() else {
            warn!("Viewport lock poisoned; dropping resize to {}x{}", size.width, size.height);
            return;
        };
        inner.size = size;
        inner.listeners.retain(|(id, listener)| {
            let delivered = listener.send(size).is_ok();
            if !delivered {
                debug!("Dropping disconnected viewport listener {:?}", id);
            }
            delivered
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.listeners.len()).unwrap_or(0)
    }
}

impl ViewportSource for SharedViewport {
    fn size(&self) -> ViewportSize {
        self.inner.lock().map(|inner| inner.size).unwrap_or_default()
    }

    fn subscribe(&mut self, listener: Sender<ViewportSize>) -> Result<SubscriptionId> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "viewport lock poisoned")?;
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.listeners.push((id, listener));
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "viewport lock poisoned")?;
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        if inner.listeners.len() == before {
            return Err(format!("no viewport subscription {id:?}").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resize_is_broadcast_from_another_thread() {
        let mut viewport = SharedViewport::new(ViewportSize::new(800.0, 600.0));
        let (sender, receiver) = crossbeam_channel::unbounded();
        viewport.subscribe(sender).unwrap();

        let host = viewport.clone();
        std::thread::spawn(move || host.set_size(ViewportSize::new(1280.0, 720.0)))
            .join()
            .unwrap();

        assert_eq!(receiver.try_recv().unwrap(), ViewportSize::new(1280.0, 720.0));
        assert_eq!(viewport.size(), ViewportSize::new(1280.0, 720.0));
    }

    #[test]
    fn unsubscribe_requires_the_issued_id() {
        let mut viewport = SharedViewport::new(ViewportSize::new(10.0, 10.0));
        let (sender, receiver) = crossbeam_channel::unbounded();
        let id = viewport.subscribe(sender).unwrap();

        assert!(viewport.unsubscribe(SubscriptionId(id.0 + 1)).is_err());
        assert_eq!(viewport.subscriber_count(), 1);

        viewport.unsubscribe(id).unwrap();
        assert_eq!(viewport.subscriber_count(), 0);
        viewport.set_size(ViewportSize::new(20.0, 20.0));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut viewport = SharedViewport::new(ViewportSize::new(10.0, 10.0));
        let (sender, receiver) = crossbeam_channel::unbounded();
        viewport.subscribe(sender).unwrap();
        drop(receiver);

        viewport.set_size(ViewportSize::new(5.0, 5.0));
        assert_eq!(viewport.subscriber_count(), 0);
    }
}
