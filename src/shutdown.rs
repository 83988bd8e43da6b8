use tokio::sync::broadcast;

/// Broadcast-backed shutdown signal.
///
/// Cloning subscribes a fresh receiver, so every holder observes the first
/// signal regardless of who fires it. The server loop, the Ctrl-C handler
/// and the `exit` command all share one of these.
#[derive(Debug)]
pub struct ShutdownManager {
    shutdown: bool,
    receiver: broadcast::Receiver<()>,
    sender: broadcast::Sender<()>,
}

impl ShutdownManager {
    pub fn new() -> ShutdownManager {
        let (sender, receiver) = broadcast::channel(1);
        ShutdownManager {
            shutdown: false,
            receiver,
            sender,
        }
    }

    /// Wait for the signal. Returns immediately once it has been observed,
    /// so it is safe to poll from a `select!` loop.
    pub async fn recv(&mut self) {
        if self.shutdown {
            return;
        }
        let _ = self.receiver.recv().await;
        self.shutdown = true;
    }

    /// Fire the signal. Receiver-less channels are fine here: the sender
    /// itself counts as shut down either way.
    pub fn send(&mut self) {
        self.shutdown = true;
        let _ = self.sender.send(());
    }
}

impl Clone for ShutdownManager {
    fn clone(&self) -> ShutdownManager {
        ShutdownManager {
            shutdown: false,
            receiver: self.sender.subscribe(),
            sender: self.sender.clone(),
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        ShutdownManager::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_observe_the_signal() {
        let mut origin = ShutdownManager::new();
        let mut observer = origin.clone();
        origin.send();
        // resolves immediately instead of blocking the test
        observer.recv().await;
        observer.recv().await;
    }
}
