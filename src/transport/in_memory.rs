use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::protocol::Message;
use crate::transport::Transport;

/// One end of an in-process transport pair.
pub struct InMemoryTransport {
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
}

impl InMemoryTransport {
    /// Two connected ends: what one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();
        (Self { tx: tx1, rx: rx2 }, Self { tx: tx2, rx: rx1 })
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))
    }
}
