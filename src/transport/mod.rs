use crate::protocol::Message;

/// A bidirectional, ordered message pipe.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

pub mod in_memory;
pub mod tcp;
