//! Outbound message interface.
//!
//! The UI layer owns the sockets; it registers each connection's sender here
//! so use cases can reach any participant by id.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, ParticipantId};

/// Channel feeding one connection's outbound frames.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn register_client(&self, participant: ParticipantId, sender: PusherChannel);

    async fn unregister_client(&self, participant: &ParticipantId);

    async fn push_to(
        &self,
        participant: &ParticipantId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Push to several participants. Individual failures are logged; an error
    /// is returned only when none of a non-empty target list was reached.
    async fn broadcast(
        &self,
        targets: Vec<ParticipantId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
