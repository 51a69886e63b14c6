use log::warn;
use smol::channel::{self, Receiver, Sender, TryRecvError, TrySendError};
use thiserror::Error;

use concord_shared::{ExecutionOpinion, Tick};

/// Errors that can occur when handing a remote opinion to the simulation thread
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoffError {
    /// The session owning the receiving end has been torn down
    #[error("Remote opinion channel is closed, the session has stopped")]
    Closed,
    /// Only opinions received from a remote peer may be handed off
    #[error("Opinion for tick {start_tick} is of local origin and cannot be handed off as remote")]
    LocalOrigin { start_tick: Tick },
}

/// Creates the ordered, unbounded channel carrying deserialized remote
/// opinions from the network thread to the simulation thread
pub fn remote_opinion_channel() -> (RemoteOpinionSender, RemoteOpinionReceiver) {
    let (sender, receiver) = channel::unbounded();
    (
        RemoteOpinionSender { sender },
        RemoteOpinionReceiver { receiver },
    )
}

/// Network-thread end of the remote opinion channel. Never blocks.
#[derive(Clone)]
pub struct RemoteOpinionSender {
    sender: Sender<ExecutionOpinion>,
}

impl RemoteOpinionSender {
    pub fn send(&self, opinion: ExecutionOpinion) -> Result<(), HandoffError> {
        if opinion.is_local() {
            return Err(HandoffError::LocalOrigin {
                start_tick: opinion.start_tick(),
            });
        }
        self.sender.try_send(opinion).map_err(|error| {
            // unbounded channels are never full
            let (TrySendError::Full(opinion) | TrySendError::Closed(opinion)) = error;
            warn!(
                "Dropping remote opinion for tick {}, the session has stopped",
                opinion.start_tick()
            );
            HandoffError::Closed
        })
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Simulation-thread end of the remote opinion channel
pub struct RemoteOpinionReceiver {
    receiver: Receiver<ExecutionOpinion>,
}

impl RemoteOpinionReceiver {
    /// Takes the oldest pending opinion, if any
    pub fn try_recv(&self) -> Option<ExecutionOpinion> {
        match self.receiver.try_recv() {
            Ok(opinion) => Some(opinion),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Takes every opinion pending right now, in arrival order
    pub fn drain(&self) -> impl Iterator<Item = ExecutionOpinion> + '_ {
        std::iter::from_fn(move || self.try_recv())
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
