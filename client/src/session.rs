use concord_shared::{ExecutionOpinion, IdBlock, IdBlockProvider, SyncConfig, Tick};

use crate::{
    desync_events::DesyncEvents,
    remote_opinions::{remote_opinion_channel, RemoteOpinionReceiver, RemoteOpinionSender},
    sync_coordinator::{SubmitOutcome, SyncCoordinator},
};

/// Desync detection state for one multiplayer session.
///
/// Created when the session starts and dropped when it stops; dropping it
/// closes the remote opinion channel. Every method must be called from the
/// simulation thread, except that [`RemoteOpinionSender`]s obtained from
/// [`SyncSession::remote_opinion_sender`] may be moved to the network thread.
pub struct SyncSession {
    coordinator: SyncCoordinator,
    remote_opinion_sender: RemoteOpinionSender,
    remote_opinion_receiver: RemoteOpinionReceiver,
    incoming_events: DesyncEvents,
    global_id_block: IdBlock,
}

impl SyncSession {
    pub fn new(config: SyncConfig) -> Self {
        Self::with_global_id_block(config, IdBlock::global())
    }

    /// Starts a session with a previously saved global block
    pub fn with_global_id_block(config: SyncConfig, global_id_block: IdBlock) -> Self {
        let (remote_opinion_sender, remote_opinion_receiver) = remote_opinion_channel();
        Self {
            coordinator: SyncCoordinator::new(config),
            remote_opinion_sender,
            remote_opinion_receiver,
            incoming_events: DesyncEvents::new(),
            global_id_block,
        }
    }

    pub fn remote_opinion_sender(&self) -> RemoteOpinionSender {
        self.remote_opinion_sender.clone()
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut SyncCoordinator {
        &mut self.coordinator
    }

    pub fn is_desynced(&self) -> bool {
        self.coordinator.is_desynced()
    }

    /// Runs once per simulation step: applies every remote opinion that has
    /// arrived since the last step, in arrival order, then builds reports for
    /// any desync detected. Returns the events produced since the last call.
    pub fn update(&mut self) -> DesyncEvents {
        for opinion in self.remote_opinion_receiver.drain() {
            self.coordinator.submit(opinion);
        }

        for report in self.coordinator.process_pending_desyncs() {
            self.incoming_events.push_report(report);
        }

        std::mem::take(&mut self.incoming_events)
    }

    /// Closes the local opinion collecting since its first recording and
    /// submits it. Returns a copy for the transport to send to the other
    /// peer, or `None` if nothing was collected.
    pub fn finish_local_opinion(&mut self, end_tick: Tick) -> Option<ExecutionOpinion> {
        let opinion = self.coordinator.take_local_opinion(end_tick)?;
        let outgoing = opinion.clone();
        match self.coordinator.submit(opinion) {
            SubmitOutcome::Ignored => None,
            _ => Some(outgoing),
        }
    }

    /// Submits an opinion received from a peer on the simulation thread
    pub fn receive_remote_opinion(&mut self, opinion: ExecutionOpinion) -> SubmitOutcome {
        self.coordinator.submit(opinion)
    }

    pub fn global_id_block(&self) -> &IdBlock {
        &self.global_id_block
    }
}

impl IdBlockProvider for SyncSession {
    fn id_block(&self) -> &IdBlock {
        &self.global_id_block
    }

    fn id_block_mut(&mut self) -> &mut IdBlock {
        &mut self.global_id_block
    }
}
