use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::info;

use super::cancel::CancelSignal;
use super::object::ObjectKind;
use super::result::{SyncReport, SyncResult};
use super::service::SyncService;
use crate::db::DbPool;
use crate::error::SyncError;
use crate::resources::ResourceBundle;

#[derive(Debug)]
pub enum SyncActorMessage {
    /// Synchronize the given kinds in order on one connection.
    SyncKinds(
        Vec<ObjectKind>,
        CancelSignal,
        RpcReplyPort<Result<SyncReport, SyncError>>,
    ),

    /// Synchronize a single kind.
    SyncKind(
        ObjectKind,
        CancelSignal,
        RpcReplyPort<Result<SyncResult, SyncError>>,
    ),
}

/// Cloneable handle to the sync actor. Requests from all clones run one at a time.
#[derive(Clone)]
pub struct SyncActorHandle {
    actor: ActorRef<SyncActorMessage>,
}

impl SyncActorHandle {
    pub async fn sync_all(&self, cancel: CancelSignal) -> Result<SyncReport, SyncError> {
        self.sync_kinds(ObjectKind::ALL.to_vec(), cancel).await
    }

    pub async fn sync_kinds(
        &self,
        kinds: Vec<ObjectKind>,
        cancel: CancelSignal,
    ) -> Result<SyncReport, SyncError> {
        ractor::call!(self.actor, SyncActorMessage::SyncKinds, kinds, cancel)
            .map_err(|e| SyncError::RactorError(format!("SyncActor SyncKinds RPC failed: {e}")))?
    }

    pub async fn sync_kind(
        &self,
        kind: ObjectKind,
        cancel: CancelSignal,
    ) -> Result<SyncResult, SyncError> {
        ractor::call!(self.actor, SyncActorMessage::SyncKind, kind, cancel)
            .map_err(|e| SyncError::RactorError(format!("SyncActor SyncKind RPC failed: {e}")))?
    }

    /// Stops the actor once queued requests are handled.
    pub fn stop(&self) {
        self.actor.stop(None);
    }
}

pub struct SyncActorArgs {
    pub pool: DbPool,
    pub bundle: ResourceBundle,
    pub service: SyncService,
}

struct SyncActorState {
    pool: DbPool,
    bundle: ResourceBundle,
    service: SyncService,
}

struct SyncActor;

#[ractor::async_trait]
impl Actor for SyncActor {
    type Msg = SyncActorMessage;
    type State = SyncActorState;
    type Arguments = SyncActorArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(
            backend = %args.pool.backend(),
            resources = args.bundle.len(),
            "SyncActor initialized"
        );
        Ok(SyncActorState {
            pool: args.pool,
            bundle: args.bundle,
            service: args.service,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SyncActorMessage::SyncKinds(kinds, cancel, reply) => {
                let res = state
                    .service
                    .sync_pool(&state.pool, &state.bundle, &kinds, &cancel)
                    .await;
                let _ = reply.send(res);
            }
            SyncActorMessage::SyncKind(kind, cancel, reply) => {
                let res = sync_one(state, kind, &cancel).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

async fn sync_one(
    state: &SyncActorState,
    kind: ObjectKind,
    cancel: &CancelSignal,
) -> Result<SyncResult, SyncError> {
    let mut store = state
        .pool
        .object_store(state.service.options().default_schema.as_deref())
        .await?;
    state
        .service
        .sync_kind(store.as_mut(), &state.bundle, kind, cancel)
        .await
}

/// Spawn the sync actor and return a cloneable handle.
pub async fn spawn(
    pool: DbPool,
    bundle: ResourceBundle,
    service: SyncService,
) -> Result<SyncActorHandle, SyncError> {
    let (actor, _jh) = ractor::Actor::spawn(
        None,
        SyncActor,
        SyncActorArgs {
            pool,
            bundle,
            service,
        },
    )
    .await
    .map_err(|e| SyncError::RactorError(format!("failed to spawn SyncActor: {e}")))?;

    Ok(SyncActorHandle { actor })
}
