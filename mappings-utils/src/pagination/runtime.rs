//! Session tasks and the router feeding them.
//!
//! Each live session runs as its own task that owns the session state and
//! drains an input channel, so navigation events for one session are handled
//! strictly one at a time. The task ends when the timeout elapses; its
//! controls are then made inert and it leaves the router.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, error};

use super::session::{NavAction, PaginationSession, Transition};

/// Queue depth per session; presses beyond it wait for the task to catch up.
const SESSION_INPUT_BUFFER: usize = 16;

/// Where a session is displayed and how it answers input.
#[async_trait]
pub trait SessionSurface: Send + Sync + 'static {
    /// Host-specific handle used to answer one input.
    type Interaction: Send + 'static;

    /// Show the session's current page in answer to `interaction`.
    async fn render(
        &self,
        interaction: Self::Interaction,
        session: &PaginationSession,
    ) -> anyhow::Result<()>;

    /// Answer input that changed nothing.
    async fn acknowledge(&self, interaction: Self::Interaction) -> anyhow::Result<()>;

    /// Remove the controls once the session expired.
    async fn close(&self) -> anyhow::Result<()>;
}

/// One navigation input addressed to a session.
#[derive(Debug)]
pub struct NavigationInput<I> {
    pub actor_id: u64,
    pub action: NavAction,
    pub interaction: I,
}

type SenderMap<I> = HashMap<u64, mpsc::Sender<NavigationInput<I>>>;

/// Routes navigation input to live session tasks by session id.
pub struct SessionRouter<I> {
    senders: Arc<Mutex<SenderMap<I>>>,
}

impl<I> Clone for SessionRouter<I> {
    fn clone(&self) -> Self {
        Self {
            senders: Arc::clone(&self.senders),
        }
    }
}

impl<I> Default for SessionRouter<I> {
    fn default() -> Self {
        Self {
            senders: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<I: Send + 'static> SessionRouter<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a session id before its message exists.
    ///
    /// Input dispatched to the id is queued until [`PendingSession::start`].
    /// Replaces any session registered under the same id.
    pub async fn register(&self, session_id: u64) -> PendingSession<I> {
        let (sender, inputs) = mpsc::channel(SESSION_INPUT_BUFFER);
        self.senders.lock().await.insert(session_id, sender);

        PendingSession {
            session_id,
            inputs,
            router: self.clone(),
        }
    }

    /// Register and immediately start driving a session.
    pub async fn spawn<S>(
        &self,
        session_id: u64,
        session: PaginationSession,
        surface: S,
    ) -> JoinHandle<()>
    where
        S: SessionSurface<Interaction = I>,
    {
        self.register(session_id).await.start(session, surface)
    }

    /// Hand input to its session.
    ///
    /// Gives the input back when no live session has that id, so the caller
    /// can answer it.
    pub async fn dispatch(
        &self,
        session_id: u64,
        input: NavigationInput<I>,
    ) -> Result<(), NavigationInput<I>> {
        let sender = self.senders.lock().await.get(&session_id).cloned();
        let Some(sender) = sender else {
            return Err(input);
        };

        sender.send(input).await.map_err(|rejected| rejected.0)
    }

    pub async fn live_sessions(&self) -> usize {
        self.senders.lock().await.len()
    }

    async fn remove(&self, session_id: u64) {
        self.senders.lock().await.remove(&session_id);
    }
}

/// A registered session id whose task has not started yet.
pub struct PendingSession<I> {
    session_id: u64,
    inputs: mpsc::Receiver<NavigationInput<I>>,
    router: SessionRouter<I>,
}

impl<I: Send + 'static> PendingSession<I> {
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Start the session task; queued input is handled first.
    pub fn start<S>(self, session: PaginationSession, surface: S) -> JoinHandle<()>
    where
        S: SessionSurface<Interaction = I>,
    {
        let Self {
            session_id,
            inputs,
            router,
        } = self;

        tokio::spawn(async move {
            drive_session(session_id, session, surface, inputs, router).await;
        })
    }

    /// Give the id back, e.g. when the message could not be sent.
    pub async fn cancel(self) {
        self.router.remove(self.session_id).await;
    }
}

async fn drive_session<S: SessionSurface>(
    session_id: u64,
    mut session: PaginationSession,
    surface: S,
    mut inputs: mpsc::Receiver<NavigationInput<S::Interaction>>,
    router: SessionRouter<S::Interaction>,
) {
    let deadline = session.deadline();

    loop {
        tokio::select! {
            biased;
            () = sleep_until(deadline) => break,
            input = inputs.recv() => {
                let Some(input) = input else { break };
                handle_input(session_id, &mut session, &surface, input).await;
            }
        }
    }

    session.expire();
    router.remove(session_id).await;
    inputs.close();

    while let Ok(late) = inputs.try_recv() {
        if let Err(source) = surface.acknowledge(late.interaction).await {
            error!(?source, session_id, "failed to acknowledge late pagination input");
        }
    }

    if let Err(source) = surface.close().await {
        error!(?source, session_id, "failed to remove pagination controls");
    }

    debug!(session_id, "pagination session expired");
}

async fn handle_input<S: SessionSurface>(
    session_id: u64,
    session: &mut PaginationSession,
    surface: &S,
    input: NavigationInput<S::Interaction>,
) {
    let transition = session.navigate(input.actor_id, input.action, Instant::now());

    let result = match transition {
        Transition::Moved => surface.render(input.interaction, session).await,
        Transition::Unchanged | Transition::Ignored => {
            surface.acknowledge(input.interaction).await
        }
    };

    if let Err(source) = result {
        error!(?source, session_id, ?transition, "failed to answer pagination input");
    }
}
