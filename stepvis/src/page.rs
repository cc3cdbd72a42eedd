use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc::Sender, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use crate::{
    BoxProducer, Config, ControllerState, Error, Result, StepController, StepProducer, Surface,
    internal::{Actions, Command, CommandKind, Factory, Session},
};

/// One visualization page: a model, a surface, and the actions that start
/// runs on it.
///
/// A page composes rather than subclasses: every action is a factory
/// building a fresh producer from the current model, and all of them share
/// the page's single [`StepController`].
///
/// - Register actions with `action(name, factory)`.
/// - `spawn()` moves everything into a Tokio task and returns a
///   [`PageHandle`] for UI triggers plus the task's join handle, which
///   yields the controller (with its model and surface) after shutdown.
///
/// # Example
///
/// ```rust,ignore
/// let page = Page::new("bubble-sort", ArrayModel::from(vec![5, 3, 8]), surface)
///     .action("Sort", |_| BubbleSort::new());
/// let (handle, task) = page.spawn();
///
/// handle.action("Sort").await?;   // first checkpoint is shown
/// handle.next().await?;           // "Next" button
/// handle.toggle_run().await?;     // "Run" button
/// handle.shutdown();
/// let controller = task.await?;
/// ```
pub struct Page<M, S> {
    name: Arc<str>,
    model: M,
    surface: S,
    config: Config,
    actions: Actions<M>,
}

impl<M: Send + 'static, S: Surface<M> + 'static> Page<M, S> {
    pub fn new(name: &str, model: M, surface: S) -> Self {
        Self {
            name: Arc::from(name),
            model,
            surface,
            config: Config::default(),
            actions: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Registers an action button. Registering the same name twice replaces
    /// the earlier factory.
    pub fn action<F, P>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&M) -> P + Send + Sync + 'static,
        P: StepProducer<M> + 'static,
    {
        let factory: Factory<M> =
            Box::new(move |model: &M| -> BoxProducer<M> { Box::new(factory(model)) });
        self.actions.insert(Arc::from(name), factory);
        self
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(|name| name.as_ref())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts the page session on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(self) -> (PageHandle<M>, JoinHandle<StepController<M, S>>) {
        let (tx, rx) = tokio::sync::mpsc::channel(self.config.command_channel_size.max(1));
        let (state_tx, state_rx) = watch::channel(ControllerState::Idle);
        let cancel_token = CancellationToken::new();

        let controller = StepController::with_config(self.model, self.surface, &self.config);
        let session = Session::new(
            controller,
            self.actions,
            rx,
            state_tx,
            self.config.run_interval,
            cancel_token.clone(),
        );
        let span = info_span!("page", name = %self.name);
        let task = tokio::spawn(session.run().instrument(span));

        let handle = PageHandle {
            name: self.name,
            sender: tx,
            state: state_rx,
            cancel_token,
        };
        (handle, task)
    }
}

/// Cheap, cloneable trigger panel for a running [`Page`].
///
/// Each trigger resolves once the session has fully processed it (message
/// published, dialog opened, timer armed or dropped) and returns the
/// controller state at that point. Triggers the controller does not accept
/// in its current state come back as errors and change nothing.
pub struct PageHandle<M> {
    name: Arc<str>,
    sender: Sender<Command<M>>,
    state: watch::Receiver<ControllerState>,
    cancel_token: CancellationToken,
}

impl<M> Clone for PageHandle<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            sender: self.sender.clone(),
            state: self.state.clone(),
            cancel_token: self.cancel_token.clone(),
        }
    }
}

impl<M: Send + 'static> PageHandle<M> {
    async fn send(&self, kind: CommandKind<M>) -> Result<ControllerState> {
        let (cmd, reply) = Command::new(kind);
        self.sender.send(cmd).await?;
        reply.await?
    }

    /// An action button: builds the registered producer, installs it and
    /// shows its first checkpoint.
    pub async fn action(&self, name: &str) -> Result<ControllerState> {
        self.send(CommandKind::Action(Arc::from(name))).await
    }

    /// Like [`action`](Self::action), for a producer built by the caller.
    pub async fn start<P>(&self, producer: P) -> Result<ControllerState>
    where
        P: StepProducer<M> + 'static,
    {
        self.send(CommandKind::Start(Box::new(producer))).await
    }

    /// The "Next" button.
    pub async fn next(&self) -> Result<ControllerState> {
        self.send(CommandKind::Next).await
    }

    /// Enters run mode with an explicit interval.
    pub async fn run(&self, interval: Duration) -> Result<ControllerState> {
        self.send(CommandKind::Run(Some(interval))).await
    }

    /// The "Run" toggle: pauses an active run, otherwise starts one with
    /// [`Config::run_interval`].
    pub async fn toggle_run(&self) -> Result<ControllerState> {
        self.send(CommandKind::ToggleRun).await
    }

    pub async fn pause(&self) -> Result<ControllerState> {
        self.send(CommandKind::Pause).await
    }

    /// The "Abort" button. A no-op when nothing runs.
    pub async fn abort(&self) -> Result<ControllerState> {
        self.send(CommandKind::Abort).await
    }

    /// Last state published by the session.
    pub fn state(&self) -> ControllerState {
        *self.state.borrow()
    }

    /// Waits until the published state satisfies `predicate`.
    pub async fn wait_for_state(
        &self,
        predicate: impl FnMut(&ControllerState) -> bool,
    ) -> Result<ControllerState> {
        let mut state = self.state.clone();
        let current = state
            .wait_for(predicate)
            .await
            .map_err(|_| Error::SessionClosed)?;
        Ok(*current)
    }

    /// Stops the session. Pending triggers fail with [`Error::SessionClosed`].
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
