use std::{collections::HashMap, sync::Arc, time::Duration};

use futures_util::future::OptionFuture;
use tokio::{
    select,
    sync::{mpsc::Receiver, watch},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    BoxProducer, ControllerState, Error, InputOutcome, InputTicket, Label, Result,
    StepController, Surface,
    gate::{self, InputFuture},
    internal::{Command, CommandKind},
    scheduler::RunTimer,
};

pub(crate) type Factory<M> = Box<dyn Fn(&M) -> BoxProducer<M> + Send + Sync>;
pub(crate) type Actions<M> = HashMap<Arc<str>, Factory<M>>;

/// Event loop of one page.
///
/// Everything that can move the controller arrives here: UI triggers on the
/// command channel, the answer of the open dialog, and run-mode ticks. One
/// `select!` picks them one at a time, so the controller sees a strictly
/// sequential stream of operations. After each of them the loop reconciles
/// the timer and the dialog with the controller state: a run session without
/// a timer gets one, an open input request without a dialog gets one, and
/// whatever the controller dropped (paused run, aborted request) is dropped
/// here as well.
pub(crate) struct Session<M, S> {
    controller: StepController<M, S>,
    actions: Actions<M>,
    receiver: Receiver<Command<M>>,
    state: watch::Sender<ControllerState>,
    input: Option<InputFuture>,
    timer: Option<RunTimer>,
    run_interval: Duration,
    cancel_token: CancellationToken,
}

impl<M, S: Surface<M>> Session<M, S> {
    pub fn new(
        controller: StepController<M, S>,
        actions: Actions<M>,
        receiver: Receiver<Command<M>>,
        state: watch::Sender<ControllerState>,
        run_interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            controller,
            actions,
            receiver,
            state,
            input: None,
            timer: None,
            run_interval,
            cancel_token,
        }
    }

    pub async fn run(mut self) -> StepController<M, S> {
        info!(actions = self.actions.len(), "page session started");
        loop {
            select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some((ticket, outcome)) = OptionFuture::from(self.input.as_mut()) => {
                    self.input = None;
                    self.handle_input(ticket, outcome);
                },
                Some(session) = OptionFuture::from(self.timer.as_mut().map(RunTimer::tick)) => {
                    self.handle_tick(session);
                },
            }
        }
        self.shutdown();
        self.controller
    }

    fn handle_command(&mut self, cmd: Command<M>) {
        let Command { kind, reply } = cmd;
        debug!(command = %kind.label(), "command received");
        let result = match kind {
            CommandKind::Action(name) => self.start_action(&name),
            CommandKind::Start(producer) => self.start_producer(producer),
            CommandKind::Next => self.controller.advance_once().map(drop),
            CommandKind::Run(interval) => self.begin_run(interval),
            CommandKind::ToggleRun => {
                if self.controller.pause() {
                    Ok(())
                } else {
                    self.begin_run(None)
                }
            }
            CommandKind::Pause => {
                self.controller.pause();
                Ok(())
            }
            CommandKind::Abort => {
                self.controller.abort();
                Ok(())
            }
        };
        if let Err(e) = &result {
            warn!(error = %e, state = %self.controller.state(), "command rejected");
        }
        self.reconcile();
        let _ = reply.send(result.map(|_| self.controller.state()));
    }

    fn handle_input(&mut self, ticket: InputTicket, outcome: InputOutcome) {
        if let Err(e) = self.controller.resolve_input(ticket, outcome) {
            debug!(%ticket, error = %e, "input resolution ignored");
        }
        self.reconcile();
    }

    fn handle_tick(&mut self, session: u32) {
        if self.controller.tick(session).is_none() {
            debug!(session, "tick skipped");
        }
        self.reconcile();
    }

    fn start_action(&mut self, name: &Arc<str>) -> Result<()> {
        let state = self.controller.state();
        if !state.accepts_start() {
            return Err(Error::Busy(state));
        }
        let factory = self
            .actions
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.clone()))?;
        let producer = factory(self.controller.model());
        debug!(action = %name, "action triggered");
        self.start_producer(producer)
    }

    /// Installs the producer and shows its first checkpoint right away, the
    /// way an action button does.
    fn start_producer(&mut self, producer: BoxProducer<M>) -> Result<()> {
        self.controller.start(producer)?;
        self.controller.advance_once()?;
        Ok(())
    }

    fn begin_run(&mut self, interval: Option<Duration>) -> Result<()> {
        self.controller
            .begin_run(interval.unwrap_or(self.run_interval))
            .map(drop)
    }

    fn reconcile(&mut self) {
        let session = self.controller.run_session().copied();
        match (session, &self.timer) {
            (Some(session), Some(timer)) if timer.session() == session.id() => {}
            (Some(session), _) => self.timer = Some(RunTimer::new(&session)),
            (None, _) => self.timer = None,
        }

        let pending = self
            .controller
            .pending_input()
            .map(|(ticket, prompt)| (ticket, prompt.clone()));
        match (pending, &self.input) {
            (Some((ticket, _)), Some(input)) if input.ticket() == ticket => {}
            (Some((ticket, prompt)), _) => {
                let (request, future) = gate::open(ticket, prompt);
                debug!(%ticket, "dialog opened");
                self.input = Some(future);
                self.controller.surface_mut().open_dialog(request);
            }
            (None, _) => self.input = None,
        }

        self.state.send_replace(self.controller.state());
    }

    fn shutdown(&mut self) {
        self.timer = None;
        self.input = None;
        self.receiver.close();
        info!(state = %self.controller.state(), "page session stopped");
    }
}
