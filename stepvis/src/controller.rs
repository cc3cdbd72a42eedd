use std::{borrow::Cow, time::Duration};

use tracing::{debug, info, trace, warn};

use crate::{
    Aborted, BoxProducer, Config, ControllerState, Error, InputOutcome, InputPrompt, InputTicket,
    Result, RunId, RunSession, Step, StepContext, StepMessage, Surface, gate::InputGate,
};

/// Result of a successful advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A checkpoint was published; the next one waits for a trigger.
    Shown,
    /// The checkpoint opened an input request. Nothing advances the
    /// producer until [`StepController::resolve_input`] gets this ticket.
    AwaitingInput(InputTicket),
    /// The producer is exhausted and the controller is back to `Idle`.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    StepPending,
    WaitingForInput,
    Aborting,
    Done,
}

struct Installed<M> {
    id: RunId,
    name: Cow<'static, str>,
    producer: BoxProducer<M>,
    checkpoints: u64,
}

impl<M> Installed<M> {
    fn new(id: RunId, producer: BoxProducer<M>) -> Self {
        Self {
            id,
            name: producer.name(),
            producer,
            checkpoints: 0,
        }
    }
}

/// Owns the current producer and decides when it advances.
///
/// The controller is the single source of truth for the current run: it
/// holds the producer slot, the model the producer works on, the input gate
/// and the run-mode session, and it is the only thing that ever mutates
/// them. Every operation runs to completion (message published, snapshot
/// rendered, state settled) before returning, and taking `&mut self` rules
/// out a second call while one is in progress.
///
/// Operations:
/// - `start(producer)`: install a fresh producer (from `Idle` only)
/// - `advance_once()`: run the next checkpoint on a "Next" trigger
/// - `resolve_input(ticket, outcome)`: answer the open input request and
///   silently advance once so the producer can consume it
/// - `begin_run(interval)` / `pause()` / `tick(session)`: run mode
/// - `abort()`: drop everything and finish with the abort message
///
/// The controller is synchronous; [`Page`](crate::Page) runs one inside an
/// async session that turns timers and dialogs into calls on it.
pub struct StepController<M, S> {
    model: M,
    surface: S,
    abort_message: String,
    phase: Phase,
    current: Option<Installed<M>>,
    gate: InputGate,
    run: Option<RunSession>,
    last_session: u32,
}

impl<M, S: Surface<M>> StepController<M, S> {
    pub fn new(model: M, surface: S) -> Self {
        Self::with_config(model, surface, &Config::default())
    }

    pub fn with_config(model: M, surface: S, config: &Config) -> Self {
        Self {
            model,
            surface,
            abort_message: config.abort_message.clone(),
            phase: Phase::Idle,
            current: None,
            gate: InputGate::new(RunId::new()),
            run: None,
            last_session: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        match self.phase {
            Phase::Idle => ControllerState::Idle,
            Phase::StepPending if self.run.is_some() => ControllerState::Running,
            Phase::StepPending => ControllerState::StepPending,
            Phase::WaitingForInput => ControllerState::WaitingForInput,
            Phase::Aborting => ControllerState::Aborting,
            Phase::Done => ControllerState::Done,
        }
    }

    /// Installs a new producer. Valid only when no run is active.
    pub fn start(&mut self, producer: BoxProducer<M>) -> Result<RunId> {
        let state = self.state();
        if !state.accepts_start() {
            return Err(Error::Busy(state));
        }
        let installed = Installed::new(RunId::new(), producer);
        let id = installed.id;
        info!(run_id = %id, producer = %installed.name, "producer installed");
        self.gate = InputGate::new(id);
        self.current = Some(installed);
        self.set_phase(Phase::StepPending);
        Ok(id)
    }

    /// Runs the next checkpoint of the installed producer.
    ///
    /// Rejected while run mode is active; ticks are the only trigger then.
    pub fn advance_once(&mut self) -> Result<Advance> {
        match self.phase {
            Phase::StepPending if self.run.is_some() => Err(Error::NoStepPending(self.state())),
            Phase::StepPending => Ok(self.step()),
            Phase::WaitingForInput => Err(Error::WaitingForInput),
            _ => Err(Error::NoStepPending(self.state())),
        }
    }

    /// Answers the open input request and resumes the producer.
    ///
    /// The resumption is a silent advance: no trigger is consumed, but what
    /// the producer shows next is published like any other checkpoint.
    /// A ticket from an aborted or finished run is rejected without touching
    /// any state.
    pub fn resolve_input(&mut self, ticket: InputTicket, outcome: InputOutcome) -> Result<Advance> {
        if self.phase != Phase::WaitingForInput {
            return Err(Error::StaleTicket(ticket));
        }
        self.gate.resolve(ticket, outcome)?;
        debug!(%ticket, ?outcome, "input resolved");
        self.set_phase(Phase::StepPending);
        Ok(self.step())
    }

    /// Cancels the current run. Returns `false` (and does nothing) when no
    /// run is active.
    pub fn abort(&mut self) -> bool {
        let from = self.state();
        if !from.is_active() {
            return false;
        }
        if let Some(run) = self.run.take() {
            debug!(session = run.id(), ticks = run.ticks(), "run mode cancelled by abort");
        }
        self.gate.discard();
        let id = self.current.as_ref().map(|c| c.id).unwrap_or_else(RunId::new);
        info!(run_id = %id, "aborting run");
        self.phase = Phase::Aborting;
        self.notify(from);
        let producer: BoxProducer<M> = Box::new(Aborted::new(self.abort_message.as_str()));
        self.current = Some(Installed::new(id, producer));
        self.step();
        true
    }

    /// Attaches a run session so that [`tick`](Self::tick) advances the producer.
    pub fn begin_run(&mut self, interval: Duration) -> Result<RunSession> {
        if interval.is_zero() {
            return Err(Error::ZeroInterval);
        }
        if self.run.is_some() {
            return Err(Error::AlreadyRunning);
        }
        if !matches!(self.phase, Phase::StepPending | Phase::WaitingForInput) {
            return Err(Error::NoStepPending(self.state()));
        }
        self.last_session += 1;
        let session = RunSession::new(self.last_session, interval);
        info!(
            session = session.id(),
            interval_ms = interval.as_millis() as u64,
            "run mode started"
        );
        let from = self.state();
        self.run = Some(session);
        self.notify(from);
        Ok(session)
    }

    /// Detaches the run session. Returns `false` if run mode was not active.
    pub fn pause(&mut self) -> bool {
        let from = self.state();
        match self.run.take() {
            Some(run) => {
                info!(session = run.id(), ticks = run.ticks(), "run mode paused");
                self.notify(from);
                true
            }
            None => false,
        }
    }

    /// One run-mode tick. Advances exactly once, or not at all when the
    /// session is no longer current or an input request is open.
    pub fn tick(&mut self, session: u32) -> Option<Advance> {
        let run = self.run.as_mut().filter(|run| run.id() == session)?;
        if self.phase != Phase::StepPending {
            trace!(session, phase = ?self.phase, "tick ignored");
            return None;
        }
        run.record_tick();
        Some(self.step())
    }

    pub fn run_session(&self) -> Option<&RunSession> {
        self.run.as_ref()
    }

    /// The open input request, if the controller waits for one.
    pub fn pending_input(&self) -> Option<(InputTicket, &InputPrompt)> {
        self.gate.outstanding()
    }

    /// Identity of the installed producer.
    pub fn current_run(&self) -> Option<RunId> {
        self.current.as_ref().map(|c| c.id)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_parts(self) -> (M, S) {
        (self.model, self.surface)
    }
}

impl<M, S: Surface<M>> StepController<M, S> {
    fn step(&mut self) -> Advance {
        let Some(mut current) = self.current.take() else {
            warn!("advance requested with no producer installed");
            self.set_phase(Phase::Idle);
            return Advance::Finished;
        };
        loop {
            let step = {
                let mut cx = StepContext::new(&mut self.model, &mut self.gate);
                current.producer.produce_next(&mut cx)
            };
            current.checkpoints += 1;
            debug!(
                run_id = %current.id,
                checkpoint = current.checkpoints,
                message = step.message().map(|m| m.as_str()).unwrap_or_default(),
                done = step.is_done(),
                "checkpoint"
            );
            match step {
                Step::Skip if !self.gate.is_open() => continue,
                Step::Skip => {}
                Step::Show(message) => self.publish(Some(&message)),
                Step::Done(message) => {
                    self.publish(message.as_ref());
                    self.finish(current, message);
                    return Advance::Finished;
                }
            }
            let ticket = self.gate.outstanding().map(|(ticket, _)| ticket);
            self.current = Some(current);
            return match ticket {
                Some(ticket) => {
                    debug!(%ticket, "waiting for input");
                    self.set_phase(Phase::WaitingForInput);
                    Advance::AwaitingInput(ticket)
                }
                None => Advance::Shown,
            };
        }
    }

    fn finish(&mut self, current: Installed<M>, message: Option<StepMessage>) {
        if self.gate.is_open() {
            warn!(run_id = %current.id, "run finished with an open input request, discarding it");
        }
        self.gate.discard();
        info!(
            run_id = %current.id,
            producer = %current.name,
            checkpoints = current.checkpoints,
            failed = message.as_ref().is_some_and(StepMessage::is_error),
            "run finished"
        );
        let from = self.state();
        self.run = None;
        self.phase = Phase::Done;
        self.notify(from);
        self.set_phase(Phase::Idle);
    }

    fn publish(&mut self, message: Option<&StepMessage>) {
        match message {
            Some(message) if !message.is_empty() => self.surface.display_message(message.as_str()),
            _ => {}
        }
        self.surface.render_snapshot(&self.model);
    }

    fn set_phase(&mut self, phase: Phase) {
        let from = self.state();
        self.phase = phase;
        self.notify(from);
    }

    fn notify(&mut self, from: ControllerState) {
        let to = self.state();
        if from != to {
            trace!(%from, %to, "state changed");
            self.surface.on_state_change(from, to);
        }
    }
}
