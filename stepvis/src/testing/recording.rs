use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::time::Instant;

use crate::{ControllerState, InputRequest, InputTicket, Surface};

/// One call the engine made into a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Message { text: String, at: Instant },
    Snapshot,
    DialogOpened(InputTicket),
    StateChanged(ControllerState, ControllerState),
}

#[derive(Debug, Default)]
struct RecordingInner {
    events: Vec<SurfaceEvent>,
    dialogs: VecDeque<InputRequest>,
}

/// Surface that records every call. Works with any model type.
///
/// Keep a [`Recording`] (from [`recording`](Self::recording)) before handing
/// the surface to a controller or page; it shares the same log.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    inner: Arc<Mutex<RecordingInner>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording(&self) -> Recording {
        Recording {
            inner: self.inner.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecordingInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M> Surface<M> for RecordingSurface {
    fn display_message(&mut self, text: &str) {
        self.lock().events.push(SurfaceEvent::Message {
            text: text.to_string(),
            at: Instant::now(),
        });
    }

    fn render_snapshot(&mut self, _model: &M) {
        self.lock().events.push(SurfaceEvent::Snapshot);
    }

    fn open_dialog(&mut self, request: InputRequest) {
        let mut inner = self.lock();
        inner.events.push(SurfaceEvent::DialogOpened(request.ticket()));
        inner.dialogs.push_back(request);
    }

    fn on_state_change(&mut self, from: ControllerState, to: ControllerState) {
        self.lock().events.push(SurfaceEvent::StateChanged(from, to));
    }
}

/// Shared, read-mostly view of what a [`RecordingSurface`] saw.
#[derive(Debug, Clone)]
pub struct Recording {
    inner: Arc<Mutex<RecordingInner>>,
}

impl Recording {
    fn lock(&self) -> MutexGuard<'_, RecordingInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().events.clone()
    }

    /// Published messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.timed_messages().into_iter().map(|(text, _)| text).collect()
    }

    /// Published messages with the (Tokio) time they were displayed.
    pub fn timed_messages(&self) -> Vec<(String, Instant)> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Message { text, at } => Some((text.clone(), *at)),
                _ => None,
            })
            .collect()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages().pop()
    }

    pub fn snapshots(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Snapshot))
            .count()
    }

    pub fn transitions(&self) -> Vec<(ControllerState, ControllerState)> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::StateChanged(from, to) => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn dialogs_opened(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::DialogOpened(_)))
            .count()
    }

    /// Takes the oldest dialog request that has not been answered yet.
    pub fn take_dialog(&self) -> Option<InputRequest> {
        self.lock().dialogs.pop_front()
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.events.clear();
        inner.dialogs.clear();
    }
}
