//! Runs an [`ImportSession`] against real collaborators.
//!
//! The driver owns the session and executes its [`Effect`]s: constructing
//! widgets, arming the init timeout, posting confirmed rows. It is a single
//! future that selects over operator commands, widget callbacks, in-flight
//! tasks and the timeout, so it runs the same on a tokio current-thread
//! runtime and in the browser.
//!
//! ```text
//!  SessionController ──commands──┐
//!  WidgetCallbacks ────events────┤──▶ ImportSession ──effects──▶ provider / submitter / timer
//!  construct + submit tasks ─────┤                          └──▶ SessionObserver
//!  init timeout ─────────────────┘
//! ```

use std::time::Duration;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{FusedFuture, FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::{ImportFailure, SubmitResult};
use crate::models::{ImportResult, RowRecord};
use crate::session::{Effect, ImportSession, SessionSnapshot};
use crate::submit::ImportSubmitter;
use crate::widget::{ConstructResult, WidgetCallbacks, WidgetEvent, WidgetProvider, WidgetUser};

// =============================================================================
// Seams
// =============================================================================

/// One-shot delays for the init timeout.
pub trait Timer {
    fn sleep(&self, after: Duration) -> LocalBoxFuture<'static, ()>;
}

/// `tokio::time` backed timer.
#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(feature = "native")]
impl Timer for TokioTimer {
    fn sleep(&self, after: Duration) -> LocalBoxFuture<'static, ()> {
        tokio::time::sleep(after).boxed_local()
    }
}

/// Receives session output. Every method is optional.
pub trait SessionObserver {
    /// Called after every step with the current view.
    fn state_changed(&mut self, _snapshot: &SessionSnapshot) {}

    fn rows_ready(&mut self, _rows: &[RowRecord]) {}

    fn finished(&mut self, _result: &ImportResult) {}

    fn failed(&mut self, _failure: &ImportFailure) {}
}

impl<O: SessionObserver + ?Sized> SessionObserver for &mut O {
    fn state_changed(&mut self, snapshot: &SessionSnapshot) {
        (**self).state_changed(snapshot)
    }

    fn rows_ready(&mut self, rows: &[RowRecord]) {
        (**self).rows_ready(rows)
    }

    fn finished(&mut self, result: &ImportResult) {
        (**self).finished(result)
    }

    fn failed(&mut self, failure: &ImportFailure) {
        (**self).failed(failure)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Operator intents.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Launch(WidgetUser),
    Confirm,
    Reset,
    Unmount,
}

/// Cloneable handle for sending commands to a running driver.
///
/// The driver stops once every controller is dropped.
#[derive(Debug, Clone)]
pub struct SessionController {
    sender: UnboundedSender<SessionCommand>,
}

impl SessionController {
    pub fn launch(&self, user: WidgetUser) -> bool {
        self.send(SessionCommand::Launch(user))
    }

    pub fn confirm(&self) -> bool {
        self.send(SessionCommand::Confirm)
    }

    pub fn reset(&self) -> bool {
        self.send(SessionCommand::Reset)
    }

    pub fn unmount(&self) -> bool {
        self.send(SessionCommand::Unmount)
    }

    /// Returns false when the driver is gone.
    pub fn send(&self, command: SessionCommand) -> bool {
        match self.sender.unbounded_send(command) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Session driver stopped; dropped {:?}", e.into_inner());
                false
            }
        }
    }
}

// =============================================================================
// Driver
// =============================================================================

enum TaskOutcome {
    Constructed(u64, ConstructResult),
    Submitted(u64, SubmitResult<ImportResult>),
}

type Tasks = FuturesUnordered<LocalBoxFuture<'static, TaskOutcome>>;
type Timeout = futures::future::Fuse<LocalBoxFuture<'static, u64>>;

/// Event loop around one session.
pub struct SessionDriver<P, S, T, O> {
    session: ImportSession,
    provider: P,
    submitter: S,
    timer: T,
    observer: O,
    commands: UnboundedReceiver<SessionCommand>,
    events_tx: UnboundedSender<WidgetEvent>,
    events: UnboundedReceiver<WidgetEvent>,
}

impl<P, S, T, O> SessionDriver<P, S, T, O>
where
    P: WidgetProvider,
    S: ImportSubmitter,
    T: Timer,
    O: SessionObserver,
{
    pub fn new(session: ImportSession, provider: P, submitter: S, timer: T, observer: O) -> (Self, SessionController) {
        let (sender, commands) = mpsc::unbounded();
        let (events_tx, events) = mpsc::unbounded();
        let driver = Self {
            session,
            provider,
            submitter,
            timer,
            observer,
            commands,
            events_tx,
            events,
        };
        (driver, SessionController { sender })
    }

    /// Drive the session until it is unmounted or every controller is
    /// dropped, then hand it back.
    pub async fn run(mut self) -> ImportSession {
        let mut tasks: Tasks = FuturesUnordered::new();
        let mut timeout: Timeout = futures::future::Fuse::terminated();

        log::debug!("Session {} driver started", self.session.id());
        self.observer.state_changed(&self.session.snapshot());

        loop {
            let mut stop = false;
            let effects = futures::select! {
                command = self.commands.next() => match command {
                    Some(SessionCommand::Launch(user)) => self.session.launch(user),
                    Some(SessionCommand::Confirm) => self.session.confirm(),
                    Some(SessionCommand::Reset) => self.session.reset(),
                    Some(SessionCommand::Unmount) => {
                        stop = true;
                        self.session.unmount()
                    }
                    None => {
                        stop = true;
                        Vec::new()
                    }
                },
                event = self.events.next() => match event {
                    Some(event) => self.session.handle_event(event),
                    None => Vec::new(),
                },
                outcome = tasks.select_next_some() => match outcome {
                    TaskOutcome::Constructed(generation, result) => self.session.widget_constructed(generation, result),
                    TaskOutcome::Submitted(generation, result) => self.session.submission_finished(generation, result),
                },
                generation = timeout => self.session.init_timed_out(generation),
            };

            self.apply(effects, &mut tasks, &mut timeout);
            if stop {
                break;
            }
        }

        log::debug!("Session {} driver stopped", self.session.id());
        self.session
    }

    fn apply(&mut self, effects: Vec<Effect>, tasks: &mut Tasks, timeout: &mut Timeout) {
        for effect in effects {
            match effect {
                Effect::Construct { generation, request } => {
                    let callbacks = WidgetCallbacks::new(generation, self.events_tx.clone());
                    let pending = self.provider.construct(request, callbacks);
                    tasks.push(
                        pending
                            .map(move |result| TaskOutcome::Constructed(generation, result))
                            .boxed_local(),
                    );
                }
                Effect::StartTimeout { generation, after } => {
                    *timeout = self.timer.sleep(after).map(move |_| generation).boxed_local().fuse();
                }
                Effect::CancelTimeout => {
                    if !timeout.is_terminated() {
                        *timeout = futures::future::Fuse::terminated();
                    }
                }
                Effect::Submit { generation, request } => {
                    let pending = self.submitter.submit(request);
                    tasks.push(
                        pending
                            .map(move |result| TaskOutcome::Submitted(generation, result))
                            .boxed_local(),
                    );
                }
                Effect::RowsReady(rows) => self.observer.rows_ready(&rows),
                Effect::Finished(result) => self.observer.finished(&result),
                Effect::Failed(failure) => self.observer.failed(&failure),
            }
        }
        self.observer.state_changed(&self.session.snapshot());
    }
}
