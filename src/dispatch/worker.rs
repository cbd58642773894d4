/// Background dispatch: runs one command on its own thread so the event loop
/// keeps drawing while the child runs. The result comes back over a channel.

use super::{CommandResult, Dispatcher};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub type Notifier = Arc<dyn Fn() + Send + Sync>;

pub enum DispatchOutcome {
    Running,
    Finished(CommandResult),
}

pub struct PendingDispatch {
    line: String,
    rx: Receiver<CommandResult>,
    started: Instant,
}

impl PendingDispatch {
    /// Start `line` on a worker thread. `notify` fires once the result is
    /// ready to be collected.
    pub fn spawn(
        dispatcher: Arc<dyn Dispatcher>,
        line: String,
        working_dir: PathBuf,
        notify: Option<Notifier>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let command = line.clone();
        // Built outside the closure: if the thread never starts, dropping the
        // closure still wakes the loop and `poll` sees the closed channel.
        let wake = WakeOnDrop(notify);
        let spawned = thread::Builder::new()
            .name("dispatch".into())
            .spawn(move || {
                let _wake = wake;
                // Dropped before `_wake`, so the channel is closed by the time it fires.
                let tx = tx;
                let result = dispatcher.run(&command, &working_dir);
                // The session may be gone already; nothing to deliver to then.
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            log::warn!("could not start dispatch thread: {}", e);
        }

        Self {
            line,
            rx,
            started: Instant::now(),
        }
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> DispatchOutcome {
        match self.rx.try_recv() {
            Ok(result) => DispatchOutcome::Finished(result),
            Err(TryRecvError::Empty) => DispatchOutcome::Running,
            Err(TryRecvError::Disconnected) => DispatchOutcome::Finished(worker_lost()),
        }
    }

    /// Block until the command finishes.
    pub fn wait(self) -> CommandResult {
        self.rx.recv().unwrap_or_else(|_| worker_lost())
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Fires the notifier however the worker ends, panics included, so a
/// disconnected channel is still noticed by the event loop.
struct WakeOnDrop(Option<Notifier>);

impl Drop for WakeOnDrop {
    fn drop(&mut self) {
        if let Some(notify) = self.0.take() {
            notify();
        }
    }
}

fn worker_lost() -> CommandResult {
    CommandResult::launch_failure("dispatch worker terminated")
}
