//! Bounded fan-out of keyed tasks onto worker threads.
//!
//! Each task runs on its own worker thread; at most `threads` workers are
//! alive at once. Results flow back over a channel and reach the caller's
//! callback on the submitting thread, in completion order.

use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::{Result, RunnerError};
use crate::threads::ThreadCount;

/// A unit of work a task may name.
pub type Operation<T> = fn(&[String]) -> T;

/// Per-worker setup run before the worker's task.
pub type Bootstrap = Arc<dyn Fn() + Send + Sync>;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Maps operation identifiers to the functions that implement them.
pub struct OperationTable<T> {
    operations: HashMap<String, Operation<T>>,
}

impl<T> OperationTable<T> {
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    pub fn register(mut self, id: impl Into<String>, operation: Operation<T>) -> Self {
        self.operations.insert(id.into(), operation);
        self
    }

    pub fn get(&self, id: &str) -> Option<Operation<T>> {
        self.operations.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.operations.contains_key(id)
    }
}

impl<T> Default for OperationTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A queued task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub key: String,
    pub operation: String,
    pub args: Vec<String>,
}

type Completion<T> = (String, thread::Result<T>);

pub struct TaskRunner<T> {
    operations: OperationTable<T>,
    threads: ThreadCount,
    bootstrap: Option<Bootstrap>,
    poll_interval: Duration,
    pending: VecDeque<Task>,
}

impl<T: Send + 'static> TaskRunner<T> {
    pub fn new(operations: OperationTable<T>, threads: ThreadCount) -> Self {
        Self {
            operations,
            threads,
            bootstrap: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            pending: VecDeque::new(),
        }
    }

    /// Installs the setup every worker runs before executing its task.
    pub fn with_bootstrap(mut self, bootstrap: impl Fn() + Send + Sync + 'static) -> Self {
        self.bootstrap = Some(Arc::new(bootstrap));
        self
    }

    /// How long to wait for a completion before re-checking worker state.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn threads(&self) -> ThreadCount {
        self.threads
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queues a task. Keys must be unique among queued tasks.
    pub fn add_task(
        &mut self,
        key: impl Into<String>,
        operation: impl Into<String>,
        args: Vec<String>,
    ) -> Result<()> {
        let key = key.into();
        let operation = operation.into();
        if !self.operations.contains(&operation) {
            return Err(RunnerError::UnknownOperation { operation });
        }
        if self.pending.iter().any(|task| task.key == key) {
            return Err(RunnerError::DuplicateKey { key });
        }
        self.pending.push_back(Task {
            key,
            operation,
            args,
        });
        Ok(())
    }

    /// Executes every queued task, handing each result to `on_result`.
    ///
    /// Returning `ControlFlow::Break` from the callback stops submission of
    /// further tasks. Tasks already running finish, but their results are
    /// discarded.
    pub fn run<F>(&mut self, mut on_result: F) -> Result<()>
    where
        F: FnMut(String, Result<T>) -> ControlFlow<()>,
    {
        let workers = self.threads.resolve();
        if workers <= 1 {
            debug!(tasks = self.pending.len(), "running tasks sequentially");
            self.run_sequential(&mut on_result);
            return Ok(());
        }
        let Some(bootstrap) = self.bootstrap.clone() else {
            return Err(RunnerError::MissingBootstrap);
        };
        debug!(tasks = self.pending.len(), workers, "running tasks in parallel");

        let (sender, receiver) = mpsc::channel::<Completion<T>>();
        let mut running: HashSet<String> = HashSet::new();
        let mut stopped = false;

        loop {
            while !stopped && running.len() < workers {
                let Some(task) = self.pending.pop_front() else {
                    break;
                };
                let Some(operation) = self.operations.get(&task.operation) else {
                    let error = RunnerError::UnknownOperation {
                        operation: task.operation,
                    };
                    stopped = on_result(task.key, Err(error)).is_break();
                    continue;
                };
                let key = task.key.clone();
                match spawn_worker(task, operation, Arc::clone(&bootstrap), sender.clone()) {
                    Ok(()) => {
                        running.insert(key);
                    }
                    Err((task, error)) => {
                        warn!(%error, "worker unavailable, continuing on the calling thread");
                        let result = run_task(&task.key, operation, &task.args);
                        stopped = on_result(task.key, result).is_break();
                    }
                }
            }

            if running.is_empty() && (stopped || self.pending.is_empty()) {
                break;
            }

            match receiver.recv_timeout(self.poll_interval) {
                Ok((key, outcome)) => {
                    running.remove(&key);
                    trace!(%key, running = running.len(), "task completed");
                    if stopped {
                        continue;
                    }
                    let result = outcome.map_err(|payload| panicked(&key, payload.as_ref()));
                    stopped = on_result(key, result).is_break();
                }
                Err(RecvTimeoutError::Timeout) => {
                    trace!(running = running.len(), "waiting for workers");
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if stopped {
            self.pending.clear();
        }
        Ok(())
    }

    fn run_sequential<F>(&mut self, on_result: &mut F)
    where
        F: FnMut(String, Result<T>) -> ControlFlow<()>,
    {
        while let Some(task) = self.pending.pop_front() {
            let result = match self.operations.get(&task.operation) {
                Some(operation) => run_task(&task.key, operation, &task.args),
                None => Err(RunnerError::UnknownOperation {
                    operation: task.operation,
                }),
            };
            if on_result(task.key, result).is_break() {
                self.pending.clear();
                break;
            }
        }
    }
}

fn spawn_worker<T: Send + 'static>(
    task: Task,
    operation: Operation<T>,
    bootstrap: Bootstrap,
    sender: Sender<Completion<T>>,
) -> std::result::Result<(), (Task, RunnerError)> {
    // The closure owns a clone so the task can be handed back if spawning fails.
    let payload = task.clone();
    let spawned = thread::Builder::new().name("csvgate-worker".into()).spawn(move || {
        let Task { key, args, .. } = payload;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            bootstrap();
            operation(&args)
        }));
        let _ = sender.send((key, outcome));
    });
    match spawned {
        Ok(_) => Ok(()),
        Err(error) => Err((
            task,
            RunnerError::Spawn {
                message: error.to_string(),
            },
        )),
    }
}

fn run_task<T>(key: &str, operation: Operation<T>, args: &[String]) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(|| operation(args)))
        .map_err(|payload| panicked(key, payload.as_ref()))
}

fn panicked(key: &str, payload: &(dyn Any + Send)) -> RunnerError {
    let message = if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic payload".to_string()
    };
    RunnerError::TaskPanicked {
        key: key.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(args: &[String]) -> String {
        args.join(",")
    }

    fn explode(_: &[String]) -> String {
        panic!("boom")
    }

    fn table() -> OperationTable<String> {
        OperationTable::new()
            .register("echo", echo)
            .register("explode", explode)
    }

    #[test]
    fn rejects_unknown_operation_and_duplicate_keys() {
        let mut runner = TaskRunner::new(table(), ThreadCount::Sequential);
        assert_eq!(
            runner.add_task("a", "missing", vec![]),
            Err(RunnerError::UnknownOperation {
                operation: "missing".into()
            })
        );
        runner.add_task("a", "echo", vec![]).unwrap();
        assert_eq!(
            runner.add_task("a", "echo", vec![]),
            Err(RunnerError::DuplicateKey { key: "a".into() })
        );
        assert_eq!(runner.pending(), 1);
    }

    #[test]
    fn sequential_mode_needs_no_bootstrap() {
        let mut runner = TaskRunner::new(table(), ThreadCount::Sequential);
        runner.add_task("a", "echo", vec!["x".into(), "y".into()]).unwrap();
        runner.add_task("b", "echo", vec!["z".into()]).unwrap();

        let mut results = Vec::new();
        runner
            .run(|key, result| {
                results.push((key, result));
                ControlFlow::Continue(())
            })
            .unwrap();

        let expected: Vec<(String, Result<String>)> = vec![
            ("a".to_string(), Ok("x,y".to_string())),
            ("b".to_string(), Ok("z".to_string())),
        ];
        assert_eq!(results, expected);
    }

    #[test]
    fn panics_become_errors() {
        let mut runner = TaskRunner::new(table(), ThreadCount::Sequential);
        runner.add_task("bad", "explode", vec![]).unwrap();

        let mut results = Vec::new();
        runner
            .run(|key, result| {
                results.push((key, result));
                ControlFlow::Continue(())
            })
            .unwrap();

        let expected: Vec<(String, Result<String>)> = vec![(
            "bad".to_string(),
            Err(RunnerError::TaskPanicked {
                key: "bad".into(),
                message: "boom".into(),
            }),
        )];
        assert_eq!(results, expected);
    }

    #[test]
    fn parallel_mode_requires_bootstrap() {
        let mut runner = TaskRunner::new(table(), ThreadCount::Fixed(2));
        runner.add_task("a", "echo", vec![]).unwrap();
        let outcome = runner.run(|_, _| ControlFlow::Continue(()));
        assert_eq!(outcome, Err(RunnerError::MissingBootstrap));
        assert_eq!(runner.pending(), 1);
    }

    #[test]
    fn break_stops_sequential_submission() {
        let mut runner = TaskRunner::new(table(), ThreadCount::Sequential);
        for key in ["a", "b", "c"] {
            runner.add_task(key, "echo", vec![]).unwrap();
        }
        let mut seen = Vec::new();
        runner
            .run(|key, _| {
                seen.push(key);
                ControlFlow::Break(())
            })
            .unwrap();
        assert_eq!(seen, vec!["a".to_string()]);
        assert_eq!(runner.pending(), 0);
    }
}
