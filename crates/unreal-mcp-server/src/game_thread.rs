//! Game-thread task queue
//!
//! Every command runs on one dedicated thread that owns the [`Editor`].
//! Network tasks hand requests over a bounded channel and await the reply
//! on a oneshot, so execution is strictly ordered.

use crate::router::Router;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};
use unreal_mcp_core::{BridgeError, CommandRequest, CommandResponse, Editor, Result};

/// Default depth of the task queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

type Task = (CommandRequest, oneshot::Sender<CommandResponse>);

/// Cloneable sender side used by the network tasks
#[derive(Clone)]
pub struct GameThreadHandle {
    tx: mpsc::Sender<Task>,
}

impl GameThreadHandle {
    /// Queue a request and wait until the game thread has run it
    pub async fn execute(&self, request: CommandRequest) -> CommandResponse {
        let command = request.command.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        if self.tx.send((request, reply_tx)).await.is_err() {
            error!("Game thread is gone, dropping {}", command);
            return CommandResponse::from_error(&BridgeError::GameThreadUnavailable);
        }

        reply_rx.await.unwrap_or_else(|_| {
            error!("Game thread dropped the reply for {}", command);
            CommandResponse::from_error(&BridgeError::GameThreadUnavailable)
        })
    }

    /// True once the receiving loop has shut down
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving side. Owns the editor and the dispatch table.
pub struct GameThread<E> {
    editor: E,
    router: Router,
    rx: mpsc::Receiver<Task>,
}

impl<E: Editor> GameThread<E> {
    /// Build a loop for a host that drives it itself, e.g. once per frame
    /// with [`GameThread::pump`].
    pub fn new(editor: E, router: Router, capacity: usize) -> (Self, GameThreadHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { editor, router, rx }, GameThreadHandle { tx })
    }

    /// Start a thread named `GameThread` whose editor is built by `factory`
    /// on that thread. The thread exits when every handle has been dropped.
    pub fn spawn<F>(
        capacity: usize,
        router: Router,
        factory: F,
    ) -> Result<(GameThreadHandle, thread::JoinHandle<()>)>
    where
        F: FnOnce() -> E + Send + 'static,
        E: 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let join = thread::Builder::new()
            .name("GameThread".to_string())
            .spawn(move || {
                let mut game = GameThread {
                    editor: factory(),
                    router,
                    rx,
                };
                info!("Game thread started");
                game.run();
                info!("Game thread stopped");
            })?;
        Ok((GameThreadHandle { tx }, join))
    }

    /// Run every queued task without blocking. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            self.process(task);
            ran += 1;
        }
        ran
    }

    /// Block on the queue until all handles are dropped
    pub fn run(&mut self) {
        while let Some(task) = self.rx.blocking_recv() {
            self.process(task);
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    fn process(&mut self, (request, reply): Task) {
        let command = request.command.clone();
        let router = &self.router;
        let editor: &mut dyn Editor = &mut self.editor;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| router.dispatch(editor, request)));
        let response = match outcome {
            Ok(response) => response,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Command {} panicked: {}", command, message);
                CommandResponse::from_error(&BridgeError::Panicked {
                    command: command.clone(),
                    message,
                })
            }
        };

        if reply.send(response).is_err() {
            debug!("Requester for {} went away before the reply", command);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};
    use unreal_editor_sim::SimulatedEditor;
    use unreal_mcp_core::Params;

    fn boom(_: &mut dyn Editor, _: Params) -> Result<Value> {
        panic!("handler exploded");
    }

    fn request(command: &str, params: Value) -> CommandRequest {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        CommandRequest::new(command, params)
    }

    #[tokio::test]
    async fn test_execute_on_spawned_thread() {
        let (handle, join) = GameThread::spawn(4, Router::new(), SimulatedEditor::new).unwrap();

        let resp = handle.execute(request("get_current_level_info", json!({}))).await;
        assert!(resp.is_success());

        let resp = handle.execute(request("no_such_command", json!({}))).await;
        assert_eq!(resp, CommandResponse::error("Unknown command: no_such_command"));

        drop(handle);
        tokio::task::spawn_blocking(move || join.join().unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let mut router = Router::new();
        router.register("boom", boom);
        let (handle, _join) = GameThread::spawn(4, router, SimulatedEditor::new).unwrap();

        let resp = handle.execute(request("boom", json!({}))).await;
        assert_eq!(
            resp,
            CommandResponse::error("Command 'boom' panicked: handler exploded")
        );

        let resp = handle.execute(request("get_actors_in_level", json!({}))).await;
        assert!(resp.is_success());
    }

    #[tokio::test]
    async fn test_pump_runs_in_order() {
        let (mut game, handle) = GameThread::new(SimulatedEditor::new(), Router::new(), 4);
        assert_eq!(game.pump(), 0);

        let first = tokio::spawn({
            let handle = handle.clone();
            async move {
                handle
                    .execute(request("create_level", json!({"level_name": "Arena"})))
                    .await
            }
        });
        tokio::task::yield_now().await;
        while game.pump() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(first.await.unwrap().is_success());

        let second = tokio::spawn(async move {
            handle
                .execute(request("create_level", json!({"level_name": "Arena"})))
                .await
        });
        while game.pump() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(!second.await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_closed_loop_reports_unavailable() {
        let (game, handle) = GameThread::new(SimulatedEditor::new(), Router::new(), 1);
        drop(game);
        assert!(handle.is_closed());
        let resp = handle.execute(request("get_actors_in_level", json!({}))).await;
        assert_eq!(resp, CommandResponse::error("Game thread unavailable"));
    }
}
