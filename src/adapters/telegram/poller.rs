//! Long-polling loop feeding the dispatcher.
//!
//! Every chat gets its own worker task fed by a channel. A worker dispatches
//! its chat's updates one after another in arrival order, while the poll
//! loop only enqueues, so a slow chat never holds up the next `getUpdates`
//! or any other chat.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::client::TelegramClient;
use crate::application::CommandDispatcher;
use crate::domain::chat::InboundUpdate;
use crate::domain::foundation::ChatId;

const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Pulls updates from Telegram and hands them to per-chat workers.
pub struct TelegramPoller {
    client: Arc<TelegramClient>,
    dispatcher: Arc<CommandDispatcher>,
}

impl TelegramPoller {
    pub fn new(client: Arc<TelegramClient>, dispatcher: Arc<CommandDispatcher>) -> Self {
        Self { client, dispatcher }
    }

    /// Polls forever. Errors are logged and retried after a short pause.
    pub async fn run(self) {
        info!("Telegram poller started");
        let mut workers = ChatWorkers::new(self.dispatcher.clone());
        let mut offset = 0i64;

        loop {
            workers.prune_idle();

            let updates = match self.client.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "getUpdates failed");
                    tokio::time::sleep(ERROR_BACKOFF).await;
                    continue;
                }
            };

            if let Some(last) = updates.iter().map(|u| u.update_id).max() {
                offset = offset.max(last.saturating_add(1));
            }

            for update in updates {
                let update_id = update.update_id;
                match update.into_inbound() {
                    Some(inbound) => workers.submit(inbound),
                    None => debug!(update_id, "Skipped unsupported update"),
                }
            }
        }
    }
}

struct ChatWorker {
    sender: mpsc::UnboundedSender<InboundUpdate>,
    /// Updates queued or being dispatched.
    pending: Arc<AtomicUsize>,
}

/// One sequential worker per chat.
pub struct ChatWorkers {
    dispatcher: Arc<CommandDispatcher>,
    workers: HashMap<ChatId, ChatWorker>,
}

impl ChatWorkers {
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            dispatcher,
            workers: HashMap::new(),
        }
    }

    /// Queues an update behind the earlier updates of its chat.
    pub fn submit(&mut self, update: InboundUpdate) {
        let chat_id = update.chat_id;

        let update = match self.workers.get(&chat_id) {
            Some(worker) => {
                worker.pending.fetch_add(1, Ordering::SeqCst);
                match worker.sender.send(update) {
                    Ok(()) => return,
                    Err(mpsc::error::SendError(update)) => {
                        warn!(chat_id = %chat_id, "Chat worker gone, starting a new one");
                        update
                    }
                }
            }
            None => update,
        };

        let worker = spawn_worker(self.dispatcher.clone(), chat_id);
        worker.pending.fetch_add(1, Ordering::SeqCst);
        if worker.sender.send(update).is_err() {
            warn!(chat_id = %chat_id, "Dropped update for a stopped chat worker");
        }
        self.workers.insert(chat_id, worker);
    }

    /// Stops workers with nothing queued or in flight.
    ///
    /// Only the owner of `self` submits, so a worker observed idle here
    /// cannot receive another update before its sender is dropped.
    pub fn prune_idle(&mut self) {
        self.workers
            .retain(|_, worker| worker.pending.load(Ordering::SeqCst) > 0);
    }

    /// Number of live workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Updates queued or being dispatched, across all chats.
    pub fn in_flight(&self) -> usize {
        self.workers
            .values()
            .map(|worker| worker.pending.load(Ordering::SeqCst))
            .sum()
    }
}

fn spawn_worker(dispatcher: Arc<CommandDispatcher>, chat_id: ChatId) -> ChatWorker {
    let (sender, mut receiver) = mpsc::unbounded_channel::<InboundUpdate>();
    let pending = Arc::new(AtomicUsize::new(0));
    let counter = pending.clone();

    tokio::spawn(async move {
        while let Some(update) = receiver.recv().await {
            dispatcher.dispatch(update).await;
            counter.fetch_sub(1, Ordering::SeqCst);
        }
        debug!(chat_id = %chat_id, "Chat worker stopped");
    });

    ChatWorker { sender, pending }
}
