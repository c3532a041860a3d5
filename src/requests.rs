//! Background execution of backend requests.
//!
//! UI code is synchronous and event-driven, so all network work is handed
//! off to a worker task running on a dedicated tokio runtime. The worker
//! receives [`ClientRequest`]s over a channel, runs each one as its own
//! task, and reports results back out-of-band: roster results go through
//! the [`RosterManager`]'s pub/sub, everything else through a
//! [`BackendUpdate`] channel the UI polls from its event loop.

use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::models::{Comment, NewComment, PinId};
use crate::roster::RosterManager;

/// The set of async operations the UI can submit to the worker.
pub enum ClientRequest {
    /// Fetch the full user roster and publish it via the roster manager.
    ///
    /// Best-effort and non-cancelable: a failure is logged and the roster
    /// simply stays empty; there is no retry and nothing blocks on it.
    FetchRoster,
    /// Fetch all comments on a pin.
    FetchComments { pin_id: PinId },
    /// Post a new comment.
    SubmitComment(NewComment),
}

/// Results delivered back to the UI thread.
#[derive(Clone, Debug)]
pub enum BackendUpdate {
    CommentsFetched { pin_id: PinId, comments: Vec<Comment> },
    CommentPosted(Comment),
    /// A comment operation failed; `message` is suitable for a message bar.
    RequestFailed { message: String },
}

/// Submits requests to the worker. Cheap to clone; dropping the last
/// handle shuts the worker down.
#[derive(Clone)]
pub struct RequestHandle {
    sender: UnboundedSender<ClientRequest>,
    _runtime: std::sync::Arc<tokio::runtime::Runtime>,
}

impl RequestHandle {
    /// Queues a request for the worker. Never blocks.
    pub fn submit(&self, request: ClientRequest) {
        if self.sender.send(request).is_err() {
            error!("Request worker has died; dropping request");
        }
    }
}

/// Spawns the request worker on its own runtime.
///
/// Returns the submission handle and the receiver for comment-related
/// [`BackendUpdate`]s. Roster updates are not delivered here; subscribe
/// to `roster` for those.
pub fn start_request_worker(
    api: ApiClient,
    roster: RosterManager,
) -> Result<(RequestHandle, crossbeam_channel::Receiver<BackendUpdate>)> {
    let runtime = tokio::runtime::Runtime::new()?;
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel::<ClientRequest>();
    let (update_sender, update_receiver) = crossbeam_channel::unbounded::<BackendUpdate>();

    runtime.spawn(async_worker(receiver, api, roster, update_sender));

    let handle = RequestHandle {
        sender,
        _runtime: std::sync::Arc::new(runtime),
    };
    Ok((handle, update_receiver))
}

/// The worker loop: waits for requests and runs each as its own task so
/// a slow fetch never delays the next request.
async fn async_worker(
    mut receiver: UnboundedReceiver<ClientRequest>,
    api: ApiClient,
    roster: RosterManager,
    updates: crossbeam_channel::Sender<BackendUpdate>,
) {
    while let Some(request) = receiver.recv().await {
        match request {
            ClientRequest::FetchRoster => {
                let api = api.clone();
                let roster = roster.clone();
                tokio::spawn(async move {
                    match api.fetch_users().await {
                        Ok(users) => {
                            info!("Fetched roster of {} users", users.len());
                            roster.update_roster(users);
                        }
                        Err(e) => {
                            // The composer degrades to no suggestions.
                            warn!("Roster fetch failed, roster remains empty: {e}");
                        }
                    }
                });
            }
            ClientRequest::FetchComments { pin_id } => {
                let api = api.clone();
                let updates = updates.clone();
                tokio::spawn(async move {
                    let update = match api.fetch_comments_for_pin(pin_id).await {
                        Ok(comments) => BackendUpdate::CommentsFetched { pin_id, comments },
                        Err(e) => BackendUpdate::RequestFailed {
                            message: format!("Failed to fetch comments: {e}"),
                        },
                    };
                    if updates.send(update).is_err() {
                        warn!("Backend update receiver dropped");
                    }
                });
            }
            ClientRequest::SubmitComment(new_comment) => {
                let api = api.clone();
                let updates = updates.clone();
                tokio::spawn(async move {
                    let update = match api.create_comment(&new_comment).await {
                        Ok(comment) => BackendUpdate::CommentPosted(comment),
                        Err(e) => BackendUpdate::RequestFailed {
                            message: format!("Failed to add comment: {e}"),
                        },
                    };
                    if updates.send(update).is_err() {
                        warn!("Backend update receiver dropped");
                    }
                });
            }
        }
    }
    info!("Request worker shutting down (all handles dropped)");
}
