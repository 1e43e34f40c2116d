//! Store worker - runs bill store calls one at a time, in arrival order.
//!
//! The shell never awaits the store directly. It queues a [`StoreRequest`]
//! and later receives the matching [`StoreEvent`], so a create queued before
//! a list fetch always completes first.

use crate::entities::BillModel;
use crate::store::{BillStore, NewBill, ReceiptUpload};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Work queued from the shell to the worker.
#[derive(Debug, Clone)]
pub enum StoreRequest {
    /// Fetch every bill
    List {
        /// Identifies the bills page that asked
        ticket: u64,
    },
    /// Persist a submitted bill
    Create(NewBill),
    /// Store a receipt file
    Upload {
        /// Identifies the new-bill form that selected the file
        form: u64,
        /// File to store
        receipt: ReceiptUpload,
    },
}

/// Outcome of a request. Errors are carried as their display message.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// Answer to [`StoreRequest::List`]
    Listed {
        /// Ticket of the request
        ticket: u64,
        /// Bills, or the failure message
        result: Result<Vec<BillModel>, String>,
    },
    /// Answer to [`StoreRequest::Create`]: the stored bill or the failure message
    Created(Result<BillModel, String>),
    /// Answer to [`StoreRequest::Upload`]
    Uploaded {
        /// Form id of the request
        form: u64,
        /// Name of the uploaded file
        file_name: String,
        /// Receipt URL, or the failure message
        result: Result<String, String>,
    },
}

async fn execute(store: &dyn BillStore, request: StoreRequest) -> StoreEvent {
    match request {
        StoreRequest::List { ticket } => StoreEvent::Listed {
            ticket,
            result: store
                .list()
                .await
                .inspect_err(|e| warn!("bill list failed: {e}"))
                .map_err(|e| e.to_string()),
        },
        StoreRequest::Create(bill) => StoreEvent::Created(
            store
                .create(bill)
                .await
                .inspect_err(|e| warn!("bill create failed: {e}"))
                .map_err(|e| e.to_string()),
        ),
        StoreRequest::Upload { form, receipt } => {
            let file_name = receipt.file_name.clone();
            StoreEvent::Uploaded {
                form,
                file_name,
                result: store
                    .upload(receipt)
                    .await
                    .inspect_err(|e| warn!("receipt upload failed: {e}"))
                    .map_err(|e| e.to_string()),
            }
        }
    }
}

/// Spawns the worker on the current tokio runtime.
///
/// The worker stops once the request sender is dropped or nobody listens
/// for events any more.
pub fn spawn(
    store: Arc<dyn BillStore>,
) -> (UnboundedSender<StoreRequest>, UnboundedReceiver<StoreEvent>) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<StoreRequest>();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            debug!(?request, "store request");
            let event = execute(store.as_ref(), request).await;
            if event_tx.send(event).is_err() {
                break;
            }
        }
        debug!("store worker stopped");
    });

    (request_tx, event_rx)
}
