//! Single-fire delivery of the flow outcome.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use evc_protocol::ConnectSessionResult;
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Sending half; only the first [`resolve`](OutcomeSlot::resolve) delivers.
#[derive(Debug)]
pub(crate) struct OutcomeSlot {
	sender: Mutex<Option<oneshot::Sender<ConnectSessionResult>>>,
}

impl OutcomeSlot {
	pub(crate) fn new() -> (Self, OutcomeReceiver) {
		let (tx, rx) = oneshot::channel();
		(
			Self {
				sender: Mutex::new(Some(tx)),
			},
			OutcomeReceiver { rx },
		)
	}

	/// Delivers `outcome`, returning `false` if one was already delivered.
	pub(crate) fn resolve(&self, outcome: ConnectSessionResult) -> bool {
		match self.sender.lock().take() {
			Some(tx) => {
				let _ = tx.send(outcome);
				true
			}
			None => false,
		}
	}
}

/// Resolves once with the flow's [`ConnectSessionResult`].
///
/// If the driver goes away without deciding, the flow counts as not started.
#[derive(Debug)]
pub struct OutcomeReceiver {
	rx: oneshot::Receiver<ConnectSessionResult>,
}

impl OutcomeReceiver {
	/// Returns the outcome if it has already been delivered.
	pub fn try_outcome(&mut self) -> Option<ConnectSessionResult> {
		self.rx.try_recv().ok()
	}
}

impl Future for OutcomeReceiver {
	type Output = ConnectSessionResult;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let result = ready!(Pin::new(&mut self.rx).poll(cx));
		Poll::Ready(result.unwrap_or(ConnectSessionResult::NotStarted))
	}
}
