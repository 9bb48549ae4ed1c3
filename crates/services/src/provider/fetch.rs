use std::sync::Arc;

use quiz_core::model::QuizDetail;
use tokio::sync::oneshot;

use super::{QuizDataProvider, QuizRequest};
use crate::error::ProviderError;

/// Pending result of a single quiz fetch.
///
/// There is exactly one observer and it receives at most one value.
#[derive(Debug)]
pub struct QuizFetch {
    rx: oneshot::Receiver<Result<QuizDetail, ProviderError>>,
}

impl QuizFetch {
    /// Wait for the fetch to finish.
    ///
    /// A fetch task that ends without sending resolves to `ProviderError::Cancelled`.
    pub async fn recv(self) -> Result<QuizDetail, ProviderError> {
        self.rx.await.unwrap_or(Err(ProviderError::Cancelled))
    }
}

/// Start fetching `request` on the current tokio runtime.
#[must_use]
pub fn fetch_once(provider: Arc<dyn QuizDataProvider>, request: QuizRequest) -> QuizFetch {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = provider.fetch_quiz(&request).await;
        if tx.send(result).is_err() {
            log::debug!("quiz {} fetched after its observer went away", request.quiz_id());
        }
    });
    QuizFetch { rx }
}
