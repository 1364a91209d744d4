use crate::transform::ResultItem;
use tokio::sync::mpsc;

/// Drains the output queue until every sender is gone.
///
/// Results are returned in arrival order, which across several workers is
/// not the order their items were produced in.
pub async fn collect_results(mut rx: mpsc::Receiver<ResultItem>) -> Vec<ResultItem> {
    let mut results = Vec::new();

    while let Some(result) = rx.recv().await {
        #[cfg(feature = "tracing")]
        tracing::info!("Got result: {result}");
        results.push(result);
    }

    results
}
