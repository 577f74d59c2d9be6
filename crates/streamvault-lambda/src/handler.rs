//! Per-invocation handler.

use lambda_runtime::{Error, LambdaEvent};
use streamvault_archive::Archiver;
use streamvault_core::StreamPayload;
use tracing::{debug, info_span, Instrument};

/// Archive one stream delivery. Errors propagate so the event source
/// retries the whole delivery.
pub async fn handle(archiver: &Archiver, event: LambdaEvent<StreamPayload>) -> Result<(), Error> {
    let (payload, context) = event.into_parts();
    let span = info_span!(
        "archive",
        request_id = %context.request_id,
        events = payload.records.len()
    );

    let outcome = archiver.archive(&payload.records).instrument(span).await?;
    debug!(?outcome, "invocation complete");
    Ok(())
}
