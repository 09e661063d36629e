use crate::metrics::Counters;
use crate::network::{
    DeadlineStream, HarnessResult, IoStatus, SessionBounds, SessionOutcome, Side,
};
use std::time::Duration;

const READ_CHUNK_SIZE: usize = 64 << 10;

/// Drain one session and classify it.
///
/// Deadline expiry counts as canceled; the socket then stays open for
/// `linger` past the deadline so the client can reach its own deadline.
/// A clean end of stream is validated against `bounds` and counted as
/// finished. Anything else is fatal.
pub async fn handle_connection(
    mut conn: DeadlineStream,
    bounds: SessionBounds,
    linger: Duration,
    counters: &Counters,
) -> HarnessResult<SessionOutcome> {
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];

    let total = match conn.drain(&mut chunk).await? {
        IoStatus::Completed(total) => total,
        IoStatus::DeadlineExceeded { transferred } => {
            tracing::debug!(bytes = transferred, "server read hit deadline");
            counters.record_canceled(Side::Server, transferred);
            conn.hold_open(linger).await;
            return Ok(SessionOutcome::Canceled { bytes: transferred });
        }
    };

    bounds.check(total)?;
    drop(conn);
    counters.record_finished(total);
    Ok(SessionOutcome::Finished { bytes: total })
}
