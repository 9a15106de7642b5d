//! Liveness probe.

/// GET /ping — always answers, whatever the database is doing.
pub async fn pong() -> &'static str {
    "pong"
}
