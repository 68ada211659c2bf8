//! Redis liveness ping.

use crate::core::DEFAULT_TIMEOUT;
use crate::error::{Validation, ValidationError, ValidationKind};
use redis::IntoConnectionInfo;
use std::time::Duration;

/// Connect to Redis and issue one `PING` within the default timeout.
pub async fn validate_redis_connection(
    info: impl IntoConnectionInfo,
    field: &str,
    field_group: &str,
) -> Validation {
    validate_redis_connection_within(info, DEFAULT_TIMEOUT, field, field_group).await
}

/// Like [`validate_redis_connection`] with an explicit timeout.
pub async fn validate_redis_connection_within(
    info: impl IntoConnectionInfo,
    timeout: Duration,
    field: &str,
    field_group: &str,
) -> Validation {
    let ping = async {
        let client = redis::Client::open(info)?;
        let mut connection = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut connection)
            .await
    };

    let detail = match tokio::time::timeout(timeout, ping).await {
        Ok(Ok(_)) => return Ok(()),
        Ok(Err(e)) => e.to_string(),
        Err(_) => "i/o timeout".to_string(),
    };

    tracing::warn!(field, error = %detail, "Redis did not answer PING");
    Err(ValidationError::for_field(
        ValidationKind::DatastoreUnreachable,
        field,
        field_group,
        format!(
            "Could not connect to Redis with values provided in {}. Error: {}",
            field, detail
        ),
    ))
}
