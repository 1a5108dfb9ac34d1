use std::{future::Future, time::Duration};

use crate::{Error, Result};

/// Runs one external call under a deadline. Elapsed deadlines surface as [`Error::Timeout`].
pub(crate) async fn bounded<T, E, F>(
	operation: &'static str,
	timeout_ms: u64,
	fut: F,
) -> Result<T>
where
	E: Into<Error>,
	F: Future<Output = Result<T, E>>,
{
	match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
		Ok(result) => result.map_err(Into::into),
		Err(_) => Err(Error::Timeout { operation, timeout_ms }),
	}
}

/// Like [`bounded`], but failures degrade to `None` after a warning. Never retries.
pub(crate) async fn best_effort<T, E, F>(
	operation: &'static str,
	timeout_ms: u64,
	fut: F,
) -> Option<T>
where
	E: Into<Error>,
	F: Future<Output = Result<T, E>>,
{
	match bounded(operation, timeout_ms, fut).await {
		Ok(value) => Some(value),
		Err(err) => {
			tracing::warn!(operation, error = %err, "External call failed. Degrading.");

			None
		},
	}
}
