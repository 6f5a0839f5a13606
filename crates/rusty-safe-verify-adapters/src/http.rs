use serde::de::DeserializeOwned;

use rusty_safe_verify_core::PortError;

use crate::config::VerifyAdapterConfig;

pub(crate) fn build_client(cfg: &VerifyAdapterConfig) -> Result<reqwest::Client, PortError> {
    reqwest::Client::builder()
        .timeout(cfg.timeout())
        .build()
        .map_err(|e| PortError::Transport(format!("http client: {e}")))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout_ms: u64) -> PortError {
    if err.is_timeout() {
        PortError::Timeout(timeout_ms)
    } else if err.is_decode() {
        PortError::Validation(err.to_string())
    } else {
        PortError::Transport(err.to_string())
    }
}

/// Send `request` and decode a JSON body. Non-2xx statuses are errors.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    timeout_ms: u64,
) -> Result<T, PortError> {
    let resp = request
        .send()
        .await
        .map_err(|e| map_reqwest_error(e, timeout_ms))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PortError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        });
    }

    resp.json::<T>()
        .await
        .map_err(|e| map_reqwest_error(e, timeout_ms))
}
