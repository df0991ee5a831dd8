use crate::errors::ResponderError;

pub async fn handle_response<T: for<'de> serde::Deserialize<'de>>(
    resp: reqwest::Response,
    method: &'static str,
) -> Result<T, ResponderError> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let errmsg = format!(
            "Failed to call method '{}', received response with status code:{} and body: {}",
            method, status, body
        );
        return Err(ResponderError::UpstreamUnavailable(errmsg));
    }
    let value = resp.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            ResponderError::from(e)
        } else {
            ResponderError::UpstreamUnavailable(format!(
                "malformed response body from method '{method}': {e}"
            ))
        }
    })?;
    Ok(value)
}
