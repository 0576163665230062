use reqwest::StatusCode;

/// Failures while gating permission or acquiring a position fix.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied. Please enable it in settings.")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Failures while talking to an HTTP endpoint.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// What a single pipeline run can surface to the user.
///
/// Geocoding failures never appear here: they degrade to the fallback city
/// name inside the geocode client.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("Forecast fetch failed: {0}")]
    Forecast(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_message_names_settings() {
        let msg = LocationError::PermissionDenied.to_string();
        assert!(msg.contains("enable it in settings"));
    }

    #[test]
    fn status_error_carries_status_and_body() {
        let err = FetchError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream broke".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream broke"));
    }

    #[test]
    fn pipeline_error_is_transparent_for_location() {
        let err = PipelineError::from(LocationError::Timeout);
        assert_eq!(err.to_string(), LocationError::Timeout.to_string());
    }
}
