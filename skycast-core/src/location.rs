use crate::{error::LocationError, model::Coordinates};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod geoip;

/// Outcome of a permission check or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Not yet decided; a request prompt is required.
    Prompt,
}

/// How long a position fix may take before the run is abandoned.
pub const FIX_TIMEOUT: Duration = Duration::from_secs(5);

/// Single-fix location source behind the permission gate.
///
/// Implementations wrap platform positioning APIs as one-shot async calls.
/// `position` must produce a fresh reading; serving a cached fix is not
/// allowed.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    /// Current permission state, without prompting the user.
    async fn check_permission(&self) -> Result<PermissionStatus, LocationError>;

    /// Prompt the user for permission. Only called when `check_permission`
    /// did not report `Granted`.
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError>;

    /// One high-accuracy position fix.
    async fn position(&self) -> Result<Coordinates, LocationError>;
}

/// Gate on permission, then take exactly one fix bounded by [`FIX_TIMEOUT`].
///
/// A denial is terminal for the run: there is no retry and the fix is never
/// attempted without a confirmed grant.
pub async fn acquire_fix(provider: &dyn LocationProvider) -> Result<Coordinates, LocationError> {
    acquire_fix_within(provider, FIX_TIMEOUT).await
}

async fn acquire_fix_within(
    provider: &dyn LocationProvider,
    deadline: Duration,
) -> Result<Coordinates, LocationError> {
    if provider.check_permission().await? != PermissionStatus::Granted
        && provider.request_permission().await? != PermissionStatus::Granted
    {
        return Err(LocationError::PermissionDenied);
    }

    let fix = tokio::time::timeout(deadline, provider.position())
        .await
        .map_err(|_| LocationError::Timeout)??;

    tracing::info!(
        latitude = fix.latitude,
        longitude = fix.longitude,
        "acquired position fix"
    );
    Ok(fix)
}

/// Provider backed by fixed coordinates (config override or CLI flags).
///
/// Positioning never leaves the process, so the gate reports `Granted` up
/// front.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    coordinates: Coordinates,
}

impl FixedProvider {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedProvider {
    async fn check_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERN: Coordinates = Coordinates {
        latitude: 46.948,
        longitude: 7.4474,
    };

    /// Grants only after a prompt; panics if the fix is taken without one.
    #[derive(Debug)]
    struct PromptThenGrant;

    #[async_trait]
    impl LocationProvider for PromptThenGrant {
        async fn check_permission(&self) -> Result<PermissionStatus, LocationError> {
            Ok(PermissionStatus::Prompt)
        }

        async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
            Ok(PermissionStatus::Granted)
        }

        async fn position(&self) -> Result<Coordinates, LocationError> {
            Ok(BERN)
        }
    }

    #[derive(Debug)]
    struct AlwaysDenied;

    #[async_trait]
    impl LocationProvider for AlwaysDenied {
        async fn check_permission(&self) -> Result<PermissionStatus, LocationError> {
            Ok(PermissionStatus::Denied)
        }

        async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
            Ok(PermissionStatus::Denied)
        }

        async fn position(&self) -> Result<Coordinates, LocationError> {
            panic!("position must not be called after a denial");
        }
    }

    #[derive(Debug)]
    struct SlowFix;

    #[async_trait]
    impl LocationProvider for SlowFix {
        async fn check_permission(&self) -> Result<PermissionStatus, LocationError> {
            Ok(PermissionStatus::Granted)
        }

        async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
            Ok(PermissionStatus::Granted)
        }

        async fn position(&self) -> Result<Coordinates, LocationError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(BERN)
        }
    }

    #[tokio::test]
    async fn fixed_provider_yields_its_coordinates() {
        let provider = FixedProvider::new(BERN);
        let fix = acquire_fix(&provider).await.expect("fix should succeed");
        assert_eq!(fix, BERN);
    }

    #[tokio::test]
    async fn prompt_then_grant_succeeds() {
        let fix = acquire_fix(&PromptThenGrant).await.expect("fix should succeed");
        assert_eq!(fix, BERN);
    }

    #[tokio::test]
    async fn denial_is_terminal() {
        let err = acquire_fix(&AlwaysDenied).await.unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn slow_fix_times_out() {
        let err = acquire_fix_within(&SlowFix, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::Timeout));
    }
}
