use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// Browser origins allowed to call the API. An empty list means any origin,
/// in which case credentials are not allowed.
#[derive(Debug, Clone)]
pub struct CorsSettings {
    origins: Vec<HeaderValue>,
}

impl CorsSettings {
    /// Parses a comma separated origin list, falling back to the local
    /// frontend dev servers when unset.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let origins = raw
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();

        Self { origins }
    }

    pub fn origins(&self) -> &[HeaderValue] {
        &self.origins
    }

    pub fn layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                header::ORIGIN,
                HeaderName::from_static("x-requested-with"),
            ])
            .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
            .max_age(Duration::from_secs(PREFLIGHT_MAX_AGE_SECS));

        if self.origins.is_empty() {
            tracing::warn!("CORS: No valid origins configured, allowing any origin");
            layer.allow_origin(AllowOrigin::any())
        } else {
            tracing::info!("CORS: Configured with {} allowed origin(s)", self.origins.len());
            layer
                .allow_origin(AllowOrigin::list(self.origins.clone()))
                .allow_credentials(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins() {
        let settings = CorsSettings::from_raw(None);
        assert_eq!(settings.origins().len(), 2);
        assert_eq!(settings.origins()[0], "http://localhost:3000");
    }

    #[test]
    fn test_invalid_and_blank_origins_are_skipped() {
        let settings = CorsSettings::from_raw(Some("https://connectech.app, ,bad\norigin"));
        assert_eq!(settings.origins(), &[HeaderValue::from_static("https://connectech.app")]);
    }

    #[test]
    fn test_layer_builds_for_any_origin() {
        let _layer = CorsSettings::from_raw(Some("")).layer();
    }
}
