//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Loading configuration from a TOML file
//! - Assembling the core against mocked Nominatim and OSRM servers
//! - Error mapping from the HTTP integrations up to the application

use std::io::Write;
use std::time::Duration;

use application::{
    ApplicationError, CancellationSource, CoreEvent, EventKind, GateState, MapCore,
};
use domain::AuthorizationState;
use infrastructure::{AppConfig, build_core};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Helpers
// ============================================================================

const PARIS_SEARCH: &str = r#"[{"lat": "48.8566", "lon": "2.3522", "display_name": "Paris, France"}]"#;

const LONDON_PARIS_ROUTE: &str = r#"{
    "code": "Ok",
    "routes": [{
        "distance": 343999.0,
        "duration": 19800.0,
        "geometry": {"type": "LineString", "coordinates": [[-0.12, 51.5], [1.0, 50.0], [2.35, 48.86]]}
    }]
}"#;

fn config_file(server: &MockServer, authorization: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[geocoding]
base_url = "{uri}"
min_interval_ms = 0

[routing]
base_url = "{uri}"

[device]
authorization = "{authorization}"
location = {{ latitude = 51.5, longitude = -0.12 }}
"#,
        uri = server.uri()
    )
    .unwrap();
    file
}

async fn started_core(config: &AppConfig) -> MapCore {
    let bootstrapped = build_core(config).unwrap();
    let (_id, mut located) = bootstrapped
        .core
        .events()
        .subscribe_channel(EventKind::LocationUpdated);
    let (core, _task) = bootstrapped.start();

    tokio::time::timeout(Duration::from_secs(2), located.recv())
        .await
        .unwrap()
        .unwrap();
    core
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[tokio::test]
    async fn file_settings_reach_the_core() {
        let server = MockServer::start().await;
        let file = config_file(&server, "authorized_always");

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.geocoding.base_url, server.uri());
        assert_eq!(config.device.authorization, AuthorizationState::AuthorizedAlways);

        let core = started_core(&config).await;
        assert_eq!(core.permission().state(), GateState::FixObtained);
        let fix = core.location().current_fix().unwrap();
        assert!((fix.coordinate().latitude() - 51.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn restricted_device_denies_access() {
        let server = MockServer::start().await;
        let file = config_file(&server, "restricted");
        let config = AppConfig::load_from(Some(file.path())).unwrap();

        let bootstrapped = build_core(&config).unwrap();
        let (_id, mut denied) = bootstrapped
            .core
            .events()
            .subscribe_channel(EventKind::AccessDenied);
        let (core, _task) = bootstrapped.start();

        let event = tokio::time::timeout(Duration::from_secs(2), denied.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(CoreEvent::AccessDenied));
        assert!(matches!(
            core.routes()
                .create_route("Paris", CancellationSource::new().token())
                .await,
            Err(ApplicationError::LocationUnavailable(_))
        ));
    }
}

// ============================================================================
// Route Planning Tests
// ============================================================================

mod route_tests {
    use super::*;

    #[tokio::test]
    async fn plans_route_to_geocoded_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PARIS_SEARCH))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/route/v1/driving/-0\.12,51\.5;2\.3522,48\.8566$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LONDON_PARIS_ROUTE))
            .expect(1)
            .mount(&server)
            .await;

        let file = config_file(&server, "authorized_when_in_use");
        let core = started_core(&AppConfig::load_from(Some(file.path())).unwrap()).await;

        let planned = core
            .routes()
            .create_route("  Paris ", CancellationSource::new().token())
            .await
            .unwrap();
        assert_eq!(planned.route.format_distance(), "343");
        assert_eq!(planned.route.geometry().len(), 3);
        assert!(core.routes().current_route().is_some());

        let center = core.routes().clear_route().unwrap();
        assert!((center.longitude() + 0.12).abs() < 1e-9);
        assert!(core.routes().current_route().is_none());
    }

    #[tokio::test]
    async fn unknown_address_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let file = config_file(&server, "authorized_when_in_use");
        let core = started_core(&AppConfig::load_from(Some(file.path())).unwrap()).await;

        let err = core
            .routes()
            .create_route("Atlantis", CancellationSource::new().token())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::AddressNotFound(a) if a == "Atlantis"));
    }

    #[tokio::test]
    async fn unroutable_destination_is_route_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"lat": "40.7128", "lon": "-74.0060"}]"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/route/v1/driving/.+"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"code": "NoRoute", "message": "Impossible route between points"}"#,
            ))
            .mount(&server)
            .await;

        let file = config_file(&server, "authorized_when_in_use");
        let core = started_core(&AppConfig::load_from(Some(file.path())).unwrap()).await;

        let err = core
            .routes()
            .create_route("New York", CancellationSource::new().token())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::RouteUnavailable { .. }));
        assert!(core.routes().current_route().is_none());
    }

    #[tokio::test]
    async fn routing_outage_is_route_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PARIS_SEARCH))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/route/v1/driving/.+"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let file = config_file(&server, "authorized_when_in_use");
        let core = started_core(&AppConfig::load_from(Some(file.path())).unwrap()).await;

        let err = core
            .routes()
            .create_route("Paris", CancellationSource::new().token())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::RouteUnavailable { .. }));
    }
}
