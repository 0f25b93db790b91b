use std::time::Duration;

use kalinga_gateway::config::{DEFAULT_TIMEOUT, GatewayConfig};
use kalinga_gateway::error::GatewayError;
use kalinga_gateway::http::HttpGateway;
use kalinga_gateway::RecordGateway;
use kalinga_core::models::category::Category;
use kalinga_core::models::client::ClientId;
use kalinga_core::models::session::{Session, WorkerId};

#[test]
fn trailing_slash_is_trimmed() {
    let config = GatewayConfig::new("http://records.local:8080/");
    assert_eq!(config.base_url, "http://records.local:8080");
    assert_eq!(config.timeout, DEFAULT_TIMEOUT);

    let gateway = HttpGateway::new(&config.with_timeout(Duration::from_secs(2))).unwrap();
    assert_eq!(gateway.base_url(), "http://records.local:8080");
}

#[tokio::test]
async fn unreachable_store_is_a_network_error() {
    // Port 9 (discard) on loopback is closed on test machines.
    let config = GatewayConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
    let gateway = HttpGateway::new(&config).unwrap();

    let result = gateway
        .visit_records(Session::worker(WorkerId(1)), Category::Pregnant, ClientId(42))
        .await;
    assert!(matches!(result, Err(GatewayError::Network(_))), "{result:?}");
}
