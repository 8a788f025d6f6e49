//! Client registration API over HTTP against a fake server.

use marketplace_clients::{ClientDetails, ClientsApi, ClientsApiConfig, MarketplaceError};
use marketplace_core::Credentials;
use marketplace_core::signature::joined_digest;
use marketplace_http_client::HttpTransport;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "0123456789abcdef0123456789abcdef";

fn client(server: &MockServer) -> ClientsApi<HttpTransport> {
    ClientsApi::with_config(
        Credentials::new("100", "s3cr3t").unwrap(),
        "vendor.module",
        HttpTransport::default_transport().unwrap(),
        ClientsApiConfig::new().with_endpoint(format!("{}/add_client.php", server.uri())),
    )
    .unwrap()
}

#[tokio::test]
async fn update_sends_utf8_query() {
    let server = MockServer::start().await;
    let hash = joined_digest(&[format!("100|vendor.module|{}|update|s3cr3t", KEY)]);

    Mock::given(method("GET"))
        .and(path("/add_client.php"))
        .and(query_param("action", "update"))
        .and(query_param("name", "Ромашка"))
        .and(query_param("is_utf", "Y"))
        .and(query_param("hash", hash.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK<br />Updated"))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server).with_client_key(KEY).unwrap();
    let details = ClientDetails {
        name: "Ромашка".to_string(),
        ..Default::default()
    };
    assert_eq!(api.update(&details).await.unwrap(), "Updated");
}

#[tokio::test]
async fn list_is_filtered_client_side() {
    let server = MockServer::start().await;
    let xml = "<clients>\
        <client><key>A</key><site_url>a.test</site_url></client>\
        <client><key>B</key><site_url>b.test</site_url></client>\
        </clients>";

    Mock::given(method("GET"))
        .and(query_param("action", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml))
        .mount(&server)
        .await;

    let api = client(&server);
    let all = api.get_list(&[]).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_b = api.get_list(&[("site_url", "b.test")]).await.unwrap();
    assert_eq!(only_b.len(), 1);
    assert_eq!(only_b[0].get("key"), Some("B"));
}

#[tokio::test]
async fn delete_error_reply() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "delete"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ERROR<br />Wrong hash"))
        .mount(&server)
        .await;

    let api = client(&server).with_client_key(KEY).unwrap();
    let err = api.delete().await.unwrap_err();
    assert!(matches!(err, MarketplaceError::ClientsApi(ref m) if m == "Wrong hash"));
}
