//! Integration tests for the legacy HTML-scraping client.

mod support;

use pawns_client::{ClientConfig, ClientError, Credential, ScrapeClient};
use support::{FixtureServer, Route};

fn client_for(server: &FixtureServer) -> ScrapeClient {
    let config = ClientConfig::new(&server.base_url).unwrap();
    ScrapeClient::with_config(config).unwrap()
}

fn cookie_client_for(server: &FixtureServer) -> ScrapeClient {
    let mut client = client_for(server);
    let credential = Some(Credential::Cookies {
        cookies: vec![("session".to_string(), "abc".to_string())],
    });
    let blob = serde_json::to_vec(&credential).unwrap();
    client.restore_session(blob.as_slice()).unwrap();
    client
}

const HOME_PAGE: &str = r#"
    <html><body>
    <form><input type="hidden" name="_token" value="csrf-token-1"></form>
    <section class="ipr-card payment_card">
        <div class="payment_card__amount">$2.10</div>
        <div class="payment_card__traffic">5.0 GB</div>
    </section>
    <section class="active_devices_card">
        <ul class="active_devices__list">
            <li class="active_devices__item active_devices__list-item">
                <div>203.0.113.7</div>
                <img class="active_devices__platform" title="ANDROID" src="a.png">
                <i class="active_devices__flag-icon" title="us"></i>
            </li>
        </ul>
    </section>
    </body></html>
"#;

/// Renders a devices page with `count` devices and a 3-page pagination list.
fn devices_page(page: u32, count: u32) -> String {
    let items: String = (0..count)
        .map(|i| {
            format!(
                r#"<li class="active_devices__item active_devices__list-item">
                    <div>10.0.{page}.{i}</div>
                    <img class="active_devices__platform" title="linux" src="l.png">
                    <i class="active_devices__flag-icon" title="fr"></i>
                </li>"#
            )
        })
        .collect();
    let pages: String = (1..=3)
        .map(|n| {
            if n == page {
                format!(r#"<li class="active">{n}</li>"#)
            } else {
                format!("<li>{n}</li>")
            }
        })
        .collect();
    format!(
        r#"<html><body>
        <section class="active_devices_card"><ul class="active_devices__list">{items}</ul></section>
        <ul class="pagination">{pages}</ul>
        </body></html>"#
    )
}

#[tokio::test]
async fn login_stores_the_cookie_jar() {
    let server = FixtureServer::start(vec![
        ("GET /", Route::html(200, HOME_PAGE).with_cookie("session=pre; Path=/")),
        ("POST /login", Route::redirect().with_cookie("session=post-login; Path=/")),
    ])
    .await;
    let mut client = client_for(&server);

    let logged_in = client.login("a@b.c", "pw").await.unwrap();
    assert!(logged_in);
    assert!(client.is_authenticated());

    let requests = server.requests().await;
    let login_request = &requests[1];
    // CSRF token and pre-login cookie both travel with the form post.
    assert!(login_request.contains("_token=csrf-token-1"));
    assert!(login_request.to_lowercase().contains("cookie: session=pre"));

    // The refreshed cookie wins for subsequent requests.
    let snapshot = client.dashboard().await.unwrap();
    assert_eq!(snapshot.balance, "$2.10");
    let dashboard_request = server.requests().await.last().unwrap().to_lowercase();
    assert!(dashboard_request.contains("cookie: session=post-login"));
}

#[tokio::test]
async fn rejected_login_returns_false() {
    let server = FixtureServer::start(vec![
        ("GET /", Route::html(200, HOME_PAGE)),
        ("POST /login", Route::html(422, "<html>bad credentials</html>")),
    ])
    .await;
    let mut client = client_for(&server);

    let logged_in = client.login("a@b.c", "wrong").await.unwrap();
    assert!(!logged_in);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn login_page_without_token_is_a_parse_error() {
    let server = FixtureServer::start(vec![("GET /", Route::html(200, "<html></html>"))]).await;
    let mut client = client_for(&server);

    let err = client.login("a@b.c", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let server = FixtureServer::start(vec![]).await;
    let client = client_for(&server);

    assert!(matches!(client.dashboard().await, Err(ClientError::NotAuthenticated)));
    assert!(matches!(client.list_all_devices().await, Err(ClientError::NotAuthenticated)));
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn stale_session_surfaces_as_not_authenticated() {
    // The dashboard answers an expired session with a redirect to /login.
    let server = FixtureServer::start(vec![("GET /", Route::redirect())]).await;
    let client = cookie_client_for(&server);

    assert!(matches!(client.dashboard().await, Err(ClientError::NotAuthenticated)));
}

#[tokio::test]
async fn list_all_devices_concatenates_pages_in_order() {
    let server = FixtureServer::start(vec![
        ("GET /devices?page=1", Route::html(200, &devices_page(1, 2))),
        ("GET /devices?page=2", Route::html(200, &devices_page(2, 2))),
        ("GET /devices?page=3", Route::html(200, &devices_page(3, 2))),
    ])
    .await;
    let client = cookie_client_for(&server);

    let devices = client.list_all_devices().await.unwrap();
    assert_eq!(devices.len(), 6);

    let ips: Vec<&str> = devices.iter().map(|d| d.ip.as_str()).collect();
    assert_eq!(
        ips,
        ["10.0.1.0", "10.0.1.1", "10.0.2.0", "10.0.2.1", "10.0.3.0", "10.0.3.1"]
    );
    assert!(devices.iter().all(|d| d.platform == "Linux" && d.country == "FR"));

    // Page 1 once for the bounds, then one sequential fetch per page.
    assert_eq!(server.hits(), 4);
}

#[tokio::test]
async fn missing_pagination_bounds_is_a_parse_error() {
    let page = devices_page(1, 2).replace("pagination", "renamed");
    let server =
        FixtureServer::start(vec![("GET /devices?page=1", Route::html(200, &page))]).await;
    let client = cookie_client_for(&server);

    let err = client.list_all_devices().await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn upstream_error_on_a_page_is_reported_with_its_status() {
    let server =
        FixtureServer::start(vec![("GET /", Route::html(503, "<html>down</html>"))]).await;
    let client = cookie_client_for(&server);

    let err = client.dashboard().await.unwrap_err();
    match err {
        ClientError::Upstream { status } => assert_eq!(status.as_u16(), 503),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn session_roundtrip_restores_the_cookie_jar() {
    let server = FixtureServer::start(vec![("GET /", Route::html(200, HOME_PAGE))]).await;
    let client = cookie_client_for(&server);

    let mut blob = Vec::new();
    client.save_session(&mut blob).unwrap();

    let mut restored = client_for(&server);
    restored.restore_session(blob.as_slice()).unwrap();
    assert!(restored.is_authenticated());

    restored.dashboard().await.unwrap();
    let request = server.requests().await.last().unwrap().to_lowercase();
    assert!(request.contains("cookie: session=abc"));
}
