use super::*;
use crate::auth::{CATALOG_SCOPE, REPOSITORY_SCOPE};
use mockito::{Matcher, Mock, ServerGuard};

fn registry_url(server: &ServerGuard) -> Url {
    Url::parse(&format!("{}/", server.url())).unwrap()
}

fn challenge_header(server: &ServerGuard) -> String {
    format!(
        r#"Bearer realm="{}/token",service="registry.test""#,
        server.url()
    )
}

fn version_mock(server: &mut ServerGuard) -> Mock {
    let challenge = challenge_header(server);
    server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Docker-Distribution-Api-Version", "registry/2.0")
        .with_header("WWW-Authenticate", &challenge)
        .create()
}

fn negotiate(server: &ServerGuard, credentials: &Credentials, scope: &str) -> Result<String> {
    let http_client = HttpClient::new();
    let url = registry_url(server);
    TokenNegotiator::new(&http_client, &url, credentials).negotiate(scope)
}

#[test]
fn test_negotiate_success() {
    let mut server = mockito::Server::new();
    let version = version_mock(&mut server);
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("service".into(), "registry.test".into()),
            Matcher::UrlEncoded("scope".into(), CATALOG_SCOPE.into()),
        ]))
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .with_body(r#"{"Token":"catalog-token"}"#)
        .create();

    let result = negotiate(&server, &Credentials::new("user", "pass"), CATALOG_SCOPE);

    version.assert();
    token.assert();
    assert_eq!(result.unwrap(), "catalog-token");
}

#[test]
fn test_negotiate_passes_repository_scope() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::UrlEncoded("scope".into(), REPOSITORY_SCOPE.into()))
        .with_status(200)
        .with_body(r#"{"Token":"pull-token"}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), REPOSITORY_SCOPE);

    token.assert();
    assert_eq!(result.unwrap(), "pull-token");
}

#[test]
fn test_version_check_accepts_200() {
    let mut server = mockito::Server::new();
    let challenge = challenge_header(&server);
    let _version = server
        .mock("GET", "/v2/")
        .with_status(200)
        .with_header("Docker-Distribution-Api-Version", "registry/2.0")
        .with_header("WWW-Authenticate", &challenge)
        .create();
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Token":"t"}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert_eq!(result.unwrap(), "t");
}

#[test]
fn test_missing_version_header_fails_without_token_request() {
    let mut server = mockito::Server::new();
    let challenge = challenge_header(&server);
    let _version = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("WWW-Authenticate", &challenge)
        .create();
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);

    token.assert();
    match result {
        Err(RegistryError::AuthDiscovery { message }) => {
            assert!(message.contains("version header"));
        }
        other => panic!("Expected AuthDiscovery error, got {:?}", other),
    }
}

#[test]
fn test_unexpected_version_header_value_fails() {
    let mut server = mockito::Server::new();
    let challenge = challenge_header(&server);
    let _version = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Docker-Distribution-Api-Version", "registry/1.0")
        .with_header("WWW-Authenticate", &challenge)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert!(matches!(result, Err(RegistryError::AuthDiscovery { .. })));
}

#[test]
fn test_version_check_server_error_is_status_error() {
    let mut server = mockito::Server::new();
    let _version = server
        .mock("GET", "/v2/")
        .with_status(500)
        .with_header("Docker-Distribution-Api-Version", "registry/2.0")
        .create();
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);

    token.assert();
    assert_eq!(result.unwrap_err().status_code(), Some(500));
}

#[test]
fn test_challenge_without_service_fails() {
    let mut server = mockito::Server::new();
    let realm_only = format!(r#"Bearer realm="{}/token""#, server.url());
    let _version = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Docker-Distribution-Api-Version", "registry/2.0")
        .with_header("WWW-Authenticate", &realm_only)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);

    match result {
        Err(RegistryError::AuthDiscovery { message }) => {
            assert!(message.contains("authentication header"));
        }
        other => panic!("Expected AuthDiscovery error, got {:?}", other),
    }
}

#[test]
fn test_missing_challenge_fails() {
    let mut server = mockito::Server::new();
    let _version = server
        .mock("GET", "/v2/")
        .with_status(200)
        .with_header("Docker-Distribution-Api-Version", "registry/2.0")
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert!(matches!(result, Err(RegistryError::AuthDiscovery { .. })));
}

#[test]
fn test_discover_skips_non_bearer_challenges() {
    let mut server = mockito::Server::new();
    let challenge = challenge_header(&server);
    let _version = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Docker-Distribution-Api-Version", "registry/2.0")
        .with_header("WWW-Authenticate", r#"Basic realm="Artifactory Realm""#)
        .with_header("WWW-Authenticate", &challenge)
        .create();

    let http_client = HttpClient::new();
    let url = registry_url(&server);
    let credentials = Credentials::default();
    let discovered = TokenNegotiator::new(&http_client, &url, &credentials)
        .discover()
        .unwrap();

    assert_eq!(discovered.realm, format!("{}/token", server.url()));
    assert_eq!(discovered.service, "registry.test");
}

#[test]
fn test_token_lowercase_field() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"token":"lower","expires_in":300}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert_eq!(result.unwrap(), "lower");
}

#[test]
fn test_token_access_token_field() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"access_token":"oauth"}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert_eq!(result.unwrap(), "oauth");
}

#[test]
fn test_token_prefers_token_over_access_token() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"token":"primary","access_token":"secondary"}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert_eq!(result.unwrap(), "primary");
}

#[test]
fn test_token_both_spellings_prefers_capitalized() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"token":"lower","Token":"upper"}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert_eq!(result.unwrap(), "upper");
}

#[test]
fn test_token_empty_capitalized_falls_back() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Token":"","access_token":"oauth"}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert_eq!(result.unwrap(), "oauth");
}

#[test]
fn test_token_missing_field_is_decode_error() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"expires_in":300}"#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert!(matches!(result, Err(RegistryError::Decode { .. })));
}

#[test]
fn test_token_malformed_json_is_decode_error() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert!(matches!(result, Err(RegistryError::Decode { .. })));
}

#[test]
fn test_token_endpoint_rejection_is_status_error() {
    let mut server = mockito::Server::new();
    let _version = version_mock(&mut server);
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"errors":[{"code":"UNAUTHORIZED"}]}"#)
        .create();

    let result = negotiate(&server, &Credentials::new("user", "wrong"), CATALOG_SCOPE);
    assert_eq!(result.unwrap_err().status_code(), Some(401));
}

#[test]
fn test_invalid_realm_is_url_error() {
    let mut server = mockito::Server::new();
    let _version = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Docker-Distribution-Api-Version", "registry/2.0")
        .with_header("WWW-Authenticate", r#"Bearer realm="not a url",service="registry.test""#)
        .create();

    let result = negotiate(&server, &Credentials::default(), CATALOG_SCOPE);
    assert!(matches!(result, Err(RegistryError::InvalidUrl { .. })));
}
