use datomic_query::{
    ApiClient, ClientError,
    config::Settings,
    datomic,
    submit::{SubmitError, Submitter},
};
use serde_json::json;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

// ----------------------------------------------------------------------
// One-shot HTTP responder
// ----------------------------------------------------------------------

async fn serve_once(status: u16, body: &'static str) -> (Settings, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;

        let response = format!(
            "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            if status < 400 { "OK" } else { "Error" },
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        request
    });

    (Settings::for_api_url(format!("http://{addr}")), handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);

            if buf.len() >= head_end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8(buf).unwrap()
}

fn body_of(request: &str) -> serde_json::Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

// ----------------------------------------------------------------------
// Submission
// ----------------------------------------------------------------------

#[tokio::test]
async fn submit_posts_the_document_as_json() {
    let (settings, server) = serve_once(200, r#"{"data":[[1,"Ada"]]}"#).await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let doc = datomic::find(["?e", "?name"])
        .where_([("?e", "user/name", "?name")])
        .build();
    let response = client.submit(&doc).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(response, json!({ "data": [[1, "Ada"]] }));
    assert!(request.starts_with("POST /api/datomic/query HTTP/1.1\r\n"));
    assert!(
        request
            .to_ascii_lowercase()
            .contains("content-type: application/json")
    );
    assert_eq!(body_of(&request), doc.to_json().unwrap());
}

#[tokio::test]
async fn builder_run_goes_through_the_client() {
    let (settings, server) = serve_once(200, r#"{"data":{"user/name":"Ada"}}"#).await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let mut builder = datomic::pull_one("?e", ["user/name"])
        .where_([("?e", "user/id", "?id")])
        .in_(["$", "?id"]);
    let response = builder.run_with(&client, ["u-1"]).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(response["data"]["user/name"], "Ada");
    assert_eq!(
        body_of(&request),
        json!({
            "find": [{ "pull": ["user/name"], "entity": "?e" }, "."],
            "in": ["$", "?id"],
            "where": [["?e", "user/id", "?id"]],
            "args": ["u-1"]
        })
    );
}

#[tokio::test]
async fn error_body_rejects_with_the_whole_body() {
    let (settings, server) = serve_once(200, r#"{"error":"unknown attribute","clause":1}"#).await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let err = client
        .submit(&datomic::find(["?e"]).build())
        .await
        .unwrap_err();
    server.await.unwrap();

    assert_eq!(err.message(), "unknown attribute");
    assert_eq!(
        err.body(),
        Some(&json!({ "error": "unknown attribute", "clause": 1 }))
    );
}

#[tokio::test]
async fn failure_status_keeps_parsed_body() {
    let (settings, server) = serve_once(500, r#"{"message":"boom"}"#).await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let err = client
        .submit(&datomic::find(["?e"]).build())
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        SubmitError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, Some(json!({ "message": "boom" })));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_is_a_decode_error() {
    let (settings, server) = serve_once(200, "not json").await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let err = client
        .submit(&datomic::find(["?e"]).build())
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, SubmitError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let settings = Settings::for_api_url(format!("http://{addr}"));
    let client = ApiClient::from_settings(&settings).unwrap();

    let err = client
        .submit(&datomic::find(["?e"]).build())
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Transport { .. }));
}

#[tokio::test]
async fn auth_headers_ride_on_every_request() {
    let (settings, server) = serve_once(200, r#"{"data":[]}"#).await;
    let settings = settings.with_auth_header("Authorization", "Bearer secret");
    let client = ApiClient::from_settings(&settings).unwrap();

    client.fetch_schema().await.unwrap();
    let request = server.await.unwrap();

    assert!(
        request
            .to_ascii_lowercase()
            .contains("authorization: bearer secret")
    );
    assert!(!format!("{client:?}").contains("secret"));
}

// ----------------------------------------------------------------------
// Translate and catalog endpoints
// ----------------------------------------------------------------------

#[tokio::test]
async fn translate_posts_to_the_translate_endpoint() {
    let (settings, server) = serve_once(200, r#"{"query":"[:find ?e]"}"#).await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let response = client
        .translate(&datomic::find(["?e"]).build())
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(response["query"], "[:find ?e]");
    assert!(request.starts_with("POST /api/datomic/translate-query HTTP/1.1\r\n"));
}

#[tokio::test]
async fn fetch_schema_unwraps_data() {
    let (settings, server) = serve_once(
        200,
        r#"{"data":[{"ident":"user/id","namespace":"user","isAttribute":true,"isUnique":true,"unique":"unique/identity"}]}"#,
    )
    .await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let schema = client.fetch_schema().await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /api/datomic/schema HTTP/1.1\r\n"));
    assert_eq!(schema.len(), 1);
    assert_eq!(schema[0].ident, "user/id");
    assert!(schema[0].is_unique);
}

#[tokio::test]
async fn fetch_entity_shapes_unwraps_data() {
    let (settings, server) = serve_once(
        200,
        r#"{"data":[{"uniqueAttribute":"user/id","schema":{"user/name":"string"}}]}"#,
    )
    .await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let shapes = client.fetch_entity_shapes().await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /api/datomic/entity-shapes HTTP/1.1\r\n"));
    assert_eq!(shapes[0].unique_attribute, "user/id");
}

#[tokio::test]
async fn malformed_catalog_is_a_decode_error() {
    let (settings, server) = serve_once(200, r#"{"rows":[]}"#).await;
    let client = ApiClient::from_settings(&settings).unwrap();

    let err = client.fetch_schema().await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, SubmitError::Decode { .. }));
}

#[test]
fn invalid_header_names_are_rejected() {
    let settings = Settings::default().with_auth_header("bad header", "x");

    assert!(matches!(
        ApiClient::from_settings(&settings),
        Err(ClientError::InvalidHeader { .. })
    ));
}
