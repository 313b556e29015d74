use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::tempdir;
use tower::ServiceExt;
use veille_api::config::DEFAULT_MAX_UPLOAD_BYTES;
use veille_api::{router, AppState, Variant};

const BOUNDARY: &str = "veille-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a [u8]),
}

fn fixture(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../veille-parser/tests/data")
        .join(name);
    std::fs::read(path).expect("read fixture")
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(content) => {
                body.extend_from_slice(
                    b"Content-Disposition: form-data; name=\"file\"; filename=\"export.csv\"\r\n",
                );
                body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyser_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyser")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("build request")
}

fn filtered_app() -> Router {
    router(
        AppState::new(Variant::Filtered, "unused.html"),
        DEFAULT_MAX_UPLOAD_BYTES,
    )
}

async fn json_body(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn filtered_report_returns_kpis_and_html() {
    let csv = fixture("mentions_basic.csv");
    let response = filtered_app()
        .oneshot(analyser_request(&[Part::File(&csv)]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["kpis"]["total_mentions"], 2);
    assert_eq!(json["kpis"]["positive"], 1);
    assert_eq!(json["kpis"]["negative"], 1);
    assert_eq!(json["kpis"]["neutral"], 0);
    let html = json["html_report"].as_str().expect("html string");
    assert!(html.contains("Auteurs sélectionnés"));
    assert_eq!(html.matches("data:image/png;base64,").count(), 3);
}

#[tokio::test]
async fn author_and_year_filters_are_applied() {
    let csv = fixture("mentions_mixed.csv");
    let response = filtered_app()
        .oneshot(analyser_request(&[
            Part::File(&csv),
            Part::Text("selected_authors", "Le Figaro"),
            Part::Text("selected_authors", "Les Echos"),
            Part::Text("min_year", ""),
            Part::Text("granularity", "Par année"),
            Part::Text("comment", "ignored"),
        ]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["kpis"]["total_mentions"], 3);
    assert!(json["html_report"]
        .as_str()
        .is_some_and(|html| html.contains("Le Figaro, Les Echos")));
}

#[tokio::test]
async fn single_year_bounds_keep_only_that_year() {
    let csv = fixture("mentions_mixed.csv");
    let response = filtered_app()
        .oneshot(analyser_request(&[
            Part::File(&csv),
            Part::Text("min_year", "2023"),
            Part::Text("max_year", "2023"),
        ]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["kpis"]["total_mentions"], 3);
    assert_eq!(json["kpis"]["negative"], 1);
}

#[tokio::test]
async fn local_variant_writes_the_report() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("rapport_veille.html");
    std::fs::write(&path, "stale").expect("seed previous report");
    let app = router(
        AppState::new(Variant::Local, path.clone()),
        DEFAULT_MAX_UPLOAD_BYTES,
    );

    let csv = fixture("mentions_mixed.csv");
    let response = app
        .oneshot(analyser_request(&[
            Part::File(&csv),
            Part::Text("min_year", "not a year"),
            Part::Text("selected_authors", "Nobody"),
        ]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["kpis"]["total_mentions"], 9);

    let written = std::fs::read_to_string(&path).expect("report on disk");
    assert_eq!(Some(written.as_str()), json["html_report"].as_str());
    assert!(!written.contains("Auteurs sélectionnés"));
}

#[tokio::test]
async fn missing_column_is_a_bad_request() {
    let csv = fixture("mentions_missing_column.csv");
    let response = filtered_app()
        .oneshot(analyser_request(&[Part::File(&csv)]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["detail"]
        .as_str()
        .is_some_and(|detail| detail.contains("authorName")));
}

#[tokio::test]
async fn missing_file_is_unprocessable() {
    let response = filtered_app()
        .oneshot(analyser_request(&[Part::Text("granularity", "Par mois")]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert!(json["detail"]
        .as_str()
        .is_some_and(|detail| detail.contains("file")));
}

#[tokio::test]
async fn non_integer_year_is_unprocessable() {
    let csv = fixture("mentions_basic.csv");
    let response = filtered_app()
        .oneshot(analyser_request(&[
            Part::File(&csv),
            Part::Text("max_year", "twenty"),
        ]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert!(json["detail"]
        .as_str()
        .is_some_and(|detail| detail.contains("max_year")));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let csv = fixture("mentions_mixed.csv");
    let app = router(AppState::new(Variant::Filtered, "unused.html"), 64);
    let response = app
        .oneshot(analyser_request(&[Part::File(&csv)]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_is_permissive() {
    let csv = fixture("mentions_basic.csv");
    let mut request = analyser_request(&[Part::File(&csv)]);
    request.headers_mut().insert(
        header::ORIGIN,
        "http://localhost:8501".parse().expect("origin header"),
    );

    let response = filtered_app().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
