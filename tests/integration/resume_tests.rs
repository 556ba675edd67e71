//! Resuming from a previous output file

use crate::{create_test_config, html_page, leftover_temp_files, read_rows, write_input};
use tempfile::TempDir;
use title_grabber::crawler::run_batch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Cached", "Story")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let url = format!("{}/cached", mock_server.uri());
    let input = write_input(dir.path(), "urls.txt", &[url]);

    let first = run_batch(create_test_config(&output), &[input.clone()])
        .await
        .unwrap();
    assert_eq!(first.fetched, 1);
    let first_output = std::fs::read(&output).unwrap();

    let second = run_batch(create_test_config(&output), &[input])
        .await
        .unwrap();
    assert_eq!(second.cache_hits, 1);
    assert_eq!(second.fetched, 0);

    assert_eq!(std::fs::read(&output).unwrap(), first_output);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_incomplete_rows_are_fetched_again() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/untitled"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Only a title</title></head></html>"),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let url = format!("{}/untitled", mock_server.uri());
    let input = write_input(dir.path(), "urls.txt", &[url.clone()]);

    for _ in 0..2 {
        let summary = run_batch(create_test_config(&output), &[input.clone()])
            .await
            .unwrap();
        assert_eq!(summary.cache_hits, 0);
        assert_eq!(summary.fetched, 1);
    }

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], "Only a title");
    assert_eq!(rows[0][3], "");
}

#[tokio::test]
async fn test_rows_not_in_input_are_dropped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kept"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Kept", "Kept")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    std::fs::write(
        &output,
        "\"url\",\"end_url\",\"page_title\",\"article_title\"\n\
         \"https://gone.test/\",\"https://gone.test/\",\"Gone\",\"Gone\"\n",
    )
    .unwrap();

    let url = format!("{}/kept", mock_server.uri());
    let input = write_input(dir.path(), "urls.txt", &[url.clone()]);

    run_batch(create_test_config(&output), &[input]).await.unwrap();

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], url);
}

#[tokio::test]
async fn test_garbage_output_file_is_ignored() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Fresh", "Fresh")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    std::fs::write(&output, "not a title list\njust some,notes\n").unwrap();

    let url = format!("{}/fresh", mock_server.uri());
    let input = write_input(dir.path(), "urls.txt", &[url.clone()]);

    let summary = run_batch(create_test_config(&output), &[input]).await.unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(read_rows(&output)[0][0], url);
}
