//! End-to-end batch runs against a mock server

use crate::{create_test_config, html_page, leftover_temp_files, read_rows, write_input};
use tempfile::TempDir;
use title_grabber::crawler::{run_batch, Coordinator, Fetcher, RowResolver};
use title_grabber::output::ResumeCache;
use title_grabber::state::BatchState;
use title_grabber::url::SocialHost;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_run_single_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Example Domain", "Example Domain"))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let url = format!("{}/a", mock_server.uri());
    let input = write_input(dir.path(), "urls.txt", &[format!("see {} for details", url)]);

    let summary = run_batch(create_test_config(&output), &[input]).await.unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.rows_written(), 1);
    assert_eq!(
        read_rows(&output),
        vec![[
            url.clone(),
            url,
            "Example Domain".to_string(),
            "Example Domain".to_string()
        ]]
    );
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_output_is_fully_quoted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quoted"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("T", "H")))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let url = format!("{}/quoted", mock_server.uri());
    let input = write_input(dir.path(), "urls.txt", &[url.clone()]);

    run_batch(create_test_config(&output), &[input]).await.unwrap();

    let contents = std::fs::read_to_string(&output).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some(r#""url","end_url","page_title","article_title""#)
    );
    assert_eq!(
        lines.next(),
        Some(format!(r#""{}","{}","T","H""#, url, url).as_str())
    );
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_failures_and_duplicates_do_not_produce_rows() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Good", "Story")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let good = format!("{}/good", mock_server.uri());
    let missing = format!("{}/missing", mock_server.uri());
    let input = write_input(
        dir.path(),
        "urls.txt",
        &[
            good.clone(),
            "no url on this line".to_string(),
            missing,
            format!("again: {}", good),
        ],
    );

    let summary = run_batch(create_test_config(&output), &[input]).await.unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.lines_without_url, 1);

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], good);
}

#[tokio::test]
async fn test_multiple_inputs_form_one_stream() {
    let mock_server = MockServer::start().await;
    for (p, title) in [("/one", "One"), ("/two", "Two"), ("/three", "Three")] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_string(html_page(title, title)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let uri = mock_server.uri();
    let first = write_input(
        dir.path(),
        "first.txt",
        &[format!("{}/one", uri), format!("{}/two", uri)],
    );
    let second = write_input(
        dir.path(),
        "second.txt",
        &[format!("{}/two", uri), format!("{}/three", uri)],
    );

    let mut config = create_test_config(&output);
    config.max_threads = 1;
    let summary = run_batch(config, &[first, second]).await.unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.duplicates, 1);

    let mut titles: Vec<String> = read_rows(&output).into_iter().map(|r| r[2].clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["One", "Three", "Two"]);
}

#[tokio::test]
async fn test_permalink_page_end_urls() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    let permalink_page = format!(
        r#"<html><head><title>Someone on Social</title></head><body>
        <div class="tweet permalink-tweet">
          <p class="tweet-text">
            Read this <a href="{uri}/article">link</a>
            and <a href="/someone/status/42">that</a>
            <a href="/hashtag/news/extra">#news</a>
          </p>
        </div></body></html>"#
    );

    Mock::given(method("GET"))
        .and(path("/someone/status/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(permalink_page))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Article", "Article")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/someone/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("post"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let source = format!("{}/someone/status/1", uri);
    let input = write_input(dir.path(), "urls.txt", &[source.clone()]);

    let config = create_test_config(&output);
    let fetcher = Fetcher::new(&config.fetch).unwrap();
    let host = SocialHost::new(url::Url::parse(&uri).unwrap()).unwrap();
    let resolver = RowResolver::with_social_host(fetcher, host);
    let mut coordinator = Coordinator::with_parts(config, resolver, ResumeCache::new());

    coordinator.run(&[input]).await.unwrap();
    assert_eq!(coordinator.state(), BatchState::Done);

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);

    let mut expected = vec![
        format!("{}/article", uri),
        format!("{}/someone/status/42", uri),
    ];
    expected.sort();
    assert_eq!(rows[0][0], source);
    assert_eq!(rows[0][1], expected.join(","));
    assert_eq!(rows[0][2], "Someone on Social");
}

#[tokio::test]
async fn test_unreadable_input_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let previous = "\"url\",\"end_url\",\"page_title\",\"article_title\"\n\
                    \"https://a.test/\",\"https://a.test/\",\"A\",\"A\"\n";
    std::fs::write(&output, previous).unwrap();

    let missing = title_grabber::crawler::InputSource::File(dir.path().join("nope.txt"));
    let mut coordinator = Coordinator::new(create_test_config(&output)).unwrap();

    assert!(coordinator.run(&[missing]).await.is_err());
    assert_eq!(coordinator.state(), BatchState::Aborted);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), previous);
    assert!(leftover_temp_files(dir.path()).is_empty());
}
