// src/test_support.rs

use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;
use warp::Filter;

/// Five rows over two seasons, one of them without usable salary data.
pub const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<table class="table">
  <thead><tr><th>Player</th><th>Salary</th><th>Year</th><th>Level</th></tr></thead>
  <tbody>
    <tr><td>Ortiz, David</td><td>$16,000,000</td><td>2016</td><td>MLB</td></tr>
    <tr><td>Kershaw, Clayton</td><td>$32,571,000</td><td>2016</td><td>MLB</td></tr>
    <tr><td>Trout, Mike</td><td>no salary data</td><td>2016</td><td>MLB</td></tr>
    <tr><td>Greinke, Zack</td><td>$ 31,799,030</td><td>2016</td><td>MLB</td></tr>
    <tr><td>Lee, Cliff</td><td>$25,000,000</td><td>2015</td><td>MLB</td></tr>
  </tbody>
</table>
</body></html>"#;

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,qoscraper=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Serve `html` at `/data.html` on an ephemeral loopback port for the rest of the test.
/// Must be called from within a tokio runtime.
pub fn serve_html(html: &'static str) -> Url {
    let page = warp::path("data.html")
        .and(warp::path::end())
        .map(move || warp::reply::html(html));
    let (addr, server) = warp::serve(page).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    Url::parse(&format!("http://{}/data.html", addr)).expect("loopback url should parse")
}
