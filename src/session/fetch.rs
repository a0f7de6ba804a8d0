// src/session/fetch.rs
// =============================================================================
// Downloads the HTML document for check_html_url.
//
// The client follows redirects, and links inside the page are resolved
// against where we ENDED UP, not where we started: a page served from
// /docs/ after a redirect from /start must resolve "page.html" as
// /docs/page.html.
// =============================================================================

use crate::error::ExtractionError;
use reqwest::Client;
use url::Url;

#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Final URL after redirects
    pub url: Url,
    pub body: String,
}

pub async fn fetch_document(client: &Client, url: &Url) -> Result<FetchedDocument, ExtractionError> {
    let fetch_error = |source| ExtractionError::Fetch {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractionError::HttpStatus {
            url: response.url().to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(fetch_error)?;

    Ok(FetchedDocument {
        url: final_url,
        body,
    })
}
