use floorplan_core::records::{ArtworkList, HighlightedGalleries, SearchHits};
use floorplan_core::{Artwork, CollectionId, FetchError, QueryParams, RoomId, UserId};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

use crate::config::AppConfig;
use crate::utils::{network_error, warn};

/// GET `url` and return the body as text.
pub async fn fetch_text(window: &Window, url: &str) -> Result<String, FetchError> {
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| network_error(url, &e))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| network_error(url, &e))?;
    if !resp.ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    let text_promise = resp.text().map_err(|e| network_error(url, &e))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| network_error(url, &e))?;
    Ok(text.as_string().unwrap_or_default())
}

pub async fn fetch_json<T: DeserializeOwned>(window: &Window, url: &str) -> Result<T, FetchError> {
    let text = fetch_text(window, url).await?;
    Ok(serde_json::from_str(&text)?)
}

fn encode(v: &str) -> String {
    utf8_percent_encode(v, NON_ALPHANUMERIC).to_string()
}

/// Collection API search, resolved to records for the ids in `[start, limit)`.
/// Records that fail to load individually are skipped.
pub async fn search_artworks(
    window: &Window,
    cfg: &AppConfig,
    params: &QueryParams,
    start: usize,
    limit: usize,
) -> Result<Vec<Artwork>, FetchError> {
    let query = params
        .search_pairs()
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let url = format!("{}?{}", cfg.met_url("search"), query);
    let hits: SearchHits = fetch_json(window, &url).await?;

    let mut out = Vec::new();
    for id in hits.window(start, limit) {
        let url = cfg.met_url(&format!("objects/{id}"));
        match fetch_json::<Artwork>(window, &url).await {
            Ok(a) => out.push(a),
            Err(e) => warn(&format!("skipping object {id}: {e}")),
        }
    }
    Ok(out)
}

pub async fn random_artworks(window: &Window, cfg: &AppConfig) -> Result<Vec<Artwork>, FetchError> {
    let list: ArtworkList = fetch_json(window, &cfg.api_url("artworks/random")).await?;
    Ok(list.artworks)
}

pub async fn gallery_artworks(
    window: &Window,
    cfg: &AppConfig,
    room: &RoomId,
) -> Result<Vec<Artwork>, FetchError> {
    let url = cfg.api_url(&format!("galleries/{}/artworks", encode(room.as_str())));
    let list: ArtworkList = fetch_json(window, &url).await?;
    Ok(list.artworks)
}

pub async fn highlighted_galleries(
    window: &Window,
    cfg: &AppConfig,
    user: UserId,
    collection: Option<CollectionId>,
) -> Result<Vec<String>, FetchError> {
    let mut url = cfg.api_url(&format!("users/{user}/highlighted_galleries"));
    if let Some(c) = collection {
        url.push_str(&format!("?collection_id={c}"));
    }
    let body: HighlightedGalleries = fetch_json(window, &url).await?;
    Ok(body.highlighted_galleries)
}
