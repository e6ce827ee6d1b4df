use crate::{catalog::operations::MediaType, r#const::image_cdn};
use serde::Serialize;
use serde_json::Value;

/// 列表中展示用的标题条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: u64,
    pub media: MediaType,
    pub title: String,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub year: String,
}

/// 把原始列表响应（数组或带 results 的对象）转换为展示条目，丢弃没有数字 id 的条目
pub fn normalize_list(body: &Value, default_media: Option<MediaType>) -> Vec<CatalogItem> {
    let items = match body {
        Value::Array(items) => items.as_slice(),
        _ => body
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
    };

    items
        .iter()
        .filter_map(|item| normalize_item(item, default_media))
        .collect()
}

fn normalize_item(item: &Value, default_media: Option<MediaType>) -> Option<CatalogItem> {
    let id = item.get("id")?.as_u64()?;

    let media = match item.get("media_type").and_then(Value::as_str) {
        Some("tv") => MediaType::Tv,
        Some(_) => MediaType::Movie,
        None => default_media.unwrap_or(MediaType::Movie),
    };

    let text = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let title = text("title")
        .or_else(|| text("name"))
        .unwrap_or("Untitled")
        .to_string();

    let year = text("release_date")
        .or_else(|| text("first_air_date"))
        .map(|date| date.chars().take(4).collect())
        .unwrap_or_default();

    Some(CatalogItem {
        id,
        media,
        title,
        poster: text("poster_path").map(|p| format!("{}{}", image_cdn::POSTER_BASE, p)),
        backdrop: text("backdrop_path").map(|p| format!("{}{}", image_cdn::BACKDROP_BASE, p)),
        year,
    })
}
