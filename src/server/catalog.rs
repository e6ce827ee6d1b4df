use crate::{
    catalog::{empty_results, normalize_list, CatalogItem, DiscoverParams, MediaType},
    error::AppError,
    metrics::METRICS,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::{state::AppState, utils::json_error};

// 列表页失败时的兜底：记录日志并返回空列表
fn shelf(name: &str, result: Result<Vec<CatalogItem>, AppError>) -> Vec<CatalogItem> {
    result.unwrap_or_else(|e| {
        warn!("Shelf {:?} degraded to empty: {}", name, e);
        Vec::new()
    })
}

/// 首页：热门、流行、类型三个栏目，各自独立降级
pub async fn home_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    METRICS.http_requests_total().with_label_values(&["home"]).inc();

    let (trending, popular, genres) = tokio::join!(
        state.catalog.trending_all(1),
        state.catalog.popular_movies(1),
        state.catalog.movie_genres(),
    );

    let trending = shelf(
        "trending",
        trending.map(|body| normalize_list(&body, Some(MediaType::Movie))),
    );
    let popular = shelf(
        "popular",
        popular.map(|body| normalize_list(&body, Some(MediaType::Movie))),
    );
    let genres = genres.unwrap_or_else(|e| {
        warn!("Shelf \"genres\" degraded to empty: {}", e);
        Vec::new()
    });

    Json(json!({
        "trending": trending,
        "popular": popular,
        "genres": genres,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
}

/// 综合搜索，空关键字不请求上游
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Value> {
    METRICS.http_requests_total().with_label_values(&["search"]).inc();

    let q = query.q.trim();
    if q.is_empty() {
        return Json(json!({ "results": [] }));
    }

    let results = shelf(
        "search",
        state
            .catalog
            .search_titles(q, query.page.unwrap_or(1))
            .await
            .map(|body| normalize_list(&body, None)),
    );

    Json(json!({ "results": results }))
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverQuery {
    pub year: Option<u32>,
    pub genre: Option<u32>,
    pub page: Option<u32>,
}

/// 按年份与类型发现电影
pub async fn discover_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiscoverQuery>,
) -> Json<Value> {
    METRICS.http_requests_total().with_label_values(&["discover"]).inc();

    let params = DiscoverParams {
        year: query.year,
        genre_id: query.genre,
        page: query.page,
    };

    let results = shelf(
        "discover",
        state
            .catalog
            .discover_movies(&params)
            .await
            .map(|body| normalize_list(&body, Some(MediaType::Movie))),
    );

    Json(json!({ "results": results }))
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleQuery {
    pub language: Option<String>,
}

/// 标题详情：详情是关键请求，失败时返回 503；观看渠道与可用性可以缺失
pub async fn title_handler(
    State(state): State<Arc<AppState>>,
    Path((media, id)): Path<(String, u64)>,
    Query(query): Query<TitleQuery>,
) -> Response {
    METRICS.http_requests_total().with_label_values(&["title"]).inc();

    let Ok(media) = media.parse::<MediaType>() else {
        return json_error(StatusCode::NOT_FOUND, "Not found.");
    };

    let (title, providers, availability) = tokio::join!(
        state.catalog.title(id, media, query.language.as_deref()),
        state.catalog.title_providers(id, media),
        state.availability.lookup(id),
    );

    let title = match title {
        Ok(title) => title,
        Err(e) => {
            warn!("Title {}/{} unavailable: {}", media, id, e);
            return json_error(StatusCode::SERVICE_UNAVAILABLE, "Content unavailable.");
        }
    };

    let providers = providers.unwrap_or_else(|e| {
        warn!("Providers for {}/{} degraded to empty: {}", media, id, e);
        empty_results()
    });

    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "title": title,
            "providers": providers,
            "availability": availability,
        })),
    )
        .into_response()
}
