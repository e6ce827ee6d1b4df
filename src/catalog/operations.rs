use crate::{
    catalog::{
        client::{CatalogClient, FetchOptions},
        policy::{Criticality, PolicyProfile},
        request::Query,
    },
    error::AppError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

// 详情页一次性展开的子资源
const TITLE_APPENDS: &str =
    "videos,images,credits,external_ids,release_dates,content_ratings,recommendations,similar";
// 默认语言
const DEFAULT_LANGUAGE: &str = "en-US";

/// 媒体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(AppError::ValidationError(format!(
                "Unknown media type: {:?}",
                other
            ))),
        }
    }
}

/// 逻辑操作表：每个操作对应固定的路径、策略档位、关键性与缓存时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TrendingMovies,
    PopularMovies,
    MovieGenres,
    SearchMulti,
    DiscoverMovies,
    TitleDetail { media: MediaType, id: u64 },
    TitleProviders { media: MediaType, id: u64 },
    MovieDetails(u64),
    MovieVideos(u64),
    MovieCredits(u64),
    SimilarMovies(u64),
    RecommendedMovies(u64),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::TrendingMovies => "/trending/movie/day".to_string(),
            Endpoint::PopularMovies => "/movie/popular".to_string(),
            Endpoint::MovieGenres => "/genre/movie/list".to_string(),
            Endpoint::SearchMulti => "/search/multi".to_string(),
            Endpoint::DiscoverMovies => "/discover/movie".to_string(),
            Endpoint::TitleDetail { media, id } => format!("/{}/{}", media, id),
            Endpoint::TitleProviders { media, id } => format!("/{}/{}/watch/providers", media, id),
            Endpoint::MovieDetails(id) => format!("/movie/{}", id),
            Endpoint::MovieVideos(id) => format!("/movie/{}/videos", id),
            Endpoint::MovieCredits(id) => format!("/movie/{}/credits", id),
            Endpoint::SimilarMovies(id) => format!("/movie/{}/similar", id),
            Endpoint::RecommendedMovies(id) => format!("/movie/{}/recommendations", id),
        }
    }

    pub fn profile(&self) -> PolicyProfile {
        match self {
            Endpoint::TrendingMovies
            | Endpoint::PopularMovies
            | Endpoint::MovieGenres
            | Endpoint::SearchMulti
            | Endpoint::DiscoverMovies => PolicyProfile::Listing,
            _ => PolicyProfile::Detail,
        }
    }

    /// 只有标题详情本身是关键的，列表与子资源都可以降级
    pub fn criticality(&self) -> Criticality {
        match self {
            Endpoint::TitleDetail { .. } | Endpoint::MovieDetails(_) => Criticality::Critical,
            _ => Criticality::NonCritical,
        }
    }

    /// 缓存时间（秒）
    pub fn revalidate_secs(&self) -> u64 {
        match self {
            Endpoint::MovieGenres => 86_400,
            Endpoint::SearchMulti => 120,
            Endpoint::TrendingMovies
            | Endpoint::PopularMovies
            | Endpoint::DiscoverMovies
            | Endpoint::TitleProviders { .. } => 600,
            _ => 300,
        }
    }

    pub fn options(&self) -> FetchOptions {
        let options = match self.profile() {
            PolicyProfile::Listing => FetchOptions::listing(),
            PolicyProfile::Detail => FetchOptions::detail(),
        };
        options
            .with_criticality(self.criticality())
            .with_revalidate(self.revalidate_secs())
    }
}

/// 发现页筛选条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverParams {
    pub year: Option<u32>,
    pub genre_id: Option<u32>,
    pub page: Option<u32>,
}

impl CatalogClient {
    /// 按逻辑操作读取
    pub async fn fetch_endpoint(&self, endpoint: Endpoint, query: Query) -> Result<Value, AppError> {
        self.fetch_json(&endpoint.path(), &query, &endpoint.options())
            .await
    }

    // 今日热门电影
    pub async fn trending_all(&self, page: u32) -> Result<Value, AppError> {
        self.fetch_endpoint(Endpoint::TrendingMovies, Query::new().param("page", page))
            .await
    }

    // 流行电影
    pub async fn popular_movies(&self, page: u32) -> Result<Value, AppError> {
        self.fetch_endpoint(Endpoint::PopularMovies, Query::new().param("page", page))
            .await
    }

    // 电影类型列表，响应中没有 genres 数组时返回空列表
    pub async fn movie_genres(&self) -> Result<Vec<Value>, AppError> {
        let body = self
            .fetch_endpoint(Endpoint::MovieGenres, Query::new())
            .await?;
        Ok(body
            .get("genres")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    // 综合搜索
    pub async fn search_titles(&self, q: &str, page: u32) -> Result<Value, AppError> {
        let query = Query::new()
            .param("query", q.trim())
            .param("include_adult", false)
            .param("page", page);
        self.fetch_endpoint(Endpoint::SearchMulti, query).await
    }

    // 按年份与类型发现电影
    pub async fn discover_movies(&self, params: &DiscoverParams) -> Result<Value, AppError> {
        let query = Query::new()
            .param("include_adult", false)
            .param("include_video", false)
            .param("sort_by", "popularity.desc")
            .param("page", params.page.unwrap_or(1))
            .param_opt("with_genres", params.genre_id.filter(|g| *g > 0))
            .param_opt("primary_release_year", params.year.filter(|y| *y > 0));
        self.fetch_endpoint(Endpoint::DiscoverMovies, query).await
    }

    // 标题详情，附带视频、演职员、推荐等子资源
    pub async fn title(
        &self,
        id: u64,
        media: MediaType,
        language: Option<&str>,
    ) -> Result<Value, AppError> {
        let query = Query::new()
            .param("language", language.unwrap_or(DEFAULT_LANGUAGE))
            .param("append_to_response", TITLE_APPENDS)
            .param("include_image_language", "en,null");
        self.fetch_endpoint(Endpoint::TitleDetail { media, id }, query)
            .await
    }

    // 标题的观看渠道
    pub async fn title_providers(&self, id: u64, media: MediaType) -> Result<Value, AppError> {
        self.fetch_endpoint(Endpoint::TitleProviders { media, id }, Query::new())
            .await
    }

    pub async fn movie_details(&self, id: u64) -> Result<Value, AppError> {
        self.fetch_endpoint(Endpoint::MovieDetails(id), Query::new())
            .await
    }

    pub async fn movie_videos(&self, id: u64) -> Result<Value, AppError> {
        self.fetch_endpoint(Endpoint::MovieVideos(id), Query::new())
            .await
    }

    pub async fn movie_credits(&self, id: u64) -> Result<Value, AppError> {
        self.fetch_endpoint(Endpoint::MovieCredits(id), Query::new())
            .await
    }

    pub async fn similar_movies(&self, id: u64, page: u32) -> Result<Value, AppError> {
        self.fetch_endpoint(Endpoint::SimilarMovies(id), Query::new().param("page", page))
            .await
    }

    pub async fn recommended_movies(&self, id: u64, page: u32) -> Result<Value, AppError> {
        self.fetch_endpoint(
            Endpoint::RecommendedMovies(id),
            Query::new().param("page", page),
        )
        .await
    }
}
