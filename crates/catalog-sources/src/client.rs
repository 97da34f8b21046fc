use crate::decode;
use crate::error::{CatalogError, TransportError};
use crate::http::FailoverClient;
use anyhow::Result;
use catalog_config::ApiConfig;
use catalog_models::{Country, Genre, Season, SortOrder, Title};
use tracing::debug;
use url::Url;

/// Genre id meaning "every genre" in the filtered list endpoints
pub const ALL_GENRES: i64 = 0;

/// Typed fetch operations against the catalog index.
///
/// Holds no state between calls: every method builds its URL from the
/// arguments, fetches through the failover client and decodes the body.
#[derive(Clone)]
pub struct CatalogClient {
    http: FailoverClient,
    base_url: Url,
    token: String,
}

impl CatalogClient {
    pub fn new(http: FailoverClient, base_url: Url, token: String) -> Self {
        Self { http, base_url, token }
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Ok(Self::new(FailoverClient::from_config(api)?, api.base_url()?, api.token.clone()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", path, e)))
    }

    pub fn movies_url(&self, genre_id: i64, order: SortOrder, page: u32) -> Result<Url, TransportError> {
        self.endpoint(&format!(
            "api/movie/by/filtres/{}/{}/{}/{}/",
            genre_id,
            order.as_path_segment(),
            page,
            self.token
        ))
    }

    pub fn series_url(&self, genre_id: i64, order: SortOrder, page: u32) -> Result<Url, TransportError> {
        self.endpoint(&format!(
            "api/serie/by/filtres/{}/{}/{}/{}/",
            genre_id,
            order.as_path_segment(),
            page,
            self.token
        ))
    }

    pub fn seasons_url(&self, series_id: i64) -> Result<Url, TransportError> {
        self.endpoint(&format!("api/season/by/serie/{}/{}/", series_id, self.token))
    }

    pub fn genres_url(&self) -> Result<Url, TransportError> {
        self.endpoint(&format!("api/genre/all/{}/", self.token))
    }

    pub fn countries_url(&self) -> Result<Url, TransportError> {
        self.endpoint(&format!("api/country/all/{}/", self.token))
    }

    pub fn search_url(&self, query: &str) -> Result<Url, TransportError> {
        self.endpoint(&format!(
            "api/search/{}/{}/",
            urlencoding::encode(query.trim()),
            self.token
        ))
    }

    pub fn posters_by_country_url(&self, country_id: i64, page: u32) -> Result<Url, TransportError> {
        self.endpoint(&format!("api/poster/by/country/{}/{}/{}/", country_id, page, self.token))
    }

    pub async fn movies(&self, genre_id: i64, order: SortOrder, page: u32) -> Result<Vec<Title>, CatalogError> {
        let body = self.http.fetch(&self.movies_url(genre_id, order, page)?).await?;
        let decoded = decode::titles(&body)?;
        debug!(page, genre_id, count = decoded.items.len(), "Fetched movies");
        Ok(decoded.items)
    }

    pub async fn series(&self, genre_id: i64, order: SortOrder, page: u32) -> Result<Vec<Title>, CatalogError> {
        let body = self.http.fetch(&self.series_url(genre_id, order, page)?).await?;
        let decoded = decode::titles(&body)?;
        debug!(page, genre_id, count = decoded.items.len(), "Fetched series");
        Ok(decoded.items)
    }

    pub async fn seasons(&self, series_id: i64) -> Result<Vec<Season>, CatalogError> {
        let body = self.http.fetch(&self.seasons_url(series_id)?).await?;
        let decoded = decode::seasons(&body)?;
        debug!(series_id, count = decoded.items.len(), "Fetched seasons");
        Ok(decoded.items)
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let body = self.http.fetch(&self.genres_url()?).await?;
        Ok(decode::genres(&body)?.items)
    }

    pub async fn countries(&self) -> Result<Vec<Country>, CatalogError> {
        let body = self.http.fetch(&self.countries_url()?).await?;
        Ok(decode::countries(&body)?.items)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError> {
        let body = self.http.fetch(&self.search_url(query)?).await?;
        let decoded = decode::search_posters(&body)?;
        debug!(query, count = decoded.items.len(), "Search finished");
        Ok(decoded.items)
    }

    pub async fn posters_by_country(&self, country_id: i64, page: u32) -> Result<Vec<Title>, CatalogError> {
        let body = self.http.fetch(&self.posters_by_country_url(country_id, page)?).await?;
        let decoded = decode::titles(&body)?;
        debug!(page, country_id, count = decoded.items.len(), "Fetched country posters");
        Ok(decoded.items)
    }
}
