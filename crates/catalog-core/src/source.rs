use async_trait::async_trait;
use catalog_models::{SortOrder, Title};
use catalog_sources::{CatalogClient, CatalogError};

/// One page of a paginated collection, addressed by zero-based page number
#[async_trait]
pub trait PageSource<T: Send + 'static>: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<T>, CatalogError>;
}

/// Free-text search over the catalog
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError>;
}

pub struct MoviePages {
    client: CatalogClient,
    genre_id: i64,
    order: SortOrder,
}

impl MoviePages {
    pub fn new(client: CatalogClient, genre_id: i64, order: SortOrder) -> Self {
        Self { client, genre_id, order }
    }
}

#[async_trait]
impl PageSource<Title> for MoviePages {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Title>, CatalogError> {
        self.client.movies(self.genre_id, self.order, page).await
    }
}

pub struct SeriesPages {
    client: CatalogClient,
    genre_id: i64,
    order: SortOrder,
}

impl SeriesPages {
    pub fn new(client: CatalogClient, genre_id: i64, order: SortOrder) -> Self {
        Self { client, genre_id, order }
    }
}

#[async_trait]
impl PageSource<Title> for SeriesPages {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Title>, CatalogError> {
        self.client.series(self.genre_id, self.order, page).await
    }
}

pub struct CountryPages {
    client: CatalogClient,
    country_id: i64,
}

impl CountryPages {
    pub fn new(client: CatalogClient, country_id: i64) -> Self {
        Self { client, country_id }
    }
}

#[async_trait]
impl PageSource<Title> for CountryPages {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Title>, CatalogError> {
        self.client.posters_by_country(self.country_id, page).await
    }
}

#[async_trait]
impl SearchSource for CatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError> {
        CatalogClient::search(self, query).await
    }
}
