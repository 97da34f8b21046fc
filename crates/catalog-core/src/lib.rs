pub mod filter;
pub mod pagination;
pub mod search;
pub mod source;

pub use filter::is_english_title;
pub use pagination::{ItemFilter, ListState, PaginatedList};
pub use search::{DebouncedSearch, SearchState, DEFAULT_DEBOUNCE};
pub use source::{CountryPages, MoviePages, PageSource, SearchSource, SeriesPages};
