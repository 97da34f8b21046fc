pub mod title;
pub mod genre;
pub mod country;
pub mod source;
pub mod season;
pub mod order;

pub use title::{Title, TitleKind, UNKNOWN_TITLE};
pub use genre::Genre;
pub use country::Country;
pub use source::Source;
pub use season::{Episode, Season};
pub use order::SortOrder;
