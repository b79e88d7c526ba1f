pub mod article;
pub mod listing;

pub use self::article::{Article, Metadata};
pub use self::listing::{DayGroup, Page};
