pub mod locator;
pub mod markdown;
pub mod metadata;
pub mod redirect;
