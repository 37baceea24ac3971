pub mod url_refresh;

pub use url_refresh::UrlRefreshJob;
