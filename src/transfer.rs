pub mod acquire;
pub mod download;

pub use acquire::{acquire, copy_into, is_http_url, Acquired};
pub use download::{download_into, filename_from_content_disposition, filename_from_url};
