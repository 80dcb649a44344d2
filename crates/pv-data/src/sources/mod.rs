pub mod http_source;
pub mod json_source;

pub use http_source::HttpPhotoSource;
pub use json_source::JsonFilePhotoSource;
