pub mod index_uploader;
pub mod scp_uploader;

pub use index_uploader::IndexUploader;
pub use scp_uploader::{ScpUploader, UploadError};
