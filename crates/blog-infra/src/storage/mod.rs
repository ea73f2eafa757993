//! File storage implementations - local disk and in-memory fallback.

mod local;
mod memory;

pub use local::LocalFileStorage;
pub use memory::InMemoryFileStorage;

use blog_core::domain::UploadedFile;

/// Name for a stored upload: a random identifier plus the client's extension.
fn generated_path(directory: &str, file: &UploadedFile) -> String {
    let identifier = uuid::Uuid::new_v4().simple();
    let directory = directory.trim_matches('/');
    match file.extension() {
        Some(ext) => format!("{directory}/{identifier}.{ext}"),
        None => format!("{directory}/{identifier}"),
    }
}
