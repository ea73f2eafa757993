//! Domain entities - the core business objects.

mod category;
mod pagination;
mod post;
mod slug;
mod tag;
mod upload;

pub use category::Category;
pub use pagination::{POSTS_PER_PAGE, Page};
pub use post::{NewPost, Post};
pub use slug::slugify_title;
pub use tag::{Tag, TagSync};
pub use upload::UploadedFile;
