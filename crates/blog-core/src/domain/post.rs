use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug::slugify_title;

/// Post entity - a blog post filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub category_id: i64,
    /// Storage path of the thumbnail image, relative to the storage root.
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Apply edited fields. The slug stays the one derived at creation time.
    pub fn apply_changes(
        &mut self,
        title: String,
        content: String,
        category_id: i64,
        thumbnail: Option<String>,
    ) {
        self.title = title;
        self.content = content;
        self.category_id = category_id;
        self.thumbnail = thumbnail;
        self.updated_at = Utc::now();
    }
}

/// Attributes of a post that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub category_id: i64,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Create the attributes of a new post, deriving its slug from the title.
    pub fn new(
        title: String,
        content: String,
        category_id: i64,
        thumbnail: Option<String>,
    ) -> Self {
        let slug = slugify_title(&title);
        Self {
            title,
            content,
            slug,
            category_id,
            thumbnail,
            created_at: Utc::now(),
        }
    }

    /// Turn the attributes into a post once the store has assigned an id.
    pub fn into_post(self, id: i64) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            slug: self.slug,
            category_id: self.category_id,
            thumbnail: self.thumbnail,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_derives_slug() {
        let post = NewPost::new(
            "Hello World Example".to_string(),
            "body".to_string(),
            1,
            None,
        );
        assert_eq!(post.slug, "hello-world-example");
    }

    #[test]
    fn test_apply_changes_keeps_slug() {
        let mut post = NewPost::new(
            "Hello World Example".to_string(),
            "body".to_string(),
            1,
            None,
        )
        .into_post(7);

        post.apply_changes(
            "Another Title Here".to_string(),
            "new body".to_string(),
            2,
            Some("images/posts/a.png".to_string()),
        );

        assert_eq!(post.slug, "hello-world-example");
        assert_eq!(post.title, "Another Title Here");
        assert_eq!(post.category_id, 2);
        assert!(post.updated_at >= post.created_at);
    }
}
