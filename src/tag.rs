//! Defines the [`Tag`] type, which represents a [`crate::post::Post`] tag.

use std::hash::{Hash, Hasher};

/// Represents a [`crate::post::Post`] tag. The `name` field holds the tag as
/// written in the post's front-matter while `slug` holds the slugified form
/// used in routes, so e.g., `macOS` and `MacOS` resolve to the same tag page.
#[derive(Clone, Debug)]
pub struct Tag {
    /// The tag's display name, as written in the front-matter.
    pub name: String,

    /// The slugified tag name. This is the form dropped into the tag page
    /// route (`/tags/{slug}`) and the identity used for equality, hashing,
    /// and ordering.
    pub slug: String,
}

impl Tag {
    /// Constructs a [`Tag`] from its front-matter name, deriving the slug.
    pub fn new(name: &str) -> Tag {
        Tag {
            name: name.to_owned(),
            slug: slug::slugify(name),
        }
    }

    /// The route for the tag's index page.
    pub fn route(&self) -> String {
        format!("/tags/{}", self.slug)
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating directly to the `slug`
    /// field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by delegating directly
    /// to the `slug` field.
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}
impl Eq for Tag {}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    /// Orders tags lexicographically by slug, consistent with [`PartialEq`].
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.slug.cmp(&other.slug)
    }
}
