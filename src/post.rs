//! Defines the [`Post`] data model.

use crate::tag::Tag;
use chrono::NaiveDate;

/// A single blog post, fully parsed and converted. Posts are produced by
/// [`crate::source::load_posts`] and are immutable inputs to the planner
/// ([`crate::plan`]) and the writer ([`crate::write`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The post's route (the front-matter `path`), e.g., `/my-first-post`.
    /// Unique across the site.
    pub route: String,

    /// The post's title.
    pub title: String,

    /// The publication date. The site's post sequence is ordered ascending
    /// by this field.
    pub date: NaiveDate,

    /// The post's tags in author order, deduplicated by slug. May be empty;
    /// an untagged post joins no tag bucket but still gets a post page.
    pub tags: Vec<Tag>,

    /// The post body, already converted from markdown to HTML.
    pub body: String,
}
