//! Conversions from the crate's data model into [`gtmpl_value::Value`]s so
//! posts, tags, and page contexts can be rendered in templates.

use crate::icon::{Icon, IconSet};
use crate::plan::{AllTagsContext, Context, PostContext, SingleTagContext};
use crate::post::Post;
use crate::tag::Tag;
use gtmpl_value::Value;
use std::collections::HashMap;

impl From<&Tag> for Value {
    /// Converts [`Tag`]s into [`Value`]s for templating.
    fn from(t: &Tag) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(t.name.clone()));
        m.insert("slug".to_owned(), Value::String(t.slug.clone()));
        m.insert("url".to_owned(), Value::String(t.route()));
        Value::Object(m)
    }
}

impl From<&Post> for Value {
    /// Converts [`Post`]s into [`Value`]s for templating.
    fn from(p: &Post) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("route".to_owned(), Value::String(p.route.clone()));
        m.insert("title".to_owned(), Value::String(p.title.clone()));
        m.insert(
            "date".to_owned(),
            Value::String(p.date.format("%Y-%m-%d").to_string()),
        );
        m.insert(
            "tags".to_owned(),
            Value::Array(p.tags.iter().map(Value::from).collect()),
        );
        m.insert("body".to_owned(), Value::String(p.body.clone()));
        Value::Object(m)
    }
}

impl From<&Icon> for Value {
    /// Converts [`Icon`]s into [`Value`]s for templating.
    fn from(i: &Icon) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(i.name.to_owned()));
        m.insert("class".to_owned(), Value::String(i.class.to_owned()));
        Value::Object(m)
    }
}

impl From<&IconSet> for Value {
    /// Converts an [`IconSet`] into a [`Value::Array`] for templating.
    fn from(set: &IconSet) -> Value {
        Value::Array(set.iter().map(Value::from).collect())
    }
}

impl From<&PostContext<'_>> for Value {
    /// Converts a post-page context into a [`Value::Object`] with fields
    /// `path_slug`, `post`, `prev`, and `next` (`prev`/`next` are `Nil` at
    /// the sequence boundaries).
    fn from(c: &PostContext) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("path_slug".to_owned(), Value::String(c.post.route.clone()));
        m.insert("post".to_owned(), c.post.into());
        m.insert("prev".to_owned(), post_or_nil(c.prev));
        m.insert("next".to_owned(), post_or_nil(c.next));
        Value::Object(m)
    }
}

impl From<&SingleTagContext<'_>> for Value {
    /// Converts a single-tag-page context into a [`Value::Object`] with
    /// fields `tag`, `posts`, and `all_tags`.
    fn from(c: &SingleTagContext) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("tag".to_owned(), (&c.tag).into());
        m.insert(
            "posts".to_owned(),
            Value::Array(c.posts.iter().map(|p| Value::from(*p)).collect()),
        );
        m.insert(
            "all_tags".to_owned(),
            Value::Array(c.all_tags.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

impl From<&AllTagsContext> for Value {
    /// Converts the all-tags-page context into a [`Value::Object`] with the
    /// single field `tags`.
    fn from(c: &AllTagsContext) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "tags".to_owned(),
            Value::Array(c.tags.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

impl From<&Context<'_>> for Value {
    /// Dispatches on the context kind.
    fn from(c: &Context) -> Value {
        match c {
            Context::Post(c) => c.into(),
            Context::SingleTag(c) => c.into(),
            Context::AllTags(c) => c.into(),
        }
    }
}

fn post_or_nil(post: Option<&Post>) -> Value {
    match post {
        Some(post) => post.into(),
        None => Value::Nil,
    }
}
