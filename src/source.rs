//! Loads [`Post`]s from markdown source files. This is the data-query side
//! of the build: it walks the posts directory, parses front-matter, converts
//! bodies to HTML, validates the result, and hands the planner a post list
//! sorted ascending by date. Any malformed input is fatal and reported
//! before a single page is planned or written.

use std::{
    collections::HashSet,
    fmt,
    fs::File,
    path::Path,
};

use chrono::NaiveDate;
use pulldown_cmark::{html, Options, Parser};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::post::Post;
use crate::tag::Tag;

const MARKDOWN_EXTENSION: &str = ".md";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Searches `source_directory` recursively for post files (extension =
/// `.md`) and returns the parsed [`Post`]s sorted ascending by date, ties
/// broken by route. Each post file must be structured as follows:
///
/// 1. Initial front-matter fence (`---`)
/// 2. YAML front-matter with fields `path`, `title`, `date`, and optionally
///    `tags`
/// 3. Terminal front-matter fence (`---`)
/// 4. Post body (markdown)
///
/// For example:
///
/// ```md
/// ---
/// path: /hello-world
/// title: Hello, world!
/// date: 2021-04-16
/// tags: [greet]
/// ---
/// # Hello
///
/// World
/// ```
pub fn load_posts(source_directory: &Path) -> Result<Vec<Post>> {
    let mut posts: Vec<Post> = Vec::new();
    let mut seen_routes: HashSet<String> = HashSet::new();

    for result in WalkDir::new(source_directory) {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if !file_name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }

        use std::io::Read;
        let mut contents = String::new();
        File::open(entry.path())?.read_to_string(&mut contents)?;

        let post = parse_post(&contents).map_err(|e| {
            Error::Annotated(
                format!("parsing post `{}`", entry.path().display()),
                Box::new(e),
            )
        })?;
        if !seen_routes.insert(post.route.clone()) {
            return Err(Error::DuplicateRoute(post.route));
        }
        posts.push(post);
    }

    posts.sort_by(|a, b| (a.date, &a.route).cmp(&(b.date, &b.route)));
    Ok(posts)
}

/// Parses a single [`Post`] from its source text. A missing `tags` field is
/// treated as an empty tag set; a missing `path`, `title`, or `date` is an
/// error. Tags are deduplicated by slug, first occurrence wins, author
/// order preserved.
pub fn parse_post(input: &str) -> Result<Post> {
    let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
    let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

    if !frontmatter.path.starts_with('/') {
        return Err(Error::InvalidRoute(frontmatter.path));
    }
    let date = NaiveDate::parse_from_str(&frontmatter.date, DATE_FORMAT)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut tags: Vec<Tag> = Vec::new();
    for name in &frontmatter.tags {
        let tag = Tag::new(name);
        if seen.insert(tag.slug.clone()) {
            tags.push(tag);
        }
    }

    let mut body = String::new();
    html::push_html(
        &mut body,
        Parser::new_ext(&input[body_start..], markdown_options()),
    );

    Ok(Post {
        route: frontmatter.path,
        title: frontmatter.title,
        date,
        tags,
        body,
    })
}

fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    match input[FENCE.len()..].find(FENCE) {
        None => Err(Error::FrontmatterMissingEndFence),
        Some(offset) => Ok((
            FENCE.len(),                        // yaml_start
            FENCE.len() + offset,               // yaml_stop
            FENCE.len() + offset + FENCE.len(), // body_start
        )),
    }
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

#[derive(Deserialize)]
struct Frontmatter {
    /// The post's route. Must begin with `/`.
    path: String,

    /// The title of the post.
    title: String,

    /// The date of the post, `YYYY-MM-DD`.
    date: String,

    /// The tags associated with the post.
    #[serde(default)]
    tags: Vec<String>,
}

/// Represents the result of a [`Post`]-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Post`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting front-matter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal front-matter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the front-matter as YAML,
    /// including a missing `path`, `title`, or `date` field.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a post's `date` is not a valid `YYYY-MM-DD` date.
    DateParse(chrono::ParseError),

    /// Returned when a post's `path` doesn't begin with `/`.
    InvalidRoute(String),

    /// Returned when two posts declare the same `path`.
    DuplicateRoute(String),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::DateParse(err) => err.fmt(f),
            Error::InvalidRoute(route) => {
                write!(f, "Post `path` must begin with `/`; found `{}`", route)
            }
            Error::DuplicateRoute(route) => {
                write!(f, "More than one post declares the path `{}`", route)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::DateParse(err) => Some(err),
            Error::InvalidRoute(_) => None,
            Error::DuplicateRoute(_) => None,
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts a [`chrono::ParseError`] into an [`Error`]. It allows us to
    /// use the `?` operator for date parsing.
    fn from(err: chrono::ParseError) -> Error {
        Error::DateParse(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SIMPLE: &str = "---
path: /simple
title: Simple
date: 2021-04-16
tags: [greet, Unix Pipes, greet]
---
Hello, *world*.
";

    #[test]
    fn test_parse_post() -> Result<()> {
        let post = parse_post(SIMPLE)?;
        assert_eq!("/simple", post.route);
        assert_eq!("Simple", post.title);
        assert_eq!(NaiveDate::from_ymd_opt(2021, 4, 16).unwrap(), post.date);

        // duplicate `greet` collapses; author order preserved
        let slugs: Vec<&str> = post.tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(vec!["greet", "unix-pipes"], slugs);

        assert!(post.body.contains("<em>world</em>"));
        Ok(())
    }

    #[test]
    fn test_parse_post_without_tags() -> Result<()> {
        let post = parse_post("---\npath: /bare\ntitle: Bare\ndate: 2021-01-01\n---\nbody")?;
        assert!(post.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_start_fence() {
        let err = parse_post("path: /x\n---\nbody").unwrap_err();
        assert!(matches!(err, Error::FrontmatterMissingStartFence));
    }

    #[test]
    fn test_missing_end_fence() {
        let err = parse_post("---\npath: /x\ntitle: X\ndate: 2021-01-01\n").unwrap_err();
        assert!(matches!(err, Error::FrontmatterMissingEndFence));
    }

    #[test]
    fn test_missing_required_field() {
        // no `date`
        let err = parse_post("---\npath: /x\ntitle: X\n---\nbody").unwrap_err();
        assert!(matches!(err, Error::DeserializeYaml(_)));
    }

    #[test]
    fn test_malformed_date() {
        let err =
            parse_post("---\npath: /x\ntitle: X\ndate: April 16\n---\nbody").unwrap_err();
        assert!(matches!(err, Error::DateParse(_)));
    }

    #[test]
    fn test_route_without_leading_slash() {
        let err = parse_post("---\npath: x\ntitle: X\ndate: 2021-01-01\n---\nbody").unwrap_err();
        assert!(matches!(err, Error::InvalidRoute(_)));
    }

    #[test]
    fn test_load_posts_sorted_ascending() -> Result<()> {
        let posts = load_posts(Path::new("./testdata/posts"))?;
        let routes: Vec<&str> = posts.iter().map(|p| p.route.as_str()).collect();
        assert_eq!(vec!["/hello-world", "/unix-pipes", "/rust-errors"], routes);
        for window in posts.windows(2) {
            assert!(window[0].date <= window[1].date);
        }
        Ok(())
    }

    #[test]
    fn test_load_posts_duplicate_route() {
        let err = load_posts(Path::new("./testdata/duplicate-posts")).unwrap_err();
        assert!(matches!(err, Error::DuplicateRoute(_)));
    }
}
