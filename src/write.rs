//! Renders planned pages to HTML files on disk. This is the
//! page-registration side of the build: it binds each instruction's
//! [`plan::Template`] identifier to an actual gtmpl template, injects the
//! site-wide context, and materializes one file per route.

use crate::icon::IconSet;
use crate::plan::{self, PageInstruction};
use crate::post::Post;
use crate::tag::Tag;
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Site-wide data injected into every render under the `site` key:
/// metadata from the project file plus the fixed icon set.
pub struct SiteContext<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub site_root: &'a Url,
    pub icons: &'a IconSet,
}

impl SiteContext<'_> {
    fn inject(&self, value: &mut Value) {
        if let Value::Object(obj) = value {
            let mut site: HashMap<String, Value> = HashMap::new();
            site.insert("title".to_owned(), Value::String(self.title.to_owned()));
            site.insert(
                "description".to_owned(),
                Value::String(self.description.to_owned()),
            );
            site.insert("root".to_owned(), Value::String(self.site_root.to_string()));
            site.insert("icons".to_owned(), self.icons.into());
            obj.insert("site".to_owned(), Value::Object(site));
        }
    }
}

/// Responsible for templating and writing HTML pages to disk from
/// [`PageInstruction`]s.
pub struct Writer<'a> {
    /// The template for post pages.
    pub post_template: &'a gtmpl::Template,

    /// The template for single-tag index pages.
    pub tag_template: &'a gtmpl::Template,

    /// The template for the all-tags index page.
    pub all_tags_template: &'a gtmpl::Template,

    /// The template for the home page.
    pub home_template: &'a gtmpl::Template,

    /// The root directory into which pages are written. A route maps to
    /// `{output_directory}/{route}/index.html`.
    pub output_directory: &'a Path,

    /// The site-wide context injected into every render.
    pub site: SiteContext<'a>,
}

impl Writer<'_> {
    /// Renders every instruction in the plan, then the home page.
    pub fn write_site(
        &self,
        instructions: &[PageInstruction],
        posts: &[Post],
        all_tags: &[Tag],
    ) -> Result<()> {
        for instruction in instructions {
            self.write_instruction(instruction)?;
        }
        self.write_home(posts, all_tags)
    }

    /// Renders a single instruction, binding its template identifier to the
    /// matching renderer.
    pub fn write_instruction(&self, instruction: &PageInstruction) -> Result<()> {
        let template = match instruction.template {
            plan::Template::Post => self.post_template,
            plan::Template::SingleTag => self.tag_template,
            plan::Template::AllTags => self.all_tags_template,
        };
        self.render(template, &instruction.route, (&instruction.context).into())
    }

    /// Renders the home page: every post in date order plus the tag
    /// selector. The home page is a fixed route, not a planned instruction.
    fn write_home(&self, posts: &[Post], all_tags: &[Tag]) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "posts".to_owned(),
            Value::Array(posts.iter().map(Value::from).collect()),
        );
        m.insert(
            "tags".to_owned(),
            Value::Array(all_tags.iter().map(Value::from).collect()),
        );
        self.render(self.home_template, "/", Value::Object(m))
    }

    fn render(&self, template: &gtmpl::Template, route: &str, mut value: Value) -> Result<()> {
        self.site.inject(&mut value);
        let path = output_path(self.output_directory, route);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let context = gtmpl::Context::from(value)?;
        template.execute(&mut std::fs::File::create(&path)?, &context)?;
        Ok(())
    }
}

/// Maps a route to its output file: `/` becomes `index.html`, `/tags`
/// becomes `tags/index.html`, `/tags/x` becomes `tags/x/index.html`.
pub fn output_path(output_directory: &Path, route: &str) -> PathBuf {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        output_directory.join("index.html")
    } else {
        output_directory.join(trimmed).join("index.html")
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
