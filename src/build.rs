//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output static site: loading the posts
//! ([`crate::source`]), planning the site's pages ([`crate::plan`]),
//! rendering them ([`crate::write`]), and copying the static source
//! directory into the output directory.

use crate::config::Config;
use crate::icon::IconSet;
use crate::plan;
use crate::source::{self, Error as SourceError};
use crate::write::{Error as WriteError, SiteContext, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Builds the site from a [`Config`] object. Posts are loaded first so that
/// malformed input aborts the build before any output is touched; only then
/// is the output directory cleaned and rewritten.
pub fn build_site(config: &Config) -> Result<()> {
    // collect all posts, sorted ascending by date
    let posts = source::load_posts(&config.posts_source_directory)?;

    // Parse the template files.
    let post_template = parse_template(config.post_template.iter())?;
    let tag_template = parse_template(config.tag_template.iter())?;
    let all_tags_template = parse_template(config.all_tags_template.iter())?;
    let home_template = parse_template(config.home_template.iter())?;

    // Plan every page before writing anything.
    let site_plan = plan::plan(&posts);

    // Blow away the old output directory so we don't have any collisions.
    rmdir(&config.output_directory)?;
    std::fs::create_dir_all(&config.output_directory)?;

    let icons = IconSet::standard();
    let writer = Writer {
        post_template: &post_template,
        tag_template: &tag_template,
        all_tags_template: &all_tags_template,
        home_template: &home_template,
        output_directory: &config.output_directory,
        site: SiteContext {
            title: &config.title,
            description: &config.description,
            site_root: &config.site_root,
            icons: &icons,
        },
    };
    writer.write_site(&site_plan.instructions, &posts, &site_plan.tags)?;

    // copy the static directory, if the project has one
    if config.static_source_directory.exists() {
        copy_dir(
            &config.static_source_directory,
            &config.output_directory.join("static"),
        )?;
    }

    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            copy_dir(&src.join(entry.file_name()), &dst.join(entry.file_name()))?;
        } else {
            std::fs::copy(src.join(entry.file_name()), dst.join(entry.file_name()))?;
        }
    }

    Ok(())
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during loading,
/// writing, cleaning the output directory, parsing template files, and
/// other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading posts.
    Source(SourceError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Source(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<SourceError> for Error {
    /// Converts [`SourceError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: SourceError) -> Error {
        Error::Source(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_build_site() -> Result<()> {
        let output = std::env::temp_dir().join("bramble-build-test");
        let config = Config::from_directory(Path::new("./testdata/project"), &output)
            .expect("loading test project config");

        build_site(&config)?;

        // home page, all-tags page, one page per tag, one page per post
        for page in &[
            "index.html",
            "tags/index.html",
            "tags/rust/index.html",
            "tags/unix/index.html",
            "hello-world/index.html",
            "unix-pipes/index.html",
            "rust-errors/index.html",
            "static/style.css",
        ] {
            assert!(output.join(page).is_file(), "missing output file: {}", page);
        }

        let home = std::fs::read_to_string(output.join("index.html"))?;
        assert!(home.contains("My Blog"));
        assert!(home.contains("/hello-world"));

        // the middle post links both neighbors
        let middle = std::fs::read_to_string(output.join("unix-pipes/index.html"))?;
        assert!(middle.contains("/hello-world"));
        assert!(middle.contains("/rust-errors"));

        Ok(())
    }
}
