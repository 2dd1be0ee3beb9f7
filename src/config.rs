//! Project configuration: locating and parsing the `bramble.yaml` project
//! file and the theme's `theme.yaml`.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "bramble.yaml";

#[derive(Deserialize)]
struct Project {
    /// The site title, rendered by the header and the home page.
    title: String,

    /// The site description, rendered under the title.
    #[serde(default)]
    description: String,

    /// The absolute URL the site will be served from.
    site_root: Url,
}

#[derive(Deserialize)]
struct Theme {
    /// The template files for the home page, concatenated before parsing.
    home_template: Vec<PathBuf>,

    /// The template files for post pages.
    post_template: Vec<PathBuf>,

    /// The template files for single-tag index pages.
    tag_template: Vec<PathBuf>,

    /// The template files for the all-tags index page.
    all_tags_template: Vec<PathBuf>,
}

/// The fully-resolved build configuration: project metadata plus every
/// directory and template path the build needs.
#[derive(Debug)]
pub struct Config {
    pub title: String,
    pub description: String,
    pub site_root: Url,
    pub posts_source_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub home_template: Vec<PathBuf>,
    pub post_template: Vec<PathBuf>,
    pub tag_template: Vec<PathBuf>,
    pub all_tags_template: Vec<PathBuf>,
    pub output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a `bramble.yaml` project file
    /// and loads the configuration from the first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(Error::ProjectFileNotFound),
            }
        }
    }

    /// Loads the configuration from a specific project file. The project
    /// root is the file's directory; posts live at `{root}/posts`, static
    /// assets at `{root}/static`, and the theme at `{root}/theme`.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path
            .parent()
            .ok_or_else(|| Error::NoParentDirectory(path.to_owned()))?;

        let theme_dir = project_root.join("theme");
        let theme: Theme =
            serde_yaml::from_reader(open(&theme_dir.join("theme.yaml"), "theme")?)?;
        let theme_paths = |relpaths: Vec<PathBuf>| -> Vec<PathBuf> {
            relpaths.iter().map(|relpath| theme_dir.join(relpath)).collect()
        };

        Ok(Config {
            title: project.title,
            description: project.description,
            site_root: project.site_root,
            posts_source_directory: project_root.join("posts"),
            static_source_directory: project_root.join("static"),
            home_template: theme_paths(theme.home_template),
            post_template: theme_paths(theme.post_template),
            tag_template: theme_paths(theme.tag_template),
            all_tags_template: theme_paths(theme.all_tags_template),
            output_directory: output_directory.to_owned(),
        })
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    File::open(path).map_err(|err| Error::Open {
        kind: kind.to_owned(),
        path: path.to_owned(),
        err,
    })
}

/// The result of a configuration-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error locating or parsing the configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no ancestor directory contains a `bramble.yaml`.
    ProjectFileNotFound,

    /// Returned when the project file path has no parent directory.
    NoParentDirectory(PathBuf),

    /// Returned for I/O problems opening a configuration file.
    Open {
        kind: String,
        path: PathBuf,
        err: std::io::Error,
    },

    /// Returned when there was an error parsing a configuration file as
    /// YAML.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectFileNotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            ),
            Error::NoParentDirectory(path) => write!(
                f,
                "Can't get parent directory for provided project file path '{}'",
                path.display()
            ),
            Error::Open { kind, path, err } => {
                write!(f, "Opening {} file '{}': {}", kind, path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectFileNotFound => None,
            Error::NoParentDirectory(_) => None,
            Error::Open { err, .. } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
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
