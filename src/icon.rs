//! The site's fixed icon set.
//!
//! The set is constructed once at startup and injected into every render
//! through the site context ([`crate::write::SiteContext`]); nothing mutates
//! it after construction and no render registers icons of its own.

/// A single renderable icon: a stable name the templates look up plus the
/// CSS class they drop into the markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Icon {
    pub name: &'static str,
    pub class: &'static str,
}

/// The full set of icons available to the templates.
#[derive(Clone, Debug)]
pub struct IconSet {
    icons: Vec<Icon>,
}

impl IconSet {
    /// The standard icon set for the site: the brand icons used by the
    /// header's social links plus the marker icons used by the post lists.
    pub fn standard() -> IconSet {
        IconSet {
            icons: vec![
                Icon { name: "github", class: "fab fa-github" },
                Icon { name: "twitter", class: "fab fa-twitter" },
                Icon { name: "rss", class: "fas fa-rss" },
                Icon { name: "circle", class: "fas fa-circle" },
            ],
        }
    }

    /// Iterates the icons in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Icon> {
        self.icons.iter()
    }
}
