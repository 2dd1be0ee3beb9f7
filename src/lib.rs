//! The library code for the `bramble` static site generator. The
//! architecture can be generally broken down into three distinct steps:
//!
//! 1. Loading posts from markdown source files ([`crate::source`])
//! 2. Planning the site's pages ([`crate::plan`])
//! 3. Rendering the planned pages to disk ([`crate::write`])
//!
//! Of the three, the planning step carries the interesting logic: it groups
//! the date-sorted posts into a tag index, chains each post to its previous
//! and next neighbor, and emits exactly one page instruction per post, one
//! per distinct tag, and one for the all-tags index. The plan is a pure
//! function of the ordered post list; all I/O lives on either side of it,
//! which is also what makes it easy to test.
//!
//! The rendering step binds each instruction's template identifier to an
//! actual template and writes `{route}/index.html` files under the output
//! directory, injecting the site-wide context (title, description, icon
//! set) into every render.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod icon;
pub mod plan;
pub mod post;
pub mod source;
pub mod tag;
pub mod value;
pub mod write;
