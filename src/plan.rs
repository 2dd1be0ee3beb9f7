//! The page planner: turns an ordered list of [`Post`]s into the full set of
//! [`PageInstruction`]s for the site.
//!
//! Planning is a pure function of the input post sequence and its order: no
//! I/O, no randomness, no partial results. The input must already be sorted
//! ascending by date ([`crate::source::load_posts`] guarantees this); the
//! planner derives the tag index from it, chains each post to its neighbors,
//! and emits exactly one instruction per page. Binding the resulting
//! [`Template`] identifiers to actual renderers is the writer's job
//! ([`crate::write`]).

use crate::post::Post;
use crate::tag::Tag;
use std::collections::HashMap;

/// The route of the all-tags index page.
pub const ALL_TAGS_ROUTE: &str = "/tags";

/// Identifies which renderer a [`PageInstruction`] should be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Template {
    /// A single post page.
    Post,

    /// The index page for a single tag.
    SingleTag,

    /// The index page listing every tag.
    AllTags,
}

/// A declarative record telling the writer which route to create, which
/// template to render it with, and what data to pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PageInstruction<'a> {
    /// The page's route, e.g., `/my-first-post` or `/tags/unix`. Unique
    /// across the whole plan.
    pub route: String,

    /// The renderer identifier for the page.
    pub template: Template,

    /// The data handed to the renderer.
    pub context: Context<'a>,
}

/// The per-kind context payload of a [`PageInstruction`].
#[derive(Clone, Debug, PartialEq)]
pub enum Context<'a> {
    Post(PostContext<'a>),
    SingleTag(SingleTagContext<'a>),
    AllTags(AllTagsContext),
}

/// Context for a post page: the post itself plus its neighbors in the
/// date-sorted sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct PostContext<'a> {
    /// The post being rendered.
    pub post: &'a Post,

    /// The previous (older) post, absent for the first post.
    pub prev: Option<&'a Post>,

    /// The next (newer) post, absent for the last post.
    pub next: Option<&'a Post>,
}

/// Context for a single-tag index page.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleTagContext<'a> {
    /// The tag being rendered.
    pub tag: Tag,

    /// The posts carrying the tag, in input (date) order.
    pub posts: Vec<&'a Post>,

    /// Every distinct tag on the site, sorted. Rendered as the tag selector.
    pub all_tags: Vec<Tag>,
}

/// Context for the all-tags index page.
#[derive(Clone, Debug, PartialEq)]
pub struct AllTagsContext {
    /// Every distinct tag on the site, sorted.
    pub tags: Vec<Tag>,
}

/// Mapping from tag to the ordered sequence of posts carrying that tag.
/// Built fresh on every planning run; never persisted.
pub struct TagIndex<'a> {
    buckets: HashMap<Tag, Vec<&'a Post>>,
}

impl<'a> TagIndex<'a> {
    /// Groups `posts` by tag. Grouping is stable: each bucket preserves the
    /// posts' relative input order, with no re-sort inside a bucket. The tag
    /// set is exactly the union of the posts' tags, so a tag with zero posts
    /// never appears.
    pub fn build(posts: &'a [Post]) -> TagIndex<'a> {
        let mut buckets: HashMap<Tag, Vec<&'a Post>> = HashMap::new();
        for post in posts {
            for tag in &post.tags {
                buckets.entry(tag.clone()).or_insert_with(Vec::new).push(post);
            }
        }
        TagIndex { buckets }
    }

    /// The posts carrying `tag`, in input order, or [`None`] for a tag no
    /// post carries.
    pub fn posts(&self, tag: &Tag) -> Option<&[&'a Post]> {
        self.buckets.get(tag).map(Vec::as_slice)
    }

    /// The number of distinct tags.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the index holds no tags at all.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The distinct tags, sorted ascending. Every tag list the site exposes
    /// goes through this so output never depends on map iteration order.
    pub fn sorted_tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.buckets.keys().cloned().collect();
        tags.sort();
        tags
    }
}

/// The planner's output: one instruction per page, plus the sorted tag list
/// for consumers that render a tag selector outside the plan (the home page).
pub struct Plan<'a> {
    pub instructions: Vec<PageInstruction<'a>>,
    pub tags: Vec<Tag>,
}

/// Plans the whole site for a date-sorted post sequence: the all-tags page
/// (omitted when `posts` is empty), one page per distinct tag, and one page
/// per post.
pub fn plan(posts: &[Post]) -> Plan<'_> {
    let index = TagIndex::build(posts);
    let tags = index.sorted_tags();

    let mut instructions = Vec::with_capacity(1 + index.len() + posts.len());
    if !posts.is_empty() {
        instructions.push(all_tags_instruction(tags.clone()));
    }
    instructions.extend(tag_instructions(&index));
    instructions.extend(post_instructions(posts));

    Plan { instructions, tags }
}

/// Emits one instruction per post. `prev`/`next` on instruction `i` reference
/// the posts at `i - 1` and `i + 1` of the date-sorted input, absent at the
/// sequence boundaries.
pub fn post_instructions(posts: &[Post]) -> Vec<PageInstruction<'_>> {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| PageInstruction {
            route: post.route.clone(),
            template: Template::Post,
            context: Context::Post(PostContext {
                post,
                prev: match i < 1 {
                    true => None,
                    false => Some(&posts[i - 1]),
                },
                next: match i + 1 < posts.len() {
                    true => Some(&posts[i + 1]),
                    false => None,
                },
            }),
        })
        .collect()
}

/// Emits one instruction per distinct tag, in sorted-tag order. Each carries
/// the tag's post sequence, the tag itself, and the full sorted tag list.
pub fn tag_instructions<'a>(index: &TagIndex<'a>) -> Vec<PageInstruction<'a>> {
    let all_tags = index.sorted_tags();
    all_tags
        .iter()
        .map(|tag| PageInstruction {
            route: tag.route(),
            template: Template::SingleTag,
            context: Context::SingleTag(SingleTagContext {
                tag: tag.clone(),
                // sorted_tags() only yields keys present in the index
                posts: index.posts(tag).unwrap_or_default().to_vec(),
                all_tags: all_tags.clone(),
            }),
        })
        .collect()
}

/// Emits the single instruction for the all-tags index page.
pub fn all_tags_instruction<'a>(tags: Vec<Tag>) -> PageInstruction<'a> {
    PageInstruction {
        route: ALL_TAGS_ROUTE.to_owned(),
        template: Template::AllTags,
        context: Context::AllTags(AllTagsContext { tags }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn post(route: &str, day: u32, tags: &[&str]) -> Post {
        Post {
            route: route.to_owned(),
            title: route.trim_start_matches('/').to_owned(),
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            tags: tags.iter().map(|t| Tag::new(t)).collect(),
            body: String::new(),
        }
    }

    // The worked example: posts /a [x], /b [x, y], /c [y].
    fn example() -> Vec<Post> {
        vec![
            post("/a", 1, &["x"]),
            post("/b", 2, &["x", "y"]),
            post("/c", 3, &["y"]),
        ]
    }

    fn routes<'a>(instructions: &'a [PageInstruction]) -> Vec<&'a str> {
        instructions.iter().map(|i| i.route.as_str()).collect()
    }

    #[test]
    fn test_grouping() {
        let posts = example();
        let index = TagIndex::build(&posts);
        assert_eq!(2, index.len());

        let x: Vec<&str> = index.posts(&Tag::new("x")).unwrap().iter().map(|p| p.route.as_str()).collect();
        let y: Vec<&str> = index.posts(&Tag::new("y")).unwrap().iter().map(|p| p.route.as_str()).collect();
        assert_eq!(vec!["/a", "/b"], x);
        assert_eq!(vec!["/b", "/c"], y);
        assert_eq!(None, index.posts(&Tag::new("z")));
    }

    #[test]
    fn test_grouping_is_stable() {
        // the tag appears on posts 0, 2, and 4; the bucket must preserve
        // that relative order
        let posts = vec![
            post("/a", 1, &["t"]),
            post("/b", 2, &[]),
            post("/c", 3, &["t"]),
            post("/d", 4, &[]),
            post("/e", 5, &["t"]),
        ];
        let index = TagIndex::build(&posts);
        let t: Vec<&str> = index.posts(&Tag::new("t")).unwrap().iter().map(|p| p.route.as_str()).collect();
        assert_eq!(vec!["/a", "/c", "/e"], t);
    }

    #[test]
    fn test_sorted_tags() {
        let posts = vec![post("/a", 1, &["zebra", "Apple", "mango"])];
        let index = TagIndex::build(&posts);
        let sorted = index.sorted_tags();
        let slugs: Vec<&str> = sorted.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(vec!["apple", "mango", "zebra"], slugs);
    }

    #[test]
    fn test_post_instructions_prev_next() {
        let posts = example();
        let instructions = post_instructions(&posts);
        assert_eq!(3, instructions.len());

        for (i, instruction) in instructions.iter().enumerate() {
            assert_eq!(posts[i].route, instruction.route);
            assert_eq!(Template::Post, instruction.template);
            let context = match &instruction.context {
                Context::Post(c) => c,
                other => panic!("expected post context, found {:?}", other),
            };
            assert_eq!(&posts[i], context.post);
            match i {
                0 => assert_eq!(None, context.prev),
                _ => assert_eq!(Some(&posts[i - 1]), context.prev),
            }
            match i + 1 < posts.len() {
                true => assert_eq!(Some(&posts[i + 1]), context.next),
                false => assert_eq!(None, context.next),
            }
        }
    }

    #[test]
    fn test_worked_example() {
        let posts = example();
        let plan = plan(&posts);

        let names: Vec<&str> = plan.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(vec!["x", "y"], names);

        // /b sits in the middle of the chain
        let b = plan
            .instructions
            .iter()
            .find(|i| i.route == "/b")
            .expect("missing instruction for /b");
        let context = match &b.context {
            Context::Post(c) => c,
            other => panic!("expected post context, found {:?}", other),
        };
        assert_eq!("/a", context.prev.unwrap().route);
        assert_eq!("/c", context.next.unwrap().route);
    }

    #[test]
    fn test_one_tag_instruction_per_distinct_tag() {
        let posts = example();
        let index = TagIndex::build(&posts);
        let instructions = tag_instructions(&index);
        assert_eq!(index.len(), instructions.len());
        assert_eq!(vec!["/tags/x", "/tags/y"], routes(&instructions));

        for instruction in &instructions {
            assert_eq!(Template::SingleTag, instruction.template);
            let context = match &instruction.context {
                Context::SingleTag(c) => c,
                other => panic!("expected single-tag context, found {:?}", other),
            };
            assert_eq!(index.posts(&context.tag).unwrap(), context.posts.as_slice());
            assert_eq!(index.sorted_tags(), context.all_tags);
        }
    }

    #[test]
    fn test_no_duplicate_routes() {
        let posts = example();
        let plan = plan(&posts);
        let mut seen = HashSet::new();
        for instruction in &plan.instructions {
            assert!(
                seen.insert(instruction.route.as_str()),
                "duplicate route: {}",
                instruction.route
            );
        }
        // all-tags + 2 tags + 3 posts
        assert_eq!(6, plan.instructions.len());
    }

    #[test]
    fn test_every_post_route_appears_exactly_once() {
        let posts = example();
        let plan = plan(&posts);
        for post in &posts {
            let count = plan
                .instructions
                .iter()
                .filter(|i| i.template == Template::Post && i.route == post.route)
                .count();
            assert_eq!(1, count, "route {} appeared {} times", post.route, count);
        }
    }

    #[test]
    fn test_untagged_post_gets_post_page_only() {
        let posts = vec![post("/solo", 1, &[])];
        let plan = plan(&posts);
        // the all-tags page plus the post page; no tag pages
        assert_eq!(vec![ALL_TAGS_ROUTE, "/solo"], routes(&plan.instructions));
        assert!(plan.tags.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let plan = plan(&[]);
        assert!(plan.instructions.is_empty());
        assert!(plan.tags.is_empty());
    }

    #[test]
    fn test_all_tags_instruction_lists_sorted_tags() {
        let posts = vec![post("/a", 1, &["b", "a"]), post("/b", 2, &["c"])];
        let plan = plan(&posts);
        let all_tags = match &plan.instructions[0].context {
            Context::AllTags(c) => c,
            other => panic!("expected all-tags context, found {:?}", other),
        };
        assert_eq!(Template::AllTags, plan.instructions[0].template);
        assert_eq!(ALL_TAGS_ROUTE, plan.instructions[0].route);
        let slugs: Vec<&str> = all_tags.tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(vec!["a", "b", "c"], slugs);
    }
}
