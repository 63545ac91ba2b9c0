//! Structural checks over a story graph: broken links, reachability and
//! dead ends, gathered into a [`StoryReport`].

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

use log::{info, warn};

use crate::{Link, LinkKey, Passage, Story};

/// Collect every link whose target matches no passage in the story.
///
/// The opening passage is always a valid target. Links are collapsed by
/// key, so the same dangling edge in two passages is reported once.
///
/// ```
/// use paths_data::{Link, LinkKey, Passage, Story, broken_links};
///
/// let mut start = Passage::new("Start", "Begin").unwrap();
/// start.add_link(Link::new("Go north", "Forest").unwrap()).unwrap();
/// let mut story = Story::new("Demo", start).unwrap();
/// assert!(broken_links(&story).contains(&LinkKey::new("Go north", "Forest")));
///
/// story.add_passage(Passage::new("Forest", "Trees").unwrap());
/// assert!(broken_links(&story).is_empty());
/// ```
pub fn broken_links(story: &Story) -> BTreeSet<LinkKey> {
    let titles = title_set(story);
    let broken: BTreeSet<LinkKey> = story
        .all_passages()
        .flat_map(Passage::links)
        .filter(|link| !titles.contains(link.reference()))
        .map(|link| link.key().clone())
        .collect();
    if !broken.is_empty() {
        warn!("story '{}' has {} broken link(s)", story.title(), broken.len());
    }
    broken
}

/// Strip every link pointing at `title` from every passage, opening included.
///
/// The passage itself is left in place; returns the number of links removed.
pub fn remove_all_links_to_passage(story: &mut Story, title: &str) -> usize {
    let removed: usize = story
        .all_passages_mut()
        .map(|passage| passage.remove_links_to(title))
        .sum();
    info!("story '{}': removed {removed} link(s) to '{title}'", story.title());
    removed
}

/// Titles reachable from the opening passage by following non-broken links.
pub fn reachable_titles(story: &Story) -> BTreeSet<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<&Passage> = VecDeque::new();
    seen.insert(story.opening_passage().title().to_string());
    queue.push_back(story.opening_passage());

    while let Some(passage) = queue.pop_front() {
        for link in passage.links() {
            if seen.contains(link.reference()) {
                continue;
            }
            if let Some(next) = story.passage_by_title(link.reference()) {
                seen.insert(next.title().to_string());
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Stored passages that no path from the opening passage reaches.
pub fn unreachable_passages(story: &Story) -> BTreeSet<String> {
    let reachable = reachable_titles(story);
    story
        .passages()
        .map(Passage::title)
        .filter(|title| !reachable.contains(*title))
        .map(str::to_string)
        .collect()
}

/// Terminal passages (no outgoing links), opening first.
pub fn dead_ends(story: &Story) -> Vec<String> {
    story
        .all_passages()
        .filter(|passage| !passage.has_links())
        .map(|passage| passage.title().to_string())
        .collect()
}

/// A structural observation about a story. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    BrokenLink { from: String, text: String, reference: String },
    Unreachable { title: String },
    DeadEnd { title: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::BrokenLink { from, text, reference } => {
                write!(f, "broken link [{text}]({reference}) in passage '{from}'")
            },
            Finding::Unreachable { title } => write!(f, "passage '{title}' cannot be reached"),
            Finding::DeadEnd { title } => write!(f, "passage '{title}' ends the story"),
        }
    }
}

/// Summary of a story's structure, used by authoring tools and library listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryReport {
    pub title: String,
    pub passage_count: usize,
    pub broken_links: BTreeSet<LinkKey>,
    pub unreachable: BTreeSet<String>,
    pub dead_ends: Vec<String>,
    findings: Vec<Finding>,
}

impl StoryReport {
    pub fn analyze(story: &Story) -> StoryReport {
        let titles = title_set(story);
        let mut findings = Vec::new();
        for passage in story.all_passages() {
            for link in passage.links() {
                check_ref(passage, link, &titles, &mut findings);
            }
        }
        let unreachable = unreachable_passages(story);
        findings.extend(unreachable.iter().map(|title| Finding::Unreachable { title: title.clone() }));
        let dead_ends = dead_ends(story);
        findings.extend(dead_ends.iter().map(|title| Finding::DeadEnd { title: title.clone() }));

        StoryReport {
            title: story.title().to_string(),
            passage_count: story.len(),
            broken_links: broken_links(story),
            unreachable,
            dead_ends,
            findings,
        }
    }

    /// A story can be played safely when no link dangles and it can end.
    pub fn is_playable(&self) -> bool {
        self.broken_links.is_empty() && !self.dead_ends.is_empty()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

fn title_set(story: &Story) -> HashSet<&str> {
    story.all_passages().map(Passage::title).collect()
}

fn check_ref(from: &Passage, link: &Link, titles: &HashSet<&str>, findings: &mut Vec<Finding>) {
    if !titles.contains(link.reference()) {
        findings.push(Finding::BrokenLink {
            from: from.title().to_string(),
            text: link.text().to_string(),
            reference: link.reference().to_string(),
        });
    }
}
