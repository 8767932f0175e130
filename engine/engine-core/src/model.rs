//! Plain data shared by every strategy.
//!
//! A [`Link`] is one outgoing hyperlink discovered on a live page, a [`Page`]
//! is one node of the offline link graph. Both are immutable once built.

use serde::{Deserialize, Serialize};

/// An outgoing hyperlink discovered on the navigator's current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Title attribute of the anchor (usually the target article's name)
    pub title: String,
    /// Visible anchor text
    pub display_text: String,
    /// Navigable target, e.g. `https://host/wiki/Data_science`
    pub target_ref: String,
}

impl Link {
    pub fn new(
        title: impl Into<String>,
        display_text: impl Into<String>,
        target_ref: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            display_text: display_text.into(),
            target_ref: target_ref.into(),
        }
    }

    /// Build a link to an article topic with identical title and text.
    pub fn to_topic(topic: &str) -> Self {
        let title = topic_title(topic);
        Self::new(title.clone(), title, format!("/wiki/{}", topic))
    }

    /// Canonical page identifier: the last path segment of the target.
    pub fn topic(&self) -> &str {
        self.target_ref
            .rsplit('/')
            .next()
            .unwrap_or(self.target_ref.as_str())
    }

    /// Label used for ranking: the title, or the display text when the
    /// anchor carries no title attribute.
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.display_text
        } else {
            &self.title
        }
    }

    /// False for namespaced targets such as `File:x.png` or `Template:Foo`.
    pub fn is_article(&self) -> bool {
        !is_namespaced(self.topic())
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Link(title=\"{}\", topic=\"{}\", text=\"{}\")",
            self.title,
            self.topic(),
            self.display_text
        )
    }
}

/// Human-readable title of a topic (`United_States` becomes `United States`).
pub fn topic_title(topic: &str) -> String {
    topic.replace('_', " ")
}

/// `Word:rest` where the prefix is a single word and the rest has no spaces.
fn is_namespaced(topic: &str) -> bool {
    match topic.split_once(':') {
        Some((prefix, rest)) => {
            !prefix.is_empty()
                && prefix.chars().all(|c| c.is_alphanumeric() || c == '_')
                && !rest.is_empty()
                && !rest.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// One node of the offline link graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    /// Outgoing links as topic strings, in stored order
    pub links: Vec<String>,
}

impl Page {
    pub fn new(title: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            title: title.into(),
            links,
        }
    }

    /// Page for a title the data store knows nothing about.
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    pub fn links_to(&self, topic: &str) -> bool {
        self.links.iter().any(|link| link == topic)
    }
}

/// Summary of one finished round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameOutcome {
    pub start: String,
    pub goal: String,
    /// Successful clicks issued during the round
    pub clicks: u32,
    /// Back navigations issued during the round
    pub backtracks: u32,
    pub won: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_last_segment() {
        let link = Link::new("NASA", "NASA", "https://www.thewikigame.com/wiki/NASA");
        assert_eq!(link.topic(), "NASA");

        let bare = Link::new("x", "x", "Data_science");
        assert_eq!(bare.topic(), "Data_science");
    }

    #[test]
    fn test_is_article_filters_namespaces() {
        assert!(Link::to_topic("Paris").is_article());
        assert!(!Link::new("", "", "/wiki/File:Map.png").is_article());
        assert!(!Link::new("", "", "/wiki/Template:Infobox").is_article());
        assert!(Link::new("", "", "/wiki/Colon:").is_article());
    }

    #[test]
    fn test_label_falls_back_to_display_text() {
        let link = Link::new("", "the dog", "/wiki/Dog");
        assert_eq!(link.label(), "the dog");
        assert_eq!(Link::to_topic("Dog").label(), "Dog");
    }

    #[test]
    fn test_to_topic_round_trips_topic() {
        let link = Link::to_topic("United_States");
        assert_eq!(link.topic(), "United_States");
        assert_eq!(link.title, "United States");
    }

    #[test]
    fn test_empty_page() {
        let page = Page::empty("Nowhere");
        assert!(page.links.is_empty());
        assert!(!page.links_to("Anything"));
    }
}
