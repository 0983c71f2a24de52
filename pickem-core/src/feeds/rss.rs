//! RSS channel parsing and item-to-headline mapping.

use crate::entities::headline::NewHeadline;
use crate::feeds::FeedError;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

/// `heading` column width.
pub const MAX_HEADING_CHARS: usize = 200;
/// `story` column width.
pub const MAX_STORY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(default, rename = "item")]
    items: Vec<RssItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RssItem {
    title: String,
    description: String,
    link: String,
    #[serde(rename = "pubDate")]
    pub_date: String,
}

/// One feed entry, limited to the fields the display schema keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
}

/// Parse an RSS document into its items.
pub fn parse_channel(xml: &str) -> Result<Vec<FeedItem>, FeedError> {
    let document: RssDocument =
        quick_xml::de::from_str(xml).map_err(|e| FeedError::Parse(e.to_string()))?;
    Ok(document
        .channel
        .items
        .into_iter()
        .map(|item| FeedItem {
            title: item.title,
            description: item.description,
            link: item.link,
            pub_date: item.pub_date,
        })
        .collect())
}

/// Map a feed item onto an insertable headline.
///
/// Items missing a title, description, link or a parseable publication
/// date are dropped; oversized text is cut to the column widths.
pub fn to_headline(item: &FeedItem, league_id: i32) -> Option<NewHeadline> {
    let heading = item.title.trim();
    let story = item.description.trim();
    let link = item.link.trim();
    if heading.is_empty() || story.is_empty() || link.is_empty() {
        debug!(league_id, "skipping feed item with empty fields");
        return None;
    }

    let Some(pub_date) = parse_pub_date(&item.pub_date) else {
        debug!(league_id, pub_date = %item.pub_date, "skipping feed item with bad pubDate");
        return None;
    };

    Some(NewHeadline {
        heading: truncate_chars(heading, MAX_HEADING_CHARS),
        story: truncate_chars(story, MAX_STORY_CHARS),
        link: link.to_owned(),
        pub_date,
        league_id,
    })
}

/// Feeds publish RFC 2822 dates; a few emit RFC 3339. Anything else is
/// treated as missing.
fn parse_pub_date(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    // Feeds often use the obsolete GMT/UT zone names, which the RFC 2822
    // parser does not accept.
    let rewritten = trimmed
        .strip_suffix(" GMT")
        .or_else(|| trimmed.strip_suffix(" UTC"))
        .or_else(|| trimmed.strip_suffix(" UT"))
        .map(|prefix| format!("{prefix} +0000"));
    let candidate = rewritten.as_deref().unwrap_or(trimmed);

    OffsetDateTime::parse(candidate, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(trimmed, &Rfc3339))
        .ok()
        .map(|parsed| parsed.to_offset(UtcOffset::UTC))
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
