/// A parsed feed document, reduced to what ingestion needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedDocument {
    pub title: String,
    pub items: Vec<FeedEntry>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
}

/// Outcome of one successful ingestion pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestSummary {
    pub feed_url: String,
    pub channel_title: String,
    pub inserted: usize,
    pub skipped: usize,
}
