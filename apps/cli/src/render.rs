//! Line rendering for command output.
//!
//! ```text
//! Random meme: id=7 title="Doge" url=http://img/doge.png category="animals"
//! 1) id=1 title="X" url=http://img/x.png category="funny"
//! 2) id=4 title="W" url=http://img/w.png category="uncategorized"
//! Listed 2 memes
//! Stream completed after 2 items
//! Uploaded 3 memes. Message: ok
//! ```
//!
//! Titles and categories are quoted; an empty category is shown as
//! `uncategorized`.

use meme_core::{MemeRecord, UploadSummary};

fn meme_fields(meme: &MemeRecord) -> String {
    format!(
        "id={} title={:?} url={} category={:?}",
        meme.id,
        meme.title,
        meme.url,
        meme.display_category()
    )
}

pub fn random_line(meme: &MemeRecord) -> String {
    format!("Random meme: {}", meme_fields(meme))
}

/// A list or stream line; `position` is 1-based.
pub fn indexed_line(position: usize, meme: &MemeRecord) -> String {
    format!("{}) {}", position, meme_fields(meme))
}

pub fn list_footer(count: usize) -> String {
    format!("Listed {} memes", count)
}

pub fn stream_footer(count: usize) -> String {
    format!("Stream completed after {} items", count)
}

pub fn upload_line(summary: &UploadSummary) -> String {
    format!(
        "Uploaded {} memes. Message: {}",
        summary.count, summary.message
    )
}
