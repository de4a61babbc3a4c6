use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

use crate::pagination::Page;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_54_30;

/// Build the embed for one page of a paginated session.
///
/// `page_number` is 1-based; the position is only shown when there is more
/// than one page in the current group.
pub fn build_page_embed(page: &Page, page_number: usize, total_pages: usize) -> anyhow::Result<Embed> {
    let footer_text = page_footer(page.footer.as_deref(), page_number, total_pages);

    let builder = EmbedBuilder::new()
        .title(page.title.as_str())
        .color(DEFAULT_EMBED_COLOR)
        .description(page.body.as_str());

    let embed = if footer_text.is_empty() {
        builder.validate()?.build()
    } else {
        let footer = EmbedFooterBuilder::new(footer_text).build();
        builder.footer(footer).validate()?.build()
    };

    Ok(embed)
}

fn page_footer(note: Option<&str>, page_number: usize, total_pages: usize) -> String {
    let page_number = page_number.max(1);
    let total_pages = total_pages.max(1);
    let note = note.filter(|note| !note.is_empty());

    match (total_pages > 1, note) {
        (true, Some(note)) => format!("Page {page_number}/{total_pages} • {note}"),
        (true, None) => format!("Page {page_number}/{total_pages}"),
        (false, Some(note)) => note.to_owned(),
        (false, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_shows_position_only_when_paginated() {
        assert_eq!(page_footer(Some("3 results"), 2, 3), "Page 2/3 • 3 results");
        assert_eq!(page_footer(None, 1, 4), "Page 1/4");
        assert_eq!(page_footer(Some("1 result"), 1, 1), "1 result");
        assert_eq!(page_footer(Some(""), 1, 1), "");
    }
}
