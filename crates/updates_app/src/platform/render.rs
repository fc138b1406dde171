use updates_core::{FeedViewModel, LoadMoreState, UpdateRowView};

pub const HELP_LINE: &str = "Enter: load more | r: reload | q: quit";

/// Text for rows `start..`, numbered from 1 across the whole list.
pub fn render_rows(rows: &[UpdateRowView], start: usize) -> Vec<String> {
    rows.iter()
        .enumerate()
        .skip(start)
        .map(|(index, row)| format_row(index + 1, row))
        .collect()
}

pub fn render_footer(view: &FeedViewModel) -> String {
    let mut footer = match view.empty_message {
        Some(message) => message.to_string(),
        None => format!("[{}]", view.load_more.label()),
    };
    if let Some(error) = &view.last_error {
        footer.push_str(&format!(" (last attempt failed: {error})"));
    }
    if view.skipped_records > 0 {
        footer.push_str(&format!(" ({} malformed skipped)", view.skipped_records));
    }
    if view.load_more == LoadMoreState::Ready {
        footer.push_str("  ");
        footer.push_str(HELP_LINE);
    }
    footer
}

fn format_row(number: usize, row: &UpdateRowView) -> String {
    format!(
        "{number:>3}. {title}\n     {chapter} | {age}\n     {route} | cover {cover}",
        title = row.manga_title,
        chapter = row.chapter_line,
        age = row.age_label,
        route = row.chapter_route,
        cover = row.cover_src,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use updates_core::ChapterId;

    fn row(id: &str) -> UpdateRowView {
        UpdateRowView {
            chapter_id: ChapterId::from(id),
            manga_title: format!("Manga {id}"),
            chapter_line: "Chapter - 3".to_string(),
            age_label: "Today".to_string(),
            chapter_route: format!("/chapter/{id}"),
            cover_src: "/api/proxy?url=c".to_string(),
        }
    }

    #[test]
    fn rows_are_numbered_across_the_list() {
        let rows = vec![row("a"), row("b"), row("c")];
        let lines = render_rows(&rows, 1);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  2. Manga b"));
        assert!(lines[1].contains("/chapter/c"));
        assert!(lines[1].contains("Chapter - 3 | Today"));
    }

    #[test]
    fn footer_reflects_load_more_state() {
        let view = FeedViewModel {
            load_more: LoadMoreState::Ready,
            can_load_more: true,
            ..FeedViewModel::default()
        };
        assert_eq!(render_footer(&view), format!("[Load More]  {HELP_LINE}"));

        let view = FeedViewModel {
            load_more: LoadMoreState::NoMore,
            last_error: None,
            ..FeedViewModel::default()
        };
        assert_eq!(render_footer(&view), "[No More]");

        let view = FeedViewModel {
            load_more: LoadMoreState::NoMore,
            empty_message: Some("No recent updates"),
            ..FeedViewModel::default()
        };
        assert_eq!(render_footer(&view), "No recent updates");
    }

    #[test]
    fn footer_mentions_failures_and_skips() {
        let view = FeedViewModel {
            load_more: LoadMoreState::Loading,
            last_error: Some("timeout".to_string()),
            skipped_records: 2,
            ..FeedViewModel::default()
        };
        assert_eq!(
            render_footer(&view),
            "[Loading...] (last attempt failed: timeout) (2 malformed skipped)"
        );
    }
}
