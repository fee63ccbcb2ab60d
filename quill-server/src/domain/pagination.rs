pub(crate) const PAGE_SIZE: u32 = 10;

/// Post listing window. Every variant is ordered by descending id and capped
/// at [`PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostListQuery {
    Latest,
    /// Ids strictly below the cursor (scrolling to older posts).
    Older { cursor: i64 },
    /// Ids strictly above the cursor (scrolling to newer posts). Still the
    /// newest matching page, not the page adjacent to the cursor.
    Newer { cursor: i64 },
    /// Newest posts of one topic; cursors are ignored.
    Topic { topic_id: i64 },
}

impl PostListQuery {
    pub(crate) fn new(topic_id: Option<i64>, cursor: Option<i64>, recent: bool) -> Self {
        match (topic_id, cursor) {
            (Some(topic_id), _) => Self::Topic { topic_id },
            (None, Some(cursor)) if recent => Self::Newer { cursor },
            (None, Some(cursor)) => Self::Older { cursor },
            (None, None) => Self::Latest,
        }
    }

    pub(crate) fn limit(&self) -> u32 {
        PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::PostListQuery;

    #[test]
    fn topic_filter_wins_over_cursor() {
        let query = PostListQuery::new(Some(3), Some(15), true);
        assert_eq!(query, PostListQuery::Topic { topic_id: 3 });
    }

    #[test]
    fn recent_flag_selects_newer_window() {
        assert_eq!(
            PostListQuery::new(None, Some(15), true),
            PostListQuery::Newer { cursor: 15 }
        );
        assert_eq!(
            PostListQuery::new(None, Some(15), false),
            PostListQuery::Older { cursor: 15 }
        );
    }

    #[test]
    fn recent_without_cursor_is_latest() {
        assert_eq!(PostListQuery::new(None, None, true), PostListQuery::Latest);
    }
}
