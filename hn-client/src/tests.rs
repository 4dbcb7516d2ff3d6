#[cfg(test)]
mod tests {
    use crate::mock::{item, poll, story, MockHackerNewsApi};
    use crate::{HackerNewsApi, StoryListFetcher};
    use heronews_core::{CoreError, FeedCategory, HnApiError, ItemKind, StoryList};
    use std::sync::Arc;

    fn stories_api(count: u64) -> MockHackerNewsApi {
        let ids: Vec<u64> = (1..=count).collect();
        MockHackerNewsApi::new()
            .with_list(StoryList::New, ids.clone())
            .with_items(ids.iter().map(|&id| story(id, &format!("Story {}", id))))
    }

    fn fetcher(api: &Arc<MockHackerNewsApi>) -> StoryListFetcher {
        StoryListFetcher::new(Arc::clone(api) as Arc<dyn HackerNewsApi>)
    }

    #[tokio::test]
    async fn test_first_page_is_first_twenty_ids_in_order() {
        let api = Arc::new(stories_api(45));
        let page = fetcher(&api).fetch_page(FeedCategory::Stories, 0).await;

        let ids: Vec<u64> = page.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
        assert_eq!(page.fetched, 20);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_last_partial_page_has_no_more() {
        let api = Arc::new(stories_api(45));
        let page = fetcher(&api).fetch_page(FeedCategory::Stories, 2).await;

        let ids: Vec<u64> = page.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, (41..=45).collect::<Vec<u64>>());
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let api = Arc::new(stories_api(45));
        let page = fetcher(&api).fetch_page(FeedCategory::Stories, 7).await;

        assert!(page.items.is_empty());
        assert_eq!(page.fetched, 0);
        assert!(!page.has_more);
        assert!(api.item_requests().is_empty());
    }

    #[tokio::test]
    async fn test_poll_filter_applies_after_resolving_full_page() {
        let ids: Vec<u64> = (1..=20).collect();
        let items = ids.iter().map(|&id| {
            if id % 3 == 0 {
                poll(id, &format!("Poll {}", id))
            } else {
                story(id, &format!("Story {}", id))
            }
        });
        let api = Arc::new(
            MockHackerNewsApi::new()
                .with_list(StoryList::Top, ids.clone())
                .with_items(items),
        );

        let page = fetcher(&api).fetch_page(FeedCategory::Polls, 0).await;

        // 3, 6, 9, 12, 15, 18
        assert_eq!(page.items.len(), 6);
        assert!(page.items.iter().all(|item| item.kind == Some(ItemKind::Poll)));
        assert_eq!(page.fetched, 20);
        assert!(page.has_more);
        assert_eq!(api.item_requests().len(), 20);
        assert_eq!(api.list_requests(), vec![StoryList::Top]);
    }

    #[tokio::test]
    async fn test_jobs_use_job_list_without_filtering() {
        let api = Arc::new(
            MockHackerNewsApi::new()
                .with_list(StoryList::Job, vec![7, 8])
                .with_items(vec![item(7, ItemKind::Job), item(8, ItemKind::Job)]),
        );

        let page = fetcher(&api).fetch_page(FeedCategory::Jobs, 0).await;
        assert_eq!(page.items.len(), 2);
        assert_eq!(api.list_requests(), vec![StoryList::Job]);
    }

    #[tokio::test]
    async fn test_null_items_are_dropped_but_counted() {
        let api = Arc::new(stories_api(20));
        api.set_list(StoryList::New, (1..=21).filter(|id| *id != 5).collect());
        // id 21 was never inserted, so it resolves to null
        let page = fetcher(&api).fetch_page(FeedCategory::Stories, 0).await;

        assert_eq!(page.fetched, 20);
        assert_eq!(page.items.len(), 19);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_remote_error_fails_soft() {
        let api = Arc::new(stories_api(40));
        api.fail_list(StoryList::New, 503);
        let fetcher = fetcher(&api);

        let result = fetcher.try_fetch_page(FeedCategory::Stories, 0).await;
        match result {
            Err(CoreError::HnApi(HnApiError::Remote { status, .. })) => assert_eq!(status, 503),
            other => panic!("Expected RemoteError, got {:?}", other),
        }

        let page = fetcher.fetch_page(FeedCategory::Stories, 0).await;
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_single_item_failure_empties_the_page() {
        let api = Arc::new(stories_api(40));
        api.fail_item(13);

        let page = fetcher(&api).fetch_page(FeedCategory::Stories, 0).await;
        assert!(page.items.is_empty());
        assert_eq!(page.fetched, 0);
    }

    #[test]
    fn test_custom_page_size() {
        let api = Arc::new(stories_api(10));
        let fetcher = StoryListFetcher::with_page_size(
            Arc::clone(&api) as Arc<dyn HackerNewsApi>,
            4,
        );

        let page = tokio_test::block_on(fetcher.fetch_page(FeedCategory::Stories, 1));
        let ids: Vec<u64> = page.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![5, 6, 7, 8]);
        assert!(page.has_more);
    }
}
