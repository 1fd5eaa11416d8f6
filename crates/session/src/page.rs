/// One page of results as returned by a fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage<R> {
    pub items: Vec<R>,
    pub total_pages: u32,
    /// Not every backend reports the overall hit count
    pub total_results: Option<u64>,
}

impl<R> Default for ResultPage<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
            total_results: None,
        }
    }
}

impl<R> ResultPage<R> {
    pub fn new(items: Vec<R>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages,
            total_results: None,
        }
    }

    pub fn with_total_results(mut self, total_results: u64) -> Self {
        self.total_results = Some(total_results);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Zero or one page needs no pager.
    pub fn shows_pager(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, false)]
    #[case(2, true)]
    #[case(500, true)]
    fn test_shows_pager(#[case] total_pages: u32, #[case] expected: bool) {
        let page: ResultPage<u8> = ResultPage::new(vec![1], total_pages);
        assert_eq!(page.shows_pager(), expected);
    }

    #[test]
    fn test_default_is_empty() {
        let page: ResultPage<u8> = ResultPage::default();
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_results, None);
    }
}
