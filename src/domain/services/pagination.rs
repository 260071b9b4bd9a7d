//! List slicing over already-loaded rows.
//!
//! Every helper here is a pure function of its input, so identical input
//! always yields an identical page.

/// Pages on either side of the current page in a page strip
const STRIP_WINDOW: usize = 2;

/// A slice of rows plus where it sits in the whole list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Entry in a numbered page strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Number(usize),
    Ellipsis,
}

/// ceil(len / page_size); zero rows means zero pages
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Rows of the 1-based `page`. Page 0 is read as page 1; a page past the
/// end yields no rows.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages: total_pages(items.len(), page_size),
        total_items: items.len(),
    }
}

/// Page strip: first page, a window around `current`, last page, with an
/// ellipsis wherever numbers are skipped.
pub fn page_strip(current: usize, total: usize) -> Vec<PageMarker> {
    let mut numbers = vec![1];
    let window_start = current.saturating_sub(STRIP_WINDOW).max(2);
    let window_end = (current + STRIP_WINDOW).min(total.saturating_sub(1));
    numbers.extend(window_start..=window_end);
    if total > 1 {
        numbers.push(total);
    }
    numbers.dedup();

    let mut strip = Vec::with_capacity(numbers.len() + 2);
    let mut previous = 0;
    for n in numbers {
        if previous != 0 && n > previous + 1 {
            strip.push(PageMarker::Ellipsis);
        }
        strip.push(PageMarker::Number(n));
        previous = n;
    }
    strip
}

/// Rows whose name contains the trimmed query, ignoring case.
/// A blank query keeps every row.
pub fn filter_by_name<T: Clone>(items: &[T], query: &str, name: impl Fn(&T) -> &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| name(*item).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Search box plus current page of an admin table.
/// Changing the search always returns to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    search: String,
    page: usize,
    page_size: usize,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Used after a save or delete
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn apply<T: Clone>(&self, items: &[T], name: impl Fn(&T) -> &str) -> Page<T> {
        let filtered = filter_by_name(items, &self.search, name);
        paginate(&filtered, self.page, self.page_size)
    }
}
