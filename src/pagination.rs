//! Last-page computation shared by every paged feed endpoint.

/// Returns whether `page` (zero-based) is the last page for `items_count`
/// matching items at `items_per_page` per page.
///
/// Pages past the end of the data are still "last": the remainder
/// saturates at zero, the caller gets an empty result set, never an error.
pub fn is_last_page(page: usize, items_count: usize, items_per_page: usize) -> bool {
    if page == 0 {
        items_per_page >= items_count
    } else {
        items_count.saturating_sub(page.saturating_mul(items_per_page)) <= items_per_page
    }
}
