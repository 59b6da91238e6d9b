/// The prefix of `filtered` visible at `page` (zero-based).
pub fn visible_prefix<T>(filtered: &[T], page: usize, page_size: usize) -> &[T] {
    let end = page
        .saturating_add(1)
        .saturating_mul(page_size)
        .min(filtered.len());
    &filtered[..end]
}

/// Whether the "load more" control should be shown.
pub fn has_more(displayed: usize, filtered: usize) -> bool {
    displayed < filtered
}
