//! Listing query engine: clamps raw paging/sort input into a [`PageRequest`]
//! and runs it against a repository as one count plus one range read.

use crate::error::StoreResult;
use crate::models::{PageRequest, PageResult, Product, SortField, SortOrder};
use crate::repository::ProductRepository;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Normalizes raw listing parameters. Never fails.
///
/// - `page` below 1 (or absent) becomes 1
/// - `page_size` outside `1..=100` (or absent) becomes 10
/// - `sort_by` is matched case-insensitively against `id`, `name`, `price`;
///   anything else sorts by id
/// - `order` is descending only for a case-insensitive `desc`
///
/// Input is not trimmed: `" desc "` sorts ascending.
pub fn plan(
    page: Option<i64>,
    page_size: Option<i64>,
    sort_by: Option<&str>,
    order: Option<&str>,
) -> PageRequest {
    let page = match page {
        Some(p) if p >= 1 => p as u64,
        _ => 1,
    };

    let page_size = match page_size {
        Some(s) if (1..=MAX_PAGE_SIZE as i64).contains(&s) => s as u64,
        _ => DEFAULT_PAGE_SIZE,
    };

    let sort_field = sort_by
        .and_then(|raw| raw.parse::<SortField>().ok())
        .unwrap_or_default();

    let order = match order {
        Some(raw) if raw.eq_ignore_ascii_case("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    };

    PageRequest {
        page,
        page_size,
        sort_field,
        order,
    }
}

/// Runs a planned request.
///
/// A page past the end is pulled back to the last page (page 1 when the
/// table is empty), and `page_index` reports the page actually served.
pub async fn execute<R>(repository: &R, request: &PageRequest) -> StoreResult<PageResult<Product>>
where
    R: ProductRepository + ?Sized,
{
    let total_count = repository.count().await?;
    let total_pages = total_count.div_ceil(request.page_size);
    let page_index = request.page.min(total_pages.max(1));
    let offset = (page_index - 1) * request.page_size;

    let items = repository
        .find_ordered(request.sort_field, request.order, offset, request.page_size)
        .await?;

    Ok(PageResult {
        total_count,
        total_pages,
        page_index,
        page_size: request.page_size,
        items,
    })
}
