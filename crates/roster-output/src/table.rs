use std::cmp::Ordering;

use roster_types::{PageSize, SortColumn, SortDirection, SortOrder, UserRecord};
use serde::Serialize;

/// Sort and paging state of the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableView {
    pub page_size: PageSize,
    /// 1-based.
    pub page: usize,
    pub sort: Option<SortOrder>,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<'a> {
    pub page: usize,
    pub total_pages: usize,
    pub total_users: usize,
    pub page_size: PageSize,
    pub users: Vec<&'a UserRecord>,
}

impl TableView {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            page: 1,
            sort: None,
        }
    }

    /// Changing the page size goes back to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn sort_by(&mut self, column: SortColumn, direction: SortDirection) {
        self.sort = Some(SortOrder { column, direction });
    }

    pub fn render<'a>(&self, users: &'a [UserRecord]) -> Page<'a> {
        let mut rows: Vec<&UserRecord> = users.iter().collect();
        if let Some(order) = self.sort {
            sort_users(&mut rows, order);
        }

        let size = self.page_size.get();
        let total_users = rows.len();
        let total_pages = total_users.div_ceil(size).max(1);
        let page = self.page.clamp(1, total_pages);

        let users = rows.into_iter().skip((page - 1) * size).take(size).collect();

        Page {
            page,
            total_pages,
            total_users,
            page_size: self.page_size,
            users,
        }
    }
}

fn sort_key(user: &UserRecord, column: SortColumn) -> String {
    let value = match column {
        SortColumn::FirstName => &user.data.first_name,
        SortColumn::LastName => &user.data.last_name,
        SortColumn::Email => &user.data.email,
    };
    value.to_uppercase()
}

/// Stable, case-insensitive sort. Equal keys keep their list order in both
/// directions.
pub fn sort_users(rows: &mut [&UserRecord], order: SortOrder) {
    rows.sort_by(|a, b| {
        let cmp: Ordering = sort_key(a, order.column).cmp(&sort_key(b, order.column));
        match order.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });
}
