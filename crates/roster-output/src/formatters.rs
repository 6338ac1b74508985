use roster_types::{
    DraftRecord, Field, PageSize, SortColumn, SortDirection, SortOrder, UserRecord,
};

use crate::table::Page;

const ID_HEADER: &str = "ID";

pub fn format_users_page(page: &Page, sort: Option<SortOrder>) -> String {
    if page.total_users == 0 {
        return "No users".to_string();
    }

    let mut headers = vec![ID_HEADER.to_string()];
    headers.extend(Field::ALL.iter().map(|f| f.label().to_string()));
    if let Some(order) = sort {
        let index = match order.column {
            SortColumn::FirstName => 1,
            SortColumn::LastName => 2,
            SortColumn::Email => 3,
        };
        let arrow = match order.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        };
        headers[index].push_str(arrow);
    }

    let rows: Vec<Vec<&str>> = page.users.iter().map(|u| row_cells(u)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(render_row(headers.iter().map(|h| h.as_str()), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        lines.push(render_row(row.iter().copied(), &widths));
    }
    lines.push(String::new());
    lines.push(format_page_footer(page));

    lines.join("\n")
}

fn row_cells(user: &UserRecord) -> Vec<&str> {
    let mut cells = vec![user.id.as_str()];
    cells.extend(Field::ALL.iter().map(|f| user.data.get(*f)));
    cells
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

pub fn format_page_footer(page: &Page) -> String {
    let noun = if page.total_users == 1 { "user" } else { "users" };
    format!(
        "Page {} of {} ({} {}, {} per page; sizes: {})",
        page.page,
        page.total_pages,
        page.total_users,
        noun,
        page.page_size,
        format_page_size_options()
    )
}

fn format_page_size_options() -> String {
    PageSize::OPTIONS
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn format_draft(draft: &DraftRecord) -> String {
    let mode = draft.mode();
    let mut lines = vec![mode.title().to_string()];
    if draft.is_editing() {
        lines.push(format!("  {:<10} {}", ID_HEADER, draft.id));
    }
    for field in Field::ALL {
        let value = draft.fields.get(field);
        let shown = if value.is_empty() { "(empty)" } else { value };
        lines.push(format!("  {:<10} {}", field.label(), shown));
    }
    lines.push(format!("[{}]", mode.button_label()));
    lines.join("\n")
}

pub fn format_user(user: &UserRecord) -> String {
    let mut lines = vec![format!("{}  {}", ID_HEADER, user.id)];
    for field in Field::ALL {
        lines.push(format!("  {:<10} {}", field.label(), user.data.get(field)));
    }
    lines.join("\n")
}
