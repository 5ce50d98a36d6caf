//! Terminal rendering of list screens and group details.

use owo_colors::{OwoColorize, Stream};
use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::list::{GroupDetail, ListController, ListEntity, ListPhase, SoftError};
use crate::query::{PaginationState, SortDirection};
use crate::types::Identity;

const EMPTY_CELL: &str = "-";

/// Header cell of the column the list is sorted by gets an arrow
fn header_titles<E: ListEntity>(controller: &ListController<E>) -> Vec<String> {
    let sort = controller.sort();
    E::columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            if i != sort.column_index {
                return column.title.to_string();
            }
            let arrow = match sort.direction {
                SortDirection::Ascending => "^",
                SortDirection::Descending => "v",
            };
            format!("{} {arrow}", column.title)
        })
        .collect()
}

/// "Page 2 of 5 (87 users)"
pub fn format_page_summary(pagination: &PaginationState, noun: &str) -> String {
    match (pagination.count, pagination.page_count()) {
        (Some(count), Some(pages)) => format!(
            "Page {} of {} ({} {})",
            pagination.page(),
            pages,
            count,
            noun
        ),
        _ => format!("Page {}", pagination.page()),
    }
}

/// Render the current rows of a list as a table, followed by a page summary
pub fn render_list<E: ListEntity>(controller: &ListController<E>, identity: &Identity) -> String {
    if let ListPhase::Error(err) = controller.phase() {
        return format!(
            "{} {}",
            "Failed to load:".if_supports_color(Stream::Stdout, |s| s.red()),
            err
        );
    }
    if controller.soft_error() == Some(SoftError::BadIdentifier) {
        return format!("No {} match the requested identifier.", E::NAME);
    }

    let views = controller.row_views(identity);
    if views.is_empty() {
        return format!("No {} found.", E::NAME);
    }

    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(header_titles(controller));
    builder.push_record(header);

    for view in views {
        let marker = match (view.selected, view.control_disabled) {
            (true, _) => "[x]",
            (false, true) => " - ",
            (false, false) => "[ ]",
        };
        let mut record = vec![marker.to_string()];
        record.extend(view.cells.into_iter().map(|cell| {
            if cell.is_empty() {
                EMPTY_CELL.to_string()
            } else {
                cell
            }
        }));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    format!(
        "{}\n\n{}",
        table,
        format_page_summary(controller.pagination(), E::NAME)
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
    )
}

/// JSON form of a list screen
pub fn list_json<E: ListEntity>(
    controller: &ListController<E>,
    identity: &Identity,
) -> serde_json::Value {
    let pagination = controller.pagination();
    json!({
        "entity": E::NAME,
        "location": controller.location().to_string(),
        "filters": controller
            .filters()
            .iter()
            .map(|(key, value)| (key.to_string(), json!(value.values())))
            .collect::<serde_json::Map<_, _>>(),
        "pagination": {
            "limit": pagination.limit,
            "offset": pagination.offset,
            "count": pagination.count,
            "page": pagination.page(),
            "page_count": pagination.page_count(),
        },
        "order_by": controller.current_request().order_by,
        "soft_error": controller.soft_error().map(|_| "bad_identifier"),
        "rows": controller.row_views(identity),
    })
}

pub fn render_group_detail(detail: &GroupDetail) -> String {
    let group = &detail.group;
    let mut output = format!(
        "{}  {}\n",
        group
            .name
            .if_supports_color(Stream::Stdout, |s| s.bold()),
        group
            .uuid
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    if let Some(description) = group.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("{description}\n"));
    }
    if group.is_default() {
        output.push_str(&format!(
            "{}\n",
            "Default group".if_supports_color(Stream::Stdout, |s| s.yellow())
        ));
    }

    output.push_str(&format!("\nMembers ({}):\n", detail.members.meta.count));
    if detail.members.items.is_empty() {
        output.push_str("  (none)\n");
    }
    for member in &detail.members.items {
        output.push_str(&format!("  - {}", member.username));
        if !member.email.is_empty() {
            output.push_str(&format!(" <{}>", member.email));
        }
        output.push('\n');
    }

    output.push_str(&format!("\nRoles ({}):\n", detail.roles.meta.count));
    if detail.roles.items.is_empty() {
        output.push_str("  (none)\n");
    }
    for role in &detail.roles.items {
        let name = role.display_name.as_deref().unwrap_or(&role.name);
        output.push_str(&format!(
            "  - {} {}\n",
            name,
            role.uuid.if_supports_color(Stream::Stdout, |s| s.dimmed())
        ));
    }
    output.trim_end().to_string()
}
