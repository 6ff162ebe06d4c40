//! CSV export of an event's registrations.

use chrono::NaiveDate;

use super::aggregator::RegistrationTable;

/// Fixed leading columns of every export.
pub const FIXED_HEADERS: [&str; 6] = ["Type", "Name", "Email", "Phone", "Status", "Registered At"];

/// Render the table as one rectangular CSV document.
///
/// Every cell is quoted, rows are separated by `\n` and there is no trailing
/// newline.
pub fn to_csv(table: &RegistrationTable) -> String {
    let dynamic = table.columns.len();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(1 + table.total);

    rows.push(
        FIXED_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(table.columns.iter().map(|c| c.header.clone()))
            .collect(),
    );

    for registration in &table.members {
        let member = &registration.member;
        let mut row = vec![
            "Member".to_string(),
            member.name.clone(),
            member.email.clone(),
            member.phone.clone().unwrap_or_default(),
            registration.status.as_str().to_string(),
            registration.registered_at.clone(),
        ];
        row.resize(FIXED_HEADERS.len() + dynamic, String::new());
        rows.push(row);
    }

    for registration in &table.public {
        let mut row = vec![
            "Public".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            registration.submitted_at.clone(),
        ];
        row.extend(registration.cells.iter().cloned());
        rows.push(row);
    }

    rows.iter()
        .map(|row| row.iter().map(|cell| quote(cell)).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a cell in double quotes, doubling any inside it.
pub fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Download name for an event's export, e.g. `registrations-Spring-Fair-2026-05-01.csv`.
pub fn export_filename(event_title: &str, date: NaiveDate) -> String {
    let title: String = event_title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("registrations-{}-{}.csv", title, date.format("%Y-%m-%d"))
}
