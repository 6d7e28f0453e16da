use crate::cli::utils::output_table;
use crate::cli::OutputFormat;
use crate::database::models::listings;
use crate::filter::UnknownSort;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for listing in listings() {
        listing.validate()?;
        let filters: Vec<&str> = listing.filters.iter().map(|f| f.key).collect();
        let default_order: Vec<String> = listing
            .default_order
            .iter()
            .map(|(column, direction)| format!("{} {}", column, direction.to_sql().to_lowercase()))
            .collect();
        rows.push(vec![
            listing.name.to_string(),
            listing.default_rows_per_page.to_string(),
            listing.search.join(","),
            listing.sortable.join(","),
            filters.join(","),
            default_order.join(","),
            match listing.unknown_sort {
                UnknownSort::Ignore => "ignore".to_string(),
                UnknownSort::Reject => "reject".to_string(),
            },
        ]);
    }
    output_table(
        output_format,
        &["listing", "rows", "search", "sortable", "filters", "default_order", "unknown_sort"],
        &rows,
    )
}
