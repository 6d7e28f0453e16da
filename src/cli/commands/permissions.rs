use crate::auth::Permission;
use crate::cli::utils::output_table;
use crate::cli::OutputFormat;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<Vec<String>> = Permission::ALL
        .into_iter()
        .map(|p| vec![p.slug().to_string(), p.description().to_string()])
        .collect();
    output_table(output_format, &["slug", "description"], &rows)
}
