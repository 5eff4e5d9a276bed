use crate::cli::GlobalArgs;
use crate::commands::common::{normalize_search_query, print_notes, take_limit, CliContext};
use crate::error::CliError;

pub async fn run_search(
    query: &str,
    limit: Option<usize>,
    as_json: bool,
    globals: &GlobalArgs,
) -> Result<(), CliError> {
    let normalized_query = normalize_search_query(query)?;
    let context = CliContext::load(globals)?;
    let collection = context.load_collection().await?;

    let notes = take_limit(collection.filtered(&normalized_query), limit);
    print_notes(&notes, as_json)
}
