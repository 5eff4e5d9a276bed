use crate::cli::GlobalArgs;
use crate::commands::common::{print_notes, take_limit, CliContext};
use crate::error::CliError;

pub async fn run_list(
    limit: Option<usize>,
    as_json: bool,
    globals: &GlobalArgs,
) -> Result<(), CliError> {
    let context = CliContext::load(globals)?;
    let collection = context.load_collection().await?;

    let notes = take_limit(collection.notes(), limit);
    print_notes(&notes, as_json)
}
