use crate::cli::GlobalArgs;
use crate::commands::common::{confirm, parse_note_id, CliContext};
use crate::error::CliError;

pub async fn run_delete(id: &str, skip_confirm: bool, globals: &GlobalArgs) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let context = CliContext::load(globals)?;
    let token = context.require_token()?;

    let mut collection = if skip_confirm {
        context.collection()
    } else {
        let collection = context.load_collection().await?;
        let note = collection
            .get(note_id)
            .ok_or(CliError::NoteNotFound(note_id))?;
        if !confirm(&format!("Delete note {} \"{}\"?", note.id, note.title))? {
            println!("Cancelled");
            return Ok(());
        }
        collection
    };

    collection.delete(Some(token), note_id).await?;
    println!("{note_id}");
    Ok(())
}
