use std::path::Path;

use neonnotes_core::NoteDraft;

use crate::cli::GlobalArgs;
use crate::commands::common::{
    capture_editor_input_with_initial, load_image, normalize_content, parse_note_id, CliContext,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
    image: Option<&Path>,
    globals: &GlobalArgs,
) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let context = CliContext::load(globals)?;
    let token = context.require_token()?;
    let mut collection = context.load_collection().await?;
    let note = collection
        .get(note_id)
        .cloned()
        .ok_or(CliError::NoteNotFound(note_id))?;

    let mut draft = NoteDraft::from_note(&note);
    if let Some(title) = title {
        draft.title = title.trim().to_string();
    }
    match content {
        Some(content) => {
            draft.content = normalize_content(content).ok_or(CliError::EmptyContent)?;
        }
        None if title.is_none() => {
            let Some(edited_content) = capture_editor_input_with_initial(&note.content)? else {
                return Err(CliError::EmptyEditedContent);
            };
            draft.content = edited_content;
        }
        None => {}
    }
    if let Some(image) = load_image(image)? {
        draft = draft.with_image(image);
    }

    if draft.image.is_none() && draft.title == note.title && draft.content == note.content {
        tracing::debug!("Note {} unchanged; skipping update", note_id);
        println!("{note_id}");
        return Ok(());
    }

    let updated = collection.update(Some(token), note_id, &draft).await?;
    println!("{}", updated.id);
    Ok(())
}
