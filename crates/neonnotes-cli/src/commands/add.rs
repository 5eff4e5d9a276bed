use std::path::Path;

use neonnotes_core::NoteDraft;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_image, resolve_note_content, CliContext};
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    content: Option<&str>,
    image: Option<&Path>,
    globals: &GlobalArgs,
) -> Result<(), CliError> {
    let context = CliContext::load(globals)?;
    let token = context.require_token()?;

    let content = resolve_note_content(content)?;
    let mut draft = NoteDraft::new(title.trim(), content);
    if let Some(image) = load_image(image)? {
        draft = draft.with_image(image);
    }

    let mut collection = context.collection();
    let note = collection.create(Some(token), &draft).await?;
    println!("{}", note.id);
    Ok(())
}
