use anyhow::{bail, Result};

use linkdeck_core::LinkError;
use linkdeck_state::{CommitOutcome, ListController};

use super::App;
use crate::formatter::{format_chips, format_link, format_links, OutputFormat};

pub fn list(app: &mut App, query: Option<String>, tag: Option<String>) -> Result<()> {
    if let Some(query) = query {
        app.collection.set_search(query);
    }
    if let Some(tag) = tag {
        app.collection.toggle_tag(&tag);
    }
    println!("{}", format_links(&app.collection.links(), app.format));
    Ok(())
}

pub async fn add(app: &App, url: &str, title: &str) -> Result<()> {
    let link = app.collection.create(url, title).await?;
    println!("{}", format_link(&link, app.format));
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct EditArgs {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Comma separated, replaces the current tags.
    pub tags: Option<String>,
}

/// Drive the inline edit machine for one row: begin, change the draft, commit.
pub async fn edit(app: &App, args: EditArgs) -> Result<()> {
    let link = app
        .collection
        .find(&args.id)
        .ok_or_else(|| LinkError::NotFound(args.id.clone()))?;

    let mut controller = ListController::new();
    controller.begin_edit(&link)?;
    {
        let draft = controller.editor_mut().draft_mut()?;
        if let Some(title) = args.title {
            draft.title = title;
        }
        if let Some(url) = args.url {
            draft.url = url;
        }
        if let Some(tags) = &args.tags {
            draft.set_tags_from_input(tags)?;
        }
    }

    match app.collection.commit_edit(&mut controller).await? {
        CommitOutcome::Rejected => bail!("title or url cannot be empty"),
        CommitOutcome::Unchanged => println!("{}", format_link(&link, app.format)),
        CommitOutcome::Updated(updated) => println!("{}", format_link(&updated, app.format)),
    }
    Ok(())
}

pub async fn remove(app: &App, id: &str) -> Result<()> {
    app.collection.delete(id).await?;
    match app.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "id": id, "removed": true })),
        _ => println!("removed {id}"),
    }
    Ok(())
}

pub async fn pin(app: &App, id: &str) -> Result<()> {
    let link = app.collection.pin(id).await?;
    println!("{}", format_link(&link, app.format));
    Ok(())
}

pub async fn unpin(app: &App, id: &str) -> Result<()> {
    let link = app.collection.unpin(id).await?;
    println!("{}", format_link(&link, app.format));
    Ok(())
}

pub fn tags(app: &App) -> Result<()> {
    print!(
        "{}",
        format_chips(&app.collection.tag_chips(), app.format, app.color)
    );
    if app.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

/// Print a link's url, putting it on the clipboard when enabled.
pub fn copy(app: &App, id: &str) -> Result<()> {
    let url = app.collection.copy(id)?;
    if app.clipboard {
        super::write_clipboard(&url);
    }
    println!("{url}");
    Ok(())
}

/// Print the destination and wait for the visit to be recorded.
pub async fn open(app: &App, id: &str) -> Result<()> {
    let visit = app.collection.visit(id)?;
    println!("{}", visit.destination);
    visit.handle.await?;
    Ok(())
}
