//! Interactive shell: one command per line, the list re-rendered after each.
//!
//! The shell plays the part of the keyboard and mouse of a list UI. It keeps a
//! [`ListController`] for selection and inline editing and drives the loaded
//! [`App`] collection with it.

use std::io::Write;

use anyhow::{anyhow, bail, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use linkdeck_core::{Link, PINNED_TAG};
use linkdeck_state::{ListController, RowMode};

use crate::commands::{status_line, write_clipboard, App};
use crate::formatter::{format_chips, OutputFormat};

const PROMPT: &str = "linkdeck> ";

const HELP: &str = "\
/text          search (a bare / clears it)
#tag           toggle a tag filter (#all clears it)
j / k          move the selection down / up
enter          open the selected link
edit           edit the selected link
title <text>   change the draft title
url <text>     change the draft url
tags <a,b>     replace the draft tags
save, esc      commit the draft (esc clears the selection when not editing)
cancel         drop the draft
pin, unpin     pin or unpin the selected link
rm             remove the selected link
copy           copy the selected link's url
add <url> <title>
reload
quit";

enum Flow {
    Continue,
    Quit,
}

/// Run until `quit` or end of input.
pub async fn run<R, W>(app: &mut App, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut controller = ListController::new();
    let mut lines = input.lines();

    render(app, &controller, out)?;
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(command = line, "shell input");

        let flow = step(app, &mut controller, line, out).await;
        for n in app.notifier.drain() {
            writeln!(out, "{}", status_line(n.level, &n.message))?;
        }
        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(out, "error: {err}")?,
        }
        controller.sync(app.collection.links().len());
        render(app, &controller, out)?;
    }
    Ok(())
}

fn selected_id(controller: &ListController, view: &[Link]) -> Result<String> {
    controller
        .selected(view)
        .map(|l| l.id.clone())
        .ok_or_else(|| anyhow!("no link selected"))
}

/// Leaving the list commits an open draft and drops the selection, so a
/// later row command never lands on whatever slid under the old cursor.
async fn click_away(app: &App, controller: &mut ListController) -> Result<()> {
    if controller.is_editing() {
        app.collection.commit_edit(controller).await?;
    }
    controller.clear_selection();
    Ok(())
}

async fn step<W: Write>(
    app: &mut App,
    controller: &mut ListController,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    let view = app.collection.links();

    if let Some(query) = line.strip_prefix('/') {
        click_away(app, controller).await?;
        app.collection.set_search(query.trim());
        return Ok(Flow::Continue);
    }
    if let Some(tag) = line.strip_prefix('#') {
        click_away(app, controller).await?;
        app.collection.toggle_tag(tag.trim());
        return Ok(Flow::Continue);
    }

    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    match cmd {
        "j" | "down" => controller.move_down(view.len()),
        "k" | "up" => controller.move_up(view.len()),
        "enter" | "open" => {
            let id = selected_id(controller, &view)?;
            let visit = app.collection.visit(&id)?;
            writeln!(out, "open {}", visit.destination)?;
            visit.handle.await?;
        }
        "edit" => {
            let id = selected_id(controller, &view)?;
            let link = app
                .collection
                .find(&id)
                .ok_or_else(|| anyhow!("link {id} is gone"))?;
            controller.begin_edit(&link)?;
        }
        "title" => controller.editor_mut().draft_mut()?.title = rest.to_string(),
        "url" => controller.editor_mut().draft_mut()?.url = rest.to_string(),
        "tags" => controller
            .editor_mut()
            .draft_mut()?
            .set_tags_from_input(rest)?,
        "save" => {
            app.collection.commit_edit(controller).await?;
        }
        "esc" => {
            if controller.is_editing() {
                app.collection.commit_edit(controller).await?;
            } else {
                controller.clear_selection();
            }
        }
        "cancel" => controller.editor_mut().cancel(),
        "pin" => {
            let id = selected_id(controller, &view)?;
            app.collection.pin(&id).await?;
        }
        "unpin" => {
            let id = selected_id(controller, &view)?;
            app.collection.unpin(&id).await?;
        }
        "rm" => {
            let id = selected_id(controller, &view)?;
            app.collection.delete(&id).await?;
        }
        "copy" => {
            let id = selected_id(controller, &view)?;
            let url = app.collection.copy(&id)?;
            if app.clipboard {
                write_clipboard(&url);
            }
            writeln!(out, "copy {url}")?;
        }
        "add" => {
            let (url, title) = rest
                .trim()
                .split_once(' ')
                .ok_or_else(|| anyhow!("usage: add <url> <title>"))?;
            click_away(app, controller).await?;
            app.collection.create(url, title).await?;
        }
        "reload" => {
            click_away(app, controller).await?;
            app.collection.load().await?;
        }
        "help" | "?" => writeln!(out, "{HELP}")?,
        "quit" | "q" | "exit" => return Ok(Flow::Quit),
        other => bail!("unknown command: {other}"),
    }
    Ok(Flow::Continue)
}

fn render<W: Write>(app: &App, controller: &ListController, out: &mut W) -> Result<()> {
    let view = app.collection.links();

    let search = app.collection.search();
    if !search.is_empty() {
        writeln!(out, "search: {search}")?;
    }
    write!(
        out,
        "{}",
        format_chips(&app.collection.tag_chips(), OutputFormat::Table, app.color)
    )?;
    if view.is_empty() {
        writeln!(out, "(no results)")?;
        return Ok(());
    }

    let cursor = controller.cursor().index();
    for (i, row) in controller.rows(&view).iter().enumerate() {
        let marker = if !controller.is_editing() && cursor == Some(i) {
            '>'
        } else {
            ' '
        };
        let pin = if row.pinned { '*' } else { ' ' };
        let dim = if row.dimmed { '~' } else { ' ' };
        let tags: Vec<String> = row
            .tags
            .iter()
            .filter(|t| *t != PINNED_TAG)
            .map(|t| format!("#{t}"))
            .collect();
        let mode = match row.mode {
            RowMode::Viewing => "",
            RowMode::Editing => "  [editing]",
            RowMode::Updating => "  [updating]",
        };
        writeln!(
            out,
            "{marker}{pin}{dim} {}  {}  {}{mode}",
            row.title,
            row.url,
            tags.join(" ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use linkdeck_client::{ClientCall, MemoryLinkClient};
    use linkdeck_core::LinkPatch;
    use linkdeck_state::{LinkCollection, LinkStore, RecordingNotifier, Session};

    fn link(id: &str, title: &str, url: &str, tags: &[&str], day: u32) -> Link {
        Link {
            id: id.to_string(),
            url: url.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            visited_at: None,
        }
    }

    async fn app() -> (App, Arc<MemoryLinkClient>) {
        let client = Arc::new(MemoryLinkClient::with_links(vec![
            link("1", "A", "a.com", &[], 2),
            link("2", "B", "b.com", &["work"], 1),
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let collection = LinkCollection::new(
            LinkStore::new(),
            Session::new("alice"),
            client.clone(),
            notifier.clone(),
        );
        collection.load().await.unwrap();
        let app = App {
            collection,
            notifier,
            format: OutputFormat::Table,
            color: false,
            clipboard: false,
        };
        (app, client)
    }

    async fn drive(app: &mut App, script: &str) -> String {
        let mut out = Vec::new();
        run(app, script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn renders_rows_and_chips() {
        let (mut app, _) = app().await;
        let out = drive(&mut app, "quit\n").await;
        assert!(out.contains("[#all]  #work (1)"));
        assert!(out.contains("A  a.com"));
        assert!(out.contains("B  b.com  #work"));
    }

    #[tokio::test]
    async fn pin_selected_row() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "j\nj\npin\n").await;
        assert!(out.contains("[info] Pinned"));
        assert!(out.contains(" *  B  b.com  #work"));
        assert_eq!(
            client.calls().last(),
            Some(&ClientCall::Update(LinkPatch::new("2").with_tags(vec![
                "work".to_string(),
                "pinned".to_string()
            ])))
        );
        assert_eq!(app.collection.all_links()[0].id, "2");
    }

    #[tokio::test]
    async fn search_then_enter_opens_the_match() {
        let (mut app, _) = app().await;
        let out = drive(&mut app, "/work\nj\nenter\n").await;
        assert!(out.contains("search: work"));
        assert!(out.contains("open http://b.com"));
        assert!(app.collection.find("2").unwrap().visited_at.is_some());
    }

    #[tokio::test]
    async fn empty_title_is_rejected_on_save() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "j\nedit\ntitle\nsave\n").await;
        assert!(out.contains("[editing]"));
        assert!(out.contains("[warning] Title or url cannot be empty"));
        assert!(!client
            .calls()
            .iter()
            .any(|c| matches!(c, ClientCall::Update(_))));
        assert_eq!(app.collection.find("1").unwrap().title, "A");
    }

    #[tokio::test]
    async fn edit_tags_then_escape_commits() {
        let (mut app, _) = app().await;
        let out = drive(&mut app, "j\nedit\ntags reading, later\nesc\n").await;
        assert!(out.contains("[ok] Link has been updated"));
        assert_eq!(
            app.collection.find("1").unwrap().tags,
            vec!["reading", "later"]
        );
    }

    #[tokio::test]
    async fn selection_is_ignored_while_editing() {
        let (mut app, _) = app().await;
        let out = drive(&mut app, "j\nedit\nj\npin\n").await;
        assert!(out.contains("error: no link selected"));
        assert!(out.contains("~ B"));
    }

    #[tokio::test]
    async fn tag_toggle_and_remove() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "#work\nj\nrm\n").await;
        assert!(out.contains("[#work (1)]"));
        assert!(out.contains("[ok] Link has been removed"));
        assert_eq!(client.links().len(), 1);
    }

    #[tokio::test]
    async fn add_and_unknown_commands() {
        let (mut app, _) = app().await;
        let out = drive(&mut app, "add c.com Cee\nfrobnicate\n").await;
        assert!(out.contains("[ok] Link has been created"));
        assert!(out.contains("error: unknown command: frobnicate"));
        assert_eq!(app.collection.all_links()[0].title, "Cee");
    }

    #[tokio::test]
    async fn tag_filter_drops_the_selection() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "j\n#work\nrm\n").await;
        assert!(out.contains("error: no link selected"));
        assert_eq!(client.links().len(), 2);
        assert!(!client
            .calls()
            .iter()
            .any(|c| matches!(c, ClientCall::Delete(_))));
    }

    #[tokio::test]
    async fn add_drops_the_selection() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "j\nadd c.com C\nrm\n").await;
        assert!(out.contains("[ok] Link has been created"));
        assert!(out.contains("error: no link selected"));
        assert_eq!(client.links().len(), 3);
        assert!(app.collection.all_links().iter().any(|l| l.title == "C"));
    }

    #[tokio::test]
    async fn reload_drops_the_selection() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "j\nreload\npin\n").await;
        assert!(out.contains("error: no link selected"));
        assert!(!client
            .calls()
            .iter()
            .any(|c| matches!(c, ClientCall::Update(_))));
    }

    #[tokio::test]
    async fn search_commits_an_open_draft() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "j\nedit\ntitle Renamed\n/zzz\n").await;
        assert!(out.contains("[ok] Link has been updated"));
        assert!(client
            .calls()
            .iter()
            .any(|c| matches!(c, ClientCall::Update(_))));
        assert_eq!(app.collection.find("1").unwrap().title, "Renamed");
        assert_eq!(app.collection.search(), "zzz");
        let after = out.rsplit("search: zzz").next().unwrap();
        assert!(!after.contains("[editing]"));
    }

    #[tokio::test]
    async fn tag_filter_discards_an_empty_draft() {
        let (mut app, client) = app().await;
        let out = drive(&mut app, "j\nedit\nurl\n#work\n").await;
        assert!(out.contains("[warning] Title or url cannot be empty"));
        assert!(out.contains("[#work (1)]"));
        assert!(!out.rsplit("[#work (1)]").next().unwrap().contains("[editing]"));
        assert_eq!(app.collection.find("1").unwrap().url, "a.com");
        assert!(!client
            .calls()
            .iter()
            .any(|c| matches!(c, ClientCall::Update(_))));
    }

    #[tokio::test]
    async fn copy_selected_url() {
        let (mut app, _) = app().await;
        let out = drive(&mut app, "j\ncopy\n").await;
        assert!(out.contains("copy a.com"));
        assert!(out.contains("[info] Copied"));
    }

    #[tokio::test]
    async fn copy_needs_a_selection() {
        let (mut app, _) = app().await;
        let out = drive(&mut app, "copy\n").await;
        assert!(out.contains("error: no link selected"));
        assert!(!out.contains("[info] Copied"));
    }
}
