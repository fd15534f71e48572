use chrono::Utc;
use jotter_core::models::{SortDirection, SortField};
use jotter_core::notes::{ListOutcome, NoteListView};
use jotter_core::{NoteDraft, NoteFilters, NotePatch};

use crate::commands::common::{
    collect_tags, format_note_detail, format_note_lines, parse_slug, print_json,
};
use crate::context::AppContext;
use crate::error::CliError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub order_by: Option<SortField>,
    pub ascending: bool,
    pub archived: Option<bool>,
    pub pinned: Option<bool>,
}

impl ListArgs {
    pub fn to_filters(&self) -> NoteFilters {
        let direction = if self.ascending {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        let mut filters =
            NoteFilters::default().ordered_by(self.order_by.unwrap_or_default(), direction);
        if let Some(search) = &self.search {
            filters = filters.with_search(search.as_str());
        }
        for tag in collect_tags(&self.tags) {
            filters = filters.with_tag(tag);
        }
        if let Some(archived) = self.archived {
            filters = filters.archived(archived);
        }
        if let Some(pinned) = self.pinned {
            filters = filters.pinned(pinned);
        }
        filters
    }
}

pub async fn run_list(context: &AppContext, args: &ListArgs, as_json: bool) -> Result<(), CliError> {
    let notes = context.client.notes();
    let view = NoteListView::new(context.client.session().notifier().clone());

    match view.load(&notes, args.to_filters()).await {
        ListOutcome::Applied { .. } | ListOutcome::Stale => {}
        ListOutcome::Failed(error) => return Err(error.into()),
    }

    let listed = view.notes();
    if as_json {
        print_json(&listed)?;
    } else if listed.is_empty() {
        println!("No notes found.");
    } else {
        for line in format_note_lines(&listed, Utc::now()) {
            println!("{line}");
        }
    }
    Ok(())
}

pub async fn run_show(context: &AppContext, slug: &str, as_json: bool) -> Result<(), CliError> {
    let note = context.client.notes().get_note(&parse_slug(slug)?).await?;
    if as_json {
        print_json(&note)?;
    } else {
        println!("{}", format_note_detail(&note));
    }
    Ok(())
}

pub async fn run_add(
    context: &AppContext,
    title: &str,
    content: &str,
    tags: &[String],
    color: Option<&str>,
) -> Result<(), CliError> {
    let mut draft = NoteDraft::new(title, content).with_tags(collect_tags(tags));
    if let Some(color) = color {
        draft = draft.with_color(color.trim());
    }

    let note = context.client.notes().create_note(&draft).await?;
    println!("Created note {}", note.slug);
    Ok(())
}

pub fn build_patch(
    title: Option<String>,
    content: Option<String>,
    tags: &[String],
    color: Option<String>,
) -> NotePatch {
    NotePatch {
        title,
        content,
        tags: if tags.is_empty() {
            None
        } else {
            Some(collect_tags(tags))
        },
        color: color.map(|color| color.trim().to_string()),
    }
}

pub async fn run_edit(context: &AppContext, slug: &str, patch: &NotePatch) -> Result<(), CliError> {
    let notes = context.client.notes();
    let current = notes.get_note(&parse_slug(slug)?).await?;
    let updated = notes.update_note(&current, patch).await?;
    println!("Updated note {}", updated.slug);
    Ok(())
}

pub async fn run_delete(context: &AppContext, slug: &str) -> Result<(), CliError> {
    let slug = parse_slug(slug)?;
    context.client.notes().delete_note(&slug).await?;
    println!("Deleted note {slug}");
    Ok(())
}

pub async fn run_archive(context: &AppContext, slug: &str) -> Result<(), CliError> {
    let notes = context.client.notes();
    let slug = parse_slug(slug)?;
    let current = notes.get_note(&slug).await?;
    let updated = notes.toggle_archive(&slug, current.is_archived).await?;
    if updated.is_archived {
        println!("Archived note {slug}");
    } else {
        println!("Unarchived note {slug}");
    }
    Ok(())
}

pub async fn run_pin(context: &AppContext, slug: &str) -> Result<(), CliError> {
    let notes = context.client.notes();
    let slug = parse_slug(slug)?;
    let current = notes.get_note(&slug).await?;
    let updated = notes.toggle_pin(&slug, current.is_pinned).await?;
    if updated.is_pinned {
        println!("Pinned note {slug}");
    } else {
        println!("Unpinned note {slug}");
    }
    Ok(())
}
