use chrono::{DateTime, Utc};
use jotter_core::models::{parse_tag_list, UserProfile};
use jotter_core::{Note, NoteSlug};
use serde::Serialize;

use crate::error::CliError;

pub fn parse_slug(raw: &str) -> Result<NoteSlug, CliError> {
    Ok(raw.trim().parse::<NoteSlug>()?)
}

/// Flattens repeated `--tag` values, each of which may be comma separated.
pub fn collect_tags(raw: &[String]) -> Vec<String> {
    parse_tag_list(&raw.join(","))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn format_note_lines(notes: &[Note], now: DateTime<Utc>) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let slug = truncate(note.slug.as_str(), 24);
            let title = truncate(&note.title, 40);
            let relative_time = format_relative_time(note.updated_at, now);
            let flags = render_flags(note);
            let tags = render_tags(note);

            if tags.is_empty() {
                format!("{slug:<24}  {flags:<2}  {title:<40}  {relative_time}")
            } else {
                format!("{slug:<24}  {flags:<2}  {title:<40}  {relative_time:<10}  {tags}")
            }
        })
        .collect()
}

pub fn format_note_detail(note: &Note) -> String {
    let mut lines = vec![
        note.title.clone(),
        format!("slug:    {}", note.slug),
        format!("color:   {}", note.color),
        format!(
            "created: {}",
            note.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!(
            "updated: {}",
            note.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ];
    if note.is_pinned || note.is_archived {
        let mut state = Vec::new();
        if note.is_pinned {
            state.push("pinned");
        }
        if note.is_archived {
            state.push("archived");
        }
        lines.push(format!("state:   {}", state.join(", ")));
    }
    let tags = render_tags(note);
    if !tags.is_empty() {
        lines.push(format!("tags:    {tags}"));
    }
    lines.push(String::new());
    lines.push(note.content.clone());
    lines.join("\n")
}

pub fn format_profile(profile: &UserProfile) -> String {
    let mut lines = vec![format!("username: {}", profile.username)];
    if let Some(email) = &profile.email {
        lines.push(format!("email:    {email}"));
    }
    if let Some(gender) = profile.gender {
        lines.push(format!("gender:   {gender}"));
    }
    if let Some(bio) = profile.bio.as_deref().filter(|bio| !bio.trim().is_empty()) {
        lines.push(format!("bio:      {bio}"));
    }
    if let Some(picture) = &profile.profile_picture {
        lines.push(format!("picture:  {picture}"));
    }
    if let Some(joined) = profile.date_joined {
        lines.push(format!("joined:   {}", joined.format("%Y-%m-%d")));
    }
    lines.join("\n")
}

pub fn render_flags(note: &Note) -> String {
    let mut flags = String::new();
    if note.is_pinned {
        flags.push('P');
    }
    if note.is_archived {
        flags.push('A');
    }
    flags
}

pub fn render_tags(note: &Note) -> String {
    let mut tags = note.tag_names();
    tags.sort_unstable();
    tags.into_iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn truncate(value: &str, max_chars: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds().max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
