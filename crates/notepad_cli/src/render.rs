//! Terminal rendering of note cards.

use chrono::{Local, TimeZone};
use notepad_core::{Note, NoteTag};

pub const EMPTY_LIST_MESSAGE: &str = "Nothing here yet. Create a note!";

/// Formats epoch milliseconds as local `dd.mm.yyyy HH:MM`.
pub fn format_timestamp(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(datetime) => datetime.format("%d.%m.%Y %H:%M").to_string(),
        None => epoch_ms.to_string(),
    }
}

/// Renders one note card; content line breaks are kept, each line indented.
pub fn render_note(note: &Note) -> String {
    let mut card = format!("[{}] {}\n", note.tag, note.title);
    for line in note.content.lines() {
        card.push_str("    ");
        card.push_str(line);
        card.push('\n');
    }
    card.push_str(&format!(
        "    id: {}  created: {}\n",
        note.id,
        format_timestamp(note.created_at)
    ));
    card
}

/// Renders the display list, or the empty-state message.
pub fn render_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return format!("{EMPTY_LIST_MESSAGE}\n");
    }
    notes
        .iter()
        .map(render_note)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_tag_counts(counts: &[(NoteTag, usize)]) -> String {
    let width = NoteTag::ALL
        .iter()
        .map(|tag| tag.label().len())
        .max()
        .unwrap_or(0);
    counts
        .iter()
        .map(|(tag, count)| format!("{:<width$}  {count}\n", tag.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{render_list, render_note, render_tag_counts, EMPTY_LIST_MESSAGE};
    use notepad_core::{Note, NoteTag};

    fn sample() -> Note {
        Note {
            id: "n1".into(),
            title: "Groceries".to_string(),
            content: "milk\neggs".to_string(),
            tag: NoteTag::ShoppingList,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn card_keeps_content_line_breaks() {
        let card = render_note(&sample());
        assert!(card.starts_with("[Shopping List] Groceries\n"));
        assert!(card.contains("    milk\n    eggs\n"));
        assert!(card.contains("id: n1"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        assert_eq!(render_list(&[]).trim_end(), EMPTY_LIST_MESSAGE);
    }

    #[test]
    fn tag_counts_are_aligned() {
        let rendered = render_tag_counts(&[(NoteTag::Work, 2), (NoteTag::ShoppingList, 0)]);
        assert_eq!(rendered, "Work           2\nShopping List  0\n");
    }
}
