use tracing::debug;

use super::interface::{Edit, EditorError, EditorHost, Notification, Selection};

/// In-memory text buffer with selections
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    selections: Vec<Selection>,
    notifications: Vec<Notification>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>, selections: Vec<Selection>) -> Result<Self, EditorError> {
        let text = text.into();
        validate(&text, &selections)?;
        Ok(Self {
            text,
            selections,
            notifications: Vec::new(),
        })
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn into_parts(self) -> (String, Vec<Notification>) {
        (self.text, self.notifications)
    }
}

fn check_range(text: &str, selection: &Selection) -> Result<(), EditorError> {
    let valid = selection.start <= selection.end
        && selection.end <= text.len()
        && text.is_char_boundary(selection.start)
        && text.is_char_boundary(selection.end);

    if valid {
        Ok(())
    } else {
        Err(EditorError::InvalidSelection {
            start: selection.start,
            end: selection.end,
        })
    }
}

fn validate(text: &str, selections: &[Selection]) -> Result<(), EditorError> {
    for selection in selections {
        check_range(text, selection)?;
    }

    let mut sorted: Vec<Selection> = selections.to_vec();
    sorted.sort_by_key(|s| (s.start, s.end));
    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(EditorError::OverlappingSelections {
                first: pair[0],
                second: pair[1],
            });
        }
    }

    Ok(())
}

impl EditorHost for TextBuffer {
    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn selected_text(&self, selection: &Selection) -> Option<String> {
        self.text.get(selection.start..selection.end).map(str::to_string)
    }

    fn apply_edits(&mut self, mut edits: Vec<Edit>) -> Result<(), EditorError> {
        let targets: Vec<Selection> = edits.iter().map(|e| e.selection).collect();
        validate(&self.text, &targets)?;

        // Back to front so earlier offsets stay valid
        edits.sort_by(|a, b| b.selection.start.cmp(&a.selection.start));

        let mut text = self.text.clone();
        let mut applied = Vec::with_capacity(edits.len());
        for edit in edits.iter() {
            text.replace_range(edit.selection.start..edit.selection.end, &edit.text);
        }

        // Recompute selections so they cover the inserted text
        let mut shift: isize = 0;
        let mut ordered = edits;
        ordered.reverse();
        for edit in ordered {
            let start = (edit.selection.start as isize + shift) as usize;
            let end = start + edit.text.len();
            shift += edit.text.len() as isize - (edit.selection.end - edit.selection.start) as isize;
            applied.push((edit.selection, Selection::new(start, end)));
        }

        self.selections = self
            .selections
            .iter()
            .map(|s| {
                applied
                    .iter()
                    .find(|(old, _)| old == s)
                    .map(|(_, new)| *new)
                    .unwrap_or(*s)
            })
            .collect();
        self.text = text;

        debug!("Applied {} edits", applied.len());
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        debug!("Notification: {:?}", notification);
        self.notifications.push(notification);
    }
}
