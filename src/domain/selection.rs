use crate::domain::model::{Font, FrameStyle, MonogramMode, MonogramSpec, SelectedFont};
use crate::utils::error::{ProofError, Result};

pub const MAX_SELECTED_FONTS: usize = 3;
pub const DEFAULT_MONOGRAM_SIZE: f32 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
}

/// Ordered set of up to three fonts, unique by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    entries: Vec<SelectedFont>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `font` if already selected, otherwise appends it with its default style.
    /// A full selection is never mutated.
    pub fn toggle(&mut self, font: &'static Font) -> Result<SelectionChange> {
        if let Some(pos) = self.position(font.name) {
            self.entries.remove(pos);
            return Ok(SelectionChange::Removed);
        }

        if self.entries.len() >= MAX_SELECTED_FONTS {
            return Err(ProofError::SelectionFull {
                max: MAX_SELECTED_FONTS,
            });
        }

        self.entries.push(SelectedFont::new(font));
        Ok(SelectionChange::Added)
    }

    /// Returns `Ok(false)` when `font_name` is not part of the selection.
    pub fn set_style(&mut self, font_name: &str, style_label: &str) -> Result<bool> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.font.name == font_name) else {
            return Ok(false);
        };

        let style = entry
            .font
            .style(style_label)
            .ok_or_else(|| ProofError::UnknownStyle {
                font: font_name.to_string(),
                style: style_label.to_string(),
            })?;
        entry.style = style;
        Ok(true)
    }

    pub fn contains(&self, font_name: &str) -> bool {
        self.position(font_name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedFont> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, font_name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.font.name == font_name)
    }
}

/// Monogram being edited. Becomes a [`MonogramSpec`] only once all three initials are set.
#[derive(Debug, Clone, PartialEq)]
pub struct MonogramDraft {
    slots: [Option<char>; 3],
    pub mode: MonogramMode,
    pub size: f32,
    pub frame: Option<FrameStyle>,
    pub uniform_scale: bool,
}

impl MonogramDraft {
    pub fn new(mode: MonogramMode) -> Self {
        Self {
            slots: [None; 3],
            mode,
            size: DEFAULT_MONOGRAM_SIZE,
            frame: None,
            uniform_scale: false,
        }
    }

    /// Sets slot 0..=2 from the first non-whitespace character of `input`; blank input clears it.
    pub fn set_initial(&mut self, slot: usize, input: &str) -> Result<()> {
        let Some(target) = self.slots.get_mut(slot) else {
            return Err(ProofError::BadRequest {
                message: format!("monogram slot {} out of range", slot),
            });
        };
        *target = input.chars().find(|c| !c.is_whitespace());
        Ok(())
    }

    pub fn initials(&self) -> [Option<char>; 3] {
        self.slots
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn insert(&self) -> Result<MonogramSpec> {
        let [Some(left), Some(middle), Some(right)] = self.slots else {
            return Err(ProofError::IncompleteMonogram);
        };

        Ok(MonogramSpec {
            initials: [left, middle, right],
            mode: self.mode,
            size: self.size,
            frame: self.frame,
            uniform_scale: self.uniform_scale,
        })
    }
}

impl Default for MonogramDraft {
    fn default() -> Self {
        Self::new(MonogramMode::Circular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{find_font, CATALOG};

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = Selection::new();
        let font = &CATALOG[0];

        assert_eq!(selection.toggle(font).unwrap(), SelectionChange::Added);
        assert!(selection.contains(font.name));
        assert_eq!(selection.toggle(font).unwrap(), SelectionChange::Removed);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_fourth_font_leaves_selection_unchanged() {
        let mut selection = Selection::new();
        for font in &CATALOG[..3] {
            selection.toggle(font).unwrap();
        }
        let before = selection.clone();

        let err = selection.toggle(&CATALOG[3]).unwrap_err();
        assert!(matches!(err, ProofError::SelectionFull { max: 3 }));
        assert_eq!(selection, before);
    }

    #[test]
    fn test_set_style_switches_family() {
        let mut selection = Selection::new();
        let font = find_font("Montserrat").unwrap();
        selection.toggle(font).unwrap();

        assert!(selection.set_style("Montserrat", "Bold").unwrap());
        let entry = selection.iter().next().unwrap();
        assert_eq!(entry.style.label, "Bold");
        assert_eq!(entry.label(), "Montserrat (Bold)");

        assert!(matches!(
            selection.set_style("Montserrat", "Oblique"),
            Err(ProofError::UnknownStyle { .. })
        ));
        assert!(!selection.set_style("Great Vibes", "Regular").unwrap());
    }

    #[test]
    fn test_monogram_requires_three_initials() {
        let mut draft = MonogramDraft::default();
        draft.set_initial(0, "A").unwrap();
        draft.set_initial(1, "  b").unwrap();
        assert!(matches!(draft.insert(), Err(ProofError::IncompleteMonogram)));

        draft.set_initial(2, "C").unwrap();
        let spec = draft.insert().unwrap();
        assert_eq!(spec.initials, ['A', 'b', 'C']);

        draft.set_initial(2, "   ").unwrap();
        assert!(!draft.is_complete());
        assert!(draft.set_initial(3, "D").is_err());
    }
}
