use crate::core::composer;
use crate::domain::model::{Font, MonogramSpec, OrderDetails, SvgDocument};
use crate::domain::selection::{MonogramDraft, Selection, SelectionChange};
use crate::utils::error::{ProofError, Result};

pub use crate::core::composer::DEFAULT_FONT_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Transient messages shown to the customer until dismissed.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeBoard {
    pub fn post(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let notice = Notice {
            id: self.next_id,
            level,
            message: message.into(),
        };
        tracing::debug!("Notice #{} ({:?}): {}", notice.id, level, notice.message);
        self.notices.push(notice);
        self.next_id
    }

    /// Returns false if the notice was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

/// Everything the form holds for one customer. The composer reads it only
/// through [`ProofSession::compose`], never as ambient state.
#[derive(Debug, Clone)]
pub struct ProofSession {
    pub selection: Selection,
    pub text: String,
    pub notes: String,
    pub font_size: f32,
    pub draft: MonogramDraft,
    pub monogram: Option<MonogramSpec>,
    pub order: OrderDetails,
    pub notices: NoticeBoard,
}

impl Default for ProofSession {
    fn default() -> Self {
        Self {
            selection: Selection::new(),
            text: String::new(),
            notes: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            draft: MonogramDraft::default(),
            monogram: None,
            order: OrderDetails::default(),
            notices: NoticeBoard::default(),
        }
    }
}

impl ProofSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A full selection stays unchanged and a warning notice is posted instead.
    pub fn toggle_font(&mut self, font: &'static Font) -> Option<SelectionChange> {
        match self.selection.toggle(font) {
            Ok(change) => Some(change),
            Err(e) => {
                self.report_as(NoticeLevel::Warning, &e);
                None
            }
        }
    }

    /// Adds `font` unless already selected, then applies `style`. Unlike
    /// [`ProofSession::toggle_font`] this never removes a selected font.
    pub fn select_font(&mut self, font: &'static Font, style: Option<&str>) -> bool {
        if !self.selection.contains(font.name) && self.toggle_font(font).is_none() {
            return false;
        }
        if let Some(style) = style {
            self.set_style(font.name, style);
        }
        true
    }

    pub fn set_style(&mut self, font_name: &str, style: &str) -> bool {
        match self.selection.set_style(font_name, style) {
            Ok(changed) => changed,
            Err(e) => {
                self.report_as(NoticeLevel::Warning, &e);
                false
            }
        }
    }

    pub fn set_initial(&mut self, slot: usize, input: &str) {
        if let Err(e) = self.draft.set_initial(slot, input) {
            self.report_as(NoticeLevel::Warning, &e);
        }
    }

    /// Promotes the draft to the document; incomplete drafts only post a notice.
    pub fn insert_monogram(&mut self) -> bool {
        match self.draft.insert() {
            Ok(spec) => {
                self.monogram = Some(spec);
                true
            }
            Err(e) => {
                self.report_as(NoticeLevel::Warning, &e);
                false
            }
        }
    }

    pub fn clear_monogram(&mut self) {
        self.monogram = None;
    }

    pub fn compose(&self) -> Result<SvgDocument> {
        composer::compose(
            self.monogram.as_ref(),
            &self.selection,
            &self.text,
            &self.notes,
            self.font_size,
        )
    }

    pub fn report(&mut self, err: &ProofError) -> u64 {
        self.report_as(NoticeLevel::Error, err)
    }

    fn report_as(&mut self, level: NoticeLevel, err: &ProofError) -> u64 {
        self.notices.post(level, err.user_friendly_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CATALOG;

    #[test]
    fn test_fourth_font_posts_notice() {
        let mut session = ProofSession::new();
        for font in &CATALOG[..3] {
            assert_eq!(session.toggle_font(font), Some(SelectionChange::Added));
        }

        assert_eq!(session.toggle_font(&CATALOG[3]), None);
        assert_eq!(session.selection.len(), 3);
        assert!(!session.selection.contains(CATALOG[3].name));

        let notices: Vec<_> = session.notices.iter().collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(notices[0].message.contains("up to 3 fonts"));
    }

    #[test]
    fn test_selecting_a_selected_font_only_changes_style() {
        let montserrat = crate::domain::catalog::find_font("Montserrat").unwrap();
        let mut session = ProofSession::new();

        assert!(session.select_font(montserrat, None));
        assert!(session.select_font(montserrat, Some("Bold")));
        assert!(session.selection.contains("Montserrat"));
        assert_eq!(session.selection.len(), 1);
        let entry = session.selection.iter().next().unwrap();
        assert_eq!(entry.style.label, "Bold");
        assert!(session.notices.is_empty());
    }

    #[test]
    fn test_notices_can_be_dismissed() {
        let mut board = NoticeBoard::default();
        let first = board.post(NoticeLevel::Info, "one");
        let second = board.post(NoticeLevel::Error, "two");

        assert!(board.dismiss(first));
        assert!(!board.dismiss(first));
        assert_eq!(board.len(), 1);
        assert_eq!(board.drain()[0].id, second);
        assert!(board.is_empty());
    }

    #[test]
    fn test_incomplete_monogram_is_not_inserted() {
        let mut session = ProofSession::new();
        session.set_initial(0, "A");
        session.set_initial(1, "B");

        assert!(!session.insert_monogram());
        assert!(session.monogram.is_none());
        assert_eq!(session.notices.len(), 1);

        session.set_initial(2, "C");
        assert!(session.insert_monogram());
        assert!(session.compose().is_ok());

        session.clear_monogram();
        assert!(matches!(session.compose(), Err(ProofError::EmptyInput)));
    }

    #[test]
    fn test_compose_reads_session_fields() {
        let mut session = ProofSession::new();
        assert!(matches!(session.compose(), Err(ProofError::EmptyInput)));

        session.toggle_font(&CATALOG[0]);
        session.text = "Happy birthday".to_string();
        session.font_size = 48.0;
        let doc = session.compose().unwrap();
        assert!(doc.markup.contains(">Happy birthday<"));
        assert!(doc.markup.contains(r#"font-size="48""#));
    }
}
