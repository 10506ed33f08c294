use crate::domain::model::{Font, FontCategory, FontStyle};

/// Family used for the circular monogram mode.
pub const CIRCULAR_MONOGRAM_FAMILY: &str = "'Circle Monogram', serif";

pub static CATALOG: &[Font] = &[
    Font {
        name: "Playfair Display",
        category: FontCategory::Serif,
        styles: &[
            FontStyle::new("Regular", "'Playfair Display', serif"),
            FontStyle::new("Italic", "'Playfair Display Italic', serif"),
            FontStyle::new("Bold", "'Playfair Display Bold', serif"),
        ],
    },
    Font {
        name: "Cormorant Garamond",
        category: FontCategory::Serif,
        styles: &[
            FontStyle::new("Regular", "'Cormorant Garamond', serif"),
            FontStyle::new("Light", "'Cormorant Garamond Light', serif"),
            FontStyle::new("Italic", "'Cormorant Garamond Italic', serif"),
        ],
    },
    Font {
        name: "Montserrat",
        category: FontCategory::Sans,
        styles: &[
            FontStyle::new("Regular", "'Montserrat', sans-serif"),
            FontStyle::new("Light", "'Montserrat Light', sans-serif"),
            FontStyle::new("Bold", "'Montserrat Bold', sans-serif"),
        ],
    },
    Font {
        name: "Josefin Sans",
        category: FontCategory::Sans,
        styles: &[
            FontStyle::new("Regular", "'Josefin Sans', sans-serif"),
            FontStyle::new("Thin", "'Josefin Sans Thin', sans-serif"),
        ],
    },
    Font {
        name: "Great Vibes",
        category: FontCategory::Script,
        styles: &[FontStyle::new("Regular", "'Great Vibes', cursive")],
    },
    Font {
        name: "Parisienne",
        category: FontCategory::Script,
        styles: &[FontStyle::new("Regular", "'Parisienne', cursive")],
    },
    Font {
        name: "Cinzel Decorative",
        category: FontCategory::Display,
        styles: &[
            FontStyle::new("Regular", "'Cinzel Decorative', serif"),
            FontStyle::new("Bold", "'Cinzel Decorative Bold', serif"),
        ],
    },
    Font {
        name: "Interlock Monogram",
        category: FontCategory::Monogram,
        styles: &[
            FontStyle::new("Classic", "'Interlock Monogram', serif"),
            FontStyle::new("Vine", "'Interlock Monogram Vine', serif"),
        ],
    },
];

pub fn find_font(name: &str) -> Option<&'static Font> {
    CATALOG.iter().find(|f| f.name == name)
}

pub fn fonts_in(category: FontCategory) -> impl Iterator<Item = &'static Font> {
    CATALOG.iter().filter(move |f| f.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_font_has_a_default_style() {
        for font in CATALOG {
            assert!(!font.styles.is_empty(), "{} has no styles", font.name);
        }
    }

    #[test]
    fn test_font_names_are_unique() {
        let mut names: Vec<&str> = CATALOG.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_find_font_is_case_sensitive() {
        assert!(find_font("Montserrat").is_some());
        assert!(find_font("montserrat").is_none());
        assert_eq!(fonts_in(FontCategory::Script).count(), 2);
    }
}
