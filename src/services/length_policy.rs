use serde::Serialize;

/// Output length limits passed to the summarizer, in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LengthBounds {
    pub max_length: u32,
    pub min_length: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SummaryLength {
    /// Initial selection in the UI.
    #[default]
    Short,
    Medium,
    Detailed,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown summary length label: {0:?}")]
pub struct UnknownLengthLabel(pub String);

impl SummaryLength {
    /// Every selectable option, in the order the UI lists them.
    pub const ALL: [SummaryLength; 3] = [
        SummaryLength::Short,
        SummaryLength::Medium,
        SummaryLength::Detailed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SummaryLength::Short => "Short (2-3 paragraphs)",
            SummaryLength::Medium => "Medium (5 paragraphs)",
            SummaryLength::Detailed => "Detailed (8+ paragraphs)",
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Detailed => "detailed",
        }
    }

    pub fn bounds(&self) -> LengthBounds {
        let (max_length, min_length) = match self {
            SummaryLength::Short => (150, 60),
            SummaryLength::Medium => (250, 100),
            SummaryLength::Detailed => (350, 150),
        };
        LengthBounds {
            max_length,
            min_length,
        }
    }

    /// Accepts the full UI label or the bare keyword (`short`, `Medium`, ...).
    pub fn from_label(label: &str) -> Result<Self, UnknownLengthLabel> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.label() == label || l.keyword().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownLengthLabel(label.to_string()))
    }
}

/// Resolves a UI label straight to its bounds.
pub fn resolve(label: &str) -> Result<LengthBounds, UnknownLengthLabel> {
    SummaryLength::from_label(label).map(|l| l.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert_eq!(
            resolve("Short (2-3 paragraphs)").unwrap(),
            LengthBounds { max_length: 150, min_length: 60 }
        );
        assert_eq!(
            resolve("Medium (5 paragraphs)").unwrap(),
            LengthBounds { max_length: 250, min_length: 100 }
        );
        assert_eq!(
            resolve("Detailed (8+ paragraphs)").unwrap(),
            LengthBounds { max_length: 350, min_length: 150 }
        );
    }

    #[test]
    fn test_every_option_resolves_to_ordered_bounds() {
        for length in SummaryLength::ALL {
            let bounds = resolve(length.label()).unwrap();
            assert!(bounds.max_length > bounds.min_length);
            assert!(bounds.min_length > 0);
        }
    }

    #[test]
    fn test_keywords_accepted() {
        assert_eq!(SummaryLength::from_label("Short").unwrap(), SummaryLength::Short);
        assert_eq!(SummaryLength::from_label("medium").unwrap(), SummaryLength::Medium);
        assert_eq!(
            SummaryLength::from_label(" DETAILED ").unwrap(),
            SummaryLength::Detailed
        );
    }

    #[test]
    fn test_unknown_label_fails() {
        let err = SummaryLength::from_label("Epic (20 paragraphs)").unwrap_err();
        assert_eq!(err.0, "Epic (20 paragraphs)");
        assert!(resolve("").is_err());
    }
}
