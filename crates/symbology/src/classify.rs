use crate::alias::first_alias_match;
use crate::category::Category;
use crate::color::Color;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub color: Color,
}

impl From<Category> for Classification {
    fn from(category: Category) -> Self {
        Self {
            category,
            color: category.color(),
        }
    }
}

/// Normalized form of a raw ownership attribute: missing becomes empty,
/// everything is lower-cased, whitespace is left alone.
pub fn normalize(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_lowercase()
}

/// Classifies a raw ownership attribute.
///
/// Total over all inputs:
/// 1. an exact (case-insensitive) canonical label wins outright;
/// 2. otherwise the first alias rule whose pattern occurs in the value;
/// 3. otherwise, including the empty string, [`Category::Unknown`].
pub fn classify<'a>(raw: impl Into<Option<&'a str>>) -> Classification {
    let normalized = normalize(raw.into());
    classify_normalized(&normalized).into()
}

fn classify_normalized(normalized: &str) -> Category {
    if normalized.is_empty() {
        return Category::Unknown;
    }
    if let Some(category) = Category::from_label(normalized) {
        return category;
    }
    first_alias_match(normalized)
        .map(|rule| rule.category)
        .unwrap_or(Category::Unknown)
}

#[cfg(test)]
mod tests {
    use super::{classify, normalize};
    use crate::category::Category;
    use crate::color::Color;

    fn category_of(raw: &str) -> Category {
        classify(raw).category
    }

    #[test]
    fn canonical_labels_match_in_any_case() {
        for category in Category::ALL {
            assert_eq!(category_of(category.label()), category);
            assert_eq!(category_of(&category.label().to_uppercase()), category);
        }
        assert_eq!(category_of("FEDERAL"), Category::Federal);
    }

    #[test]
    fn exact_label_wins_where_aliases_would_miss() {
        // No alias pattern occurs in "local government".
        assert_eq!(category_of("LOCAL GOVERNMENT"), Category::LocalGovernment);
    }

    #[test]
    fn first_declared_alias_wins() {
        assert_eq!(category_of("Las Animas County Water District"), Category::LocalGovernment);
        assert_eq!(category_of("United States Forest Service"), Category::Federal);
        assert_eq!(category_of("Joint Federal/State"), Category::Federal);
    }

    #[test]
    fn substring_matching_is_not_word_aware() {
        assert_eq!(category_of("Colorado State University"), Category::State);
        assert_eq!(category_of("Bureau of Reclamation"), Category::Federal);
        assert_eq!(category_of("The Nature Conservancy"), Category::NonGovernmentalOrganization);
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        assert_eq!(normalize(Some(" Private ")), " private ");
        // Falls through to the alias rule rather than the exact label.
        assert_eq!(category_of(" Private "), Category::Private);
    }

    #[test]
    fn empty_missing_and_garbled_values_are_unknown() {
        let unknown = Color::hex(0x909090);
        assert_eq!(classify("").category, Category::Unknown);
        assert_eq!(classify(None).category, Category::Unknown);
        assert_eq!(classify("qqq").category, Category::Unknown);
        assert_eq!(classify("qqq").color, unknown);
    }

    #[test]
    fn color_follows_category() {
        let hit = classify("BLM");
        assert_eq!(hit.category, Category::Federal);
        assert_eq!(hit.color, Category::Federal.color());
    }
}
