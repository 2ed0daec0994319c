use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Canonical land-ownership category.
///
/// The declaration order is the legend order and the bit order used by
/// category sets; it never changes at runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    AmericanIndianLands,
    Federal,
    Joint,
    LocalGovernment,
    NonGovernmentalOrganization,
    Private,
    RegionalAgencySpecialDistrict,
    State,
    Unknown,
}

impl Category {
    pub const COUNT: usize = 9;

    pub const ALL: [Category; Category::COUNT] = [
        Category::AmericanIndianLands,
        Category::Federal,
        Category::Joint,
        Category::LocalGovernment,
        Category::NonGovernmentalOrganization,
        Category::Private,
        Category::RegionalAgencySpecialDistrict,
        Category::State,
        Category::Unknown,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::AmericanIndianLands => "American Indian Lands",
            Category::Federal => "Federal",
            Category::Joint => "Joint",
            Category::LocalGovernment => "Local Government",
            Category::NonGovernmentalOrganization => "Non-Governmental Organization",
            Category::Private => "Private",
            Category::RegionalAgencySpecialDistrict => "Regional Agency Special District",
            Category::State => "State",
            Category::Unknown => "Unknown",
        }
    }

    /// Lower-cased label, the form raw attributes are compared against.
    pub const fn canonical_key(self) -> &'static str {
        match self {
            Category::AmericanIndianLands => "american indian lands",
            Category::Federal => "federal",
            Category::Joint => "joint",
            Category::LocalGovernment => "local government",
            Category::NonGovernmentalOrganization => "non-governmental organization",
            Category::Private => "private",
            Category::RegionalAgencySpecialDistrict => "regional agency special district",
            Category::State => "state",
            Category::Unknown => "unknown",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Category::AmericanIndianLands => Color::hex(0xE07AAE),
            Category::Federal => Color::hex(0xA779E9),
            Category::Joint => Color::hex(0x6FB8FF),
            Category::LocalGovernment => Color::hex(0xFF2B2B),
            Category::NonGovernmentalOrganization => Color::hex(0xB7C400),
            Category::Private => Color::hex(0x46E0C0),
            Category::RegionalAgencySpecialDistrict => Color::hex(0x17B657),
            Category::State => Color::hex(0xE3A455),
            Category::Unknown => Color::hex(0x909090),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exact, case-insensitive lookup by canonical label.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.canonical_key() == key)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn keys_are_lowercased_labels() {
        for category in Category::ALL {
            assert_eq!(category.canonical_key(), category.label().to_lowercase());
        }
    }

    #[test]
    fn index_follows_declaration_order() {
        for (i, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn from_label_ignores_case_but_not_whitespace() {
        assert_eq!(Category::from_label("LOCAL GOVERNMENT"), Some(Category::LocalGovernment));
        assert_eq!(Category::from_label(" federal"), None);
    }
}
