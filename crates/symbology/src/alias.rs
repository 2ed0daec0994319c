use crate::category::Category;

/// Substring fallback mapping a variant agency name onto a category.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AliasRule {
    /// Lower-case substring; matched anywhere, not on word boundaries.
    pub pattern: &'static str,
    pub category: Category,
}

impl AliasRule {
    pub const fn new(pattern: &'static str, category: Category) -> Self {
        Self { pattern, category }
    }

    pub fn matches(&self, normalized: &str) -> bool {
        normalized.contains(self.pattern)
    }
}

const fn rule(pattern: &'static str, category: Category) -> AliasRule {
    AliasRule::new(pattern, category)
}

/// Alias rules in priority order. The first matching rule wins, so a broad
/// pattern listed early (e.g. `state`) shadows later, more specific ones.
pub const ALIAS_RULES: &[AliasRule] = &[
    rule("american indian", Category::AmericanIndianLands),
    rule("tribal", Category::AmericanIndianLands),
    rule("ute", Category::AmericanIndianLands),
    rule("blm", Category::Federal),
    rule("bureau of land", Category::Federal),
    rule("usfs", Category::Federal),
    rule("forest service", Category::Federal),
    rule("nps", Category::Federal),
    rule("park service", Category::Federal),
    rule("fws", Category::Federal),
    rule("fish and wildlife", Category::Federal),
    // Misspelled "bureau" shows up in the source data.
    rule("burea", Category::Federal),
    rule("federal", Category::Federal),
    rule("state", Category::State),
    rule("colorado parks and wildlife", Category::State),
    rule("cpw", Category::State),
    rule("state land board", Category::State),
    rule("county", Category::LocalGovernment),
    rule("city", Category::LocalGovernment),
    rule("town", Category::LocalGovernment),
    rule("municipal", Category::LocalGovernment),
    rule("ngo", Category::NonGovernmentalOrganization),
    rule("non-governmental", Category::NonGovernmentalOrganization),
    rule("conservancy", Category::NonGovernmentalOrganization),
    rule("land trust", Category::NonGovernmentalOrganization),
    rule("trust", Category::NonGovernmentalOrganization),
    rule("private", Category::Private),
    rule("district", Category::RegionalAgencySpecialDistrict),
    rule("authority", Category::RegionalAgencySpecialDistrict),
    rule("metro", Category::RegionalAgencySpecialDistrict),
    rule("water", Category::RegionalAgencySpecialDistrict),
    rule("joint", Category::Joint),
    rule("unknown", Category::Unknown),
];

/// First rule (in declared order) whose pattern occurs in `normalized`.
pub fn first_alias_match(normalized: &str) -> Option<&'static AliasRule> {
    ALIAS_RULES.iter().find(|rule| rule.matches(normalized))
}
