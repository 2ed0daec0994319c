use layers::paint::normalized_attribute;
use layers::{Expression, OWNERSHIP_FIELD};
use selection::CategorySet;

/// Renderer filter for the ownership layers, or `None` (show everything)
/// when every category is enabled.
///
/// Membership is tested against the lower-cased canonical labels only.
/// Values that classify through an alias rule are not individually
/// selectable here: the style language has no cheap way to run the whole
/// ordered alias list inside a filter.
pub fn ownership_filter(categories: &CategorySet) -> Option<Expression> {
    if categories.is_full() {
        return None;
    }
    Some(Expression::is_in(
        normalized_attribute(OWNERSHIP_FIELD),
        Expression::literal_list(categories.iter().map(|c| c.canonical_key())),
    ))
}
