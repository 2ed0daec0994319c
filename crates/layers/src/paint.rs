use symbology::{ALIAS_RULES, Category, Color};

use crate::expression::Expression;

const VALUE_VAR: &str = "o";

/// Lower-cased, stringified attribute; null reads as the empty string.
pub fn normalized_attribute(field: &str) -> Expression {
    Expression::get(field).stringify().downcase()
}

/// Renderer-side twin of [`symbology::classify`]: colors each feature by
/// its ownership attribute with the same precedence (empty value, exact
/// labels, alias substrings in declared order, Unknown).
pub fn ownership_fill_color(field: &str) -> Expression {
    let value = || Expression::var(VALUE_VAR);
    let color = |c: Color| Expression::color(c);

    let mut branches = Vec::with_capacity(1 + Category::COUNT + ALIAS_RULES.len());
    branches.push((
        Expression::equals(value(), Expression::string("")),
        color(Category::Unknown.color()),
    ));
    for category in Category::ALL {
        branches.push((
            Expression::equals(value(), Expression::string(category.canonical_key())),
            color(category.color()),
        ));
    }
    for rule in ALIAS_RULES {
        branches.push((
            Expression::contains(value(), rule.pattern),
            color(rule.category.color()),
        ));
    }

    Expression::bind(
        VALUE_VAR,
        normalized_attribute(field),
        Expression::case(branches, color(Category::Unknown.color())),
    )
}

#[cfg(test)]
mod tests {
    use super::ownership_fill_color;
    use serde_json::{Value, json};
    use symbology::{ALIAS_RULES, Category};

    fn case_arms(expr: &Value) -> &[Value] {
        let body = &expr.as_array().expect("let")[3];
        body.as_array().expect("case").as_slice()
    }

    #[test]
    fn binds_normalized_attribute() {
        let expr = ownership_fill_color("d_Mang_Type").into_value();
        let parts = expr.as_array().expect("let");
        assert_eq!(parts[0], json!("let"));
        assert_eq!(parts[1], json!("o"));
        assert_eq!(parts[2], json!(["downcase", ["to-string", ["get", "d_Mang_Type"]]]));
    }

    #[test]
    fn exact_labels_precede_aliases() {
        let expr = ownership_fill_color("d_Mang_Type").into_value();
        let arms = case_arms(&expr);
        // "case", empty check (2), then one pair per category.
        assert_eq!(arms[3], json!(["==", ["var", "o"], "american indian lands"]));
        assert_eq!(arms[4], json!("#E07AAE"));
        let first_alias = 3 + Category::COUNT * 2;
        assert_eq!(arms[first_alias], json!([">=", ["index-of", "american indian", ["var", "o"]], 0.0]));
        assert_eq!(arms.len(), 1 + 2 + Category::COUNT * 2 + ALIAS_RULES.len() * 2 + 1);
    }

    #[test]
    fn fallback_is_unknown_color() {
        let expr = ownership_fill_color("d_Mang_Type").into_value();
        let arms = case_arms(&expr);
        assert_eq!(arms.last(), Some(&json!("#909090")));
    }
}
