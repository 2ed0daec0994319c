use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use symbology::Color;

/// Expression in the renderer's JSON style language.
///
/// Only the handful of operators the symbology needs are exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(Value);

impl Expression {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self(Value::String(text.into()))
    }

    pub fn number(n: f64) -> Self {
        Self(json!(n))
    }

    pub fn color(color: Color) -> Self {
        Self::string(color.to_hex())
    }

    /// `["get", field]`
    pub fn get(field: &str) -> Self {
        Self(json!(["get", field]))
    }

    /// `["var", name]`
    pub fn var(name: &str) -> Self {
        Self(json!(["var", name]))
    }

    /// `["to-string", self]`; null becomes the empty string.
    pub fn stringify(self) -> Self {
        Self(json!(["to-string", self.0]))
    }

    /// `["downcase", self]`
    pub fn downcase(self) -> Self {
        Self(json!(["downcase", self.0]))
    }

    /// `["==", lhs, rhs]`
    pub fn equals(lhs: Self, rhs: Self) -> Self {
        Self(json!(["==", lhs.0, rhs.0]))
    }

    /// `[">=", lhs, rhs]`
    pub fn gte(lhs: Self, rhs: Self) -> Self {
        Self(json!([">=", lhs.0, rhs.0]))
    }

    /// `["index-of", needle, haystack]`
    pub fn index_of(needle: Self, haystack: Self) -> Self {
        Self(json!(["index-of", needle.0, haystack.0]))
    }

    /// True when `needle` occurs in `haystack`.
    pub fn contains(haystack: Self, needle: &str) -> Self {
        Self::gte(
            Self::index_of(Self::string(needle), haystack),
            Self::number(0.0),
        )
    }

    /// `["literal", [items...]]`
    pub fn literal_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<Value> = items.into_iter().map(|s| Value::String(s.into())).collect();
        Self(json!(["literal", items]))
    }

    /// `["in", needle, list]`
    pub fn is_in(needle: Self, list: Self) -> Self {
        Self(json!(["in", needle.0, list.0]))
    }

    /// `["let", name, value, body]`
    pub fn bind(name: &str, value: Self, body: Self) -> Self {
        Self(json!(["let", name, value.0, body.0]))
    }

    /// `["case", cond1, out1, ..., fallback]`
    pub fn case(branches: Vec<(Self, Self)>, fallback: Self) -> Self {
        let mut parts = Vec::with_capacity(branches.len() * 2 + 2);
        parts.push(Value::String("case".to_string()));
        for (condition, output) in branches {
            parts.push(condition.0);
            parts.push(output.0);
        }
        parts.push(fallback.0);
        Self(Value::Array(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::Expression;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn builds_case_insensitive_membership() {
        let field = Expression::get("d_Mang_Type").stringify().downcase();
        let expr = Expression::is_in(field, Expression::literal_list(["federal", "state"]));
        assert_eq!(
            expr.into_value(),
            json!([
                "in",
                ["downcase", ["to-string", ["get", "d_Mang_Type"]]],
                ["literal", ["federal", "state"]]
            ])
        );
    }

    #[test]
    fn case_places_fallback_last() {
        let expr = Expression::case(
            vec![(
                Expression::contains(Expression::var("o"), "blm"),
                Expression::string("#A779E9"),
            )],
            Expression::string("#909090"),
        );
        assert_eq!(
            expr.into_value(),
            json!([
                "case",
                [">=", ["index-of", "blm", ["var", "o"]], 0.0],
                "#A779E9",
                "#909090"
            ])
        );
    }
}
