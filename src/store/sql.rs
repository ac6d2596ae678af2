//! Predicate-list to SQL translation. Pure string assembly, no connection.

use serde_json::Value;

use super::StoreError;
use crate::search::predicate::Predicate;
use crate::search::types::SortSpec;

#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<Value>,
}

pub fn count_sql(table: &str, predicates: &[Predicate]) -> Result<SqlQuery, StoreError> {
    validate_identifier(table)?;
    let mut builder = WhereBuilder::new();
    let clause = builder.build(predicates)?;
    let text = if clause.is_empty() {
        format!("SELECT COUNT(*) AS count FROM \"{}\"", table)
    } else {
        format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", table, clause)
    };
    Ok(SqlQuery { text, params: builder.params })
}

pub fn select_sql(
    table: &str,
    predicates: &[Predicate],
    sort: &SortSpec,
    skip: i64,
    limit: i64,
) -> Result<SqlQuery, StoreError> {
    validate_identifier(table)?;
    validate_identifier(&sort.field)?;

    let mut builder = WhereBuilder::new();
    let clause = builder.build(predicates)?;

    // Secondary id sort keeps page boundaries stable when the primary key
    // has duplicates.
    let order = if sort.field == "id" {
        format!("ORDER BY \"id\" {}", sort.direction.as_sql())
    } else {
        format!(
            "ORDER BY \"{}\" {}, \"id\" ASC",
            sort.field,
            sort.direction.as_sql()
        )
    };

    let text = [
        format!("SELECT * FROM \"{}\"", table),
        if clause.is_empty() { String::new() } else { format!("WHERE {}", clause) },
        order,
        format!("LIMIT {} OFFSET {}", limit.max(0), skip.max(0)),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    Ok(SqlQuery { text, params: builder.params })
}

struct WhereBuilder {
    params: Vec<Value>,
}

impl WhereBuilder {
    fn new() -> Self {
        Self { params: vec![] }
    }

    fn build(&mut self, predicates: &[Predicate]) -> Result<String, StoreError> {
        let mut conditions = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            conditions.push(self.condition(predicate)?);
        }
        Ok(conditions.join(" AND "))
    }

    fn condition(&mut self, predicate: &Predicate) -> Result<String, StoreError> {
        match predicate {
            Predicate::Equals { field, value } => {
                validate_identifier(field)?;
                if value.is_null() {
                    Ok(format!("\"{}\" IS NULL", field))
                } else {
                    Ok(format!("\"{}\" = {}", field, self.param(value.clone())))
                }
            }
            Predicate::Range { field, from, to } => {
                validate_identifier(field)?;
                let mut parts = vec![];
                if let Some(from) = from {
                    parts.push(format!("\"{}\" >= {}", field, self.param(from.clone())));
                }
                if let Some(to) = to {
                    parts.push(format!("\"{}\" <= {}", field, self.param(to.clone())));
                }
                if parts.is_empty() {
                    // the compiler never emits an unbounded range, but an
                    // empty condition must not corrupt the clause join
                    return Ok("1=1".to_string());
                }
                Ok(parts.join(" AND "))
            }
            Predicate::Contains { field, substring } => {
                validate_identifier(field)?;
                let pattern = like_pattern(substring);
                Ok(format!("\"{}\" LIKE {}", field, self.param(Value::String(pattern))))
            }
            Predicate::In { field, values } => {
                validate_identifier(field)?;
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }
                let placeholders: Vec<String> =
                    values.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("\"{}\" IN ({})", field, placeholders.join(", ")))
            }
            Predicate::MatchesAny { fields, substring } => {
                let pattern = like_pattern(substring);
                let mut parts = Vec::with_capacity(fields.len());
                for field in fields {
                    validate_identifier(field)?;
                    parts.push(format!(
                        "\"{}\" LIKE {}",
                        field,
                        self.param(Value::String(pattern.clone()))
                    ));
                }
                Ok(format!("({})", parts.join(" OR ")))
            }
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

/// Substring match: escape LIKE metacharacters, then wrap in wildcards.
fn like_pattern(substring: &str) -> String {
    let escaped = substring
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::SortDirection;
    use serde_json::json;

    fn sort(field: &str, direction: SortDirection) -> SortSpec {
        SortSpec { field: field.to_string(), direction }
    }

    #[test]
    fn select_assembles_where_order_limit() {
        let predicates = vec![
            Predicate::Equals { field: "status".to_string(), value: json!("active") },
            Predicate::Range {
                field: "amount".to_string(),
                from: Some(json!(100)),
                to: Some(json!(500)),
            },
        ];
        let sql = select_sql("orders", &predicates, &sort("placed_at", SortDirection::Desc), 20, 10)
            .unwrap();
        assert_eq!(
            sql.text,
            "SELECT * FROM \"orders\" WHERE \"status\" = $1 AND \"amount\" >= $2 AND \"amount\" <= $3 \
             ORDER BY \"placed_at\" DESC, \"id\" ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![json!("active"), json!(100), json!(500)]);
    }

    #[test]
    fn null_equality_renders_is_null() {
        let predicates = vec![Predicate::Equals {
            field: "deleted_at".to_string(),
            value: Value::Null,
        }];
        let sql = count_sql("orders", &predicates).unwrap();
        assert_eq!(
            sql.text,
            "SELECT COUNT(*) AS count FROM \"orders\" WHERE \"deleted_at\" IS NULL"
        );
        assert!(sql.params.is_empty());
    }

    #[test]
    fn empty_in_set_matches_nothing() {
        let predicates = vec![Predicate::In { field: "status".to_string(), values: vec![] }];
        let sql = count_sql("orders", &predicates).unwrap();
        assert_eq!(sql.text, "SELECT COUNT(*) AS count FROM \"orders\" WHERE 1=0");
    }

    #[test]
    fn free_text_composite_is_one_or_group() {
        let predicates = vec![Predicate::MatchesAny {
            fields: vec!["name".to_string(), "description".to_string()],
            substring: "50%_off".to_string(),
        }];
        let sql = count_sql("products", &predicates).unwrap();
        assert_eq!(
            sql.text,
            "SELECT COUNT(*) AS count FROM \"products\" WHERE (\"name\" LIKE $1 OR \"description\" LIKE $2)"
        );
        // metacharacters escaped before wrapping
        assert_eq!(sql.params[0], json!("%50\\%\\_off%"));
    }

    #[test]
    fn hostile_identifier_is_rejected() {
        let predicates = vec![Predicate::Equals {
            field: "status\"; DROP TABLE orders; --".to_string(),
            value: json!("x"),
        }];
        let err = count_sql("orders", &predicates).unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
    }
}
