use super::types::{SortDirection, SortSpec};
use crate::entity::EntityConfig;

pub struct SortResolver;

impl SortResolver {
    /// Validate the requested sort against the entity allow-list.
    ///
    /// An unrecognized field is not an error: it silently resolves to the
    /// entity default. Direction must be exactly `asc` or `desc`; anything
    /// else (including absent) resolves to the default direction.
    pub fn resolve(
        entity: &EntityConfig,
        requested_field: Option<&str>,
        requested_direction: Option<&str>,
    ) -> SortSpec {
        let field = match requested_field {
            Some(f) if entity.sort_allow_list.iter().any(|allowed| *allowed == f) => f,
            Some(f) => {
                tracing::debug!(
                    collection = entity.collection,
                    requested = f,
                    fallback = entity.default_sort.field,
                    "sort field not in allow-list, using default"
                );
                entity.default_sort.field
            }
            None => entity.default_sort.field,
        };

        let direction = match requested_direction {
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            _ => entity.default_sort.direction,
        };

        SortSpec {
            field: field.to_string(),
            direction,
        }
    }
}
