use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::predicate::Predicate;
use crate::entity::EntityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

/// Caller context established by the authentication layer.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub id: Uuid,
    pub role: Role,
}

impl CallerIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Mandatory predicates attached per entity type, never per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeRule {
    /// Column bound to the caller id for non-administrative callers.
    pub owner_field: Option<&'static str>,
    /// Soft-delete marker column; rows with it set never appear.
    pub soft_delete_field: Option<&'static str>,
}

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Caller identity required to search {0}")]
    IdentityRequired(&'static str),
}

pub struct ScopeInjector;

impl ScopeInjector {
    /// Merge the entity scope rule into a compiled predicate list.
    ///
    /// The ownership predicate overwrites any caller-supplied value on the
    /// owner field; a caller cannot read another principal's rows by naming
    /// a different id there. Administrators skip the ownership predicate but
    /// still get soft-delete exclusion.
    pub fn inject(
        entity: &EntityConfig,
        caller: Option<&CallerIdentity>,
        predicates: &mut Vec<Predicate>,
    ) -> Result<(), ScopeError> {
        if let Some(marker) = entity.scope.soft_delete_field {
            predicates.push(Predicate::Equals {
                field: marker.to_string(),
                value: Value::Null,
            });
        }

        let Some(owner_field) = entity.scope.owner_field else {
            return Ok(());
        };

        let caller = caller.ok_or(ScopeError::IdentityRequired(entity.collection))?;
        if caller.is_admin() {
            return Ok(());
        }

        let before = predicates.len();
        predicates.retain(|p| p.field() != Some(owner_field));
        if predicates.len() != before {
            tracing::warn!(
                collection = entity.collection,
                caller = %caller.id,
                field = owner_field,
                "caller-supplied owner filter overridden by scope rule"
            );
        }

        predicates.push(Predicate::Equals {
            field: owner_field.to_string(),
            value: Value::String(caller.id.to_string()),
        });
        Ok(())
    }
}
