//! Authorization gate: decides, once per request, whether the resolved actor may
//! reach a handler that declares an optional required permission.

use thiserror::Error;

use super::actor::Actor;
use super::permission::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    /// No actor could be resolved from the request credential
    #[error("Unauthenticated.")]
    Unauthenticated,

    /// The actor's role lacks the permission the route declares
    #[error("This action is unauthorized.")]
    Forbidden { required: Permission },
}

/// Allow iff an actor is present and, when `required` is set, its role grants it.
pub fn authorize(actor: Option<&Actor>, required: Option<Permission>) -> Result<(), GateError> {
    let actor = actor.ok_or(GateError::Unauthenticated)?;
    match required {
        Some(permission) if !actor.can(permission) => Err(GateError::Forbidden { required: permission }),
        _ => Ok(()),
    }
}
