use uuid::Uuid;

use crate::database::models::OwnedResource;
use crate::database::ResourceStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// The single response for "does not exist", "not yours" and "not an id"
pub fn not_found<R: OwnedResource>() -> ApiError {
    ApiError::not_found(format!("{} not found", R::LABEL))
}

/// Parse a path id; anything that is not a UUID reads as a missing record
pub fn parse_resource_id<R: OwnedResource>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found::<R>())
}

/// Load a record only if the principal owns it
pub async fn authorize_ownership<R: OwnedResource>(
    principal: AuthUser,
    raw_id: &str,
    store: &dyn ResourceStore<R>,
) -> Result<R, ApiError> {
    let id = parse_resource_id::<R>(raw_id)?;
    store
        .find_one_if_owned(id, principal.user_id)
        .await?
        .ok_or_else(not_found::<R>)
}
