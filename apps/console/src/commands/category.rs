//! # Category Commands

use stockroom_core::{Capability, Category, CoreError};
use stockroom_db::{Database, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::input::Target;
use crate::state::authorize;

pub async fn list_categories(db: &Database, session: &Session) -> Result<Vec<Category>, ApiError> {
    authorize(session, Capability::ViewCatalog)?;
    debug!("list_categories command");
    Ok(db.categories().list_all().await?)
}

pub async fn search_categories(
    db: &Database,
    session: &Session,
    term: &str,
) -> Result<Vec<Category>, ApiError> {
    authorize(session, Capability::ViewCatalog)?;
    debug!(term = %term.trim(), "search_categories command");
    Ok(db.categories().search(term.trim()).await?)
}

/// Gets one category by id or exact name.
pub async fn get_category(
    db: &Database,
    session: &Session,
    target: &Target,
) -> Result<Category, ApiError> {
    authorize(session, Capability::ViewCatalog)?;
    match target {
        Target::Id(id) => Ok(db.categories().get_by_id(*id).await?),
        Target::Name(name) => db
            .categories()
            .find_by_name(name)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(name.clone()).into()),
    }
}

pub async fn add_category(
    db: &Database,
    session: &Session,
    name: &str,
) -> Result<Category, ApiError> {
    authorize(session, Capability::EditCatalog)?;
    let category = db.categories().create(name).await?;
    info!(id = category.id, name = %category.name, by = %session.username, "Category added");
    Ok(category)
}

pub async fn rename_category(
    db: &Database,
    session: &Session,
    target: &Target,
    new_name: &str,
) -> Result<Category, ApiError> {
    authorize(session, Capability::EditCatalog)?;
    let category = match target {
        Target::Id(id) => db.categories().rename(*id, new_name).await?,
        Target::Name(name) => db.categories().rename_by_name(name, new_name).await?,
    };
    info!(id = category.id, name = %category.name, by = %session.username, "Category renamed");
    Ok(category)
}

/// Deletes an unused category. Returns `false` when nothing matched.
pub async fn delete_category(
    db: &Database,
    session: &Session,
    target: &Target,
) -> Result<bool, ApiError> {
    authorize(session, Capability::EditCatalog)?;
    let deleted = match target {
        Target::Id(id) => db.categories().delete_by_id(*id).await?,
        Target::Name(name) => db.categories().delete_by_name(name).await?,
    };
    if deleted {
        info!(?target, by = %session.username, "Category deleted");
    }
    Ok(deleted)
}
