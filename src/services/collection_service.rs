use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::collections::{
        CollectionList, CollectionWithProducts, CreateCollectionRequest, UpdateCollectionRequest,
    },
    entity::{
        collections::{ActiveModel, Column, Entity as Collections},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::{Collection, Product},
    response::{ApiResponse, Meta},
    routes::params::CollectionListQuery,
    state::AppState,
};

pub async fn list_collections(
    state: &AppState,
    query: CollectionListQuery,
) -> AppResult<ApiResponse<CollectionList>> {
    let mut condition = Condition::all();
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(Column::Name).ilike(pattern));
    }

    let collections = Collections::find()
        .filter(condition)
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut products_by_collection: HashMap<Uuid, Vec<Product>> = HashMap::new();
    if !collections.is_empty() {
        let ids: Vec<Uuid> = collections.iter().map(|c| c.id).collect();
        let products = Products::find()
            .filter(ProdCol::CollectionId.is_in(ids))
            .order_by_asc(ProdCol::Name)
            .all(&state.orm)
            .await?;
        for product in products {
            products_by_collection
                .entry(product.collection_id)
                .or_default()
                .push(product.into());
        }
    }

    let items = collections
        .into_iter()
        .map(|collection| {
            let products = products_by_collection
                .remove(&collection.id)
                .unwrap_or_default();
            CollectionWithProducts {
                collection: Collection::from(collection),
                products,
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Collections",
        CollectionList { items },
        None,
    ))
}

pub async fn create_collection(
    state: &AppState,
    payload: CreateCollectionRequest,
) -> AppResult<ApiResponse<Collection>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        created_at: NotSet,
    };
    let collection = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        "collection_create",
        Some("collections"),
        Some(serde_json::json!({ "collection_id": collection.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Collection created",
        Collection::from(collection),
        Some(Meta::empty()),
    ))
}

pub async fn update_collection(
    state: &AppState,
    id: Uuid,
    payload: UpdateCollectionRequest,
) -> AppResult<ApiResponse<Collection>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let existing = Collections::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    let collection = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        "collection_update",
        Some("collections"),
        Some(serde_json::json!({ "collection_id": collection.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        Collection::from(collection),
        Some(Meta::empty()),
    ))
}

pub async fn delete_collection(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // The FK rejects the delete while products still reference the collection.
    let result = match Collections::delete_by_id(id).exec(&state.orm).await {
        Ok(result) => result,
        Err(err) => {
            return Err(match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::Conflict("Collection still has products".into())
                }
                _ => AppError::OrmError(err),
            });
        }
    };
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        "collection_delete",
        Some("collections"),
        Some(serde_json::json!({ "collection_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
