//! Item API handlers.
//!
//! Every route requires a bearer token. Listing returns the caller's own
//! items; single-item routes apply owner-or-admin access in the domain.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Item, ItemDraft, ItemPatch, Page};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{item_error, parse_item_id};

/// Request body for `POST /api/v1/items`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[schema(example = "Desk lamp")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = 12.5)]
    pub price: f64,
}

/// Request body for `PUT /api/v1/items/{id}`. Omitted fields stay as they
/// are; `"description": null` clears the description.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Maps a present field to `Some`, keeping an explicit `null` as `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Listing window query for `GET /api/v1/items`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// Records to skip; defaults to 0.
    pub offset: Option<i64>,
    /// Page size between 1 and 100; defaults to 100.
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            owner_id: item.owner_id().to_string(),
            name: item.name().to_owned(),
            description: item.description().map(str::to_owned),
            price: item.price(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "createItem",
    security(("bearer" = []))
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateItemRequest>,
) -> ApiResult<HttpResponse> {
    let CreateItemRequest {
        name,
        description,
        price,
    } = payload.into_inner();
    let draft =
        ItemDraft::try_from_parts(&name, description.as_deref(), price).map_err(item_error)?;
    let item = state.items.create(auth.identity(), draft).await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(&item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Caller's items", body = [ItemResponse]),
        (status = 400, description = "Invalid listing window", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listItems",
    security(("bearer" = []))
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<ListItemsQuery>,
) -> ApiResult<web::Json<Vec<ItemResponse>>> {
    let ListItemsQuery { offset, limit } = query.into_inner();
    let page = Page::try_new(offset, limit).map_err(item_error)?;
    let items = state.items_query.list(auth.identity(), page).await?;
    Ok(web::Json(items.iter().map(ItemResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item", body = ItemResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "No such item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "getItem",
    security(("bearer" = []))
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItemResponse>> {
    let id = parse_item_id(&path.into_inner())?;
    let item = state.items_query.get(auth.identity(), &id).await?;
    Ok(web::Json(ItemResponse::from(&item)))
}

#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "No such item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "updateItem",
    security(("bearer" = []))
)]
#[put("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateItemRequest>,
) -> ApiResult<web::Json<ItemResponse>> {
    let id = parse_item_id(&path.into_inner())?;
    let UpdateItemRequest {
        name,
        description,
        price,
    } = payload.into_inner();
    let description = description.as_ref().map(Option::as_deref);
    let patch =
        ItemPatch::try_from_parts(name.as_deref(), description, price).map_err(item_error)?;
    let item = state.items.update(auth.identity(), &id, patch).await?;
    Ok(web::Json(ItemResponse::from(&item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "No such item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "deleteItem",
    security(("bearer" = []))
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_item_id(&path.into_inner())?;
    state.items.delete(auth.identity(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
