//! Stash REST API server binary.
//!
//! ## Purpose
//! Exposes the save vault over HTTP: listing, binary upload, text
//! save/edit, title edit, and object retrieval, with OpenAPI/Swagger UI.
//!
//! ## Identity
//! Session validation is delegated to the upstream identity provider; by the
//! time a request reaches this service the owner identity in the path has
//! already been authenticated. Handlers turn it into a typed `OwnerId` and
//! pass it down explicitly; nothing here reads identity from ambient state.

mod dto;
mod error;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path as AxumPath, State},
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use error::ApiError;
use stash_core::{CoreConfig, FsItemRepository, ItemRepository, ItemService};
use stash_store::{FsObjectStore, ObjectKey, ObjectStore};
use stash_types::OwnerId;

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across REST API handlers
///
/// Contains the reconciliation service for save/edit operations and the
/// object store for serving stored payloads back.
#[derive(Clone)]
struct AppState {
    service: Arc<ItemService>,
    objects: Arc<dyn ObjectStore>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_items, upload_file, save_text, edit_title, get_object),
    components(schemas(
        dto::HealthRes,
        dto::ListItemsRes,
        dto::UploadFileRes,
        dto::SaveTextReq,
        dto::SaveTextRes,
        dto::EditTitleReq,
        dto::UpdatedRes,
        stash_core::Item,
        stash_core::ItemKind,
    ))
)]
struct ApiDoc;

/// Main entry point for the stash REST API server
///
/// Starts the REST server on the configured address (default: 0.0.0.0:3000)
/// and serves the save-vault endpoints with OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `STASH_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `STASH_DATA_DIR`: Backing directory for both stores (default: "/stash_data")
/// - `STASH_PUBLIC_BASE_URL`: Prefix of returned locator URLs (default: "http://localhost:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory is missing or the store roots cannot be prepared, or
/// - the server address cannot be bound.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stash_api_rest=info".parse()?)
                .add_directive("stash_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("STASH_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting stash REST API on {}", addr);

    let data_dir = std::env::var("STASH_DATA_DIR").unwrap_or_else(|_| "/stash_data".into());
    let data_path = Path::new(&data_dir);
    if !data_path.exists() {
        anyhow::bail!("Data directory does not exist: {}", data_path.display());
    }

    let public_base_url =
        std::env::var("STASH_PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

    let cfg = CoreConfig::new(data_path.to_path_buf(), public_base_url)?;
    std::fs::create_dir_all(cfg.objects_dir())?;
    std::fs::create_dir_all(cfg.items_dir())?;

    let objects: Arc<dyn ObjectStore> =
        Arc::new(FsObjectStore::new(cfg.objects_dir(), cfg.public_base_url())?);
    let items: Arc<dyn ItemRepository> = Arc::new(FsItemRepository::new(cfg.items_dir()));

    let state = AppState {
        service: Arc::new(ItemService::new(objects.clone(), items)),
        objects,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/items/:owner_id", get(list_items))
        .route("/items/:owner_id/files", post(upload_file))
        .route("/items/:owner_id/texts", post(save_text))
        .route("/items/:owner_id/:item_id/title", put(edit_title))
        .route("/objects/:owner_id/:name", get(get_object))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = dto::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<dto::HealthRes> {
    Json(dto::HealthRes {
        ok: true,
        message: "stash REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/items/{owner_id}",
    params(
        ("owner_id" = String, Path, description = "Owner of the collection")
    ),
    responses(
        (status = 200, description = "All items saved by the owner", body = dto::ListItemsRes),
        (status = 400, description = "Invalid owner id"),
        (status = 500, description = "Internal server error")
    )
)]
/// List all items saved by one owner
///
/// Returns an unordered snapshot of the owner's item records. Payload bytes
/// are not included; clients dereference each item's `storageUrl`.
///
/// # Errors
/// Returns `400 Bad Request` if the owner id is empty or malformed, and
/// `500 Internal Server Error` if the metadata repository fails.
#[axum::debug_handler]
async fn list_items(
    State(state): State<AppState>,
    AxumPath(owner_id): AxumPath<String>,
) -> Result<Json<dto::ListItemsRes>, ApiError> {
    let owner = OwnerId::new(&owner_id)?;
    let files = state.service.list(owner).await?;
    Ok(Json(dto::ListItemsRes {
        success: true,
        files,
    }))
}

#[utoipa::path(
    post,
    path = "/items/{owner_id}/files",
    params(
        ("owner_id" = String, Path, description = "Owner of the collection")
    ),
    responses(
        (status = 200, description = "File stored", body = dto::UploadFileRes),
        (status = 400, description = "Missing file or invalid owner id"),
        (status = 500, description = "Internal server error")
    )
)]
/// Upload a binary file
///
/// Accepts a multipart form with a `file` field. The payload is stored under
/// `{owner}/{original file name}` and a metadata record is created for it;
/// uploading the same file name again overwrites the stored object.
///
/// # Errors
/// Returns `400 Bad Request` when the form carries no file (or an empty
/// one), and `500 Internal Server Error` when either store fails.
#[axum::debug_handler]
async fn upload_file(
    State(state): State<AppState>,
    AxumPath(owner_id): AxumPath<String>,
    mut multipart: Multipart,
) -> Result<Json<dto::UploadFileRes>, ApiError> {
    let owner = OwnerId::new(&owner_id)?;

    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<axum::body::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {e}")))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(|n| n.to_string());
                content_type = field.content_type().map(|c| c.to_string());
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("multipart read error: {e}")))?,
                );
            }
            // Ignore other fields; the owner travels in the path.
            _ => {}
        }
    }

    let file_name =
        file_name.ok_or_else(|| ApiError::BadRequest("missing required field: file".into()))?;
    let data = data.ok_or_else(|| ApiError::BadRequest("missing required field: file".into()))?;

    let saved = state
        .service
        .save_file(owner, &file_name, content_type.as_deref(), &data)
        .await?;

    Ok(Json(dto::UploadFileRes {
        success: true,
        id: saved.id,
        storage_url: saved.storage_url,
    }))
}

#[utoipa::path(
    post,
    path = "/items/{owner_id}/texts",
    params(
        ("owner_id" = String, Path, description = "Owner of the collection")
    ),
    request_body = dto::SaveTextReq,
    responses(
        (status = 200, description = "Text saved or edited", body = dto::SaveTextRes),
        (status = 400, description = "Missing text or invalid owner id"),
        (status = 404, description = "No text item with that id for this owner"),
        (status = 500, description = "Internal server error")
    )
)]
/// Save a new text snippet or edit an existing one
///
/// A request without an `id` saves a new snippet under a fresh
/// time-qualified key; a request with an `id` replaces that item's body,
/// overwriting the original stored object. In both cases the returned
/// `title` is derived from the body prefix.
///
/// # Errors
/// Returns `400 Bad Request` on empty text, `404 Not Found` when the edit
/// id matches no text item of this owner, and `500 Internal Server Error`
/// on store failure.
#[axum::debug_handler]
async fn save_text(
    State(state): State<AppState>,
    AxumPath(owner_id): AxumPath<String>,
    Json(req): Json<dto::SaveTextReq>,
) -> Result<Json<dto::SaveTextRes>, ApiError> {
    let owner = OwnerId::new(&owner_id)?;

    let saved = match req.id {
        Some(id) => state.service.edit_text(owner, id, &req.text).await?,
        None => state.service.save_text(owner, &req.text).await?,
    };

    Ok(Json(dto::SaveTextRes {
        success: true,
        id: saved.id,
        storage_url: saved.storage_url,
        text: saved.body,
        title: saved.title,
    }))
}

#[utoipa::path(
    put,
    path = "/items/{owner_id}/{item_id}/title",
    params(
        ("owner_id" = String, Path, description = "Owner of the item"),
        ("item_id" = Uuid, Path, description = "Item to rename")
    ),
    request_body = dto::EditTitleReq,
    responses(
        (status = 200, description = "Title updated", body = dto::UpdatedRes),
        (status = 400, description = "Missing title or invalid owner id"),
        (status = 404, description = "No item with that id for this owner")
    )
)]
/// Rename an item
///
/// Updates the display title only; the stored payload is untouched. Works
/// for both binary and text items.
///
/// # Errors
/// Returns `400 Bad Request` on an empty title and `404 Not Found` when the
/// owner + id pair matches nothing.
#[axum::debug_handler]
async fn edit_title(
    State(state): State<AppState>,
    AxumPath((owner_id, item_id)): AxumPath<(String, Uuid)>,
    Json(req): Json<dto::EditTitleReq>,
) -> Result<Json<dto::UpdatedRes>, ApiError> {
    let owner = OwnerId::new(&owner_id)?;
    state.service.rename(owner, item_id, &req.title).await?;
    Ok(Json(dto::UpdatedRes { success: true }))
}

#[utoipa::path(
    get,
    path = "/objects/{owner_id}/{name}",
    params(
        ("owner_id" = String, Path, description = "Owner of the object"),
        ("name" = String, Path, description = "Object name within the owner's namespace")
    ),
    responses(
        (status = 200, description = "Object payload with its stored content type"),
        (status = 404, description = "No object under that key"),
        (status = 500, description = "Internal server error")
    )
)]
/// Serve a stored payload back
///
/// Dereferences the locator URLs handed out by the save operations: the
/// payload bytes are returned with the content type recorded at put time.
#[axum::debug_handler]
async fn get_object(
    State(state): State<AppState>,
    AxumPath((owner_id, name)): AxumPath<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = OwnerId::new(&owner_id)?;
    let key = ObjectKey::new(owner, &name)?;
    let obj = state.objects.get(&key).await?;
    Ok(([(header::CONTENT_TYPE, obj.content_type)], obj.bytes))
}
