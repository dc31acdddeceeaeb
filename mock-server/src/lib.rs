use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: String,
    pub name: String,
    pub data: Option<Map<String, Value>>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
pub struct ObjectInput {
    pub name: String,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

pub type Db = Arc<RwLock<HashMap<String, Object>>>;

type ApiError = (StatusCode, Json<Value>);

/// Highest seeded id; ids `1..=RESERVED_COUNT` are read-only.
pub const RESERVED_COUNT: u32 = 13;

pub fn is_reserved(id: &str) -> bool {
    matches!(id.parse::<u32>(), Ok(n) if (1..=RESERVED_COUNT).contains(&n))
}

fn seeded(id: u32, name: &str, data: Value) -> Object {
    Object {
        id: id.to_string(),
        name: name.to_string(),
        data: data.as_object().cloned(),
        created_at: None,
        updated_at: None,
    }
}

/// The thirteen objects every fresh server starts with.
pub fn seed() -> Vec<Object> {
    vec![
        seeded(1, "Google Pixel 6 Pro", json!({"color": "Cloudy White", "capacity": "128 GB"})),
        seeded(2, "Apple iPhone 12 Mini, 256GB, Blue", Value::Null),
        seeded(3, "Apple iPhone 12 Pro Max", json!({"color": "Cloudy White", "capacity GB": 512})),
        seeded(4, "Apple iPhone 11, 64GB", json!({"price": 389.99, "color": "Purple"})),
        seeded(5, "Samsung Galaxy Z Fold2", json!({"price": 689.99, "color": "Brown"})),
        seeded(6, "Apple AirPods", json!({"generation": "3rd", "price": 120})),
        seeded(
            7,
            "Apple MacBook Pro 16",
            json!({"year": 2019, "price": 1849.99, "CPU model": "Intel Core i9", "Hard disk size": "1 TB"}),
        ),
        seeded(8, "Apple Watch Series 8", json!({"Strap Colour": "Elderberry", "Case Size": "41mm"})),
        seeded(
            9,
            "Beats Studio3 Wireless",
            json!({"Color": "Red", "Description": "High-performance wireless noise cancelling headphones"}),
        ),
        seeded(10, "Apple iPad Mini 5th Gen", json!({"Capacity": "64 GB", "Screen size": 7.9})),
        seeded(11, "Apple iPad Mini 5th Gen", json!({"Capacity": "254 GB", "Screen size": 7.9})),
        seeded(12, "Apple iPad Air", json!({"Generation": "4th", "Price": "419.99", "Capacity": "64 GB"})),
        seeded(13, "Apple iPad Air", json!({"Generation": "4th", "Price": "519.99", "Capacity": "256 GB"})),
    ]
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(
        seed().into_iter().map(|o| (o.id.clone(), o)).collect(),
    ));
    Router::new()
        .route("/objects", get(list_objects).post(create_object))
        .route(
            "/objects/{id}",
            get(get_object).put(update_object).delete(delete_object),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("Object with id={id} was not found.")})),
    )
}

fn reserved(id: &str) -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": format!("{id} is a reserved id and the data object of it cannot be modified.")})),
    )
}

fn timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    secs.to_string()
}

/// Only the seeded objects are listed, in id order. Created objects are
/// reachable by id but never listed.
async fn list_objects(State(db): State<Db>) -> Json<Vec<Object>> {
    let objects = db.read().await;
    let mut listed: Vec<Object> = objects
        .values()
        .filter(|o| is_reserved(&o.id))
        .cloned()
        .collect();
    listed.sort_by_key(|o| o.id.parse::<u32>().unwrap_or(u32::MAX));
    Json(listed)
}

async fn create_object(State(db): State<Db>, Json(input): Json<ObjectInput>) -> Json<Object> {
    let object = Object {
        id: Uuid::new_v4().simple().to_string(),
        name: input.name,
        data: input.data,
        created_at: Some(timestamp()),
        updated_at: None,
    };
    info!(id = %object.id, "object created");
    db.write().await.insert(object.id.clone(), object.clone());
    Json(object)
}

async fn get_object(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Object>, ApiError> {
    let objects = db.read().await;
    objects.get(&id).cloned().map(Json).ok_or_else(|| not_found(&id))
}

/// Full replacement of `name` and `data`.
async fn update_object(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ObjectInput>,
) -> Result<Json<Object>, ApiError> {
    if is_reserved(&id) {
        return Err(reserved(&id));
    }
    let mut objects = db.write().await;
    let object = objects.get_mut(&id).ok_or_else(|| not_found(&id))?;
    object.name = input.name;
    object.data = input.data;
    object.updated_at = Some(timestamp());
    debug!(%id, "object updated");
    Ok(Json(object.clone()))
}

async fn delete_object(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    if is_reserved(&id) {
        return Err(reserved(&id));
    }
    let mut objects = db.write().await;
    objects.remove(&id).ok_or_else(|| not_found(&id))?;
    debug!(%id, "object deleted");
    Ok(Json(json!({"message": format!("Object with id = {id} has been deleted.")})))
}
