//! In-memory stand-in for the trip-planner backend.
//!
//! Serves the JSON API under `/api` with session-cookie authentication, plus
//! an HTML login page that protected pages redirect to, the way the real
//! backend's login-required views do.

pub mod store;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

use store::{Bnb, Id, List, Plan, Rating, Review, Store, StoredImage, Trip, User};

pub const SESSION_COOKIE: &str = "sessionid";
pub const LOGIN_PAGE: &str = "/accounts/login/";

pub type Db = Arc<RwLock<Store>>;

/// Failures rendered as `{"error": ...}` JSON.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication required.")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found.")]
    NotFound(&'static str),
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match self {
            BackendError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BackendError::Unauthorized | BackendError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            BackendError::Forbidden(_) => StatusCode::FORBIDDEN,
            BackendError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = match self {
            BackendError::InvalidCredentials => json!({"success": false, "error": self.to_string()}),
            _ => json!({"error": self.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

type Result<T> = std::result::Result<T, BackendError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .route("/logout/", post(logout))
        .route("/user/", get(current_user))
        .route("/user/update/", patch(update_user).put(update_user))
        .route("/user/delete/", delete(delete_user))
        .route("/check-auth/", get(check_auth))
        .route("/bucket-list/", get(bucket_list))
        .route("/my-trips/", get(my_trips))
        .route("/trips/create/", post(create_trip))
        .route("/trips/create-for-bucket-list/", post(create_for_bucket_list))
        .route("/trips/create-for-my-trips/", post(create_for_my_trips))
        .route("/trips/add-to-bucket-list/", post(add_to_bucket_list))
        .route("/trips/add-to-my-trips/", post(add_to_my_trips))
        .route("/trips/{id}/", get(get_trip))
        .route("/trips/{id}/update/", patch(update_trip))
        .route("/trips/{id}/delete/", delete(delete_trip))
        .route("/trips/{id}/complete/", post(complete_trip))
        .route("/trips/{id}/plans/", post(create_plan))
        .route("/plans/{id}/", delete(delete_plan))
        .route("/trips/{id}/bnb/", post(create_bnb))
        .route("/bnb/{id}/", patch(update_bnb))
        .route("/bnb/{id}/ratings/", post(create_rating))
        .route("/bnb/{id}/reviews/", post(create_review))
        .route("/weather/current/", get(current_weather));

    Router::new()
        .nest("/api", api)
        .route(LOGIN_PAGE, get(login_page))
        .route("/media/trip_images/{name}", get(trip_image))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> std::result::Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

async fn session_user(db: &Db, headers: &HeaderMap) -> Option<User> {
    let token = session_token(headers)?;
    db.read().await.session_user(&token).cloned()
}

async fn require_user(db: &Db, headers: &HeaderMap) -> Result<User> {
    session_user(db, headers).await.ok_or(BackendError::Unauthorized)
}

fn parse_json<T: DeserializeOwned>(body: &str, message: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|_| BackendError::BadRequest(message.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CredentialsBody {
    username: Option<String>,
    password: Option<String>,
}

async fn register(State(db): State<Db>, body: String) -> Result<Json<Value>> {
    let input: CredentialsBody = parse_json(&body, "Invalid JSON format.")?;
    let (Some(username), Some(password)) = (non_blank(input.username), non_blank(input.password))
    else {
        return Err(BackendError::BadRequest(
            "Username and password are required.".to_string(),
        ));
    };

    let mut store = db.write().await;
    if store.find_user(&username).is_some() {
        return Err(BackendError::BadRequest("Username already taken.".to_string()));
    }
    let user = store.create_user(&username, &password);
    info!(user_id = user.id, "registered {}", user.username);
    Ok(Json(json!({
        "success": true,
        "message": "User registered successfully.",
        "user_id": user.id,
        "username": user.username,
    })))
}

async fn login(State(db): State<Db>, body: String) -> Result<Response> {
    let input: CredentialsBody = parse_json(&body, "Invalid JSON or missing fields.")?;
    let mut store = db.write().await;
    let user = match (input.username, input.password) {
        (Some(username), Some(password)) => store
            .find_user(&username)
            .filter(|u| u.check_password(&password))
            .cloned(),
        _ => None,
    };
    let Some(user) = user else {
        warn!("rejected login");
        return Err(BackendError::InvalidCredentials);
    };

    let token = store.open_session(user.id);
    info!(user_id = user.id, "logged in {}", user.username);
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "message": "Login successful",
            "username": user.username,
        })),
    )
        .into_response())
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        db.write().await.close_session(&token);
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0");
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({"success": true, "message": "Logged out successfully."})),
    )
        .into_response()
}

/// Without a session this redirects to the HTML login page.
async fn current_user(State(db): State<Db>, headers: HeaderMap) -> Response {
    match session_user(&db, &headers).await {
        Some(user) => Json(json!({
            "is_authenticated": true,
            "username": user.username,
            "id": user.id,
        }))
        .into_response(),
        None => Redirect::to(&format!("{LOGIN_PAGE}?next=/api/user/")).into_response(),
    }
}

async fn login_page() -> Html<&'static str> {
    Html("<!DOCTYPE html><html><body><form method=\"post\">Log in</form></body></html>")
}

#[derive(Deserialize)]
struct UpdateUserBody {
    username: Option<String>,
    password: Option<String>,
}

async fn update_user(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let input: UpdateUserBody = parse_json(&body, "Invalid JSON.")?;
    if !input.password.is_some_and(|p| user.check_password(&p)) {
        return Err(BackendError::Forbidden("Incorrect password.".to_string()));
    }

    let mut store = db.write().await;
    let mut username = user.username.clone();
    if let Some(new_username) = non_blank(input.username) {
        if store.find_user(&new_username).is_some_and(|u| u.id != user.id) {
            return Err(BackendError::BadRequest("Username already taken.".to_string()));
        }
        store.rename_user(user.id, &new_username);
        username = new_username;
    }
    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully.",
        "username": username,
    })))
}

#[derive(Deserialize)]
struct DeleteUserBody {
    password: Option<String>,
}

async fn delete_user(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Response> {
    let user = require_user(&db, &headers).await?;
    let input: DeleteUserBody = parse_json(&body, "Invalid JSON.")?;
    let Some(password) = non_blank(input.password) else {
        return Err(BackendError::BadRequest(
            "Password is required to delete account.".to_string(),
        ));
    };
    if !user.check_password(&password) {
        return Err(BackendError::Forbidden("Incorrect password.".to_string()));
    }

    db.write().await.delete_user(user.id);
    let cookie = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "message": format!("User '{}' has been deleted successfully.", user.username),
        })),
    )
        .into_response())
}

async fn check_auth(State(db): State<Db>, headers: HeaderMap) -> Json<Value> {
    match session_user(&db, &headers).await {
        Some(user) => Json(json!({
            "is_authenticated": true,
            "username": user.username,
            "id": user.id,
        })),
        None => Json(json!({"is_authenticated": false})),
    }
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct TripBody {
    name: Option<String>,
    location: Option<String>,
    date: Option<String>,
}

struct TripForm {
    body: TripBody,
    image: Option<(String, StoredImage)>,
}

async fn bucket_list(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let trips = db.read().await.list(user.id, List::BucketList);
    Ok(Json(json!({"trips": trips})))
}

async fn my_trips(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let trips = db.read().await.list(user.id, List::MyTrips);
    Ok(Json(json!({"trips": trips})))
}

async fn create_trip(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, Json<Value>)> {
    let user = require_user(&db, &headers).await?;
    let input: TripBody = parse_json(&body, "Invalid JSON.")?;
    let trip = store_trip(&db, user.id, TripForm { body: input, image: None }, None).await?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "trip": trip}))))
}

async fn create_for_bucket_list(
    State(db): State<Db>,
    request: Request,
) -> Result<(StatusCode, Json<Value>)> {
    create_listed(db, request, List::BucketList).await
}

async fn create_for_my_trips(
    State(db): State<Db>,
    request: Request,
) -> Result<(StatusCode, Json<Value>)> {
    create_listed(db, request, List::MyTrips).await
}

/// Accepts either a JSON trip or a multipart form with an `image` file.
async fn create_listed(db: Db, request: Request, list: List) -> Result<(StatusCode, Json<Value>)> {
    let user = require_user(&db, request.headers()).await?;
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let form = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| BackendError::BadRequest(e.body_text()))?;
        read_trip_form(multipart).await?
    } else {
        let body = String::from_request(request, &())
            .await
            .map_err(|e| BackendError::BadRequest(e.body_text()))?;
        TripForm {
            body: parse_json(&body, "Invalid JSON.")?,
            image: None,
        }
    };

    let trip = store_trip(&db, user.id, form, Some(list)).await?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "trip": trip}))))
}

async fn read_trip_form(mut multipart: Multipart) -> Result<TripForm> {
    let bad = |e: axum::extract::multipart::MultipartError| BackendError::BadRequest(e.body_text());
    let mut form = TripForm {
        body: TripBody::default(),
        image: None,
    };
    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(bad)?.to_vec();
            form.image = Some((file_name, StoredImage { content_type, bytes }));
            continue;
        }
        let value = field.text().await.map_err(bad)?;
        match name.as_str() {
            "name" => form.body.name = Some(value),
            "location" => form.body.location = Some(value),
            "date" => form.body.date = Some(value),
            _ => {}
        }
    }
    Ok(form)
}

async fn store_trip(db: &Db, owner: Id, form: TripForm, list: Option<List>) -> Result<Value> {
    let (Some(name), Some(location)) = (non_blank(form.body.name), non_blank(form.body.location))
    else {
        return Err(BackendError::BadRequest(
            "Name and location are required.".to_string(),
        ));
    };

    let mut store = db.write().await;
    let id = store.next_id();
    let image = form.image.map(|(file_name, image)| {
        let key = format!("{id}-{file_name}");
        store.images.insert(key.clone(), image);
        format!("/media/trip_images/{key}")
    });
    store.insert_trip(Trip {
        id,
        owner,
        name,
        location,
        date: non_blank(form.body.date),
        image,
    });
    if let Some(list) = list {
        store.add_to_list(owner, list, id);
    }
    info!(trip_id = id, "created trip");
    store.trip_json(id).ok_or(BackendError::NotFound("Trip"))
}

async fn trip_image(State(db): State<Db>, Path(name): Path<String>) -> Response {
    match db.read().await.images.get(&name) {
        Some(image) => (
            [(header::CONTENT_TYPE, image.content_type.clone())],
            image.bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_trip(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let store = db.read().await;
    store.owned_trip(user.id, id).ok_or(BackendError::NotFound("Trip"))?;
    let trip = store.trip_json(id).ok_or(BackendError::NotFound("Trip"))?;
    Ok(Json(trip))
}

async fn update_trip(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Id>,
    body: String,
) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let input: TripBody = parse_json(&body, "Invalid JSON.")?;
    let mut store = db.write().await;
    store.owned_trip(user.id, id).ok_or(BackendError::NotFound("Trip"))?;
    if let Some(trip) = store.trips.get_mut(&id) {
        if let Some(name) = non_blank(input.name) {
            trip.name = name;
        }
        if let Some(location) = non_blank(input.location) {
            trip.location = location;
        }
        if let Some(date) = input.date {
            trip.date = non_blank(Some(date));
        }
    }
    let trip = store.trip_json(id).ok_or(BackendError::NotFound("Trip"))?;
    Ok(Json(json!({"success": true, "trip": trip})))
}

async fn delete_trip(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let mut store = db.write().await;
    store.owned_trip(user.id, id).ok_or(BackendError::NotFound("Trip"))?;
    store.delete_trip(id);
    Ok(Json(json!({"success": true, "message": "Trip deleted successfully."})))
}

/// Moves the trip from the bucket list to My Trips.
async fn complete_trip(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let mut store = db.write().await;
    store.owned_trip(user.id, id).ok_or(BackendError::NotFound("Trip"))?;
    store.remove_from_list(user.id, List::BucketList, id);
    store.add_to_list(user.id, List::MyTrips, id);
    let trip = store.trip_json(id).ok_or(BackendError::NotFound("Trip"))?;
    Ok(Json(json!({"success": true, "trip": trip})))
}

#[derive(Deserialize)]
struct TripRefBody {
    trip_id: Option<Id>,
}

async fn add_to_bucket_list(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>> {
    add_to_list(db, headers, body, List::BucketList).await
}

async fn add_to_my_trips(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>> {
    add_to_list(db, headers, body, List::MyTrips).await
}

async fn add_to_list(db: Db, headers: HeaderMap, body: String, list: List) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let input: TripRefBody = parse_json(&body, "Invalid JSON.")?;
    let id = input
        .trip_id
        .ok_or_else(|| BackendError::BadRequest("trip_id is required.".to_string()))?;
    let mut store = db.write().await;
    store.owned_trip(user.id, id).ok_or(BackendError::NotFound("Trip"))?;
    store.add_to_list(user.id, list, id);
    Ok(Json(json!({"success": true, "trip_id": id})))
}

// ---------------------------------------------------------------------------
// Plans, BNBs, ratings, reviews
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PlanBody {
    name: Option<String>,
    activity: Option<String>,
}

async fn create_plan(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(trip): Path<Id>,
    body: String,
) -> Result<(StatusCode, Json<Value>)> {
    let user = require_user(&db, &headers).await?;
    let input: PlanBody = parse_json(&body, "Invalid JSON.")?;
    let name = non_blank(input.name)
        .ok_or_else(|| BackendError::BadRequest("Plan name is required.".to_string()))?;
    let mut store = db.write().await;
    store.owned_trip(user.id, trip).ok_or(BackendError::NotFound("Trip"))?;
    let plan = Plan {
        id: store.next_id(),
        trip,
        name,
        activity: input.activity,
    };
    store.plans.insert(plan.id, plan.clone());
    Ok((StatusCode::CREATED, Json(json!(plan))))
}

async fn delete_plan(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let mut store = db.write().await;
    let trip = store.plans.get(&id).map(|p| p.trip).ok_or(BackendError::NotFound("Plan"))?;
    store.owned_trip(user.id, trip).ok_or(BackendError::NotFound("Plan"))?;
    store.plans.remove(&id);
    Ok(Json(json!({"success": true})))
}

#[derive(Deserialize)]
struct BnbBody {
    name: Option<String>,
    address: Option<String>,
    availability: Option<bool>,
}

async fn create_bnb(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(trip): Path<Id>,
    body: String,
) -> Result<(StatusCode, Json<Value>)> {
    let user = require_user(&db, &headers).await?;
    let input: BnbBody = parse_json(&body, "Invalid JSON.")?;
    let (Some(name), Some(address)) = (non_blank(input.name), non_blank(input.address)) else {
        return Err(BackendError::BadRequest(
            "Name and address are required.".to_string(),
        ));
    };
    let mut store = db.write().await;
    store.owned_trip(user.id, trip).ok_or(BackendError::NotFound("Trip"))?;
    if store.bnb_for_trip(trip).is_some() {
        return Err(BackendError::BadRequest("Trip already has a BNB.".to_string()));
    }
    let bnb = Bnb {
        id: store.next_id(),
        trip,
        name,
        address,
        availability: input.availability.unwrap_or(true),
    };
    store.bnbs.insert(bnb.id, bnb.clone());
    Ok((StatusCode::CREATED, Json(store.bnb_json(&bnb))))
}

async fn update_bnb(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Id>,
    body: String,
) -> Result<Json<Value>> {
    let user = require_user(&db, &headers).await?;
    let input: BnbBody = parse_json(&body, "Invalid JSON.")?;
    let mut store = db.write().await;
    store.owned_bnb(user.id, id).ok_or(BackendError::NotFound("BNB"))?;
    if let Some(bnb) = store.bnbs.get_mut(&id) {
        if let Some(name) = non_blank(input.name) {
            bnb.name = name;
        }
        if let Some(address) = non_blank(input.address) {
            bnb.address = address;
        }
        if let Some(availability) = input.availability {
            bnb.availability = availability;
        }
    }
    let bnb = store.bnbs.get(&id).cloned().ok_or(BackendError::NotFound("BNB"))?;
    Ok(Json(store.bnb_json(&bnb)))
}

#[derive(Deserialize)]
struct RatingBody {
    value: Option<i64>,
}

async fn create_rating(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(bnb): Path<Id>,
    body: String,
) -> Result<(StatusCode, Json<Value>)> {
    let user = require_user(&db, &headers).await?;
    let input: RatingBody = parse_json(&body, "Invalid JSON.")?;
    let value = input
        .value
        .filter(|v| (1..=5).contains(v))
        .ok_or_else(|| BackendError::BadRequest("Rating must be between 1 and 5.".to_string()))?;
    let mut store = db.write().await;
    store.owned_bnb(user.id, bnb).ok_or(BackendError::NotFound("BNB"))?;
    let rating = Rating {
        id: store.next_id(),
        bnb,
        value: value as u8,
    };
    store.ratings.insert(rating.id, rating.clone());
    Ok((StatusCode::CREATED, Json(json!(rating))))
}

#[derive(Deserialize)]
struct ReviewBody {
    statement: Option<String>,
    rating: Option<u8>,
}

async fn create_review(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(bnb): Path<Id>,
    body: String,
) -> Result<(StatusCode, Json<Value>)> {
    let user = require_user(&db, &headers).await?;
    let input: ReviewBody = parse_json(&body, "Invalid JSON.")?;
    let statement = non_blank(input.statement)
        .ok_or_else(|| BackendError::BadRequest("Review statement is required.".to_string()))?;
    if statement.chars().count() > 4000 {
        return Err(BackendError::BadRequest("Review is too long.".to_string()));
    }
    let mut store = db.write().await;
    store.owned_bnb(user.id, bnb).ok_or(BackendError::NotFound("BNB"))?;
    let review = Review {
        id: store.next_id(),
        bnb,
        statement,
        rating: input.rating,
    };
    store.reviews.insert(review.id, review.clone());
    Ok((StatusCode::CREATED, Json(json!(review))))
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Deterministic readings derived from the city name.
async fn current_weather(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>> {
    let city = non_blank(params.get("city").cloned())
        .ok_or_else(|| BackendError::BadRequest("City parameter is required.".to_string()))?;
    let seed: u32 = city.bytes().map(u32::from).sum();
    let description = ["clear sky", "few clouds", "light rain"][(seed % 3) as usize];
    Ok(Json(json!({
        "city": city,
        "temperature": f64::from(seed % 35) + 0.5,
        "humidity": 40 + seed % 50,
        "description": description,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("csrftoken=abc; sessionid=s3cr3t"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn missing_cookie_yields_no_session() {
        assert!(session_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn invalid_credentials_keep_success_flag() {
        let response = BackendError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn non_blank_rejects_whitespace() {
        assert!(non_blank(Some("  ".to_string())).is_none());
        assert_eq!(non_blank(Some("Rome".to_string())).as_deref(), Some("Rome"));
    }
}
