//! The backend's endpoints as one table.
//!
//! Each `Endpoint` variant maps to its method, path and accepted body shape
//! in `Endpoint::route`. `TripApi` methods are thin calls over this table.

use crate::http::{HttpMethod, RequestBody};
use crate::types::{BnbId, PlanId, TripId};

/// What an endpoint accepts as a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    Empty,
    Json,
    /// JSON, or a multipart form when an image is attached.
    JsonOrMultipart,
}

impl BodyShape {
    pub fn accepts(self, body: Option<&RequestBody>) -> bool {
        matches!(
            (self, body),
            (BodyShape::Empty, None)
                | (BodyShape::Json, Some(RequestBody::Json(_)))
                | (BodyShape::JsonOrMultipart, Some(_))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    pub body: BodyShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    Logout,
    CurrentUser,
    UpdateUser,
    DeleteUser,
    CheckAuth,
    BucketList,
    MyTrips,
    CreateTrip,
    CreateTripForBucketList,
    CreateTripForMyTrips,
    Trip(TripId),
    UpdateTrip(TripId),
    DeleteTrip(TripId),
    CompleteTrip(TripId),
    AddToBucketList,
    AddToMyTrips,
    CreatePlan(TripId),
    DeletePlan(PlanId),
    CreateBnb(TripId),
    UpdateBnb(BnbId),
    CreateRating(BnbId),
    CreateReview(BnbId),
    CurrentWeather(String),
}

impl Endpoint {
    pub fn route(&self) -> Route {
        use BodyShape::{Empty, Json, JsonOrMultipart};
        use HttpMethod::{Delete, Get, Patch, Post};

        let (method, path, body) = match self {
            Endpoint::Register => (Post, "/register/".to_string(), Json),
            Endpoint::Login => (Post, "/login/".to_string(), Json),
            Endpoint::Logout => (Post, "/logout/".to_string(), Empty),
            Endpoint::CurrentUser => (Get, "/user/".to_string(), Empty),
            Endpoint::UpdateUser => (Patch, "/user/update/".to_string(), Json),
            Endpoint::DeleteUser => (Delete, "/user/delete/".to_string(), Json),
            Endpoint::CheckAuth => (Get, "/check-auth/".to_string(), Empty),
            Endpoint::BucketList => (Get, "/bucket-list/".to_string(), Empty),
            Endpoint::MyTrips => (Get, "/my-trips/".to_string(), Empty),
            Endpoint::CreateTrip => (Post, "/trips/create/".to_string(), Json),
            Endpoint::CreateTripForBucketList => {
                (Post, "/trips/create-for-bucket-list/".to_string(), JsonOrMultipart)
            }
            Endpoint::CreateTripForMyTrips => {
                (Post, "/trips/create-for-my-trips/".to_string(), JsonOrMultipart)
            }
            Endpoint::Trip(id) => (Get, format!("/trips/{id}/"), Empty),
            Endpoint::UpdateTrip(id) => (Patch, format!("/trips/{id}/update/"), Json),
            Endpoint::DeleteTrip(id) => (Delete, format!("/trips/{id}/delete/"), Empty),
            Endpoint::CompleteTrip(id) => (Post, format!("/trips/{id}/complete/"), Empty),
            Endpoint::AddToBucketList => (Post, "/trips/add-to-bucket-list/".to_string(), Json),
            Endpoint::AddToMyTrips => (Post, "/trips/add-to-my-trips/".to_string(), Json),
            Endpoint::CreatePlan(trip) => (Post, format!("/trips/{trip}/plans/"), Json),
            Endpoint::DeletePlan(id) => (Delete, format!("/plans/{id}/"), Empty),
            Endpoint::CreateBnb(trip) => (Post, format!("/trips/{trip}/bnb/"), Json),
            Endpoint::UpdateBnb(id) => (Patch, format!("/bnb/{id}/"), Json),
            Endpoint::CreateRating(bnb) => (Post, format!("/bnb/{bnb}/ratings/"), Json),
            Endpoint::CreateReview(bnb) => (Post, format!("/bnb/{bnb}/reviews/"), Json),
            Endpoint::CurrentWeather(city) => (
                Get,
                format!("/weather/current/?city={}", urlencoding::encode(city)),
                Empty,
            ),
        };
        Route { method, path, body }
    }

    /// Short description used when logging a failed call.
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Register => "registering user",
            Endpoint::Login => "logging in",
            Endpoint::Logout => "logging out",
            Endpoint::CurrentUser => "fetching current user",
            Endpoint::UpdateUser => "updating user",
            Endpoint::DeleteUser => "deleting user",
            Endpoint::CheckAuth => "checking auth",
            Endpoint::BucketList => "fetching bucket list",
            Endpoint::MyTrips => "fetching my trips",
            Endpoint::CreateTrip => "creating trip",
            Endpoint::CreateTripForBucketList => "creating trip for bucket list",
            Endpoint::CreateTripForMyTrips => "creating trip for my trips",
            Endpoint::Trip(_) => "fetching trip",
            Endpoint::UpdateTrip(_) => "updating trip",
            Endpoint::DeleteTrip(_) => "deleting trip",
            Endpoint::CompleteTrip(_) => "completing trip",
            Endpoint::AddToBucketList => "adding trip to bucket list",
            Endpoint::AddToMyTrips => "adding trip to my trips",
            Endpoint::CreatePlan(_) => "creating plan",
            Endpoint::DeletePlan(_) => "deleting plan",
            Endpoint::CreateBnb(_) => "creating BNB",
            Endpoint::UpdateBnb(_) => "updating BNB",
            Endpoint::CreateRating(_) => "creating rating",
            Endpoint::CreateReview(_) => "creating review",
            Endpoint::CurrentWeather(_) => "fetching weather",
        }
    }
}
