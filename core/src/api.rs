//! Endpoint operations for the trip-planner backend.
//!
//! # Design
//! Every method is one row of the `Endpoint` table plus an optional payload,
//! sent through the shared `RequestGateway`. Failures are logged with the
//! operation's label and returned unchanged. The two session probes,
//! `current_user` and `check_auth`, instead fold any failure into
//! `{"is_authenticated": false}` so callers can treat an unreachable backend
//! and a missing session the same way.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::config::ApiConfig;
use crate::endpoints::Endpoint;
use crate::gateway::{RequestGateway, ResponseOutcome, Transport};
use crate::http::{RequestBody, RequestSpec};
use crate::transport::UreqTransport;
use crate::types::{
    AccountDeletion, BnbId, BnbInput, BnbPatch, NewTrip, PlanId, PlanInput,
    RatingInput, ReviewInput, TripDetails, TripId, TripPatch, TripRef, UserCredentials, UserUpdate,
};

/// Payload returned by the session probes when there is no usable session.
pub fn not_authenticated() -> Value {
    json!({ "is_authenticated": false })
}

#[derive(Debug, Clone)]
pub struct TripApi<T> {
    gateway: RequestGateway<T>,
}

impl TripApi<UreqTransport> {
    /// Client over a fresh `ureq` agent. Same-origin relative base URLs are
    /// completed from the config's page origin.
    pub fn connect(config: ApiConfig) -> Self {
        let transport = match config.page_origin() {
            Some(origin) => UreqTransport::new().with_origin(origin),
            None => UreqTransport::new(),
        };
        Self::new(RequestGateway::new(config, transport))
    }
}

impl<T: Transport> TripApi<T> {
    pub fn new(gateway: RequestGateway<T>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &RequestGateway<T> {
        &self.gateway
    }

    pub fn register(&self, username: &str, password: &str) -> ResponseOutcome {
        self.call_json(Endpoint::Register, &credentials(username, password))
    }

    pub fn login(&self, username: &str, password: &str) -> ResponseOutcome {
        self.call_json(Endpoint::Login, &credentials(username, password))
    }

    pub fn logout(&self) -> ResponseOutcome {
        self.call(Endpoint::Logout)
    }

    /// The signed-in user, or `{"is_authenticated": false}` on any failure.
    pub fn current_user(&self) -> Value {
        match self.dispatch(&Endpoint::CurrentUser, None) {
            Ok(user) => user,
            Err(_) => not_authenticated(),
        }
    }

    pub fn update_user(&self, update: &UserUpdate) -> ResponseOutcome {
        self.call_json(Endpoint::UpdateUser, update)
    }

    pub fn delete_user(&self, password: &str) -> ResponseOutcome {
        self.call_json(
            Endpoint::DeleteUser,
            &AccountDeletion {
                password: password.to_string(),
            },
        )
    }

    /// Session liveness, or `{"is_authenticated": false}` on any failure.
    pub fn check_auth(&self) -> Value {
        match self.dispatch(&Endpoint::CheckAuth, None) {
            Ok(status) => status,
            Err(e) => {
                error!("Auth check error: {e}");
                not_authenticated()
            }
        }
    }

    pub fn bucket_list(&self) -> ResponseOutcome {
        self.call(Endpoint::BucketList)
    }

    pub fn my_trips(&self) -> ResponseOutcome {
        self.call(Endpoint::MyTrips)
    }

    pub fn create_trip(&self, trip: &TripDetails) -> ResponseOutcome {
        self.call_json(Endpoint::CreateTrip, trip)
    }

    pub fn create_trip_for_bucket_list(&self, trip: &NewTrip) -> ResponseOutcome {
        self.create_listed_trip(Endpoint::CreateTripForBucketList, trip)
    }

    pub fn create_trip_for_my_trips(&self, trip: &NewTrip) -> ResponseOutcome {
        self.create_listed_trip(Endpoint::CreateTripForMyTrips, trip)
    }

    pub fn trip(&self, id: TripId) -> ResponseOutcome {
        self.call(Endpoint::Trip(id))
    }

    pub fn update_trip(&self, id: TripId, patch: &TripPatch) -> ResponseOutcome {
        self.call_json(Endpoint::UpdateTrip(id), patch)
    }

    pub fn delete_trip(&self, id: TripId) -> ResponseOutcome {
        self.call(Endpoint::DeleteTrip(id))
    }

    /// Move a trip from the bucket list to My Trips.
    pub fn complete_trip(&self, id: TripId) -> ResponseOutcome {
        self.call(Endpoint::CompleteTrip(id))
    }

    pub fn add_to_bucket_list(&self, trip_id: TripId) -> ResponseOutcome {
        self.call_json(Endpoint::AddToBucketList, &TripRef { trip_id })
    }

    pub fn add_to_my_trips(&self, trip_id: TripId) -> ResponseOutcome {
        self.call_json(Endpoint::AddToMyTrips, &TripRef { trip_id })
    }

    pub fn create_plan(&self, trip_id: TripId, plan: &PlanInput) -> ResponseOutcome {
        self.call_json(Endpoint::CreatePlan(trip_id), plan)
    }

    pub fn delete_plan(&self, id: PlanId) -> ResponseOutcome {
        self.call(Endpoint::DeletePlan(id))
    }

    pub fn create_bnb(&self, trip_id: TripId, bnb: &BnbInput) -> ResponseOutcome {
        self.call_json(Endpoint::CreateBnb(trip_id), bnb)
    }

    pub fn update_bnb(&self, id: BnbId, patch: &BnbPatch) -> ResponseOutcome {
        self.call_json(Endpoint::UpdateBnb(id), patch)
    }

    pub fn create_rating(&self, bnb_id: BnbId, value: u8) -> ResponseOutcome {
        self.call_json(Endpoint::CreateRating(bnb_id), &RatingInput { value })
    }

    pub fn create_review(&self, bnb_id: BnbId, review: &ReviewInput) -> ResponseOutcome {
        self.call_json(Endpoint::CreateReview(bnb_id), review)
    }

    pub fn current_weather(&self, city: &str) -> ResponseOutcome {
        self.call(Endpoint::CurrentWeather(city.to_string()))
    }

    fn create_listed_trip(&self, endpoint: Endpoint, trip: &NewTrip) -> ResponseOutcome {
        let Some(image) = &trip.image else {
            return self.call_json(endpoint, &trip.details);
        };
        let body = RequestBody::Multipart(trip.to_form(image));
        self.logged(&endpoint, self.dispatch(&endpoint, Some(body)))
    }

    fn call(&self, endpoint: Endpoint) -> ResponseOutcome {
        self.logged(&endpoint, self.dispatch(&endpoint, None))
    }

    fn call_json<P: Serialize>(&self, endpoint: Endpoint, payload: &P) -> ResponseOutcome {
        let outcome = serde_json::to_value(payload)
            .map_err(Into::into)
            .and_then(|body| self.dispatch(&endpoint, Some(RequestBody::Json(body))));
        self.logged(&endpoint, outcome)
    }

    /// Send `body` to `endpoint`'s route. The body must match the route's
    /// `BodyShape`.
    fn dispatch(&self, endpoint: &Endpoint, body: Option<RequestBody>) -> ResponseOutcome {
        let route = endpoint.route();
        debug_assert!(
            route.body.accepts(body.as_ref()),
            "{endpoint:?} does not accept {body:?}"
        );
        let mut spec = RequestSpec::new(route.path).method(route.method);
        spec.body = body;
        self.gateway.send(spec)
    }

    fn logged(&self, endpoint: &Endpoint, outcome: ResponseOutcome) -> ResponseOutcome {
        outcome.inspect_err(|e| error!("Error {}: {e}", endpoint.label()))
    }
}

fn credentials(username: &str, password: &str) -> UserCredentials {
    UserCredentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}
