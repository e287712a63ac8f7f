//! Client core for the trip-planner backend API.
//!
//! # Overview
//! Talks to a session-cookie-authenticated backend. Every operation goes
//! through `RequestGateway`, which builds the request, classifies the response
//! by content type and normalizes failures into `ApiError`.
//!
//! # Design
//! - `ApiConfig` fixes the base URL once at startup; the gateway only reads it.
//! - `RequestGateway::resolve` and `RequestGateway::classify` have no I/O; the
//!   `Transport` trait carries the round-trip (`UreqTransport` in production).
//! - Request bodies are an explicit `RequestBody::Json` or
//!   `RequestBody::Multipart`, chosen by the caller.
//! - `Endpoint` is the single table of paths and methods; `TripApi` wraps it.

pub mod api;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod http;
pub mod multipart;
pub mod transport;
pub mod types;

pub use api::{not_authenticated, TripApi};
pub use config::ApiConfig;
pub use endpoints::{BodyShape, Endpoint, Route};
pub use error::ApiError;
pub use gateway::{RequestGateway, ResponseOutcome, Transport, TransportError};
pub use http::{Credentials, HttpMethod, HttpResponse, RequestBody, RequestSpec, ResolvedRequest};
pub use multipart::{MultipartForm, Part};
pub use transport::UreqTransport;
pub use types::{
    BnbInput, BnbPatch, ImageAttachment, NewTrip, PlanInput, ReviewInput, TripDetails, TripPatch,
    UserCredentials, UserUpdate,
};
