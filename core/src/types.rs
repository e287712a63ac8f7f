//! Request payloads for the trip-planner API.
//!
//! # Design
//! Responses are passed through as `serde_json::Value`, so only the request
//! side is typed. Optional fields are skipped when absent, which gives the
//! partial-update semantics the backend's PATCH views expect.

use serde::{Deserialize, Serialize};

use crate::multipart::MultipartForm;

pub type TripId = u64;
pub type PlanId = u64;
pub type BnbId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

/// Profile update. The backend requires the current password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountDeletion {
    pub password: String,
}

/// Fields of a trip. `date` is an ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripDetails {
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// An image uploaded alongside a new trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A trip to create in one of the user's lists, optionally with an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub details: TripDetails,
    pub image: Option<ImageAttachment>,
}

impl NewTrip {
    pub fn new(details: TripDetails) -> Self {
        Self {
            details,
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    /// Form fields in backend order: name, location, date (when set), image.
    pub(crate) fn to_form(&self, image: &ImageAttachment) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("name", self.details.name.as_str())
            .text("location", self.details.location.as_str());
        if let Some(date) = self.details.date.as_deref().filter(|d| !d.is_empty()) {
            form = form.text("date", date);
        }
        form.file(
            "image",
            image.file_name.as_str(),
            image.content_type.as_str(),
            image.bytes.clone(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripRef {
    pub trip_id: TripId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BnbInput {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BnbPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
}

/// A 1 to 5 star rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingInput {
    pub value: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewInput {
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}
