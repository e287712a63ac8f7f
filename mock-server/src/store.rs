use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub type Id = u64;

#[derive(Clone, Debug)]
pub struct User {
    pub id: Id,
    pub username: String,
    password: String,
}

impl User {
    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }
}

#[derive(Clone, Debug, Default)]
pub struct Trip {
    pub id: Id,
    pub owner: Id,
    pub name: String,
    pub location: String,
    pub date: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Plan {
    pub id: Id,
    #[serde(skip)]
    pub trip: Id,
    pub name: String,
    pub activity: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Bnb {
    pub id: Id,
    pub trip: Id,
    pub name: String,
    pub address: String,
    pub availability: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Rating {
    pub id: Id,
    #[serde(skip)]
    pub bnb: Id,
    pub value: u8,
}

#[derive(Clone, Debug, Serialize)]
pub struct Review {
    pub id: Id,
    #[serde(skip)]
    pub bnb: Id,
    pub statement: String,
    pub rating: Option<u8>,
}

/// An uploaded trip image.
#[derive(Clone, Debug)]
pub struct StoredImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Which of a user's two lists a trip belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum List {
    BucketList,
    MyTrips,
}

/// All backend state. Every id is drawn from one counter.
#[derive(Debug, Default)]
pub struct Store {
    next_id: Id,
    users: BTreeMap<Id, User>,
    sessions: HashMap<String, Id>,
    pub trips: BTreeMap<Id, Trip>,
    bucket_lists: HashMap<Id, BTreeSet<Id>>,
    my_trips: HashMap<Id, BTreeSet<Id>>,
    pub plans: BTreeMap<Id, Plan>,
    pub bnbs: BTreeMap<Id, Bnb>,
    pub ratings: BTreeMap<Id, Rating>,
    pub reviews: BTreeMap<Id, Review>,
    pub images: HashMap<String, StoredImage>,
}

impl Store {
    pub fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn user(&self, id: Id) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn create_user(&mut self, username: &str, password: &str) -> User {
        let user = User {
            id: self.next_id(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.users.insert(user.id, user.clone());
        self.bucket_lists.insert(user.id, BTreeSet::new());
        self.my_trips.insert(user.id, BTreeSet::new());
        user
    }

    pub fn rename_user(&mut self, id: Id, username: &str) {
        if let Some(user) = self.users.get_mut(&id) {
            user.username = username.to_string();
        }
    }

    pub fn delete_user(&mut self, id: Id) {
        self.users.remove(&id);
        self.sessions.retain(|_, user| *user != id);
        self.bucket_lists.remove(&id);
        self.my_trips.remove(&id);
        let owned: Vec<Id> = self
            .trips
            .values()
            .filter(|t| t.owner == id)
            .map(|t| t.id)
            .collect();
        for trip in owned {
            self.delete_trip(trip);
        }
    }

    pub fn open_session(&mut self, user: Id) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), user);
        token
    }

    pub fn close_session(&mut self, token: &str) {
        self.sessions.remove(token);
    }

    pub fn session_user(&self, token: &str) -> Option<&User> {
        self.sessions.get(token).and_then(|id| self.users.get(id))
    }

    pub fn insert_trip(&mut self, trip: Trip) -> Id {
        let id = trip.id;
        self.trips.insert(id, trip);
        id
    }

    /// The trip if it exists and belongs to `owner`.
    pub fn owned_trip(&self, owner: Id, id: Id) -> Option<&Trip> {
        self.trips.get(&id).filter(|t| t.owner == owner)
    }

    pub fn delete_trip(&mut self, id: Id) {
        self.trips.remove(&id);
        for list in self.bucket_lists.values_mut().chain(self.my_trips.values_mut()) {
            list.remove(&id);
        }
        self.plans.retain(|_, p| p.trip != id);
        let bnbs: Vec<Id> = self
            .bnbs
            .values()
            .filter(|b| b.trip == id)
            .map(|b| b.id)
            .collect();
        for bnb in bnbs {
            self.bnbs.remove(&bnb);
            self.ratings.retain(|_, r| r.bnb != bnb);
            self.reviews.retain(|_, r| r.bnb != bnb);
        }
    }

    pub fn add_to_list(&mut self, user: Id, list: List, trip: Id) {
        let lists = match list {
            List::BucketList => &mut self.bucket_lists,
            List::MyTrips => &mut self.my_trips,
        };
        lists.entry(user).or_default().insert(trip);
    }

    pub fn remove_from_list(&mut self, user: Id, list: List, trip: Id) {
        let lists = match list {
            List::BucketList => &mut self.bucket_lists,
            List::MyTrips => &mut self.my_trips,
        };
        if let Some(trips) = lists.get_mut(&user) {
            trips.remove(&trip);
        }
    }

    pub fn list(&self, user: Id, list: List) -> Vec<Value> {
        let lists = match list {
            List::BucketList => &self.bucket_lists,
            List::MyTrips => &self.my_trips,
        };
        lists
            .get(&user)
            .map(|ids| ids.iter().filter_map(|id| self.trip_json(*id)).collect())
            .unwrap_or_default()
    }

    pub fn bnb_for_trip(&self, trip: Id) -> Option<&Bnb> {
        self.bnbs.values().find(|b| b.trip == trip)
    }

    /// The BNB if its trip belongs to `owner`.
    pub fn owned_bnb(&self, owner: Id, id: Id) -> Option<&Bnb> {
        self.bnbs
            .get(&id)
            .filter(|b| self.owned_trip(owner, b.trip).is_some())
    }

    pub fn trip_json(&self, id: Id) -> Option<Value> {
        let trip = self.trips.get(&id)?;
        let plans: Vec<&Plan> = self.plans.values().filter(|p| p.trip == id).collect();
        Some(json!({
            "id": trip.id,
            "name": trip.name,
            "location": trip.location,
            "date": trip.date,
            "image": trip.image,
            "plans": plans,
            "bnb": self.bnb_for_trip(id).map(|b| self.bnb_json(b)),
        }))
    }

    pub fn bnb_json(&self, bnb: &Bnb) -> Value {
        let ratings: Vec<&Rating> = self.ratings.values().filter(|r| r.bnb == bnb.id).collect();
        let reviews: Vec<&Review> = self.reviews.values().filter(|r| r.bnb == bnb.id).collect();
        json!({
            "id": bnb.id,
            "name": bnb.name,
            "address": bnb.address,
            "availability": bnb.availability,
            "ratings": ratings,
            "reviews": reviews,
        })
    }
}
