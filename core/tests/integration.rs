//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every `TripApi`
//! operation over real HTTP through `UreqTransport`, so session cookies,
//! multipart uploads and redirects all go through the actual network stack.

use serde_json::json;
use trip_core::{
    not_authenticated, ApiConfig, ApiError, BnbInput, BnbPatch, ImageAttachment, NewTrip,
    PlanInput, ReviewInput, TripApi, TripDetails, TripPatch, UserUpdate,
};

/// Start the mock server on a random port and return its origin.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(origin: &str) -> TripApi<trip_core::UreqTransport> {
    TripApi::connect(ApiConfig::with_base_url(&format!("{origin}/api")))
}

fn details(name: &str, location: &str) -> TripDetails {
    TripDetails {
        name: name.to_string(),
        location: location.to_string(),
        date: Some("2026-07-01".to_string()),
    }
}

fn trip_ids(list: &serde_json::Value) -> Vec<u64> {
    list["trips"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect()
}

#[test]
fn trip_lifecycle() {
    let origin = start_server();
    let api = client(&origin);

    // Step 1: no session yet.
    assert_eq!(api.check_auth(), not_authenticated());

    // Step 2: register and log in; the session cookie is kept by the agent.
    api.register("ana", "pw").unwrap();
    let login = api.login("ana", "pw").unwrap();
    assert_eq!(login["username"], "ana");
    let auth = api.check_auth();
    assert_eq!(auth["is_authenticated"], true);
    assert_eq!(api.current_user()["username"], "ana");

    // Step 3: create a bucket-list trip with an image (multipart).
    let trip = NewTrip::new(details("Summer", "Lisbon")).with_image(ImageAttachment {
        file_name: "tram.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 0, 1, 2],
    });
    let created = api.create_trip_for_bucket_list(&trip).unwrap();
    assert_eq!(created["trip"]["name"], "Summer");
    assert_eq!(created["trip"]["date"], "2026-07-01");
    let lisbon = created["trip"]["id"].as_u64().unwrap();
    let image_path = created["trip"]["image"].as_str().unwrap().to_string();
    let mut image = ureq::get(&format!("{origin}{image_path}")).call().unwrap();
    assert_eq!(
        image.body_mut().read_to_vec().unwrap(),
        vec![0x89, b'P', b'N', b'G', 0, 1, 2]
    );

    // Step 4: create a My Trips trip without an image (JSON).
    let created = api
        .create_trip_for_my_trips(&NewTrip::new(details("Autumn", "Porto")))
        .unwrap();
    let porto = created["trip"]["id"].as_u64().unwrap();

    assert_eq!(trip_ids(&api.bucket_list().unwrap()), vec![lisbon]);
    assert_eq!(trip_ids(&api.my_trips().unwrap()), vec![porto]);

    // Step 5: the same GET twice gives equal payloads.
    assert_eq!(api.trip(lisbon).unwrap(), api.trip(lisbon).unwrap());

    // Step 6: plans.
    let plan = api
        .create_plan(
            lisbon,
            &PlanInput {
                name: "Tram 28".to_string(),
                activity: Some("Ride across Alfama".to_string()),
            },
        )
        .unwrap();
    let plan_id = plan["id"].as_u64().unwrap();
    assert_eq!(api.trip(lisbon).unwrap()["plans"][0]["name"], "Tram 28");
    api.delete_plan(plan_id).unwrap();
    assert_eq!(api.trip(lisbon).unwrap()["plans"], json!([]));

    // Step 7: lodging, rating, review.
    let bnb = api
        .create_bnb(
            lisbon,
            &BnbInput {
                name: "Casa Azul".to_string(),
                address: "Rua Augusta 1".to_string(),
                availability: None,
            },
        )
        .unwrap();
    let bnb_id = bnb["id"].as_u64().unwrap();
    assert_eq!(bnb["availability"], true);
    let bnb = api
        .update_bnb(
            bnb_id,
            &BnbPatch {
                availability: Some(false),
                ..BnbPatch::default()
            },
        )
        .unwrap();
    assert_eq!(bnb["availability"], false);
    assert_eq!(bnb["name"], "Casa Azul");
    api.create_rating(bnb_id, 5).unwrap();
    api.create_review(
        bnb_id,
        &ReviewInput {
            statement: "Lovely terrace".to_string(),
            rating: Some(5),
        },
    )
    .unwrap();
    let fetched = api.trip(lisbon).unwrap();
    assert_eq!(fetched["bnb"]["ratings"][0]["value"], 5);
    assert_eq!(fetched["bnb"]["reviews"][0]["statement"], "Lovely terrace");

    // Step 8: update and complete.
    let updated = api
        .update_trip(
            lisbon,
            &TripPatch {
                name: Some("Early summer".to_string()),
                ..TripPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated["trip"]["name"], "Early summer");
    assert_eq!(updated["trip"]["location"], "Lisbon");
    api.complete_trip(lisbon).unwrap();
    assert!(trip_ids(&api.bucket_list().unwrap()).is_empty());
    assert_eq!(trip_ids(&api.my_trips().unwrap()), vec![lisbon, porto]);

    // Step 9: categorize an existing trip.
    let created = api.create_trip(&details("Someday", "Reykjavik")).unwrap();
    let reykjavik = created["trip"]["id"].as_u64().unwrap();
    assert!(trip_ids(&api.bucket_list().unwrap()).is_empty());
    api.add_to_bucket_list(reykjavik).unwrap();
    assert_eq!(trip_ids(&api.bucket_list().unwrap()), vec![reykjavik]);
    api.add_to_my_trips(reykjavik).unwrap();
    assert!(trip_ids(&api.my_trips().unwrap()).contains(&reykjavik));

    // Step 10: weather.
    let weather = api.current_weather("São Paulo").unwrap();
    assert_eq!(weather["city"], "São Paulo");

    // Step 11: delete, then the trip is gone.
    api.delete_trip(porto).unwrap();
    let err = api.trip(porto).unwrap_err();
    assert_eq!(
        err,
        ApiError::HttpError {
            status: 404,
            message: "Trip not found.".to_string()
        }
    );

    // Step 12: rename, log out, session is gone.
    let renamed = api
        .update_user(&UserUpdate {
            username: Some("ana.b".to_string()),
            password: "pw".to_string(),
        })
        .unwrap();
    assert_eq!(renamed["username"], "ana.b");
    api.logout().unwrap();
    assert_eq!(api.check_auth(), not_authenticated());
}

#[test]
fn login_rejection_is_http_error() {
    let origin = start_server();
    let api = client(&origin);
    api.register("bo", "secret").unwrap();

    let err = api.login("bo", "wrong").unwrap_err();
    assert_eq!(
        err,
        ApiError::HttpError {
            status: 401,
            message: "Invalid username or password".to_string()
        }
    );
    assert_eq!(api.check_auth(), not_authenticated());
}

#[test]
fn current_user_redirect_to_login_page_is_recovered() {
    let origin = start_server();
    let api = client(&origin);

    // The redirect ends on an HTML page with a 2xx status.
    let route = trip_core::Endpoint::CurrentUser.route();
    let err = api
        .gateway()
        .send(trip_core::RequestSpec::new(route.path).method(route.method))
        .unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedNonJsonResponse { status: 200, .. }));

    assert_eq!(api.current_user(), not_authenticated());
}

#[test]
fn unknown_route_is_non_json_error() {
    let origin = start_server();
    let api = client(&origin);
    let err = api
        .gateway()
        .send(trip_core::RequestSpec::new("/does-not-exist/"))
        .unwrap_err();
    assert!(matches!(err, ApiError::NonJsonErrorResponse { status: 404, .. }));
}

#[test]
fn unreachable_backend_is_recovered_by_probes() {
    // Bind and drop a listener so the port is closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let api = client(&format!("http://{addr}"));

    assert_eq!(api.check_auth(), not_authenticated());
    assert_eq!(api.current_user(), not_authenticated());
    assert!(matches!(
        api.bucket_list().unwrap_err(),
        ApiError::NetworkUnreachable { .. }
    ));
}

#[test]
fn account_deletion_ends_session() {
    let origin = start_server();
    let api = client(&origin);
    api.register("cy", "pw").unwrap();
    api.login("cy", "pw").unwrap();

    let err = api.delete_user("bad").unwrap_err();
    assert_eq!(err.status(), Some(403));

    api.delete_user("pw").unwrap();
    assert_eq!(api.check_auth(), not_authenticated());
    assert!(api.login("cy", "pw").is_err());
}

#[test]
fn same_origin_config_resolves_relative_base() {
    let origin = start_server();
    // Pretend the page is served by the backend on its own port.
    let config = ApiConfig::resolve(None, Some("http://localhost:8000"));
    assert_eq!(config.base_url(), "/api");

    // Relative URLs are completed from the transport's origin.
    let transport = trip_core::UreqTransport::new().with_origin(&origin);
    let api = TripApi::new(trip_core::RequestGateway::new(config, transport));
    assert_eq!(api.check_auth(), not_authenticated());
    let weather = api.current_weather("Oslo").unwrap();
    assert_eq!(weather["city"], "Oslo");
}
