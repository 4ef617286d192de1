use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post, put, MethodRouter},
    Router,
};
use liftlog_auth::{require_bearer, AuthState};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::health,
        resources::{
            create_record, delete_record, get_record, list_records, update_record, ApiResource,
        },
    },
    state::{AppState, Resources, Store},
};

/// Key segments of a single-key resource route.
const ID_PATH: &str = "/{id}";
/// Key segments of a compound-key resource route.
const COMPOUND_KEY_PATH: &str = "/{partition}/{row}";

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let auth = &state.auth;
    let (workouts, comments) = match state.resources {
        Resources::SingleKey { workouts, comments } => (
            resource_routes(workouts, auth, ID_PATH),
            resource_routes(comments, auth, ID_PATH),
        ),
        Resources::CompoundKey { workouts, comments } => (
            resource_routes(workouts, auth, COMPOUND_KEY_PATH),
            resource_routes(comments, auth, COMPOUND_KEY_PATH),
        ),
    };

    let api_routes = Router::new()
        .route("/health", get(health))
        .nest("/workout", workouts)
        .nest("/comment", comments)
        .layer(cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}

/// CRUD routes for one record type. Writes always require a bearer token;
/// reads do unless public reads are enabled.
fn resource_routes<R: ApiResource>(store: Store<R>, auth: &AuthState, key_path: &str) -> Router {
    let read = |route: MethodRouter<Store<R>>| {
        if auth.public_reads() {
            route
        } else {
            guarded(route, auth)
        }
    };

    Router::new()
        .route(
            "/",
            read(get(list_records::<R>)).merge(guarded(post(create_record::<R>), auth)),
        )
        .route(
            key_path,
            read(get(get_record::<R>)).merge(guarded(
                put(update_record::<R>).delete(delete_record::<R>),
                auth,
            )),
        )
        .with_state(store)
}

fn guarded<S>(route: MethodRouter<S>, auth: &AuthState) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(auth.clone(), require_bearer))
}
