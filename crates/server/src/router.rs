//! Declarative route table and router assembly.
//!
//! Every endpoint is declared once in [`routes`] with its access level.
//! [`build_router`] partitions the table, attaches the auth gate to the
//! protected partition only, and layers the shared pipeline so that the
//! rate limiter decides first and the logger sees everything admitted:
//!
//! ```text
//! rate limiter -> request logger -> auth gate (protected only) -> handler
//! ```

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use courier_core::middleware::RateLimiter;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    handlers::{chats, events, files, items, maps, orders, users},
    middleware::{bearer_auth_middleware, rate_limit_middleware, request_logger},
    state::AppState,
};

/// Largest accepted request body, uploads included.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Whether a route requires a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

struct RouteSpec {
    path: &'static str,
    access: Access,
    handler: MethodRouter<AppState>,
}

fn route(path: &'static str, access: Access, handler: MethodRouter<AppState>) -> RouteSpec {
    RouteSpec { path, access, handler }
}

/// The complete route table. Registration, login, and refresh are the only
/// public routes; every entry declares its access explicitly, so a new
/// endpoint cannot silently skip the auth gate.
fn routes() -> Vec<RouteSpec> {
    use Access::{Protected, Public};

    vec![
        // Users
        route("/users/new", Public, post(users::register)),
        route("/users/login", Public, post(users::login)),
        route("/users/refresh", Public, post(users::refresh)),
        route("/users/all", Protected, get(users::list)),
        route("/users/id/:id", Protected, get(users::get)),
        route("/users/update", Protected, put(users::update)),
        route("/users/delete/:id", Protected, delete(users::delete)),
        // Chats
        route("/chats/new", Protected, post(chats::create)),
        route("/chats/all", Protected, get(chats::list)),
        route("/chats/chat/update", Protected, put(chats::update)),
        route("/chats/chat/:id", Protected, get(chats::get)),
        route("/chats/chat/:id/delete", Protected, delete(chats::delete)),
        route("/chats/chat/:id/messages/new", Protected, post(chats::create_message)),
        route("/chats/chat/:id/messages", Protected, get(chats::list_messages)),
        route(
            "/chats/chat/:id/messages/message/:message_id/delete",
            Protected,
            delete(chats::delete_message),
        ),
        // Events
        route("/events/new", Protected, post(events::create)),
        route("/events/all", Protected, get(events::list)),
        route("/events/event/update", Protected, put(events::update)),
        route("/events/event/:id", Protected, get(events::get)),
        route("/events/event/:id/delete", Protected, delete(events::delete)),
        // Items
        route("/items/new", Protected, post(items::create)),
        route("/items/all", Protected, get(items::list)),
        route("/items/item/update", Protected, put(items::update)),
        route("/items/item/:id", Protected, get(items::get)),
        route("/items/item/:id/delete", Protected, delete(items::delete)),
        // Orders
        route("/orders/new", Protected, post(orders::create)),
        route("/orders/all", Protected, get(orders::list)),
        route("/orders/order/update", Protected, put(orders::update)),
        route("/orders/order/:id", Protected, get(orders::get)),
        route("/orders/order/:id/delete", Protected, delete(orders::delete)),
        // Maps
        route("/maps/from/:origin/to/:destination", Protected, get(maps::directions)),
        route("/maps/geocode/:address", Protected, get(maps::geocode)),
        route("/maps/reversegeocode/lat/:lat/long/:long", Protected, get(maps::reverse_geocode)),
        // Files
        route("/upload", Protected, post(files::upload)),
        route("/download", Protected, get(files::download)),
    ]
}

/// Assembles the application router with the full admission pipeline.
#[must_use]
pub fn build_router(state: AppState, rate_limiter: Arc<RateLimiter>) -> Router {
    let mut public = Router::new();
    let mut protected = Router::new();

    for spec in routes() {
        match spec.access {
            Access::Public => public = public.route(spec.path, spec.handler),
            Access::Protected => protected = protected.route(spec.path, spec.handler),
        }
    }

    let protected = protected.layer(middleware::from_fn_with_state(
        state.tokens.clone(),
        bearer_auth_middleware,
    ));

    // Outermost layer is applied last: rate limiting wraps the logger,
    // which wraps the body limit, routing, and the auth gate.
    public
        .merge(protected)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(request_logger))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware))
        .with_state(state)
}
