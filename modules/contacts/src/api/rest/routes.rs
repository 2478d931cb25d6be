use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "CRM Contacts API"),
    paths(
        handlers::list_contacts,
        handlers::get_contact,
        handlers::create_contact,
        handlers::update_contact,
        handlers::delete_contact,
    ),
    components(schemas(
        dto::ContactDto,
        dto::ContactListDto,
        dto::CreateContactReq,
        dto::UpdateContactReq,
        problem::Problem,
    )),
    tags((name = "contacts", description = "Contact management"))
)]
pub struct ApiDoc;

/// Mount the contacts routes. The service and the timeout apply to these routes only;
/// `None` disables the timeout.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    timeout: Option<Duration>,
) -> Router {
    let contacts = Router::new()
        .route(
            "/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route(
            "/contacts/{id}",
            get(handlers::get_contact)
                .put(handlers::update_contact)
                .delete(handlers::delete_contact),
        )
        .layer(Extension(service));

    router.merge(with_timeout(contacts, timeout))
}

/// Requests running longer than `timeout` get 408.
fn with_timeout(router: Router, timeout: Option<Duration>) -> Router {
    match timeout {
        Some(timeout) => router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        )),
        None => router,
    }
}

/// Serve the generated OpenAPI document at `/openapi.json`.
pub fn register_openapi_route(router: Router) -> Router {
    router.route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
