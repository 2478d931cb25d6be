use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    ContactDto, ContactListDto, CreateContactReq, ListContactsQuery, UpdateContactReq,
};
use crate::api::rest::error::{map_domain_error, JsonBody};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::ContactQuery;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// List contacts, optionally searched and/or filtered by owner
#[utoipa::path(
    get,
    path = "/contacts",
    tag = "contacts",
    operation_id = "contacts.list_contacts",
    params(ListContactsQuery),
    responses(
        (status = 200, description = "List of contacts", body = ContactListDto),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn list_contacts(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<ListContactsQuery>,
    uri: Uri,
) -> Result<Json<ContactListDto>, ProblemResponse> {
    info!("Listing contacts with query: {:?}", query);

    let query = ContactQuery::from(query);
    match svc.list_contacts(&query).await {
        Ok(contacts) => {
            let contacts: Vec<ContactDto> = contacts.into_iter().map(ContactDto::from).collect();
            Ok(Json(ContactListDto {
                total: contacts.len(),
                contacts,
            }))
        }
        Err(e) => {
            error!("Failed to list contacts: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific contact by ID
#[utoipa::path(
    get,
    path = "/contacts/{id}",
    tag = "contacts",
    operation_id = "contacts.get_contact",
    params(("id" = Uuid, Path, description = "Contact UUID")),
    responses(
        (status = 200, description = "Contact found", body = ContactDto),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn get_contact(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<Json<ContactDto>, ProblemResponse> {
    info!("Getting contact with id: {}", id);

    match svc.get_contact(id).await {
        Ok(Some(contact)) => Ok(Json(ContactDto::from(contact))),
        Ok(None) => Err(map_domain_error(
            &DomainError::contact_not_found(id),
            uri.path(),
        )),
        Err(e) => {
            error!("Failed to get contact {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a new contact
#[utoipa::path(
    post,
    path = "/contacts",
    tag = "contacts",
    operation_id = "contacts.create_contact",
    request_body = CreateContactReq,
    responses(
        (status = 201, description = "Created contact", body = ContactDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn create_contact(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    JsonBody(req_body): JsonBody<CreateContactReq>,
) -> Result<(StatusCode, Json<ContactDto>), ProblemResponse> {
    info!("Creating contact: {:?}", req_body);

    match svc.create_contact(req_body.into()).await {
        Ok(contact) => Ok((StatusCode::CREATED, Json(ContactDto::from(contact)))),
        Err(e) => {
            error!("Failed to create contact: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Edit an existing contact
#[utoipa::path(
    put,
    path = "/contacts/{id}",
    tag = "contacts",
    operation_id = "contacts.update_contact",
    params(("id" = Uuid, Path, description = "Contact UUID")),
    request_body = UpdateContactReq,
    responses(
        (status = 200, description = "Updated contact", body = ContactDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn update_contact(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    JsonBody(req_body): JsonBody<UpdateContactReq>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    info!("Updating contact {} with: {:?}", id, req_body);

    match svc.update_contact(id, req_body.into()).await {
        Ok(contact) => Ok(Json(ContactDto::from(contact))),
        Err(e) => {
            error!("Failed to update contact {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a contact by ID. Deleting an unknown id succeeds.
#[utoipa::path(
    delete,
    path = "/contacts/{id}",
    tag = "contacts",
    operation_id = "contacts.delete_contact",
    params(("id" = Uuid, Path, description = "Contact UUID")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn delete_contact(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting contact: {}", id);

    match svc.delete_contact(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete contact {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
