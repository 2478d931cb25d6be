use sea_orm::Set;

use crate::contract::model::Contact;
use crate::infra::storage::entity::{ActiveModel as ContactAM, Model as ContactEntity};

impl From<ContactEntity> for Contact {
    fn from(entity: ContactEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone: entity.phone,
            title: entity.title,
            company_id: entity.company_id,
            owner_id: entity.owner_id,
            image: entity.image,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Fully-set active model; used for both insert and whole-row update.
pub fn contact_to_active_model(c: Contact) -> ContactAM {
    ContactAM {
        id: Set(c.id),
        first_name: Set(c.first_name),
        last_name: Set(c.last_name),
        email: Set(c.email),
        phone: Set(c.phone),
        title: Set(c.title),
        company_id: Set(c.company_id),
        owner_id: Set(c.owner_id),
        image: Set(c.image),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}
