use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Pure contact model for inter-module communication (no serde/utoipa)
///
/// `company_id` and `owner_id` are weak references: nothing guarantees the
/// referenced company or user still exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub company_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Case-insensitive substring match on first name, last name, email and phone.
    /// An empty term matches every contact.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        std::iter::once(Some(self.first_name.as_str()))
            .chain([
                self.last_name.as_deref(),
                self.email.as_deref(),
                self.phone.as_deref(),
            ])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Data for creating a new contact
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub company_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub image: Option<String>,
}

impl NewContact {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a contact.
///
/// `first_name` is always supplied. Every other field is tri-state:
/// `None` keeps the stored value, `Some(None)` clears it and
/// `Some(Some(v))` replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactPatch {
    pub first_name: String,
    pub last_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub title: Option<Option<String>>,
    pub company_id: Option<Option<Uuid>>,
    pub owner_id: Option<Option<Uuid>>,
    pub image: Option<Option<String>>,
}

impl ContactPatch {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..Default::default()
        }
    }

    /// Apply this patch onto `contact`. Timestamps are left to the caller.
    pub fn apply_to(self, contact: &mut Contact) {
        contact.first_name = self.first_name;
        merge(&mut contact.last_name, self.last_name);
        merge(&mut contact.email, self.email);
        merge(&mut contact.phone, self.phone);
        merge(&mut contact.title, self.title);
        merge(&mut contact.company_id, self.company_id);
        merge(&mut contact.owner_id, self.owner_id);
        merge(&mut contact.image, self.image);
    }
}

fn merge<T>(slot: &mut Option<T>, change: Option<Option<T>>) {
    if let Some(value) = change {
        *slot = value;
    }
}

/// Filters accepted by the list operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactQuery {
    /// Restrict to contacts managed by this user (served by the `by_owner` index).
    pub owner_id: Option<Uuid>,
    /// Free-text search, see [`Contact::matches`].
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Contact {
        let now = Utc::now();
        Contact {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 7946 0000".to_string()),
            title: Some("Analyst".to_string()),
            company_id: None,
            owner_id: None,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn matches_is_case_insensitive_across_fields() {
        let c = ada();
        assert!(c.matches("ada"));
        assert!(c.matches("LOVE"));
        assert!(c.matches("@example"));
        assert!(c.matches("7946"));
        assert!(c.matches(""));
        // title is not searched
        assert!(!c.matches("analyst"));
        assert!(!c.matches("babbage"));
    }

    #[test]
    fn patch_keeps_absent_fields_and_clears_null_fields() {
        let mut c = ada();
        let patch = ContactPatch {
            first_name: "Augusta".to_string(),
            email: Some(Some("augusta@example.com".to_string())),
            phone: Some(None),
            ..Default::default()
        };
        patch.apply_to(&mut c);

        assert_eq!(c.first_name, "Augusta");
        assert_eq!(c.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(c.email.as_deref(), Some("augusta@example.com"));
        assert_eq!(c.phone, None);
        assert_eq!(c.title.as_deref(), Some("Analyst"));
    }
}
