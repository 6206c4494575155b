//! # Person

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A person who may own products
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Unique identifier, generated at creation
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Unique email address
    pub email: String,

    /// When the person was created
    pub created_at: DateTime<Utc>,
}

impl Person {
    /// Create a new person with a fresh identifier and creation time
    pub fn new(first_name: String, last_name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            created_at: super::now(),
        }
    }
}

/// `"{first_name} {last_name} ({email})"`, used as the owner label on
/// product listings.
impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.first_name, self.last_name, self.email)
    }
}
