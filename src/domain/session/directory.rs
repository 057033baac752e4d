//! Contact fixtures for simulated calls

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Remote party identity used when a call is generated rather than dialed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub number: String,
    #[serde(default)]
    pub portrait: String,
}

impl Contact {
    pub fn new(name: &str, number: &str, portrait: &str) -> Self {
        Self {
            name: name.to_string(),
            number: number.to_string(),
            portrait: portrait.to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self::new("Unknown", "", "")
    }
}

/// Pool of contacts the simulated network picks from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
}

impl ContactDirectory {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    /// Random contact; `Contact::unknown()` when the directory is empty
    pub fn pick(&self) -> Contact {
        self.contacts
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(Contact::unknown)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl Default for ContactDirectory {
    fn default() -> Self {
        Self::new(default_contacts())
    }
}

/// Built-in directory
pub fn default_contacts() -> Vec<Contact> {
    vec![
        Contact::new("John Doe", "555-1234", "portrait1.jpg"),
        Contact::new("Waston Smith", "525-5678", "portrait2.jpg"),
        Contact::new("Jorden Smith", "1235-5678", "portrait2.jpg"),
        Contact::new("Diana Smith", "3455-5678", "portrait2.jpg"),
        Contact::new("Hana Smith", "453-5678", "portrait2.jpg"),
        Contact::new("Broline Smith", "5675-5678", "portrait2.jpg"),
        Contact::new("Aley Smith", "555-5678", "portrait2.jpg"),
        Contact::new("Kevin Smith", "555-5678", "portrait2.jpg"),
        Contact::new("Adam Smith", "555-5678", "portrait2.jpg"),
        Contact::new("Will Smith", "555-5678", "portrait2.jpg"),
        Contact::new("Bob Johnson", "555-9876", "portrait3.jpg"),
    ]
}
