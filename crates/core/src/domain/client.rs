use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Matricule fiscal
    pub tax_number: Option<String>,
}

/// Client form payload before an id is assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
}

impl NewClient {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("client name is required".to_string()));
        }
        Ok(())
    }

    pub fn into_client(self, id: ClientId) -> Result<Client, DomainError> {
        self.validate()?;
        Ok(Client {
            id,
            name: self.name.trim().to_string(),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            city: non_blank(self.city),
            postal_code: non_blank(self.postal_code),
            tax_number: non_blank(self.tax_number),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ClientId, NewClient};
    use crate::errors::DomainError;

    #[test]
    fn client_name_is_required() {
        let error = NewClient { name: "  ".to_string(), ..NewClient::default() }
            .into_client(ClientId("C-1".to_string()))
            .expect_err("blank name should be rejected");
        assert!(matches!(error, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        let client = NewClient {
            name: " Société Sfax Import ".to_string(),
            email: Some("  ".to_string()),
            city: Some("Sfax".to_string()),
            ..NewClient::default()
        }
        .into_client(ClientId("C-2".to_string()))
        .expect("valid client");

        assert_eq!(client.name, "Société Sfax Import");
        assert_eq!(client.email, None);
        assert_eq!(client.city.as_deref(), Some("Sfax"));
    }
}
