use crate::domain::client::Client;
use crate::errors::DomainError;

/// Client directory: upsert-by-name store held for the lifetime of one
/// session. Names match case-insensitively on their trimmed form; an upsert
/// that matches an existing client overwrites every mutable field in place
/// and keeps the record's original position and name casing.
#[derive(Clone, Debug, Default)]
pub struct ClientDirectory {
    clients: Vec<Client>,
}

impl ClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_clients(clients: impl IntoIterator<Item = Client>) -> Self {
        let mut directory = Self::new();
        for client in clients {
            let _ = directory.upsert(client);
        }
        directory
    }

    /// Update-or-insert, never a duplicate row. Returns the stored record.
    pub fn upsert(&mut self, client: Client) -> Result<Client, DomainError> {
        let trimmed = client.name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidClient);
        }
        let key = trimmed.to_lowercase();

        match self.clients.iter_mut().find(|existing| name_key(&existing.name) == key) {
            Some(existing) => {
                // The stored name keeps its first-saved casing.
                existing.contact_name = client.contact_name;
                existing.email = client.email;
                existing.phone = client.phone;
                existing.payment_days = client.payment_days;
                existing.logistics_cost = client.logistics_cost;
                existing.pricing_default = client.pricing_default;
                Ok(existing.clone())
            }
            None => {
                let stored = Client { name: trimmed.to_owned(), ..client };
                self.clients.push(stored.clone());
                Ok(stored)
            }
        }
    }

    /// All clients in first-insert order, preserved across in-place updates.
    pub fn list(&self) -> Vec<Client> {
        self.clients.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Result<&Client, DomainError> {
        let key = name_key(name);
        self.clients
            .iter()
            .find(|client| name_key(&client.name) == key)
            .ok_or_else(|| DomainError::NotFound { name: name.trim().to_owned() })
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
