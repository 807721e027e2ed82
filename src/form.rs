use api_client::{BillingApi, error::ApiError};
use core_types::{Client, ClientFields};

/// Whether submitting the form creates a new client or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(i32),
}

/// Values given on the command line; `None` leaves the field as loaded.
#[derive(Debug, Clone, Default)]
pub struct FieldChanges {
    pub customer_name: Option<String>,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { id_client: i32, message: String },
    Updated { id_client: i32, message: String },
}

impl SubmitOutcome {
    pub fn message(&self) -> &str {
        match self {
            SubmitOutcome::Created { message, .. } | SubmitOutcome::Updated { message, .. } => {
                message
            }
        }
    }

    pub fn id_client(&self) -> i32 {
        match self {
            SubmitOutcome::Created { id_client, .. } | SubmitOutcome::Updated { id_client, .. } => {
                *id_client
            }
        }
    }
}

/// The client edit form. `editing` holds the id of the client being edited;
/// `None` means the form creates a new client.
#[derive(Debug, Clone, Default)]
pub struct ClientForm {
    editing: Option<i32>,
    fields: ClientFields,
}

impl ClientForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        match self.editing {
            Some(id_client) => FormMode::Update(id_client),
            None => FormMode::Create,
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> &ClientFields {
        &self.fields
    }

    /// Populates the form from `client` and switches to update mode.
    pub fn load(&mut self, client: &Client) {
        self.editing = Some(client.id_client);
        self.fields = client.fields();
    }

    pub fn apply(&mut self, changes: FieldChanges) {
        let FieldChanges {
            customer_name,
            identification,
            address,
            phone_number,
            email,
        } = changes;
        let fields = &mut self.fields;
        for (slot, value) in [
            (&mut fields.customer_name, customer_name),
            (&mut fields.identification, identification),
            (&mut fields.address, address),
            (&mut fields.phone_number, phone_number),
            (&mut fields.email, email),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    /// Back to an empty form in create mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// POSTs in create mode, PUTs in update mode. The form resets only on
    /// success, so a failed submit can be retried as is.
    pub async fn submit(&mut self, api: &dyn BillingApi) -> Result<SubmitOutcome, ApiError> {
        let outcome = match self.mode() {
            FormMode::Create => {
                let created = api.create_client(&self.fields).await?;
                SubmitOutcome::Created {
                    id_client: created.id_client,
                    message: created.message,
                }
            }
            FormMode::Update(id_client) => {
                let updated = api.update_client(id_client, &self.fields).await?;
                SubmitOutcome::Updated {
                    id_client,
                    message: updated.message,
                }
            }
        };
        self.reset();
        Ok(outcome)
    }
}
