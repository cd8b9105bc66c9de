//! Customer service
//!
//! Handles single and bulk customer creation and customer lookups.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{Customer, CustomerId, CustomerInput};
use crate::domain::filters::{CustomerFilter, Page};
use crate::domain::ports::CustomerRepository;
use crate::domain::validation::validate_customer;
use crate::error::DomainError;

pub const CUSTOMER_CREATED_MESSAGE: &str = "Customer created successfully";

/// Outcome of a bulk import
///
/// `errors` holds one `"Row N: <reason>"` entry per rejected row, where N is the
/// 1-based position of the row in the input.
#[derive(Debug, Clone, Default)]
pub struct BulkCreateResult {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
}

/// Service for managing customers
pub struct CustomerService<CR>
where
    CR: CustomerRepository,
{
    customers: Arc<CR>,
}

impl<CR> CustomerService<CR>
where
    CR: CustomerRepository,
{
    pub fn new(customers: Arc<CR>) -> Self {
        Self { customers }
    }

    /// Create a single customer
    ///
    /// Fails with `DuplicateKey` if the email is already taken and with
    /// `Validation` if any field is malformed. Nothing is written on failure.
    pub async fn create(&self, input: &CustomerInput) -> Result<Customer, DomainError> {
        let email = input.email.trim();
        if self.customers.find_by_email(email).await?.is_some() {
            return Err(DomainError::duplicate_email(email));
        }

        let new_customer = validate_customer(input)?;
        let customer = self.customers.create(&new_customer).await?;

        tracing::info!(customer_id = %customer.id, "Created customer");
        Ok(customer)
    }

    /// Create many customers, committing each valid row on its own
    ///
    /// A bad row never aborts the batch. Emails accepted earlier in the same
    /// batch are rejected before reaching the store; the store's unique
    /// constraint still catches concurrent imports.
    pub async fn bulk_create(&self, inputs: &[CustomerInput]) -> BulkCreateResult {
        let mut result = BulkCreateResult::default();
        let mut seen_emails: HashSet<String> = HashSet::new();

        for (idx, input) in inputs.iter().enumerate() {
            let row = idx + 1;
            let email = input.email.trim();

            let outcome = if seen_emails.contains(email) {
                Err(DomainError::duplicate_email(email))
            } else {
                self.create(input).await
            };

            match outcome {
                Ok(customer) => {
                    seen_emails.insert(customer.email.clone());
                    result.customers.push(customer);
                }
                Err(e) => {
                    tracing::debug!(row, error = %e, "Rejected customer row");
                    result.errors.push(format!("Row {}: {}", row, e));
                }
            }
        }

        tracing::info!(
            created = result.customers.len(),
            failed = result.errors.len(),
            "Bulk customer import finished"
        );
        result
    }

    /// Find a customer by ID
    pub async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        self.customers.find_by_id(id).await
    }

    /// List customers, newest first
    pub async fn list(
        &self,
        filters: &[CustomerFilter],
        page: Page,
    ) -> Result<Vec<Customer>, DomainError> {
        self.customers.list(filters, page).await
    }
}
