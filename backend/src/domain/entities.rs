/// Domain entities
use super::base::{DomainResult, Entity};
use super::value_objects::{Category, TicketId};

/// A customer-support ticket: an issue reported by a customer and the
/// response that resolved it.
///
/// Tickets are immutable once loaded; identity is the ticket id.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    id: TicketId,
    category: Category,
    customer_issue: String,
    resolution_response: String,
}

impl Ticket {
    pub fn new(
        id: TicketId,
        category: Category,
        customer_issue: impl Into<String>,
        resolution_response: impl Into<String>,
    ) -> Self {
        Ticket {
            id,
            category,
            customer_issue: customer_issue.into(),
            resolution_response: resolution_response.into(),
        }
    }

    /// Build a ticket from raw field values, validating the id and category
    pub fn from_parts(
        id: impl Into<String>,
        category: impl Into<String>,
        customer_issue: impl Into<String>,
        resolution_response: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Ticket::new(
            TicketId::new(id)?,
            Category::new(category)?,
            customer_issue,
            resolution_response,
        ))
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// The text that gets embedded
    pub fn customer_issue(&self) -> &str {
        &self.customer_issue
    }

    /// Stored alongside the vector, never embedded
    pub fn resolution_response(&self) -> &str {
        &self.resolution_response
    }
}

impl Entity for Ticket {
    type Id = TicketId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
