use serde::{Deserialize, Serialize};

use crate::domain::{base::Entity, entities::Ticket, DomainResult};

/// A ticket as it appears in the input data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub ticket_id: String,
    pub category: String,
    pub customer_issue: String,
    pub resolution_response: String,
}

impl TicketRecord {
    pub fn into_ticket(self) -> DomainResult<Ticket> {
        Ticket::from_parts(
            self.ticket_id,
            self.category,
            self.customer_issue,
            self.resolution_response,
        )
    }
}

/// The properties stored with each vector in the `CustomerSupport` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketProperties {
    pub ticket_id: String,
    pub category: String,
    pub customer_issue: String,
    pub resolution_response: String,
}

impl From<&Ticket> for TicketProperties {
    fn from(ticket: &Ticket) -> Self {
        TicketProperties {
            ticket_id: ticket.id().as_str().to_string(),
            category: ticket.category().as_str().to_string(),
            customer_issue: ticket.customer_issue().to_string(),
            resolution_response: ticket.resolution_response().to_string(),
        }
    }
}

/// Stored property names
pub mod properties {
    pub const TICKET_ID: &str = "ticketId";
    pub const CATEGORY: &str = "category";
    pub const CUSTOMER_ISSUE: &str = "customerIssue";
    pub const RESOLUTION_RESPONSE: &str = "resolutionResponse";

    /// Properties returned by search queries
    pub const DISPLAY: [&str; 3] = [CUSTOMER_ISSUE, CATEGORY, RESOLUTION_RESPONSE];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserializes_snake_case_input() {
        let record: TicketRecord = serde_json::from_value(json!({
            "ticket_id": "T1001",
            "category": "Billing",
            "customer_issue": "Refund not received",
            "resolution_response": "Refund issued"
        }))
        .unwrap();

        let ticket = record.into_ticket().unwrap();
        assert_eq!(ticket.id().as_str(), "T1001");
    }

    #[test]
    fn test_properties_serialize_camel_case() {
        let ticket =
            Ticket::from_parts("T1001", "Billing", "Refund not received", "Refund issued")
                .unwrap();

        let value = serde_json::to_value(TicketProperties::from(&ticket)).unwrap();
        assert_eq!(
            value,
            json!({
                "ticketId": "T1001",
                "category": "Billing",
                "customerIssue": "Refund not received",
                "resolutionResponse": "Refund issued"
            })
        );

        let object = value.as_object().unwrap();
        assert!(object.contains_key(properties::TICKET_ID));
        for name in properties::DISPLAY {
            assert!(object.contains_key(name));
        }
    }

    #[test]
    fn test_record_with_empty_id_is_rejected() {
        let record = TicketRecord {
            ticket_id: String::new(),
            category: "Billing".to_string(),
            customer_issue: "issue".to_string(),
            resolution_response: "response".to_string(),
        };
        assert!(record.into_ticket().is_err());
    }
}
