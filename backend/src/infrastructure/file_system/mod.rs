/// File system access for ticket data
mod ticket_file;

pub use ticket_file::{read_ticket_file, TicketFileError};
