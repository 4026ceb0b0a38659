pub mod event;
pub mod organizer;
pub mod volunteer;

pub use event::{CheckoutLink, CreateEventRequest, Event, NewEvent, UpdateEventRequest};
pub use organizer::Organizer;
pub use volunteer::Volunteer;
