pub mod faq;
pub mod feedback;
pub mod object;
pub mod reservation;
pub mod role;
pub mod tag;
pub mod user;

pub use faq::Faq;
pub use feedback::Feedback;
pub use object::Object;
pub use reservation::{Reservation, ReservationStatus};
pub use role::Role;
pub use tag::Tag;
pub use user::User;

use crate::filter::Listing;

/// Every listing the API serves
pub fn listings() -> [&'static Listing; 7] {
    [
        &role::LISTING,
        &user::LISTING,
        &object::LISTING,
        &reservation::LISTING,
        &faq::LISTING,
        &tag::LISTING,
        &feedback::LISTING,
    ]
}
