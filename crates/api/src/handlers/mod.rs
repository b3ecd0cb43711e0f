pub mod bookings;
pub mod dashboard;
pub mod rooms;
pub mod settings;
