pub mod bookings;
pub mod cars;
pub mod clients;
pub mod health;
pub mod work_orders;
