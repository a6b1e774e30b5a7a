pub mod audit;
pub mod bookings;
pub mod cars;
pub mod clients;
pub mod totals;
pub mod work_orders;
