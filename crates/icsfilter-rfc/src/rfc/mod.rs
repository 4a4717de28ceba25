pub mod filter;
pub mod ical;
