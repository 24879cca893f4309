pub mod bridge;
pub mod pages;
pub mod waitlist;
