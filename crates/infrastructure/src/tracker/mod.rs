pub mod client;

pub use client::RestTicketTrackerClient;
