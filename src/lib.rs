//! Read a CRM org's information over its REST API.
//!
//! A run loads a JSON credentials file, exchanges it for an OAuth2 access
//! token (password or client-credentials grant), optionally reads the
//! user-info resource and then reads the org-info resource, logging every
//! request and response to stdout and a timestamped file.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod options;
pub mod secret;
pub mod workflow;

#[cfg(test)]
mod test_support;
