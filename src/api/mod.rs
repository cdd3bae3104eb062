//! HTTP layer: handlers, DTOs, middleware and the OpenAPI document.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
mod doc;

#[cfg(test)]
mod tests;
