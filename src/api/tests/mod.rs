//! Tests for API routes.

mod routes;
