// ABOUTME: Test helper module organization
// ABOUTME: Re-exports HTTP testing utilities shared across integration tests

pub mod axum_test;
