//! Integration tests: dashboard API over the router and the full chat path
//! from feed events to delivered replies.

mod admission_flow_test;
mod api_test;
mod helpers;
