//! Service and filter tests against an in-memory mock store.

mod companies;
mod mock;
