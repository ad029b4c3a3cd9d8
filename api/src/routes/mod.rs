pub mod ask;
pub mod health_route;
pub mod ingest;
pub mod sessions;
