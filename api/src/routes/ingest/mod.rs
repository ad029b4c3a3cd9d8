pub mod ingest_request;
pub mod ingest_route;
