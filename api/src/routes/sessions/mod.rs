pub mod session_request;
pub mod session_route;
