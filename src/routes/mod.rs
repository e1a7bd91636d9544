pub mod connection_routes;
pub mod event_routes;
pub mod join_request_routes;
pub mod profile_routes;
pub mod team_routes;
