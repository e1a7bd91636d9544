pub mod connection_ledger;
pub mod join_request_queue;
pub mod team_roster;
