// veriscan: AI-generated content detection backend
//
// This is the library root. Each module corresponds to one component:
// the detection store, the scorers, the feedback log and the HTTP API.

pub mod config;
pub mod db;
pub mod feedback;
pub mod scoring;
pub mod status;
pub mod web;
