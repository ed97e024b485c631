// Dashboard handlers
pub mod d402_shared_dashboard;
