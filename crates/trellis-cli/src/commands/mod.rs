pub mod generate;
pub mod routes;
