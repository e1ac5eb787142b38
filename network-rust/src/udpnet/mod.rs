pub mod bcast;
mod sock;
