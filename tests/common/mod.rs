#![allow(dead_code)]

pub mod csv_server;
pub mod tls_server;
