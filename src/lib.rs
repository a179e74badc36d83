// Library for tests to access modules

pub mod config;
pub mod error;
pub mod flame_graph;
pub mod histogram;
pub mod merging;
pub mod models;
pub mod series;
pub mod service;
pub mod source;
