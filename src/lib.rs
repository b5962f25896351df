pub mod app;
pub mod audit;
pub mod catalog;
pub mod comparison;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod export;
pub mod models;
pub mod pricing;
pub mod reconcile;
pub mod response;
pub mod retailers;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;
pub mod wizard;
