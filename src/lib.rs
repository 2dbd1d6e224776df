pub mod bot_state;
pub mod business_hours;
pub mod calendar;
pub mod database;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod whatsapp;
