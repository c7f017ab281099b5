/**
 * Routes Module
 * API route handlers
 */

pub mod auth;
pub mod health;
pub mod projects;
pub mod skills;
pub mod testimonials;
