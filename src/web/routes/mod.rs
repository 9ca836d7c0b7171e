pub mod admin_routes;
pub mod tool_routes;
pub mod user_routes;
