// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Security Level: valid token whose role is `admin`
// Route Prefix: /api/admin/*, /api/users/*
// Middleware: `authenticate` (401) wrapping `require_admin` (403)

pub mod dashboard; // Summary and login statistics
pub mod devices;   // Device registry writes
pub mod reference; // Faculties, manufacturers, power specifications
pub mod responsible_persons; // Faculty contacts
pub mod users;     // User administration

pub use dashboard::{dashboard_get, login_stats_get};
pub use devices::{device_data_put, device_delete, device_post, device_put};
pub use reference::{
    faculties_get, faculties_post, faculty_delete, manufacturer_delete, manufacturers_get, manufacturers_post,
    power_spec_delete, power_specs_get, power_specs_post,
};
pub use responsible_persons::{
    responsible_person_delete, responsible_person_put, responsible_persons_get, responsible_persons_post,
};
pub use users::{user_delete, user_get, user_put, users_get, users_post};
