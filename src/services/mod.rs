pub mod dashboard_service;
pub mod device_service;
pub mod faculty_service;
pub mod manufacturer_service;
pub mod power_spec_service;
pub mod responsible_person_service;
pub mod user_service;

pub use dashboard_service::{DashboardService, DashboardSummary};
pub use device_service::{DeviceList, DeviceService, DeviceStats};
pub use faculty_service::FacultyService;
pub use manufacturer_service::ManufacturerService;
pub use power_spec_service::PowerSpecService;
pub use responsible_person_service::ResponsiblePersonService;
pub use user_service::{format_last_login, split_name, LoginStats, NewUser, UserError, UserService, UserUpdate};
