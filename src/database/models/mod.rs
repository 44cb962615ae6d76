pub mod device;
pub mod faculty;
pub mod manufacturer;
pub mod power_spec;
pub mod responsible_person;
pub mod user;

pub use device::{Device, DeviceData, DeviceInfo, DeviceUpdate, NewDevice, NewDeviceData};
pub use faculty::{Faculty, NewFaculty};
pub use manufacturer::{Manufacturer, NewManufacturer};
pub use power_spec::{NewPowerSpec, PowerSpec};
pub use responsible_person::{NewResponsiblePerson, ResponsiblePerson, ResponsiblePersonFilter};
pub use user::{User, UserSummary};
