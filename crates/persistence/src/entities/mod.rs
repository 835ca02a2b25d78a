//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod employee;
pub mod leave_request;
pub mod notification;
pub mod salary;
pub mod schedule;
pub mod user;

pub use employee::{EmployeeEntity, EmployeeStatusDb, EmployeeWithUserEntity};
pub use leave_request::{LeaveRequestEntity, LeaveRequestWithEmployeeEntity, LeaveStatusDb};
pub use notification::NotificationEntity;
pub use salary::{SalaryEntity, SalaryWithEmployeeEntity};
pub use schedule::ScheduleEntity;
pub use user::{AdminContactEntity, AuthContextEntity, UserEntity, UserRoleDb};
