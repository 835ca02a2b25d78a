//! Repository implementations for database operations.

pub mod dashboard;
pub mod employee;
pub mod leave_request;
pub mod notification;
pub mod salary;
pub mod schedule;
pub mod session;
pub mod user;

pub use dashboard::{DashboardRepository, DirectoryCounts, EmployeeLeaveCounts};
pub use employee::{EmployeeFilter, EmployeeRepository, EmployeeUpdate, NewEmployee, ProfileUpdate};
pub use leave_request::{LeaveRequestFilter, LeaveRequestRepository, NewLeaveRequest};
pub use notification::NotificationRepository;
pub use salary::{SalaryFilter, SalaryRepository};
pub use schedule::{ScheduleChanges, ScheduleRepository};
pub use session::SessionRepository;
pub use user::UserRepository;
