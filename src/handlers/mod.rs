// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod assignments;
mod attendance;
mod error;
mod extract;
mod health;
mod metrics;
mod root;
mod shared_types;
mod tasks;
mod timetables;
mod users;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, track_requests};
pub use root::root_handler;

// Accounts
pub use users::{check_login, get_profile, list_students, login, logout, register, update_profile};

// Timetables and assignments
pub use assignments::{assign_timetable, get_assignment, list_assignments};
pub use timetables::{get_timetable, get_timetable_by_id, list_timetables, save_timetable};

// Attendance
pub use attendance::{attendance_analytics, attendance_history, submit_attendance};

// Task boards
pub use tasks::{routes as task_routes, CornerBoard, OngoingBoard};
