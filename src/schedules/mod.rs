pub(crate) mod schedules_constants;
pub(crate) mod schedules_errors;
pub(crate) mod schedules_model;
pub(crate) mod schedules_repository;
pub(crate) mod schedules_service;
pub(crate) mod schedules_traits;

pub use schedules_constants::*;
pub use schedules_errors::ScheduleError;
pub use schedules_model::{
    NewScheduleEntry, ScheduleEntry, ScheduleEntryView, ScheduleStats, ScheduleStatus,
};
pub use schedules_repository::ScheduleRepository;
pub use schedules_service::ScheduleService;
pub use schedules_traits::{ScheduleRepositoryTrait, ScheduleServiceTrait};
