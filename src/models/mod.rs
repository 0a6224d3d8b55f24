//! Data models for the Classeviva REST API.
//!
//! This module contains the structures used to represent platform data:
//!
//! - `Profile`, `School`, `UserKind`, `Card`: the authenticated account
//! - `Grade`, `Period`, `Subject`: marks and grading structure
//! - `AgendaEvent`, `Lesson`, `CalendarDay`: schedule data
//! - `AbsenceEvent`: attendance events
//! - `NoticeboardItem`, `Document`: published material
//!
//! Field names mirror the wire format through `serde(rename)`; almost every
//! field is optional because the platform omits what it does not populate.

pub mod absences;
pub mod agenda;
pub mod documents;
pub mod grades;
pub mod noticeboard;
pub mod profile;

pub use absences::AbsenceEvent;
pub use agenda::{AgendaEvent, AgendaFilter, CalendarDay, Lesson};
pub use documents::{Document, DocumentStatus};
pub use grades::{Grade, Period, Subject, SubjectTeacher};
pub use noticeboard::NoticeboardItem;
pub use profile::{Card, Profile, School, TokenStatus, UserKind};
