use serde::{Deserialize, Serialize};

/// Event-code filter for the agenda endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgendaFilter {
    #[default]
    All,
    Homework,
    Notes,
}

impl AgendaFilter {
    /// Path segment the platform expects for this filter.
    pub(crate) fn code(self) -> &'static str {
        match self {
            AgendaFilter::All => "all",
            AgendaFilter::Homework => "AGHW",
            AgendaFilter::Notes => "AGNT",
        }
    }
}

/// An agenda entry from `/students/{id}/agenda/{filter}/{begin}/{end}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaEvent {
    #[serde(rename = "evtId")]
    pub evt_id: Option<i64>,
    #[serde(rename = "evtCode")]
    pub evt_code: Option<String>,
    #[serde(rename = "evtDatetimeBegin")]
    pub evt_datetime_begin: Option<String>,
    #[serde(rename = "evtDatetimeEnd")]
    pub evt_datetime_end: Option<String>,
    #[serde(rename = "isFullDay", default)]
    pub is_full_day: bool,
    pub notes: Option<String>,
    #[serde(rename = "authorName")]
    pub author_name: Option<String>,
    #[serde(rename = "classDesc")]
    pub class_desc: Option<String>,
    #[serde(rename = "subjectId")]
    pub subject_id: Option<i64>,
    #[serde(rename = "subjectDesc")]
    pub subject_desc: Option<String>,
}

/// A lesson from `/students/{id}/lessons/...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(rename = "evtId")]
    pub evt_id: Option<i64>,
    #[serde(rename = "evtDate")]
    pub evt_date: Option<String>,
    #[serde(rename = "evtHPos")]
    pub evt_h_pos: Option<i32>,
    #[serde(rename = "evtDuration")]
    pub evt_duration: Option<i32>,
    #[serde(rename = "classDesc")]
    pub class_desc: Option<String>,
    #[serde(rename = "authorName")]
    pub author_name: Option<String>,
    #[serde(rename = "subjectId")]
    pub subject_id: Option<i64>,
    #[serde(rename = "subjectCode")]
    pub subject_code: Option<String>,
    #[serde(rename = "subjectDesc")]
    pub subject_desc: Option<String>,
    #[serde(rename = "lessonType")]
    pub lesson_type: Option<String>,
    #[serde(rename = "lessonArg")]
    pub lesson_arg: Option<String>,
}

/// One day of the school calendar from `/students/{id}/calendar/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    #[serde(rename = "dayDate")]
    pub day_date: Option<String>,
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: Option<u8>,
    /// "SD" school day, "NW" non-working, "HD" holiday.
    #[serde(rename = "dayStatus")]
    pub day_status: Option<String>,
}
